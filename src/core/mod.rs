//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod income;
pub mod log;
pub mod month;
pub mod outcome;
pub mod position;
pub mod profile;
pub mod timestamp;

// Re-export main types for cleaner imports
pub use cache::{CachedRate, RateSource, RateStore};
pub use currency::CurrencyRateProvider;
pub use month::MonthProgress;
pub use outcome::{DefaultReason, Outcome};
pub use position::CalculationResult;
pub use profile::{AssetSnapshot, UserConfig, ValidationError};

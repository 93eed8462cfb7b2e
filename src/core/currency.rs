//! Currency conversion abstractions

use anyhow::Result;
use async_trait::async_trait;

pub const USD: &str = "USD";
pub const EUR: &str = "EUR";

/// A live source of exchange rates. Implementations report every failure
/// as an error; degrading to a fallback is the caller's decision.
#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

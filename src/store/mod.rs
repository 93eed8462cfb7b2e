pub mod disk;
pub mod memory;
pub mod profile;

use crate::core::cache::RateStore;
use crate::core::config::AppConfig;
use anyhow::Result;
use disk::JsonFileRateStore;
use std::sync::Arc;

pub use memory::MemoryRateStore;
pub use profile::{ProfileStore, StoreError};

/// The persistent rate cache for `config`, under its data directory.
pub fn rate_store(config: &AppConfig) -> Result<Arc<dyn RateStore>> {
    Ok(Arc::new(JsonFileRateStore::new(config.rate_cache_path()?)))
}

pub fn profile_store(config: &AppConfig) -> Result<ProfileStore> {
    Ok(ProfileStore::new(config.data_dir()?))
}

pub mod caching;
pub mod exchange_rate_api;
pub mod util;

use crate::core::config::AppConfig;
use crate::core::RateStore;
use anyhow::Result;
use caching::CachingRateProvider;
use exchange_rate_api::ExchangeRateApiProvider;
use std::sync::Arc;

pub use caching::{RateInfo, RateOrigin, RateQuote};

/// Builds the cache-backed USD to EUR provider described by `config`.
pub fn exchange_rate_provider(
    config: &AppConfig,
    store: Arc<dyn RateStore>,
) -> Result<CachingRateProvider<ExchangeRateApiProvider>> {
    let api = &config.providers.exchange_rate;
    let inner =
        ExchangeRateApiProvider::new(&api.base_url, api.timeout())?.with_retries(api.retries);

    Ok(CachingRateProvider::new(inner, store)
        .with_ttl(config.cache.ttl())
        .with_fallback_rate(config.cache.fallback_rate))
}

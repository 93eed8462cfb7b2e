//! USD to EUR resolution: cache first, then the network, then a fixed rate.
//!
//! Nothing here fails outward. A stale or approximate rate is preferred over
//! blocking the dashboard on an external service; the [`RateOrigin`] of each
//! quote records which tier answered.

use crate::core::cache::{CachedRate, DEFAULT_RATE_TTL, RateSource, RateStore};
use crate::core::config::DEFAULT_FALLBACK_RATE;
use crate::core::currency::{CurrencyRateProvider, EUR, USD};
use crate::core::income::round_currency;
use crate::core::outcome::{DefaultReason, Outcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    Cache,
    Api,
    /// Neither cache nor network had a rate.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateQuote {
    pub rate: f64,
    pub origin: RateOrigin,
}

impl RateQuote {
    pub fn is_degraded(&self) -> bool {
        self.origin == RateOrigin::Fallback
    }
}

/// Diagnostic view of the cache, for display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateInfo {
    pub rate: f64,
    pub source: RateSource,
    pub last_updated: Option<DateTime<Utc>>,
    pub cache_valid: bool,
    pub cache_age_minutes: Option<i64>,
    pub error: Option<String>,
}

pub struct CachingRateProvider<T: CurrencyRateProvider> {
    inner: T,
    store: Arc<dyn RateStore>,
    ttl: Duration,
    fallback_rate: f64,
}

impl<T: CurrencyRateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, store: Arc<dyn RateStore>) -> Self {
        Self {
            inner,
            store,
            ttl: DEFAULT_RATE_TTL,
            fallback_rate: DEFAULT_FALLBACK_RATE,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fallback_rate(mut self, rate: f64) -> Self {
        self.fallback_rate = rate;
        self
    }

    fn fallback(&self) -> RateQuote {
        RateQuote {
            rate: self.fallback_rate,
            origin: RateOrigin::Fallback,
        }
    }

    pub async fn get_exchange_rate(&self) -> RateQuote {
        if let Some(rate) = self.get_cached_rate().await {
            return RateQuote {
                rate,
                origin: RateOrigin::Cache,
            };
        }
        self.fetch_and_cache().await
    }

    /// Ignores any cached entry and asks the network.
    pub async fn refresh_exchange_rate(&self) -> RateQuote {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Could not clear rate cache");
        }
        self.fetch_and_cache().await
    }

    async fn fetch_and_cache(&self) -> RateQuote {
        match self.fetch_rate_from_api().await {
            Some(rate) => {
                self.cache_rate(rate).await;
                RateQuote {
                    rate,
                    origin: RateOrigin::Api,
                }
            }
            None => {
                debug!("Using fallback rate {}", self.fallback_rate);
                self.fallback()
            }
        }
    }

    /// The cached rate if one exists, is readable and is younger than the
    /// ttl. Every other case is a miss.
    pub async fn get_cached_rate(&self) -> Option<f64> {
        self.cached_rate_at(Utc::now()).await
    }

    async fn cached_rate_at(&self, now: DateTime<Utc>) -> Option<f64> {
        match self.store.load().await {
            Ok(Some(entry)) if entry.is_fresh(now, self.ttl) => {
                debug!("Cache hit for currency rate: {}", entry.rate);
                Some(entry.rate)
            }
            Ok(Some(entry)) => {
                debug!("Cached currency rate expired at age {}", entry.age(now));
                None
            }
            Ok(None) => {
                debug!("Cache miss for currency rate");
                None
            }
            Err(e) => {
                debug!(error = %e, "Unreadable rate cache, treating as miss");
                None
            }
        }
    }

    /// Best effort; a failed write is logged and dropped.
    pub async fn cache_rate(&self, rate: f64) {
        if let Err(e) = self.store.save(&CachedRate::from_api(rate, Utc::now())).await {
            warn!(error = %e, "Failed to cache exchange rate");
        }
    }

    pub async fn fetch_rate_from_api(&self) -> Option<f64> {
        match self.inner.get_rate(USD, EUR).await {
            Ok(rate) => Some(rate),
            Err(e) => {
                warn!(error = %e, "Exchange rate fetch failed");
                None
            }
        }
    }

    /// Reports the cache state without touching the network.
    pub async fn rate_info(&self) -> RateInfo {
        let now = Utc::now();
        let fallback = |error: Option<String>| RateInfo {
            rate: self.fallback_rate,
            source: RateSource::Fallback,
            last_updated: None,
            cache_valid: false,
            cache_age_minutes: None,
            error,
        };

        match self.store.load().await {
            Ok(Some(entry)) => RateInfo {
                rate: entry.rate,
                source: entry.source,
                last_updated: Some(entry.timestamp),
                cache_valid: entry.is_fresh(now, self.ttl),
                cache_age_minutes: Some(entry.age(now).num_minutes()),
                error: None,
            },
            Ok(None) => fallback(None),
            Err(e) => fallback(Some(format!("{e:#}"))),
        }
    }

    /// Converts a USD amount with the current rate, rounded to cents.
    pub async fn convert_usd_to_eur(&self, usd_amount: f64) -> Outcome<f64> {
        if !usd_amount.is_finite() {
            return Outcome::defaulted(0.0, DefaultReason::NonFiniteInput);
        }
        if usd_amount < 0.0 {
            return Outcome::defaulted(0.0, DefaultReason::NegativeAmount);
        }
        let quote = self.get_exchange_rate().await;
        Outcome::Computed(round_currency(usd_amount * quote.rate))
    }
}

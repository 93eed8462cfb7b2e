use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;

/// How long a cached rate stays usable.
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Api,
    Fallback,
    #[serde(other)]
    Unknown,
}

impl Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateSource::Api => "api",
                RateSource::Fallback => "fallback",
                RateSource::Unknown => "unknown",
            }
        )
    }
}

/// A persisted USD to EUR rate and when it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRate {
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
    pub source: RateSource,
}

impl CachedRate {
    pub fn from_api(rate: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            rate,
            timestamp,
            source: RateSource::Api,
        }
    }

    /// Age relative to `now`. Negative for future-dated entries.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.timestamp)
    }

    /// Fresh while `age < ttl`. An entry exactly `ttl` old is stale; a
    /// future-dated entry is fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match self.age(now).to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }
}

/// Backing storage for the single rate-cache entry.
///
/// `load` distinguishes "nothing stored" (`Ok(None)`) from an unreadable
/// entry (`Err`) so diagnostics can report the latter.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn load(&self) -> Result<Option<CachedRate>>;
    async fn save(&self, entry: &CachedRate) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

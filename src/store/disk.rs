use crate::core::cache::{CachedRate, RateSource, RateStore};
use crate::core::timestamp::parse_timestamp;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk shape of the cache entry.
#[derive(Serialize, Deserialize)]
struct CacheRecord {
    rate: f64,
    timestamp: String,
    #[serde(default = "unknown_source")]
    source: RateSource,
}

fn unknown_source() -> RateSource {
    RateSource::Unknown
}

/// Keeps the rate cache as a small JSON document on disk.
///
/// Writes are not locked. A torn write surfaces as a parse error on the next
/// load, which callers treat as a miss.
pub struct JsonFileRateStore {
    path: PathBuf,
}

impl JsonFileRateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RateStore for JsonFileRateStore {
    async fn load(&self) -> Result<Option<CachedRate>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No rate cache at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read rate cache: {}", self.path.display())
                });
            }
        };

        let record: CacheRecord = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse rate cache: {}", self.path.display()))?;

        Ok(Some(CachedRate {
            rate: record.rate,
            timestamp: parse_timestamp(&record.timestamp)?,
            source: record.source,
        }))
    }

    async fn save(&self, entry: &CachedRate) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let record = CacheRecord {
            rate: entry.rate,
            timestamp: entry.timestamp.to_rfc3339(),
            source: entry.source,
        };
        let body = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("Failed to write rate cache: {}", self.path.display()))?;
        debug!("Cache PUT rate {} at {}", entry.rate, self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e)
                .with_context(|| format!("Failed to remove rate cache: {}", self.path.display())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonFileRateStore::new(dir.path().join("nested").join("rates.json"));

        assert!(store.load().await.unwrap().is_none());

        let entry = CachedRate::from_api(0.8542, Utc::now() - TimeDelta::minutes(3));
        store.save(&entry).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.rate, 0.8542);
        assert_eq!(loaded.source, RateSource::Api);
        assert_eq!(loaded.timestamp, entry.timestamp);
    }

    #[tokio::test]
    async fn test_written_file_has_expected_shape() {
        let dir = tempdir().unwrap();
        let store = JsonFileRateStore::new(dir.path().join("rates.json"));
        store
            .save(&CachedRate::from_api(0.91, Utc::now()))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["rate"], 0.91);
        assert_eq!(value["source"], "api");
        assert!(value["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_corrupt_entries_are_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rates.json");
        let store = JsonFileRateStore::new(&path);

        for body in [
            r#"{"rate": 0.85, "timestamp": "2024-"#,
            r#"{"timestamp": "2024-07-15T10:00:00"}"#,
            r#"{"rate": 0.85}"#,
            r#"{"rate": 0.85, "timestamp": "yesterday"}"#,
            r#"{"rate": "0.85", "timestamp": "2024-07-15T10:00:00"}"#,
            "",
        ] {
            std::fs::write(&path, body).unwrap();
            assert!(store.load().await.is_err(), "expected error for {body:?}");
        }
    }

    #[tokio::test]
    async fn test_missing_source_reads_as_unknown() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rates.json");
        std::fs::write(&path, r#"{"rate": 0.85, "timestamp": "2024-07-15T10:00:00Z"}"#).unwrap();

        let loaded = JsonFileRateStore::new(&path).load().await.unwrap().unwrap();
        assert_eq!(loaded.source, RateSource::Unknown);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = JsonFileRateStore::new(dir.path().join("rates.json"));
        store.clear().await.unwrap();

        store
            .save(&CachedRate::from_api(0.85, Utc::now()))
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}

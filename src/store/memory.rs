use crate::core::cache::{CachedRate, RateStore};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory rate cache. Lives as long as the process and is shared by
/// cloning.
#[derive(Clone, Default)]
pub struct MemoryRateStore {
    inner: Arc<Mutex<Option<CachedRate>>>,
}

impl MemoryRateStore {
    /// Creates a new MemoryRateStore instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `entry`.
    pub fn with_entry(entry: CachedRate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(entry))),
        }
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn load(&self) -> Result<Option<CachedRate>> {
        let slot = self.inner.lock().await;
        if slot.is_some() {
            debug!("Cache HIT for rate entry");
        } else {
            debug!("Cache MISS for rate entry");
        }
        Ok(slot.clone())
    }

    async fn save(&self, entry: &CachedRate) -> Result<()> {
        let mut slot = self.inner.lock().await;
        debug!("Cache PUT rate {}", entry.rate);
        *slot = Some(entry.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut slot = self.inner.lock().await;
        *slot = None;
        debug!("Cache CLEAR");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_store_save_load_clear() {
        let store = MemoryRateStore::new();

        // Initially, store is empty
        assert!(store.load().await.unwrap().is_none());

        let entry = CachedRate::from_api(0.8542, Utc::now());
        store.save(&entry).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(entry));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_the_entry() {
        let store = MemoryRateStore::new();
        let other = store.clone();

        store
            .save(&CachedRate::from_api(0.9, Utc::now()))
            .await
            .unwrap();
        assert_eq!(other.load().await.unwrap().map(|e| e.rate), Some(0.9));
    }
}

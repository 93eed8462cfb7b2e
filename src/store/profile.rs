//! JSON files holding the user's salary settings and asset balances.
//!
//! Reads never fail: a missing file yields defaults and a corrupt one is
//! moved aside before defaults are written back. Writes are the only
//! operations that report errors, since dropping saved data silently would
//! lose the user's input.

use crate::core::profile::{AssetSnapshot, UserConfig};
use chrono::{DateTime, Local, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE: &str = "user_config.json";
const ASSETS_FILE: &str = "assets.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to save {what} to {path}: {source}")]
    Io {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Records with creation and update stamps.
pub trait Stamped {
    fn stamp(&mut self, now: DateTime<Utc>);
}

impl Stamped for UserConfig {
    fn stamp(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
        self.updated_at = Some(now);
    }
}

impl Stamped for AssetSnapshot {
    fn stamp(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
        self.updated_at = Some(now);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub config_exists: bool,
    pub assets_exists: bool,
    pub config_last_updated: Option<DateTime<Utc>>,
    pub assets_last_updated: Option<DateTime<Utc>>,
    pub monthly_salary_configured: bool,
    pub assets_configured: bool,
}

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn assets_path(&self) -> PathBuf {
        self.dir.join(ASSETS_FILE)
    }

    pub fn load_config(&self) -> UserConfig {
        self.load_or_default(&self.config_path(), "configuration")
    }

    pub fn save_config(&self, config: &UserConfig) -> Result<UserConfig, StoreError> {
        self.save(&self.config_path(), "configuration", config)
    }

    pub fn load_assets(&self) -> AssetSnapshot {
        self.load_or_default(&self.assets_path(), "assets")
    }

    pub fn save_assets(&self, assets: &AssetSnapshot) -> Result<AssetSnapshot, StoreError> {
        self.save(&self.assets_path(), "assets", assets)
    }

    pub fn data_summary(&self) -> DataSummary {
        let config_exists = self.config_path().exists();
        let assets_exists = self.assets_path().exists();
        let config = self.load_config();
        let assets = self.load_assets();

        DataSummary {
            config_exists,
            assets_exists,
            config_last_updated: config.updated_at,
            assets_last_updated: assets.updated_at,
            monthly_salary_configured: config.is_salary_configured(),
            assets_configured: assets.has_any_balance(),
        }
    }

    /// Writes `record` with fresh stamps and returns the stamped copy.
    fn save<T>(&self, path: &Path, what: &'static str, record: &T) -> Result<T, StoreError>
    where
        T: Serialize + Clone + Stamped,
    {
        let mut record = record.clone();
        record.stamp(Utc::now());

        let io_err = |source| StoreError::Io {
            what,
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let body = serde_json::to_string_pretty(&record)
            .map_err(|source| StoreError::Serialize { what, source })?;
        fs::write(path, body).map_err(io_err)?;

        debug!("Saved {} to {}", what, path.display());
        Ok(record)
    }

    fn load_or_default<T>(&self, path: &Path, what: &'static str) -> T
    where
        T: DeserializeOwned + Serialize + Clone + Default + Stamped,
    {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(record) => return record,
                Err(e) => {
                    warn!(error = %e, "Corrupt {} file {}, resetting", what, path.display());
                    backup_corrupt_file(path);
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No {} file at {}, using defaults", what, path.display());
            }
            Err(e) => {
                warn!(error = %e, "Could not read {} file {}", what, path.display());
                return T::default();
            }
        }

        match self.save(path, what, &T::default()) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Could not write default {}", what);
                T::default()
            }
        }
    }
}

/// Moves a corrupt file to `<file>.backup.<YYYYmmdd_HHMMSS>`, deleting it if
/// the rename fails.
fn backup_corrupt_file(path: &Path) {
    let suffix = Local::now().format("%Y%m%d_%H%M%S");
    let mut backup = path.as_os_str().to_owned();
    backup.push(format!(".backup.{suffix}"));

    if let Err(e) = fs::rename(path, &backup) {
        warn!(error = %e, "Backup of {} failed, removing it", path.display());
        if let Err(e) = fs::remove_file(path) {
            warn!(error = %e, "Could not remove {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn backups_in(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.contains(".backup."))
            .collect()
    }

    #[test]
    fn test_missing_files_yield_defaults_and_are_created() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("data"));

        let config = store.load_config();
        assert_eq!(config.monthly_salary, 0.0);
        assert_eq!(config.daily_goal_percentage, 0.0);
        assert!(config.created_at.is_some());
        assert!(store.config_path().exists());

        let assets = store.load_assets();
        assert!(!assets.has_any_balance());
        assert!(store.assets_path().exists());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());

        let saved = store
            .save_assets(&AssetSnapshot::new(5000.0, 200.0, 100.0, 10000.0))
            .unwrap();
        assert!(saved.updated_at.is_some());
        assert_eq!(store.load_assets(), saved);

        let config = UserConfig {
            monthly_salary: 3000.0,
            daily_goal_percentage: 75.0,
            ..UserConfig::default()
        };
        let saved = store.save_config(&config).unwrap();
        let loaded = store.load_config();
        assert_eq!(loaded.monthly_salary, 3000.0);
        assert_eq!(loaded.daily_goal_percentage, 75.0);
        assert_eq!(loaded.updated_at, saved.updated_at);
    }

    #[test]
    fn test_save_keeps_created_at() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());

        let first = store.save_assets(&AssetSnapshot::default()).unwrap();
        let second = store.save_assets(&first).unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn test_files_with_naive_stamps_load_intact() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        fs::write(
            store.config_path(),
            r#"{
  "monthly_salary": 3000,
  "daily_goal_percentage": 75,
  "created_at": "2024-07-01T09:00:00.123456",
  "updated_at": "2024-07-15T10:30:00.654321"
}"#,
        )
        .unwrap();
        fs::write(
            store.assets_path(),
            r#"{
  "bank_balance": 5000,
  "cash_eur": 200,
  "cash_usd": 100,
  "investments": 10000,
  "created_at": "2024-07-01T09:00:00.123456",
  "updated_at": "2024-07-15T10:30:00.654321"
}"#,
        )
        .unwrap();

        let config = store.load_config();
        assert_eq!(config.monthly_salary, 3000.0);
        assert_eq!(config.daily_goal_percentage, 75.0);
        assert!(config.created_at.is_some());

        let assets = store.load_assets();
        assert_eq!(
            assets,
            AssetSnapshot {
                created_at: assets.created_at,
                updated_at: assets.updated_at,
                ..AssetSnapshot::new(5000.0, 200.0, 100.0, 10000.0)
            }
        );
        assert!(assets.updated_at.is_some());
        assert!(backups_in(dir.path()).is_empty());

        let resaved = store.save_config(&config).unwrap();
        assert_eq!(resaved.created_at, config.created_at);
    }

    #[test]
    fn test_corrupt_file_is_backed_up_and_reset() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        fs::write(store.assets_path(), "{ invalid json").unwrap();

        let assets = store.load_assets();
        assert_eq!(assets.bank_balance, 0.0);
        assert_eq!(backups_in(dir.path()).len(), 1);

        let raw = fs::read_to_string(store.assets_path()).unwrap();
        assert!(serde_json::from_str::<AssetSnapshot>(&raw).is_ok());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();
        let store = ProfileStore::new(&blocker);

        let err = store.save_config(&UserConfig::default()).unwrap_err();
        assert!(matches!(err, StoreError::Io { what: "configuration", .. }));
        assert!(err.to_string().starts_with("Failed to save configuration"));

        // Reads still succeed with defaults.
        assert_eq!(store.load_config().monthly_salary, 0.0);
    }

    #[test]
    fn test_data_summary() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());

        let empty = store.data_summary();
        assert!(!empty.config_exists);
        assert!(!empty.monthly_salary_configured);
        assert!(!empty.assets_configured);

        store
            .save_config(&UserConfig {
                monthly_salary: 2500.0,
                ..UserConfig::default()
            })
            .unwrap();
        store
            .save_assets(&AssetSnapshot::new(0.0, 0.0, 10.0, 0.0))
            .unwrap();

        let summary = store.data_summary();
        assert!(summary.config_exists);
        assert!(summary.assets_exists);
        assert!(summary.monthly_salary_configured);
        assert!(summary.assets_configured);
        assert!(summary.config_last_updated.is_some());
    }
}

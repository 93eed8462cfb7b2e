//! Commands that replace the stored profile.

use super::ui;
use crate::core::position::position_from_goal;
use crate::core::profile::{AssetSnapshot, UserConfig, validate_percentage};
use crate::core::{CurrencyRateProvider, MonthProgress};
use crate::providers::caching::CachingRateProvider;
use crate::store::ProfileStore;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

pub fn set_assets(profiles: &ProfileStore, assets: AssetSnapshot) -> Result<()> {
    let previous = profiles.load_assets();
    let assets = AssetSnapshot {
        created_at: previous.created_at,
        ..assets
    };
    let saved = profiles.save_assets(&assets).context("Failed to update assets")?;

    info!("Assets updated");
    println!(
        "{} bank {:.2} EUR, cash {:.2} EUR, cash {:.2} USD, investments {:.2} EUR",
        ui::style_text("Assets saved:", ui::StyleType::TotalLabel),
        saved.bank_balance,
        saved.cash_eur,
        saved.cash_usd,
        saved.investments
    );
    Ok(())
}

pub fn set_salary(
    profiles: &ProfileStore,
    monthly_salary: f64,
    goal_percentage: f64,
) -> Result<()> {
    let config = UserConfig::validated(monthly_salary, goal_percentage)?;
    let config = UserConfig {
        created_at: profiles.load_config().created_at,
        ..config
    };
    let saved = profiles.save_config(&config).context("Failed to update salary configuration")?;

    info!("Salary configuration updated");
    println!(
        "{} {:.2} EUR per month at {:.1}% daily goal",
        ui::style_text("Salary saved:", ui::StyleType::TotalLabel),
        saved.monthly_salary,
        saved.daily_goal_percentage
    );
    Ok(())
}

/// Updates only the goal, then shows what it does to this month's figures.
pub async fn set_goal<P: CurrencyRateProvider>(
    profiles: &ProfileStore,
    rates: &CachingRateProvider<P>,
    percentage: f64,
) -> Result<()> {
    let percentage = validate_percentage(&Value::from(percentage))?;

    let mut config = profiles.load_config();
    config.daily_goal_percentage = percentage;
    let config = profiles.save_config(&config).context("Failed to update daily goal")?;
    info!(percentage, "Daily goal updated");

    let quote = rates.get_exchange_rate().await;
    let month = MonthProgress::current().into_value();
    let result = position_from_goal(
        &profiles.load_assets(),
        config.monthly_salary,
        config.daily_goal_percentage,
        Some(quote.rate),
        &month,
    )
    .into_value();

    println!(
        "{} {percentage:.1}%",
        ui::style_text("Daily goal saved:", ui::StyleType::TotalLabel)
    );
    println!("Potential income (EUR): {:.2}", result.potential_income);
    println!(
        "Global position (EUR): {}",
        ui::style_text(
            &format!("{:.2}", result.global_position),
            ui::StyleType::TotalValue
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValidationError;
    use crate::store::MemoryRateStore;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct FixedRate(f64);

    #[async_trait]
    impl CurrencyRateProvider for FixedRate {
        async fn get_rate(&self, _from: &str, _to: &str) -> Result<f64> {
            Ok(self.0)
        }
    }

    fn rates() -> CachingRateProvider<FixedRate> {
        CachingRateProvider::new(FixedRate(0.9), Arc::new(MemoryRateStore::new()))
    }

    #[test]
    fn test_set_salary_validates_before_saving() {
        let dir = TempDir::new().unwrap();
        let profiles = ProfileStore::new(dir.path());

        let err = set_salary(&profiles, 3000.0, 120.0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::OutOfRange { .. })
        ));
        assert!(!profiles.config_path().exists());

        set_salary(&profiles, 3000.0, 75.0).unwrap();
        let stored = profiles.load_config();
        assert_eq!(stored.monthly_salary, 3000.0);
        assert_eq!(stored.daily_goal_percentage, 75.0);
        assert!(stored.created_at.is_some());
    }

    #[test]
    fn test_set_assets_keeps_creation_stamp() {
        let dir = TempDir::new().unwrap();
        let profiles = ProfileStore::new(dir.path());

        set_assets(&profiles, AssetSnapshot::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        let first = profiles.load_assets();

        set_assets(&profiles, AssetSnapshot::new(5.0, 6.0, 7.0, 8.0)).unwrap();
        let second = profiles.load_assets();

        assert_eq!(second.bank_balance, 5.0);
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn test_set_goal_updates_only_the_goal() {
        let dir = TempDir::new().unwrap();
        let profiles = ProfileStore::new(dir.path());
        set_salary(&profiles, 3000.0, 75.0).unwrap();

        set_goal(&profiles, &rates(), 50.0).await.unwrap();

        let stored = profiles.load_config();
        assert_eq!(stored.monthly_salary, 3000.0);
        assert_eq!(stored.daily_goal_percentage, 50.0);
    }

    #[tokio::test]
    async fn test_set_goal_rejects_invalid_percentage() {
        let dir = TempDir::new().unwrap();
        let profiles = ProfileStore::new(dir.path());
        set_salary(&profiles, 3000.0, 75.0).unwrap();

        for bad in [-1.0, 100.5, f64::NAN] {
            assert!(set_goal(&profiles, &rates(), bad).await.is_err());
        }
        assert_eq!(profiles.load_config().daily_goal_percentage, 75.0);
    }
}

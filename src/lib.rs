pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::profile::AssetSnapshot;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    Dashboard,
    Rate {
        refresh: bool,
    },
    SetAssets {
        bank_balance: f64,
        cash_eur: f64,
        cash_usd: f64,
        investments: f64,
    },
    SetSalary {
        monthly_salary: f64,
        goal_percentage: f64,
    },
    SetGoal(f64),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("mindbank starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let profiles = store::profile_store(&config)?;
    let rates = || providers::exchange_rate_provider(&config, store::rate_store(&config)?);

    match command {
        AppCommand::Dashboard => cli::dashboard::run(&profiles, &rates()?).await,
        AppCommand::Rate { refresh } => cli::rate::run(&rates()?, refresh).await,
        AppCommand::SetAssets {
            bank_balance,
            cash_eur,
            cash_usd,
            investments,
        } => {
            let assets = AssetSnapshot::validated(bank_balance, cash_eur, cash_usd, investments)?;
            cli::update::set_assets(&profiles, assets)
        }
        AppCommand::SetSalary {
            monthly_salary,
            goal_percentage,
        } => cli::update::set_salary(&profiles, monthly_salary, goal_percentage),
        AppCommand::SetGoal(percentage) => {
            cli::update::set_goal(&profiles, &rates()?, percentage).await
        }
    }
}

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mindbank::cli::setup::{setup, setup_at_path};
use mindbank::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for mindbank::AppCommand {
    fn from(cmd: Commands) -> mindbank::AppCommand {
        match cmd {
            Commands::Dashboard => mindbank::AppCommand::Dashboard,
            Commands::Rate { refresh } => mindbank::AppCommand::Rate { refresh },
            Commands::Assets {
                bank,
                cash_eur,
                cash_usd,
                investments,
            } => mindbank::AppCommand::SetAssets {
                bank_balance: bank,
                cash_eur,
                cash_usd,
                investments,
            },
            Commands::Salary { amount, goal } => mindbank::AppCommand::SetSalary {
                monthly_salary: amount,
                goal_percentage: goal,
            },
            Commands::Goal { percentage } => mindbank::AppCommand::SetGoal(percentage),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration, at --config-path if given
    Setup,
    /// Show month progress, assets and global position
    Dashboard,
    /// Show the cached USD to EUR exchange rate
    Rate {
        /// Fetch a fresh rate, ignoring the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Replace the stored asset balances
    #[command(allow_negative_numbers = true)]
    Assets {
        /// Bank balance in EUR
        #[arg(long)]
        bank: f64,
        /// Cash held in EUR
        #[arg(long)]
        cash_eur: f64,
        /// Cash held in USD
        #[arg(long)]
        cash_usd: f64,
        /// Investments in EUR
        #[arg(long)]
        investments: f64,
    },
    /// Set the monthly salary and daily goal
    #[command(allow_negative_numbers = true)]
    Salary {
        /// Monthly salary in EUR
        #[arg(long)]
        amount: f64,
        /// Daily goal percentage, 0 to 100
        #[arg(long)]
        goal: f64,
    },
    /// Update only the daily goal percentage
    #[command(allow_negative_numbers = true)]
    Goal { percentage: f64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => setup_at_path(path),
            None => setup(),
        },
        Some(cmd) => mindbank::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

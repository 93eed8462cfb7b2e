use super::ui;
use crate::core::income::{IncomeBreakdown, income_breakdown};
use crate::core::outcome::Outcome;
use crate::core::position::{AssetBreakdown, CalculationResult, asset_breakdown, position_from_goal};
use crate::core::{CurrencyRateProvider, MonthProgress};
use crate::providers::caching::CachingRateProvider;
use crate::providers::{RateOrigin, RateQuote};
use crate::store::ProfileStore;
use crate::store::profile::DataSummary;
use anyhow::Result;
use chrono::Local;
use comfy_table::Cell;
use tracing::debug;

/// Everything the dashboard shows, computed up front.
pub struct Dashboard {
    pub month: MonthProgress,
    pub goal_percentage: f64,
    pub quote: RateQuote,
    pub assets: AssetBreakdown,
    pub income: Outcome<IncomeBreakdown>,
    pub position: Outcome<CalculationResult>,
    pub summary: DataSummary,
}

impl Dashboard {
    pub fn build(profiles: &ProfileStore, quote: RateQuote, month: MonthProgress) -> Self {
        let config = profiles.load_config();
        let assets = profiles.load_assets();
        let rate = Some(quote.rate);

        let position = position_from_goal(
            &assets,
            config.monthly_salary,
            config.daily_goal_percentage,
            rate,
            &month,
        );
        if let Some(reason) = position.reason() {
            debug!(%reason, "Income figures defaulted to zero");
        }

        Self {
            income: income_breakdown(config.monthly_salary, config.daily_goal_percentage, &month),
            assets: asset_breakdown(&assets, rate),
            goal_percentage: config.daily_goal_percentage,
            summary: profiles.data_summary(),
            month,
            quote,
            position,
        }
    }

    fn assets_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Asset"),
            ui::header_cell("Amount"),
            ui::header_cell("Currency"),
            ui::header_cell("Value (EUR)"),
        ]);
        for line in &self.assets.lines {
            table.add_row(vec![
                Cell::new(line.name),
                ui::amount_cell(line.value),
                Cell::new(line.currency),
                ui::amount_cell(line.value_eur),
            ]);
        }
        table.to_string()
    }

    fn income_table(&self) -> String {
        let income = self.income.value();
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Income"), ui::header_cell("EUR")]);
        table.add_row(vec![
            Cell::new("Daily income"),
            ui::amount_cell(income.daily_income),
        ]);
        table.add_row(vec![
            Cell::new(format!("Realized ({:.1}% goal)", self.goal_percentage)),
            ui::amount_cell(income.realized_income),
        ]);
        table.add_row(vec![
            Cell::new(format!("Potential ({} days left)", income.remaining_days)),
            ui::amount_cell(income.potential_income),
        ]);
        table.add_row(vec![
            Cell::new("Projected this month"),
            ui::amount_cell(income.total_projected),
        ]);
        table.to_string()
    }

    fn rate_line(&self) -> String {
        let note = match self.quote.origin {
            RateOrigin::Cache => ui::style_text("(cached)", ui::StyleType::Subtle),
            RateOrigin::Api => ui::style_text("(live)", ui::StyleType::Subtle),
            RateOrigin::Fallback => ui::style_text(
                "(fallback, rate service unavailable)",
                ui::StyleType::Warning,
            ),
        };
        format!("1 USD = {:.4} EUR {note}", self.quote.rate)
    }

    pub fn display(&self) -> String {
        let month = &self.month;
        let mut output = format!(
            "{}\nDay {} of {} ({:.1}% elapsed, {} days remaining)\n\n",
            ui::style_text(
                &format!("{} {}", month.month_name, month.year),
                ui::StyleType::Title
            ),
            month.current_day,
            month.days_in_month,
            month.progress_percentage,
            month.remaining_days,
        );

        output.push_str(&self.assets_table());
        output.push_str(&format!("\n{}\n\n", self.rate_line()));
        output.push_str(&self.income_table());

        let result = self.position.value();
        for (label, value) in [
            ("Total assets (EUR)", result.total_assets),
            ("Realized income (EUR)", result.realized_income),
            ("Potential income (EUR)", result.potential_income),
        ] {
            output.push_str(&format!(
                "\n{}: {value:.2}",
                ui::style_text(label, ui::StyleType::TotalLabel)
            ));
        }
        output.push_str(&format!(
            "\n{}: {}",
            ui::style_text("Global position (EUR)", ui::StyleType::TotalLabel),
            ui::style_text(
                &format!("{:.2}", result.global_position),
                ui::StyleType::TotalValue
            )
        ));

        if !self.summary.monthly_salary_configured {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    "No salary configured yet. Run `mindbank salary --amount <EUR> --goal <PCT>`.",
                    ui::StyleType::Warning
                )
            ));
        }
        let assets_updated = self
            .summary
            .assets_last_updated
            .filter(|_| self.summary.assets_configured);
        if let Some(updated) = assets_updated {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!(
                        "Assets last updated {}",
                        updated.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    ),
                    ui::StyleType::Subtle
                )
            ));
        }

        output
    }
}

pub async fn run<P: CurrencyRateProvider>(
    profiles: &ProfileStore,
    rates: &CachingRateProvider<P>,
) -> Result<()> {
    let month = MonthProgress::current().into_value();

    let spinner = ui::new_spinner("Fetching exchange rate...");
    let quote = rates.get_exchange_rate().await;
    spinner.finish_and_clear();
    debug!(rate = quote.rate, origin = ?quote.origin, "Resolved exchange rate");

    println!("{}", Dashboard::build(profiles, quote, month).display());
    Ok(())
}

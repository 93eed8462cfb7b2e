use super::ui;
use crate::core::CurrencyRateProvider;
use crate::providers::RateInfo;
use crate::providers::caching::CachingRateProvider;
use anyhow::Result;
use chrono::Local;
use comfy_table::Cell;

impl RateInfo {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Exchange rate"), ui::header_cell("")]);

        table.add_row(vec![
            Cell::new("USD to EUR"),
            Cell::new(format!("{:.4}", self.rate)),
        ]);
        table.add_row(vec![Cell::new("Source"), Cell::new(self.source.to_string())]);
        table.add_row(vec![
            Cell::new("Last updated"),
            ui::format_optional_cell(self.last_updated, |t| {
                t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
            }),
        ]);
        table.add_row(vec![
            Cell::new("Cache age"),
            ui::format_optional_cell(self.cache_age_minutes, |m| format!("{m} min")),
        ]);
        table.add_row(vec![
            Cell::new("Cache valid"),
            Cell::new(if self.cache_valid { "yes" } else { "no" }),
        ]);

        let mut output = table.to_string();
        if let Some(error) = &self.error {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(&format!("Cache unreadable: {error}"), ui::StyleType::Error)
            ));
        }
        output
    }
}

pub async fn run<P: CurrencyRateProvider>(
    rates: &CachingRateProvider<P>,
    refresh: bool,
) -> Result<()> {
    if refresh {
        let spinner = ui::new_spinner("Refreshing exchange rate...");
        let quote = rates.refresh_exchange_rate().await;
        spinner.finish_and_clear();

        if quote.is_degraded() {
            println!(
                "{}\n",
                ui::style_text(
                    "Rate service unavailable, nothing was cached.",
                    ui::StyleType::Warning
                )
            );
        }
    }

    println!("{}", rates.rate_info().await.display_as_table());
    Ok(())
}

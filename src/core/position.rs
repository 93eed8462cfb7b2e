//! Net worth plus the income still in motion this month.

use super::income::{potential_income, realized_income_at_goal, round_currency};
use super::month::MonthProgress;
use super::outcome::Outcome;
use super::profile::AssetSnapshot;
use serde::Serialize;

/// The four headline dashboard figures, in EUR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationResult {
    pub realized_income: f64,
    pub potential_income: f64,
    pub total_assets: f64,
    pub global_position: f64,
}

/// Sum of all balances in EUR.
///
/// `usd_to_eur` converts `cash_usd`. With `None` the USD amount is counted
/// one to one; this function never looks a rate up on its own.
pub fn total_assets(assets: &AssetSnapshot, usd_to_eur: Option<f64>) -> f64 {
    let cash_usd_in_eur = assets.cash_usd * usd_to_eur.unwrap_or(1.0);
    round_currency(assets.bank_balance + assets.cash_eur + cash_usd_in_eur + assets.investments)
}

/// Global position from income figures the caller already has.
pub fn position_from_incomes(
    assets: &AssetSnapshot,
    realized_income: f64,
    potential_income: f64,
    usd_to_eur: Option<f64>,
) -> CalculationResult {
    let total_assets = total_assets(assets, usd_to_eur);
    CalculationResult {
        realized_income,
        potential_income,
        total_assets,
        global_position: round_currency(total_assets + realized_income + potential_income),
    }
}

/// Global position from the raw salary and goal settings.
///
/// Realized income is scaled by the goal, like potential income. The result
/// is `Defaulted` when either income had to fall back to zero.
pub fn position_from_goal(
    assets: &AssetSnapshot,
    monthly_salary: f64,
    goal_percentage: f64,
    usd_to_eur: Option<f64>,
    month: &MonthProgress,
) -> Outcome<CalculationResult> {
    let realized = realized_income_at_goal(monthly_salary, goal_percentage, month);
    let potential = potential_income(monthly_salary, goal_percentage, month);
    let reason = realized.reason().or(potential.reason());

    let result = position_from_incomes(
        assets,
        realized.into_value(),
        potential.into_value(),
        usd_to_eur,
    );
    match reason {
        Some(reason) => Outcome::defaulted(result, reason),
        None => Outcome::Computed(result),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetLine {
    pub name: &'static str,
    pub value: f64,
    pub currency: &'static str,
    pub value_eur: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetBreakdown {
    pub lines: Vec<AssetLine>,
    /// The rate applied to USD, if any.
    pub exchange_rate: Option<f64>,
    pub total_eur: f64,
}

pub fn asset_breakdown(assets: &AssetSnapshot, usd_to_eur: Option<f64>) -> AssetBreakdown {
    let eur = |name, value| AssetLine {
        name,
        value,
        currency: "EUR",
        value_eur: value,
    };
    let lines = vec![
        eur("Bank balance", assets.bank_balance),
        eur("Cash (EUR)", assets.cash_eur),
        AssetLine {
            name: "Cash (USD)",
            value: assets.cash_usd,
            currency: "USD",
            value_eur: round_currency(assets.cash_usd * usd_to_eur.unwrap_or(1.0)),
        },
        eur("Investments", assets.investments),
    ];
    let total_eur = round_currency(lines.iter().map(|line| line.value_eur).sum());

    AssetBreakdown {
        lines,
        exchange_rate: usd_to_eur,
        total_eur,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::DefaultReason;
    use chrono::NaiveDate;

    fn sample_assets() -> AssetSnapshot {
        AssetSnapshot::new(5000.0, 200.0, 100.0, 10000.0)
    }

    fn july_15() -> MonthProgress {
        MonthProgress::for_date(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()).into_value()
    }

    #[test]
    fn test_total_assets_with_rate() {
        assert_eq!(total_assets(&sample_assets(), Some(0.85)), 15285.0);
    }

    #[test]
    fn test_total_assets_without_rate_counts_usd_as_eur() {
        assert_eq!(total_assets(&sample_assets(), None), 15300.0);
    }

    #[test]
    fn test_total_assets_only_scales_usd() {
        let assets = AssetSnapshot::new(1.5, 2.25, 40.0, 3.0);
        assert_eq!(total_assets(&assets, Some(0.5)), 26.75);
        assert_eq!(total_assets(&AssetSnapshot::default(), Some(0.85)), 0.0);
    }

    #[test]
    fn test_total_assets_rounds_half_cent_to_even() {
        let assets = AssetSnapshot::new(0.125, 0.0, 0.0, 0.0);
        assert_eq!(total_assets(&assets, None), 0.12);
    }

    #[test]
    fn test_position_from_incomes() {
        let result = position_from_incomes(&sample_assets(), 1000.0, 45.0, Some(0.85));
        assert_eq!(
            result,
            CalculationResult {
                realized_income: 1000.0,
                potential_income: 45.0,
                total_assets: 15285.0,
                global_position: 16330.0,
            }
        );
    }

    #[test]
    fn test_position_from_goal() {
        let outcome = position_from_goal(&sample_assets(), 3000.0, 75.0, Some(0.85), &july_15());
        assert!(!outcome.is_defaulted());
        let result = outcome.into_value();
        assert_eq!(result.realized_income, 1088.71);
        assert_eq!(result.potential_income, 1161.29);
        assert_eq!(result.total_assets, 15285.0);
        assert_eq!(result.global_position, 17535.0);
    }

    #[test]
    fn test_position_from_goal_without_salary() {
        let outcome = position_from_goal(&sample_assets(), 0.0, 75.0, None, &july_15());
        assert_eq!(outcome.reason(), Some(DefaultReason::NonPositiveSalary));
        let result = outcome.into_value();
        assert_eq!(result.realized_income, 0.0);
        assert_eq!(result.global_position, 15300.0);
    }

    #[test]
    fn test_asset_breakdown() {
        let breakdown = asset_breakdown(&sample_assets(), Some(0.85));
        assert_eq!(breakdown.lines.len(), 4);
        assert_eq!(breakdown.lines[2].currency, "USD");
        assert_eq!(breakdown.lines[2].value, 100.0);
        assert_eq!(breakdown.lines[2].value_eur, 85.0);
        assert_eq!(breakdown.total_eur, 15285.0);
        assert_eq!(breakdown.exchange_rate, Some(0.85));

        let unconverted = asset_breakdown(&sample_assets(), None);
        assert_eq!(unconverted.total_eur, total_assets(&sample_assets(), None));
    }
}

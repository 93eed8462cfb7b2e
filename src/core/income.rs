//! Month-prorated salary figures.
//!
//! Every function here is pure: the calendar position is passed in as a
//! [`MonthProgress`] so the same inputs always give the same numbers.
//! Unusable inputs never raise; they produce a zero tagged with the reason.

use super::month::MonthProgress;
use super::outcome::{DefaultReason, Outcome};
use serde::Serialize;

/// Rounds to cents, exact halves to the even cent.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn check_inputs(monthly_salary: f64, goal_percentage: f64) -> Option<DefaultReason> {
    if !monthly_salary.is_finite() || !goal_percentage.is_finite() {
        Some(DefaultReason::NonFiniteInput)
    } else if monthly_salary <= 0.0 {
        Some(DefaultReason::NonPositiveSalary)
    } else if goal_percentage < 0.0 {
        Some(DefaultReason::NegativeGoal)
    } else {
        None
    }
}

/// Salary earned over the days already elapsed, ignoring the goal.
pub fn realized_income(monthly_salary: f64, month: &MonthProgress) -> Outcome<f64> {
    realized_income_at_goal(monthly_salary, 100.0, month)
}

/// Salary earned over the elapsed days, scaled by the goal percentage.
pub fn realized_income_at_goal(
    monthly_salary: f64,
    goal_percentage: f64,
    month: &MonthProgress,
) -> Outcome<f64> {
    if let Some(reason) = check_inputs(monthly_salary, goal_percentage) {
        return Outcome::defaulted(0.0, reason);
    }
    let income = month.elapsed_fraction() * monthly_salary * (goal_percentage / 100.0);
    Outcome::Computed(round_currency(income))
}

/// Salary still obtainable over the remaining days at the goal rate.
pub fn potential_income(
    monthly_salary: f64,
    goal_percentage: f64,
    month: &MonthProgress,
) -> Outcome<f64> {
    if let Some(reason) = check_inputs(monthly_salary, goal_percentage) {
        return Outcome::defaulted(0.0, reason);
    }
    if month.remaining_days == 0 {
        return Outcome::Computed(0.0);
    }
    let daily_income = monthly_salary / f64::from(month.days_in_month);
    let income = f64::from(month.remaining_days) * daily_income * (goal_percentage / 100.0);
    Outcome::Computed(round_currency(income))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeBreakdown {
    pub monthly_salary: f64,
    pub days_in_month: u32,
    pub current_day: u32,
    pub remaining_days: u32,
    pub daily_income: f64,
    pub realized_income: f64,
    pub potential_income: f64,
    /// What the remaining days are worth at 100%.
    pub remaining_potential: f64,
    pub total_projected: f64,
    pub progress_percentage: f64,
}

pub fn income_breakdown(
    monthly_salary: f64,
    goal_percentage: f64,
    month: &MonthProgress,
) -> Outcome<IncomeBreakdown> {
    let realized = realized_income_at_goal(monthly_salary, goal_percentage, month);
    let potential = potential_income(monthly_salary, goal_percentage, month);
    let reason = realized.reason().or(potential.reason());

    let daily_income = if reason.is_none() {
        monthly_salary / f64::from(month.days_in_month)
    } else {
        0.0
    };
    let realized = realized.into_value();
    let potential = potential.into_value();

    let breakdown = IncomeBreakdown {
        monthly_salary: if monthly_salary.is_finite() {
            monthly_salary
        } else {
            0.0
        },
        days_in_month: month.days_in_month,
        current_day: month.current_day,
        remaining_days: month.remaining_days,
        daily_income: round_currency(daily_income),
        realized_income: realized,
        potential_income: potential,
        remaining_potential: round_currency(f64::from(month.remaining_days) * daily_income),
        total_projected: round_currency(realized + potential),
        progress_percentage: month.progress_percentage,
    };

    match reason {
        Some(reason) => Outcome::defaulted(breakdown, reason),
        None => Outcome::Computed(breakdown),
    }
}

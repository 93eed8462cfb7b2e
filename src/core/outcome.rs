//! Tagged calculation results.
//!
//! Dashboard figures never surface an error to the user, but callers still
//! need to tell a genuine zero apart from a value that was substituted
//! because the inputs were unusable.

use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultReason {
    /// Salary is zero or negative.
    NonPositiveSalary,
    NegativeGoal,
    /// Negative amount where only non-negative ones convert.
    NegativeAmount,
    /// NaN or infinite input.
    NonFiniteInput,
    /// The calendar for the requested date could not be resolved.
    CalendarUnavailable,
}

impl Display for DefaultReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DefaultReason::NonPositiveSalary => "salary is not positive",
                DefaultReason::NegativeGoal => "goal percentage is negative",
                DefaultReason::NegativeAmount => "amount is negative",
                DefaultReason::NonFiniteInput => "input is not a finite number",
                DefaultReason::CalendarUnavailable => "calendar unavailable",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Computed(T),
    Defaulted { value: T, reason: DefaultReason },
}

impl<T> Outcome<T> {
    pub fn defaulted(value: T, reason: DefaultReason) -> Self {
        Outcome::Defaulted { value, reason }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Computed(value) | Outcome::Defaulted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Computed(value) | Outcome::Defaulted { value, .. } => value,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Outcome::Defaulted { .. })
    }

    pub fn reason(&self) -> Option<DefaultReason> {
        match self {
            Outcome::Computed(_) => None,
            Outcome::Defaulted { reason, .. } => Some(*reason),
        }
    }
}

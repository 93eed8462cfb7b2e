//! The user's salary settings and asset balances.

use super::timestamp::deserialize_optional;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current balances. EUR unless the field name says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSnapshot {
    pub bank_balance: f64,
    pub cash_eur: f64,
    pub cash_usd: f64,
    pub investments: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Monthly salary in EUR.
    pub monthly_salary: f64,
    /// Target completion rate, 0 to 100.
    pub daily_goal_percentage: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Checks that a JSON value is a number within `[0, 100]`.
pub fn validate_percentage(value: &Value) -> Result<f64, ValidationError> {
    check_percentage("percentage", number_field("percentage", value)?)
}

fn check_percentage(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(value)
}

fn number_field(field: &'static str, value: &Value) -> Result<f64, ValidationError> {
    finite(field, value.as_f64().unwrap_or(f64::NAN))
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotANumber { field })
    }
}

fn required<'a>(payload: &'a Value, field: &'static str) -> Result<&'a Value, ValidationError> {
    payload
        .get(field)
        .ok_or(ValidationError::MissingField(field))
}

impl UserConfig {
    /// Builds a config from typed inputs, rejecting a negative or non-finite
    /// salary and a goal outside `[0, 100]`.
    pub fn validated(monthly_salary: f64, goal_percentage: f64) -> Result<Self, ValidationError> {
        let monthly_salary = finite("monthly_salary", monthly_salary)?;
        if monthly_salary < 0.0 {
            return Err(ValidationError::Negative {
                field: "monthly_salary",
                value: monthly_salary,
            });
        }
        let goal = finite("daily_goal_percentage", goal_percentage)?;

        Ok(Self {
            monthly_salary,
            daily_goal_percentage: check_percentage("daily_goal_percentage", goal)?,
            ..Self::default()
        })
    }

    /// Builds a config from an untrusted payload, rejecting bad fields.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let field = |name: &'static str| number_field(name, required(payload, name)?);
        Self::validated(field("monthly_salary")?, field("daily_goal_percentage")?)
    }

    pub fn is_salary_configured(&self) -> bool {
        self.monthly_salary > 0.0
    }
}

impl AssetSnapshot {
    pub fn new(bank_balance: f64, cash_eur: f64, cash_usd: f64, investments: f64) -> Self {
        Self {
            bank_balance,
            cash_eur,
            cash_usd,
            investments,
            ..Self::default()
        }
    }

    /// Like [`AssetSnapshot::new`], but every balance must be finite.
    /// Negative balances are allowed.
    pub fn validated(
        bank_balance: f64,
        cash_eur: f64,
        cash_usd: f64,
        investments: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(
            finite("bank_balance", bank_balance)?,
            finite("cash_eur", cash_eur)?,
            finite("cash_usd", cash_usd)?,
            finite("investments", investments)?,
        ))
    }

    /// Builds a snapshot from an untrusted payload. Every field is required.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let field = |name: &'static str| number_field(name, required(payload, name)?);
        Self::validated(
            field("bank_balance")?,
            field("cash_eur")?,
            field("cash_usd")?,
            field("investments")?,
        )
    }

    pub fn has_any_balance(&self) -> bool {
        [
            self.bank_balance,
            self.cash_eur,
            self.cash_usd,
            self.investments,
        ]
        .iter()
        .any(|v| *v > 0.0)
    }
}

//! Calendar math for prorating a monthly salary.

use super::outcome::{DefaultReason, Outcome};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::debug;

/// Where a given day sits inside its month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthProgress {
    pub current_day: u32,
    pub days_in_month: u32,
    /// Share of the month elapsed, in percent with one decimal.
    pub progress_percentage: f64,
    pub remaining_days: u32,
    pub month_name: String,
    pub year: i32,
}

impl MonthProgress {
    /// Progress for today's date in the local timezone.
    pub fn current() -> Outcome<Self> {
        Self::for_date(Local::now().date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Outcome<Self> {
        let Some(days_in_month) = days_in_month(date.year(), date.month()) else {
            debug!(%date, "Could not resolve month length, using default progress");
            return Outcome::defaulted(
                Self::fallback(date.year()),
                DefaultReason::CalendarUnavailable,
            );
        };

        let current_day = date.day();
        let progress = f64::from(current_day) / f64::from(days_in_month) * 100.0;

        Outcome::Computed(Self {
            current_day,
            days_in_month,
            progress_percentage: (progress * 10.0).round() / 10.0,
            remaining_days: days_in_month.saturating_sub(current_day),
            month_name: date.format("%B").to_string(),
            year: date.year(),
        })
    }

    /// Day 1 of a 30 day month.
    pub fn fallback(year: i32) -> Self {
        Self {
            current_day: 1,
            days_in_month: 30,
            progress_percentage: 0.0,
            remaining_days: 29,
            month_name: "Unknown".to_string(),
            year,
        }
    }

    /// Elapsed days over days in month, in `(0, 1]`.
    pub fn elapsed_fraction(&self) -> f64 {
        f64::from(self.current_day) / f64::from(self.days_in_month)
    }
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 7), Some(31));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_mid_month_progress() {
        let progress = MonthProgress::for_date(date(2024, 7, 15)).into_value();
        assert_eq!(progress.current_day, 15);
        assert_eq!(progress.days_in_month, 31);
        assert_eq!(progress.remaining_days, 16);
        assert_eq!(progress.progress_percentage, 48.4);
        assert_eq!(progress.month_name, "July");
        assert_eq!(progress.year, 2024);
    }

    #[test]
    fn test_leap_february_progress() {
        let outcome = MonthProgress::for_date(date(2024, 2, 14));
        assert!(!outcome.is_defaulted());
        let progress = outcome.into_value();
        assert_eq!(progress.days_in_month, 29);
        assert!((progress.elapsed_fraction() - 14.0 / 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_last_day_has_no_remaining_days() {
        let progress = MonthProgress::for_date(date(2024, 12, 31)).into_value();
        assert_eq!(progress.remaining_days, 0);
        assert_eq!(progress.progress_percentage, 100.0);
        assert_eq!(progress.elapsed_fraction(), 1.0);
    }

    #[test]
    fn test_calendar_overflow_uses_fallback() {
        let outcome = MonthProgress::for_date(NaiveDate::MAX);
        assert_eq!(outcome.reason(), Some(DefaultReason::CalendarUnavailable));
        let progress = outcome.into_value();
        assert_eq!(progress.current_day, 1);
        assert_eq!(progress.days_in_month, 30);
        assert_eq!(progress.progress_percentage, 0.0);
        assert_eq!(progress.remaining_days, 29);
        assert_eq!(progress.month_name, "Unknown");
    }
}

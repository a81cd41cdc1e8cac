//! Monthly projection analyzer
//!
//! Estimates the end-of-month balance from the current spending
//! velocity. With a week or more of data the daily average blends the
//! trailing 7 days (70%) with the whole elapsed period (30%) so the
//! projection tracks recent behavior without overreacting to one day.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Expense;

use super::period::TimePeriod;

/// Qualitative reliability of a projection, driven by how many days of
/// the month have elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    fn for_elapsed_days(days_elapsed: u32) -> Self {
        if days_elapsed < 7 {
            Self::Low
        } else if days_elapsed < 14 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Projected end-of-month balance at the current spending rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub projected_balance: f64,
    pub average_daily_spending: f64,
    pub remaining_days: u32,
    pub confidence: Confidence,
}

/// Weight given to the trailing-7-day daily average once a full week of
/// data exists; the remainder weights the whole elapsed period.
const RECENT_WEIGHT: f64 = 0.7;

/// Minimum elapsed days before a projection is meaningful.
const MIN_ELAPSED_DAYS: u32 = 3;

/// Project the end-of-month balance from spending so far.
///
/// Returns `None` when there are no expenses, fewer than 3 days of the
/// month have elapsed, or the projection degenerates to NaN/infinity.
/// A non-finite `current_balance` is treated as 0. Only expenses dated
/// within the reference month and on or before the reference date count;
/// future-dated records are excluded by civil-date comparison.
pub fn calculate_monthly_projection(
    expenses: &[Expense],
    current_balance: f64,
    reference: NaiveDate,
) -> Option<MonthlyProjection> {
    if expenses.is_empty() {
        return None;
    }

    let balance = if current_balance.is_finite() {
        current_balance
    } else {
        0.0
    };

    let period = TimePeriod::for_date(reference);
    if period.days_elapsed < MIN_ELAPSED_DAYS {
        return None;
    }

    // Current month only, nothing dated after the reference day
    let in_window = |date: NaiveDate| date >= period.start && date <= reference;

    let total_spending: f64 = expenses
        .iter()
        .filter(|e| e.civil_date().is_some_and(in_window))
        .filter_map(|e| e.valid_amount())
        .sum();

    let elapsed = f64::from(period.days_elapsed);
    let average_daily_spending = if period.days_elapsed >= 7 {
        let week_start = reference - Duration::days(7);
        let recent_total: f64 = expenses
            .iter()
            .filter(|e| {
                e.civil_date()
                    .is_some_and(|d| in_window(d) && d >= week_start)
            })
            .filter_map(|e| e.valid_amount())
            .sum();

        let recent_avg = recent_total / 7.0;
        let overall_avg = total_spending / elapsed;
        recent_avg * RECENT_WEIGHT + overall_avg * (1.0 - RECENT_WEIGHT)
    } else {
        total_spending / elapsed
    };

    let projected_balance =
        balance - average_daily_spending * f64::from(period.days_remaining);
    if !projected_balance.is_finite() {
        return None;
    }

    Some(MonthlyProjection {
        projected_balance,
        average_daily_spending,
        remaining_days: period.days_remaining,
        confidence: Confidence::for_elapsed_days(period.days_elapsed),
    })
}

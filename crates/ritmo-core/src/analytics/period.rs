//! Shared aggregation helpers
//!
//! Leaf utilities used by every analyzer: grouping expenses by category
//! and slicing a month into elapsed/remaining day counts around an
//! explicit reference date.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Category, Expense};

/// Day boundaries and counts for the month containing a reference date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePeriod {
    /// First day of the month.
    pub start: NaiveDate,
    /// Last day of the month.
    pub end: NaiveDate,
    /// `YYYY-MM` key for the month.
    pub month_key: String,
    pub days_in_month: u32,
    /// 1-indexed day of month of the reference date.
    pub days_elapsed: u32,
    /// `days_in_month - days_elapsed`.
    pub days_remaining: u32,
}

impl TimePeriod {
    pub fn for_date(reference: NaiveDate) -> TimePeriod {
        let year = reference.year();
        let month = reference.month();

        let start = NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is valid");
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .expect("first of month is valid");
        let end = next_month.pred_opt().expect("previous day exists");

        let days_in_month = end.day();
        let days_elapsed = reference.day();
        let days_remaining = days_in_month - days_elapsed;

        TimePeriod {
            start,
            end,
            month_key: reference.format("%Y-%m").to_string(),
            days_in_month,
            days_elapsed,
            days_remaining,
        }
    }
}

/// Sum expense amounts per category.
///
/// Records without a finite amount are skipped; records without a
/// category land in [`Category::Other`]. Map iteration follows the
/// category declaration order, so downstream scans are deterministic.
pub fn aggregate_by_category(expenses: &[Expense]) -> BTreeMap<Category, f64> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        let Some(amount) = expense.valid_amount() else {
            continue;
        };
        *totals.entry(expense.category_or_other()).or_insert(0.0) += amount;
    }

    totals
}

/// Total spend across all valid records.
pub fn total_spending(expenses: &[Expense]) -> f64 {
    expenses.iter().filter_map(|e| e.valid_amount()).sum()
}

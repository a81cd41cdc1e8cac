//! Month-over-month comparison analyzer

use serde::{Deserialize, Serialize};

use crate::models::{Category, Expense};

use super::period::{aggregate_by_category, total_spending};

/// Spending delta between the current and previous month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthComparison {
    pub current_total: f64,
    pub previous_total: f64,
    pub percentage_change: f64,
    pub is_increase: bool,
    pub category_comparisons: Vec<CategoryComparison>,
}

/// Per-category slice of a month comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryComparison {
    pub category: Category,
    pub current_amount: f64,
    pub previous_amount: f64,
    pub percentage_change: f64,
}

/// `(current - previous) / previous * 100`, with a defined answer when
/// the previous value is 0 (100 if anything was spent, else 0) and any
/// NaN/infinite result coerced to 0.
pub(crate) fn percent_change(current: f64, previous: f64) -> f64 {
    let change = if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - previous) / previous * 100.0
    };

    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// Compare this month's spending against the previous month.
///
/// Returns `None` when there is no previous-month data to compare
/// against. Category comparisons cover the union of categories seen in
/// either month; a category absent from one side contributes 0.
pub fn calculate_month_comparison(
    current_expenses: &[Expense],
    previous_expenses: &[Expense],
) -> Option<MonthComparison> {
    if previous_expenses.is_empty() {
        return None;
    }

    let current_total = total_spending(current_expenses);
    let previous_total = total_spending(previous_expenses);
    let percentage_change = percent_change(current_total, previous_total);

    let current_by_category = aggregate_by_category(current_expenses);
    let previous_by_category = aggregate_by_category(previous_expenses);

    let category_comparisons = Category::ALL
        .into_iter()
        .filter(|cat| {
            current_by_category.contains_key(cat) || previous_by_category.contains_key(cat)
        })
        .map(|cat| {
            let current_amount = current_by_category.get(&cat).copied().unwrap_or(0.0);
            let previous_amount = previous_by_category.get(&cat).copied().unwrap_or(0.0);
            CategoryComparison {
                category: cat,
                current_amount,
                previous_amount,
                percentage_change: percent_change(current_amount, previous_amount),
            }
        })
        .collect();

    Some(MonthComparison {
        current_total,
        previous_total,
        percentage_change,
        is_increase: current_total > previous_total,
        category_comparisons,
    })
}

//! Behavioral pattern detectors
//!
//! Four independent detectors scan the same expense set for distinct
//! statistical patterns:
//!
//! - **Recurring** - similar amounts at regular intervals in one category
//! - **Dominant category** - one category above 40% of total spend
//! - **Consistency** - low day-to-day variance in daily totals
//! - **Spikes** - individual expenses above twice the mean
//!
//! None of them mutate state; each is a pure scan over the input slice.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Expense};

use super::format::format_currency;
use super::period::{aggregate_by_category, total_spending};

/// Kind of behavioral pattern an insight reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Recurring,
    DominantCategory,
    Spike,
    Consistent,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recurring => "recurring",
            Self::DominantCategory => "dominant_category",
            Self::Spike => "spike",
            Self::Consistent => "consistent",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Integer severity used to rank insights for display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    Info = 1,
    Warning = 2,
    Critical = 3,
}

impl Priority {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Priority::Info),
            2 => Ok(Priority::Warning),
            3 => Ok(Priority::Critical),
            _ => Err(format!("Unknown priority: {}", v)),
        }
    }
}

/// A behavioral pattern worth surfacing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    pub priority: Priority,
}

/// Detector thresholds. The defaults are the product-defined values;
/// tests occasionally tighten or loosen them.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Minimum expenses in a category before recurrence is considered.
    pub recurring_min_expenses: usize,
    /// Relative band around the mean amount that counts as "similar".
    pub recurring_amount_tolerance: f64,
    /// Allowed deviation (days) from the mean gap between occurrences.
    pub recurring_gap_tolerance_days: f64,
    /// How many gaps must sit inside the tolerance band.
    pub recurring_min_regular_gaps: usize,
    /// Share of total spend (percent) above which a category dominates.
    pub dominant_share_percent: f64,
    /// Distinct spending days required before consistency is judged.
    pub consistency_min_days: usize,
    /// Maximum stddev/mean ratio of daily totals considered consistent.
    pub consistency_max_relative_stddev: f64,
    /// Multiple of the mean amount above which an expense is a spike.
    pub spike_multiplier: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            recurring_min_expenses: 3,
            recurring_amount_tolerance: 0.10,
            recurring_gap_tolerance_days: 3.0,
            recurring_min_regular_gaps: 2,
            dominant_share_percent: 40.0,
            consistency_min_days: 3,
            consistency_max_relative_stddev: 0.20,
            spike_multiplier: 2.0,
        }
    }
}

/// Detect categories with 3+ similar-amount expenses at regular
/// intervals. Emits at most one insight per category.
pub fn detect_recurring_expenses(
    expenses: &[Expense],
    config: &BehaviorConfig,
) -> Vec<BehaviorInsight> {
    let mut insights = Vec::new();

    if expenses.is_empty() {
        return insights;
    }

    let mut by_category: BTreeMap<Category, Vec<&Expense>> = BTreeMap::new();
    for expense in expenses {
        by_category
            .entry(expense.category_or_other())
            .or_default()
            .push(expense);
    }

    for (category, group) in by_category {
        if group.len() < config.recurring_min_expenses {
            continue;
        }

        // Amount similarity: at least N expenses within the tolerance
        // band around the category mean
        let amounts: Vec<f64> = group.iter().filter_map(|e| e.valid_amount()).collect();
        if amounts.len() < config.recurring_min_expenses {
            continue;
        }

        let mean = amounts.iter().sum::<f64>() / amounts.len() as f64;
        if mean == 0.0 {
            continue;
        }

        let mut similar: Vec<&Expense> = group
            .iter()
            .filter(|e| {
                e.valid_amount().is_some_and(|a| {
                    ((a - mean) / mean).abs() <= config.recurring_amount_tolerance
                })
            })
            .copied()
            .collect();
        if similar.len() < config.recurring_min_expenses {
            continue;
        }

        // Interval regularity over the date-sorted similar expenses
        similar.sort_by_key(|e| e.civil_date());
        let dates: Vec<NaiveDate> = similar.iter().filter_map(|e| e.civil_date()).collect();

        let gaps: Vec<f64> = dates
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_days() as f64)
            .collect();
        if gaps.len() < config.recurring_min_regular_gaps {
            continue;
        }

        let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
        let regular = gaps
            .iter()
            .filter(|gap| (*gap - mean_gap).abs() <= config.recurring_gap_tolerance_days)
            .count();

        if regular >= config.recurring_min_regular_gaps {
            insights.push(BehaviorInsight {
                kind: InsightKind::Recurring,
                message: format!("Despesa recorrente detectada em {}", category.label()),
                priority: Priority::Warning,
            });
        }
    }

    insights
}

/// Detect a category holding more than 40% of total spend. The first
/// category in declaration order that crosses the threshold wins.
pub fn detect_dominant_category(
    expenses: &[Expense],
    config: &BehaviorConfig,
) -> Option<BehaviorInsight> {
    if expenses.is_empty() {
        return None;
    }

    let total = total_spending(expenses);
    if total == 0.0 {
        return None;
    }

    for (category, amount) in aggregate_by_category(expenses) {
        let share = amount / total * 100.0;
        if !share.is_finite() {
            continue;
        }

        if share > config.dominant_share_percent {
            return Some(BehaviorInsight {
                kind: InsightKind::DominantCategory,
                message: format!("{} representa {:.0}% dos gastos", category.label(), share),
                priority: Priority::Warning,
            });
        }
    }

    None
}

/// Detect low day-to-day variance: daily totals whose population
/// standard deviation stays under 20% of their mean.
pub fn detect_spending_consistency(
    expenses: &[Expense],
    config: &BehaviorConfig,
) -> Option<BehaviorInsight> {
    if expenses.len() < config.consistency_min_days {
        return None;
    }

    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for expense in expenses {
        let (Some(date), Some(amount)) = (expense.civil_date(), expense.valid_amount()) else {
            continue;
        };
        *daily.entry(date).or_insert(0.0) += amount;
    }

    if daily.len() < config.consistency_min_days {
        return None;
    }

    let totals: Vec<f64> = daily.into_values().collect();
    let mean = totals.iter().sum::<f64>() / totals.len() as f64;
    if mean == 0.0 {
        return None;
    }

    let variance =
        totals.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / totals.len() as f64;
    let stddev = variance.sqrt();
    if !stddev.is_finite() {
        return None;
    }

    let relative_stddev = if mean > 0.0 { stddev / mean } else { 0.0 };
    if relative_stddev < config.consistency_max_relative_stddev {
        return Some(BehaviorInsight {
            kind: InsightKind::Consistent,
            message: "Seus gastos estão consistentes".to_string(),
            priority: Priority::Info,
        });
    }

    None
}

/// Detect individual expenses above twice the mean amount. Each
/// offender produces its own insight.
pub fn detect_spending_spikes(
    expenses: &[Expense],
    config: &BehaviorConfig,
) -> Vec<BehaviorInsight> {
    let mut insights = Vec::new();

    let valid: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.valid_amount().is_some_and(|a| a > 0.0))
        .collect();
    if valid.is_empty() {
        return insights;
    }

    let mean = valid
        .iter()
        .filter_map(|e| e.valid_amount())
        .sum::<f64>()
        / valid.len() as f64;
    if mean == 0.0 {
        return insights;
    }

    for expense in valid {
        let Some(amount) = expense.valid_amount() else {
            continue;
        };

        if amount > config.spike_multiplier * mean {
            insights.push(BehaviorInsight {
                kind: InsightKind::Spike,
                message: format!(
                    "Gasto alto em {}: {}",
                    expense.category_or_other().label(),
                    format_currency(amount)
                ),
                priority: Priority::Critical,
            });
        }
    }

    insights
}

/// Run all four detectors with default thresholds, in the fixed order
/// recurring, dominant category, consistency, spikes.
pub fn generate_behavior_insights(expenses: &[Expense]) -> Vec<BehaviorInsight> {
    generate_behavior_insights_with(expenses, &BehaviorConfig::default())
}

/// Same as [`generate_behavior_insights`] with custom thresholds.
pub fn generate_behavior_insights_with(
    expenses: &[Expense],
    config: &BehaviorConfig,
) -> Vec<BehaviorInsight> {
    let mut insights = detect_recurring_expenses(expenses, config);

    if let Some(dominant) = detect_dominant_category(expenses, config) {
        insights.push(dominant);
    }
    if let Some(consistent) = detect_spending_consistency(expenses, config) {
        insights.push(consistent);
    }
    insights.extend(detect_spending_spikes(expenses, config));

    tracing::debug!(count = insights.len(), "Behavior analysis complete");
    insights
}

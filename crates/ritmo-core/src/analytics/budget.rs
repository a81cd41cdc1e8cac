//! Budget alert analyzer
//!
//! Classifies per-category spending against configured limits. The
//! warning and critical thresholds are evaluated independently, so a
//! category at or above 100% produces a critical alert without a
//! warning entry in the same pass.

use serde::{Deserialize, Serialize};

use crate::models::{Category, CategoryBudget, Expense};

use super::period::aggregate_by_category;

/// Percentage of the limit at which a warning fires.
const WARNING_THRESHOLD: f64 = 80.0;
/// Percentage of the limit at which a critical alert fires.
const CRITICAL_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category whose spending crossed a budget threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: Category,
    pub limit: f64,
    pub spent: f64,
    pub percentage: f64,
    pub level: AlertLevel,
}

/// Overall health of one budget, the non-alert companion view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    Safe,
    Warning,
    Exceeded,
}

/// Spending position against one budget, for display alongside alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: Category,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage_used: f64,
    pub status: BudgetHealth,
}

/// Emit warning/critical alerts for budgets whose spending crossed the
/// 80% or 100% bands. Budgets without a positive finite limit are
/// skipped, as are degenerate percentages.
pub fn detect_budget_alerts(
    expenses: &[Expense],
    budget_limits: &[CategoryBudget],
) -> Vec<BudgetAlert> {
    let mut alerts = Vec::new();

    if expenses.is_empty() || budget_limits.is_empty() {
        return alerts;
    }

    let spending = aggregate_by_category(expenses);

    for budget in budget_limits {
        let Some(limit) = budget.valid_limit() else {
            continue;
        };

        let spent = spending.get(&budget.category).copied().unwrap_or(0.0);
        let percentage = spent / limit * 100.0;
        if !percentage.is_finite() {
            continue;
        }

        if percentage >= WARNING_THRESHOLD && percentage < CRITICAL_THRESHOLD {
            alerts.push(BudgetAlert {
                category: budget.category,
                limit,
                spent,
                percentage,
                level: AlertLevel::Warning,
            });
        }

        if percentage >= CRITICAL_THRESHOLD {
            alerts.push(BudgetAlert {
                category: budget.category,
                limit,
                spent,
                percentage,
                level: AlertLevel::Critical,
            });
        }
    }

    tracing::debug!(count = alerts.len(), "Budget alert scan complete");
    alerts
}

/// Status rows for every valid budget, whether or not a threshold was
/// crossed. Used by the budget manager display.
pub fn budget_statuses(
    expenses: &[Expense],
    budget_limits: &[CategoryBudget],
) -> Vec<BudgetStatus> {
    let spending = aggregate_by_category(expenses);

    budget_limits
        .iter()
        .filter_map(|budget| {
            let limit = budget.valid_limit()?;
            let spent = spending.get(&budget.category).copied().unwrap_or(0.0);
            let percentage_used = spent / limit * 100.0;
            if !percentage_used.is_finite() {
                return None;
            }

            let status = if percentage_used >= CRITICAL_THRESHOLD {
                BudgetHealth::Exceeded
            } else if percentage_used >= WARNING_THRESHOLD {
                BudgetHealth::Warning
            } else {
                BudgetHealth::Safe
            };

            Some(BudgetStatus {
                category: budget.category,
                limit,
                spent,
                remaining: limit - spent,
                percentage_used,
                status,
            })
        })
        .collect()
}

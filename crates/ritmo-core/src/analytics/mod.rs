//! Analytics engine - derived financial signals
//!
//! Pure, stateless functions that turn raw expense records (plus budget
//! limits and dismissed-insight markers) into derived signals: monthly
//! spending projections, month-over-month comparisons, budget threshold
//! alerts and behavioral pattern insights.
//!
//! Every analyzer is deterministic: time-sensitive functions take an
//! explicit reference date instead of reading the clock, inputs are
//! never mutated, and malformed records degrade to `None`/empty results
//! rather than errors. Data flows one way:
//!
//! raw records -> analyzers -> result structs -> formatters -> strings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ritmo_core::analytics;
//!
//! let projection = analytics::calculate_monthly_projection(&expenses, balance, today);
//! let message = analytics::format_projection_message(projection.as_ref());
//! ```

pub mod behavior;
pub mod budget;
pub mod comparison;
pub mod filter;
pub mod format;
pub mod overview;
pub mod period;
pub mod projection;

pub use behavior::{
    detect_dominant_category, detect_recurring_expenses, detect_spending_consistency,
    detect_spending_spikes, generate_behavior_insights, generate_behavior_insights_with,
    BehaviorConfig, BehaviorInsight, InsightKind, Priority,
};
pub use budget::{
    budget_statuses, detect_budget_alerts, AlertLevel, BudgetAlert, BudgetHealth, BudgetStatus,
};
pub use comparison::{calculate_month_comparison, CategoryComparison, MonthComparison};
pub use filter::{insight_key, prioritize_and_filter_insights};
pub use format::{format_comparison_message, format_currency, format_projection_message};
pub use overview::{
    category_breakdown, generate_financial_insights, top_expenses, CategoryBreakdown,
    FinancialInsight, FinancialInsightKind, TopExpense,
};
pub use period::{aggregate_by_category, total_spending, TimePeriod};
pub use projection::{calculate_monthly_projection, Confidence, MonthlyProjection};

/// Shared fixture builders for unit tests.
#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Category, CategoryBudget, Expense};

    pub fn expense(amount: f64, category: &str, date: &str) -> Expense {
        Expense {
            id: String::new(),
            user_id: "user1".to_string(),
            description: format!("{} expense", category),
            amount: Some(amount),
            category: Some(Category::from_tag(category)),
            date: crate::models::parse_civil_date(date),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn budget(category: &str, limit: f64) -> CategoryBudget {
        CategoryBudget {
            id: String::new(),
            user_id: "user1".to_string(),
            category: Category::from_tag(category),
            month_year: "2024-02".to_string(),
            limit_amount: Some(limit),
            created_at: None,
            updated_at: None,
        }
    }
}

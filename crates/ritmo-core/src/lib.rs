//! Ritmo Core Library
//!
//! Analytics and insights engine for the Ritmo personal finance
//! tracker:
//! - Monthly projection of the end-of-month balance
//! - Month-over-month spending comparisons
//! - Budget threshold alerts (warning/critical bands)
//! - Behavioral pattern detection (recurring charges, dominant
//!   categories, consistency, spikes)
//! - Insight prioritization with time-limited dismissals
//! - pt-BR message and currency formatting
//!
//! Persistence, rendering and authentication live elsewhere: this crate
//! consumes in-memory record collections from a storage collaborator
//! and produces plain result structures. All analyzers are pure and
//! take explicit reference dates, so results are reproducible without
//! clock mocking.

pub mod analytics;
pub mod error;
pub mod limiter;
pub mod models;

pub use analytics::{
    aggregate_by_category, budget_statuses, calculate_month_comparison,
    calculate_monthly_projection, category_breakdown, detect_budget_alerts,
    detect_dominant_category, detect_recurring_expenses, detect_spending_consistency,
    detect_spending_spikes, format_comparison_message, format_currency,
    format_projection_message, generate_behavior_insights, generate_behavior_insights_with,
    generate_financial_insights, insight_key, prioritize_and_filter_insights, top_expenses,
    AlertLevel, BehaviorConfig, BehaviorInsight, BudgetAlert, BudgetHealth, BudgetStatus,
    CategoryBreakdown, CategoryComparison, Confidence, FinancialInsight, FinancialInsightKind,
    InsightKind, MonthComparison, MonthlyProjection, Priority, TimePeriod, TopExpense,
};
pub use error::{Error, Result};
pub use limiter::{RateLimitConfig, RateLimiter};
pub use models::{
    month_bounds, month_key, parse_civil_date, previous_month_key, Category, CategoryBudget,
    DismissedInsight, Expense,
};

//! Dashboard overview helpers
//!
//! Category breakdowns, top expenses and income-relative insights that
//! back the summary cards and charts. These complement the behavior
//! detectors: they compare spending to income instead of to itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Expense};

use super::period::{aggregate_by_category, total_spending};

/// One category's share of the month, with display metadata attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub amount: f64,
    pub percentage: f64,
    pub label: String,
    pub icon: String,
    pub color: String,
}

/// A single large expense on the dashboard's top-expenses card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopExpense {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: Option<NaiveDate>,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialInsightKind {
    Warning,
    Info,
    Success,
}

/// Income-relative observation for the insights hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialInsight {
    pub kind: FinancialInsightKind,
    pub title: String,
    pub message: String,
    pub icon: String,
}

/// Share of income above which a single expense is flagged.
const SIGNIFICANT_EXPENSE_SHARE: f64 = 0.15;
/// Share of income (percent) above which a category is flagged.
const ELEVATED_CATEGORY_PERCENT: f64 = 30.0;

/// Per-category totals with share of total spend, sorted by amount
/// descending. Empty when nothing was spent.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryBreakdown> {
    let total = total_spending(expenses);
    if total == 0.0 {
        return Vec::new();
    }

    let mut breakdown: Vec<CategoryBreakdown> = aggregate_by_category(expenses)
        .into_iter()
        .map(|(category, amount)| CategoryBreakdown {
            category,
            amount,
            percentage: amount / total * 100.0,
            label: category.label().to_string(),
            icon: category.icon().to_string(),
            color: category.color().to_string(),
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    breakdown
}

/// The `limit` largest expenses with their share of total spend.
pub fn top_expenses(expenses: &[Expense], limit: usize) -> Vec<TopExpense> {
    let total = total_spending(expenses);

    let mut valid: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.valid_amount().is_some())
        .collect();
    valid.sort_by(|a, b| {
        let a_amount = a.valid_amount().unwrap_or(0.0);
        let b_amount = b.valid_amount().unwrap_or(0.0);
        b_amount
            .partial_cmp(&a_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    valid
        .into_iter()
        .take(limit)
        .map(|e| {
            let amount = e.valid_amount().unwrap_or(0.0);
            TopExpense {
                description: e.description.clone(),
                amount,
                category: e.category_or_other(),
                date: e.civil_date(),
                percentage: if total > 0.0 {
                    amount / total * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Income-relative insight rules: significant single expenses, elevated
/// categories, overall spend-vs-income bands and the previous-month
/// delta. Pass `None` for `previous_expenses` when no prior month
/// exists.
pub fn generate_financial_insights(
    income: f64,
    expenses: &[Expense],
    previous_expenses: Option<&[Expense]>,
) -> Vec<FinancialInsight> {
    let mut insights = Vec::new();
    let total = total_spending(expenses);
    let expense_percentage = if income > 0.0 {
        total / income * 100.0
    } else {
        0.0
    };

    // Single expenses above 15% of income
    if income > 0.0 {
        for expense in expenses {
            let Some(amount) = expense.valid_amount() else {
                continue;
            };
            if amount > income * SIGNIFICANT_EXPENSE_SHARE {
                insights.push(FinancialInsight {
                    kind: FinancialInsightKind::Warning,
                    title: "Despesa Significativa".to_string(),
                    message: format!(
                        "\"{}\" representa {:.1}% da sua renda mensal.",
                        expense.description,
                        amount / income * 100.0
                    ),
                    icon: "⚠️".to_string(),
                });
            }
        }
    }

    // Categories above 30% of income
    for entry in category_breakdown(expenses) {
        let category_percentage = if income > 0.0 {
            entry.amount / income * 100.0
        } else {
            0.0
        };
        if category_percentage > ELEVATED_CATEGORY_PERCENT {
            insights.push(FinancialInsight {
                kind: FinancialInsightKind::Warning,
                title: "Categoria Elevada".to_string(),
                message: format!(
                    "Gastos com {} ultrapassaram 30% da sua renda ({:.1}%).",
                    entry.label.to_lowercase(),
                    category_percentage
                ),
                icon: "⚠️".to_string(),
            });
        }
    }

    // Overall spend against income
    if expense_percentage > 80.0 {
        insights.push(FinancialInsight {
            kind: FinancialInsightKind::Warning,
            title: "Atenção com Orçamento".to_string(),
            message: format!(
                "Seus gastos atingiram {:.1}% da sua renda. Considere reduzir despesas.",
                expense_percentage
            ),
            icon: "⚠️".to_string(),
        });
    } else if expense_percentage > 60.0 {
        insights.push(FinancialInsight {
            kind: FinancialInsightKind::Info,
            title: "Gastos Moderados".to_string(),
            message: format!(
                "Você gastou {:.1}% da sua renda. Mantenha o bom trabalho!",
                expense_percentage
            ),
            icon: "💡".to_string(),
        });
    } else if total > 0.0 {
        insights.push(FinancialInsight {
            kind: FinancialInsightKind::Success,
            title: "Excelente Controle".to_string(),
            message: format!(
                "Você gastou apenas {:.1}% da sua renda. Parabéns!",
                expense_percentage
            ),
            icon: "✅".to_string(),
        });
    }

    // Delta against the previous month
    if let Some(previous) = previous_expenses.filter(|p| !p.is_empty()) {
        let previous_total = total_spending(previous);
        let difference = total - previous_total;
        let percentage_difference = if previous_total > 0.0 {
            difference / previous_total * 100.0
        } else {
            0.0
        };

        if difference.abs() > 0.01 {
            if difference > 0.0 {
                insights.push(FinancialInsight {
                    kind: FinancialInsightKind::Warning,
                    title: "Gastos Aumentaram".to_string(),
                    message: format!(
                        "Você gastou {:.1}% a mais que no mês anterior.",
                        percentage_difference.abs()
                    ),
                    icon: "📈".to_string(),
                });
            } else {
                insights.push(FinancialInsight {
                    kind: FinancialInsightKind::Success,
                    title: "Gastos Diminuíram".to_string(),
                    message: format!(
                        "Você gastou {:.1}% a menos que no mês anterior!",
                        percentage_difference.abs()
                    ),
                    icon: "📉".to_string(),
                });
            }
        }
    }

    insights
}

//! User-facing message formatters (pt-BR)
//!
//! Renders structured analyzer results into display strings. Currency
//! values follow Brazilian conventions: `R$` prefix, `.` thousands
//! separator, `,` decimal separator.

use super::comparison::MonthComparison;
use super::projection::MonthlyProjection;

/// Format an amount as BRL, e.g. `R$ 1.234,56`. Non-finite input
/// renders as the zero amount.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "R$ 0,00".to_string();
    }

    let negative = amount < 0.0;
    // Saturates for absurdly large finite values, which still yields a
    // well-formed string
    let total_cents = (amount.abs() * 100.0).round() as u128;
    let whole = total_cents / 100;
    let cents = (total_cents % 100) as u32;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents)
}

/// Render a projection as a user-facing sentence, or the fixed
/// insufficient-data message when no projection could be computed.
pub fn format_projection_message(projection: Option<&MonthlyProjection>) -> String {
    match projection {
        None => {
            "Dados insuficientes para projeção. Continue registrando suas despesas.".to_string()
        }
        Some(p) => format!(
            "Mantendo esse ritmo, seu saldo final será de {}",
            format_currency(p.projected_balance)
        ),
    }
}

/// Render a month comparison as a user-facing sentence. `None` in means
/// `None` out; a zero previous total gets the first-month message.
pub fn format_comparison_message(comparison: Option<&MonthComparison>) -> Option<String> {
    let comparison = comparison?;

    if comparison.previous_total == 0.0 {
        return Some("Primeiro mês com dados".to_string());
    }

    let percentage = comparison.percentage_change.abs();
    let direction = if comparison.is_increase {
        "a mais"
    } else {
        "a menos"
    };
    Some(format!(
        "Você gastou {:.1}% {} que no mês passado",
        percentage, direction
    ))
}

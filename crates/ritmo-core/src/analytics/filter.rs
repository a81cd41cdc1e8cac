//! Insight prioritization and dismissal filtering
//!
//! Merges detector output into the short list actually shown: strips
//! insights the user dismissed in the last 24 hours, bounds message
//! length, ranks by priority and caps the count.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::DismissedInsight;

use super::behavior::BehaviorInsight;

/// Maximum number of insights surfaced at once.
const MAX_INSIGHTS: usize = 3;

/// Messages longer than this are truncated to [`TRUNCATED_LEN`] + `...`.
const MAX_MESSAGE_LEN: usize = 100;
const TRUNCATED_LEN: usize = 97;

/// Dismissal key for an insight: type and message text joined by `_`.
///
/// The message is part of the identity, so an insight whose numeric
/// content changes gets a fresh key and escapes an earlier dismissal.
pub fn insight_key(insight: &BehaviorInsight) -> String {
    format!("{}_{}", insight.kind.as_str(), insight.message)
}

/// Filter out actively-dismissed insights, truncate long messages, sort
/// by priority descending (ties keep insertion order) and return at most
/// three.
pub fn prioritize_and_filter_insights(
    insights: Vec<BehaviorInsight>,
    dismissed: &[DismissedInsight],
    now: DateTime<Utc>,
) -> Vec<BehaviorInsight> {
    let active_keys: HashSet<&str> = dismissed
        .iter()
        .filter(|marker| marker.is_active(now))
        .map(|marker| marker.insight_key.as_str())
        .collect();

    let mut filtered: Vec<BehaviorInsight> = insights
        .into_iter()
        .filter(|insight| !active_keys.contains(insight_key(insight).as_str()))
        .map(|mut insight| {
            if insight.message.chars().count() > MAX_MESSAGE_LEN {
                let mut truncated: String =
                    insight.message.chars().take(TRUNCATED_LEN).collect();
                truncated.push_str("...");
                insight.message = truncated;
            }
            insight
        })
        .collect();

    // sort_by is stable, so equal priorities keep insertion order
    filtered.sort_by(|a, b| b.priority.cmp(&a.priority));
    filtered.truncate(MAX_INSIGHTS);

    tracing::debug!(count = filtered.len(), "Insight filtering complete");
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::behavior::{InsightKind, Priority};
    use chrono::Duration;

    fn insight(kind: InsightKind, message: &str, priority: Priority) -> BehaviorInsight {
        BehaviorInsight {
            kind,
            message: message.to_string(),
            priority,
        }
    }

    #[test]
    fn test_insight_key_format() {
        let spike = insight(InsightKind::Spike, "Gasto alto em Compras", Priority::Critical);
        assert_eq!(insight_key(&spike), "spike_Gasto alto em Compras");
    }

    #[test]
    fn test_sorts_by_priority_and_caps_at_three() {
        let insights = vec![
            insight(InsightKind::Consistent, "c", Priority::Info),
            insight(InsightKind::Recurring, "r1", Priority::Warning),
            insight(InsightKind::Spike, "s1", Priority::Critical),
            insight(InsightKind::Recurring, "r2", Priority::Warning),
        ];

        let result = prioritize_and_filter_insights(insights, &[], Utc::now());
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].priority, Priority::Critical);
        // Stable tie-break keeps r1 before r2
        assert_eq!(result[1].message, "r1");
        assert_eq!(result[2].message, "r2");
    }

    #[test]
    fn test_active_dismissal_strips_insight() {
        let now = Utc::now();
        let spike = insight(InsightKind::Spike, "Gasto alto", Priority::Critical);
        let marker = DismissedInsight::new("u", insight_key(&spike), now);

        let result = prioritize_and_filter_insights(vec![spike.clone()], &[marker], now);
        assert!(result.is_empty());
    }

    #[test]
    fn test_expired_dismissal_is_ignored() {
        let now = Utc::now();
        let spike = insight(InsightKind::Spike, "Gasto alto", Priority::Critical);
        let stale = DismissedInsight::new("u", insight_key(&spike), now - Duration::hours(25));

        let result = prioritize_and_filter_insights(vec![spike], &[stale], now);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_changed_message_defeats_dismissal() {
        // Message text is part of the key, so a numeric change in the
        // message yields a fresh key
        let now = Utc::now();
        let old = insight(InsightKind::Spike, "Gasto alto: R$ 100,00", Priority::Critical);
        let new = insight(InsightKind::Spike, "Gasto alto: R$ 150,00", Priority::Critical);
        let marker = DismissedInsight::new("u", insight_key(&old), now);

        let result = prioritize_and_filter_insights(vec![new], &[marker], now);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_long_message_truncated() {
        let long = "x".repeat(150);
        let insights = vec![insight(InsightKind::Recurring, &long, Priority::Warning)];

        let result = prioritize_and_filter_insights(insights, &[], Utc::now());
        assert_eq!(result[0].message.chars().count(), 100);
        assert!(result[0].message.ends_with("..."));
    }
}

//! Domain models for Ritmo
//!
//! Records here are owned by the external storage collaborator and are
//! read-only to the analytics core. Fields that may arrive missing or
//! malformed are modeled as `Option` and validated through accessors
//! instead of failing deserialization.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Expense category, a closed tag set with `Other` as the fallback for
/// anything unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Health,
    Education,
    Bills,
    Shopping,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Health,
        Category::Education,
        Category::Bills,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Education => "education",
            Self::Bills => "bills",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }

    /// Total mapping from a raw tag; unknown tags fall back to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "food" => Self::Food,
            "transport" => Self::Transport,
            "entertainment" => Self::Entertainment,
            "health" => Self::Health,
            "education" => Self::Education,
            "bills" => Self::Bills,
            "shopping" => Self::Shopping,
            _ => Self::Other,
        }
    }

    /// Display name shown to users (pt-BR).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Alimentação",
            Self::Transport => "Transporte",
            Self::Entertainment => "Lazer",
            Self::Health => "Saúde",
            Self::Education => "Educação",
            Self::Bills => "Contas",
            Self::Shopping => "Compras",
            Self::Other => "Outros",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "🍔",
            Self::Transport => "🚗",
            Self::Entertainment => "🎬",
            Self::Health => "💊",
            Self::Education => "📚",
            Self::Bills => "💡",
            Self::Shopping => "🛍️",
            Self::Other => "📦",
        }
    }

    /// Chart color as a hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "#FF6B6B",
            Self::Transport => "#4ECDC4",
            Self::Entertainment => "#FFE66D",
            Self::Health => "#95E1D3",
            Self::Education => "#A8E6CF",
            Self::Bills => "#FF8B94",
            Self::Shopping => "#C7CEEA",
            Self::Other => "#B4A7D6",
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from_tag(&s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense record as handed over by the storage collaborator.
///
/// Amount and date may be missing or malformed in stored data; records
/// failing [`Expense::valid_amount`] or [`Expense::civil_date`] are
/// silently excluded from every calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<Category>,
    /// Calendar date with local-civil-date semantics, no time component.
    #[serde(default, with = "civil_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// The amount if present and finite, otherwise `None`.
    pub fn valid_amount(&self) -> Option<f64> {
        self.amount.filter(|a| a.is_finite())
    }

    /// The calendar date, if present.
    pub fn civil_date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Category with the guaranteed `Other` fallback.
    pub fn category_or_other(&self) -> Category {
        self.category.unwrap_or(Category::Other)
    }

    /// Decode a batch of expense records from the storage collaborator's
    /// JSON representation.
    pub fn decode_batch(json: &str) -> Result<Vec<Expense>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serde helper for civil dates stored as `YYYY-MM-DD`, possibly with a
/// `T...` time suffix. The date part is compared as a Y/M/D triple, never
/// routed through a timezone-aware parse that could shift the day.
/// Unparseable dates become `None` so a bad record never fails a batch.
mod civil_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| parse_civil_date(&s)))
    }

    pub fn parse_civil_date(s: &str) -> Option<NaiveDate> {
        let date_part = s.split('T').next().unwrap_or(s);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

pub use civil_date::parse_civil_date;

/// A spending limit for one category in one month.
///
/// At most one budget exists per (user, category, month); conflicting
/// writes upsert by that key in the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBudget {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub category: Category,
    /// Month identifier in `YYYY-MM` form.
    pub month_year: String,
    #[serde(default)]
    pub limit_amount: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CategoryBudget {
    /// The limit if present, finite and positive.
    pub fn valid_limit(&self) -> Option<f64> {
        self.limit_amount.filter(|l| l.is_finite() && *l > 0.0)
    }
}

/// How long a dismissal suppresses an insight.
const DISMISSAL_TTL_HOURS: i64 = 24;

/// A user's time-limited suppression of one insight.
///
/// The storage collaborator persists and eventually deletes these; the
/// core computes the expiry at dismissal time and decides activeness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DismissedInsight {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    /// Opaque key derived from insight type + message text.
    pub insight_key: String,
    pub dismissed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DismissedInsight {
    /// Build a marker dismissed at `now`, expiring 24 hours later.
    pub fn new(
        user_id: impl Into<String>,
        insight_key: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            insight_key: insight_key.into(),
            dismissed_at: now,
            expires_at: now + Duration::hours(DISMISSAL_TTL_HOURS),
        }
    }

    /// A marker suppresses its insight only while the expiry is strictly
    /// in the future.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// `YYYY-MM` key for the month containing `date`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// `YYYY-MM` key for the month before the one containing `date`.
pub fn previous_month_key(date: NaiveDate) -> String {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    format!("{:04}-{:02}", year, month)
}

/// First and last day of the month named by a `YYYY-MM` key.
///
/// Used by callers to scope expense queries to a budget's month.
pub fn month_bounds(key: &str) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || Error::InvalidMonthKey(key.to_string());

    let (year_str, month_str) = key.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year_str.parse().map_err(|_| invalid())?;
    let month: u32 = month_str.parse().map_err(|_| invalid())?;

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let end = next_month.pred_opt().ok_or_else(invalid)?;

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_fallback() {
        assert_eq!(Category::from_tag("food"), Category::Food);
        assert_eq!(Category::from_tag("FOOD"), Category::Food);
        assert_eq!(Category::from_tag("groceries"), Category::Other);
        assert_eq!(Category::from_tag(""), Category::Other);
    }

    #[test]
    fn test_category_metadata_is_total() {
        for cat in Category::ALL {
            assert!(!cat.label().is_empty());
            assert!(!cat.icon().is_empty());
            assert!(cat.color().starts_with('#'));
        }
    }

    #[test]
    fn test_expense_decode_tolerates_bad_records() {
        let json = r#"[
            {"id": "1", "user_id": "u", "description": "Almoço",
             "amount": 42.5, "category": "food", "date": "2024-02-10"},
            {"id": "2", "user_id": "u", "description": "sem valor",
             "amount": null, "category": "mystery", "date": "2024-02-11T00:00:00"},
            {"id": "3", "user_id": "u", "description": "sem data",
             "amount": 10.0, "date": "not-a-date"}
        ]"#;

        let expenses = Expense::decode_batch(json).unwrap();
        assert_eq!(expenses.len(), 3);

        assert_eq!(expenses[0].valid_amount(), Some(42.5));
        assert_eq!(
            expenses[0].civil_date(),
            NaiveDate::from_ymd_opt(2024, 2, 10)
        );

        // Unknown category falls back to Other, T-suffixed date keeps its civil day
        assert_eq!(expenses[1].valid_amount(), None);
        assert_eq!(expenses[1].category_or_other(), Category::Other);
        assert_eq!(
            expenses[1].civil_date(),
            NaiveDate::from_ymd_opt(2024, 2, 11)
        );

        assert_eq!(expenses[2].civil_date(), None);
    }

    #[test]
    fn test_dismissal_expiry_arithmetic() {
        let now = Utc::now();
        let marker = DismissedInsight::new("user1", "spike_Gasto alto", now);

        assert_eq!(marker.expires_at - marker.dismissed_at, Duration::hours(24));
        assert!(marker.is_active(now));
        assert!(marker.is_active(now + Duration::hours(23)));
        // Strictly-after comparison: exactly at expiry the marker is inactive
        assert!(!marker.is_active(now + Duration::hours(24)));
    }

    #[test]
    fn test_month_keys() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(month_key(date), "2024-03");
        assert_eq!(previous_month_key(date), "2024-02");

        let january = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(previous_month_key(january), "2023-12");
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds("2024-02").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (start, end) = month_bounds("2023-12").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        assert!(month_bounds("2024").is_err());
        assert!(month_bounds("2024-13").is_err());
        assert!(month_bounds("banana").is_err());
    }

    #[test]
    fn test_budget_limit_validation() {
        let mut budget = CategoryBudget {
            id: "b1".into(),
            user_id: "u".into(),
            category: Category::Food,
            month_year: "2024-02".into(),
            limit_amount: Some(100.0),
            created_at: None,
            updated_at: None,
        };
        assert_eq!(budget.valid_limit(), Some(100.0));

        budget.limit_amount = Some(0.0);
        assert_eq!(budget.valid_limit(), None);
        budget.limit_amount = Some(-5.0);
        assert_eq!(budget.valid_limit(), None);
        budget.limit_amount = Some(f64::NAN);
        assert_eq!(budget.valid_limit(), None);
        budget.limit_amount = None;
        assert_eq!(budget.valid_limit(), None);
    }
}

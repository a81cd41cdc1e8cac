//! Integration tests for ritmo-core
//!
//! These tests exercise the full decode → analyze → prioritize → format
//! pipeline the way the UI layer drives it.

use chrono::{Duration, NaiveDate, Utc};

use ritmo_core::{
    calculate_month_comparison, calculate_monthly_projection, detect_budget_alerts,
    detect_recurring_expenses, detect_spending_spikes, format_comparison_message,
    format_projection_message, generate_behavior_insights, insight_key,
    prioritize_and_filter_insights, AlertLevel, BehaviorConfig, Category, CategoryBudget,
    Confidence, DismissedInsight, Expense, InsightKind,
};

fn expense(amount: f64, category: &str, date: &str) -> Expense {
    Expense {
        id: String::new(),
        user_id: "user1".to_string(),
        description: format!("{} expense", category),
        amount: Some(amount),
        category: Some(Category::from_tag(category)),
        date: ritmo_core::parse_civil_date(date),
        created_at: None,
        updated_at: None,
    }
}

fn budget(category: &str, limit: f64) -> CategoryBudget {
    CategoryBudget {
        id: String::new(),
        user_id: "user1".to_string(),
        category: Category::from_tag(category),
        month_year: "2023-02".to_string(),
        limit_amount: Some(limit),
        created_at: None,
        updated_at: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// Projection pipeline
// =============================================================================

#[test]
fn test_projection_scenario_single_expense_28_day_month() {
    // One expense of 100 on the 15th of a 28-day month, projected on
    // the 15th: 13 days remain
    let expenses = vec![expense(100.0, "food", "2023-02-15")];
    let balance = 2500.0;

    let projection = calculate_monthly_projection(&expenses, balance, date(2023, 2, 15))
        .expect("projection should exist with 15 elapsed days");

    assert_eq!(projection.remaining_days, 13);
    assert!(
        (projection.projected_balance
            - (balance - projection.average_daily_spending * 13.0))
            .abs()
            < 0.01
    );

    let message = format_projection_message(Some(&projection));
    assert!(message.contains("Mantendo esse ritmo"));
    assert!(message.contains("R$"));
}

#[test]
fn test_projection_formula_holds_across_the_month() {
    let expenses = vec![
        expense(45.0, "food", "2023-03-01"),
        expense(80.0, "bills", "2023-03-04"),
        expense(22.5, "transport", "2023-03-07"),
        expense(130.0, "shopping", "2023-03-09"),
    ];

    for day in [4, 10, 20, 31] {
        let reference = date(2023, 3, day);
        let projection = calculate_monthly_projection(&expenses, 4000.0, reference)
            .expect("enough elapsed days");

        // projected == balance - avg * remaining, remaining == 31 - day
        assert_eq!(projection.remaining_days, 31 - day);
        assert!(
            (projection.projected_balance
                - (4000.0
                    - projection.average_daily_spending
                        * f64::from(projection.remaining_days)))
                .abs()
                < 0.01
        );
    }
}

#[test]
fn test_projection_insufficient_data_message() {
    let projection = calculate_monthly_projection(&[], 1000.0, date(2023, 3, 20));
    assert!(projection.is_none());
    assert_eq!(
        format_projection_message(None),
        "Dados insuficientes para projeção. Continue registrando suas despesas."
    );
}

#[test]
fn test_projection_confidence_follows_elapsed_days() {
    let expenses = vec![expense(10.0, "food", "2023-03-01")];

    let by_day = [
        (5, Confidence::Low),
        (13, Confidence::Medium),
        (20, Confidence::High),
    ];
    for (day, expected) in by_day {
        let projection =
            calculate_monthly_projection(&expenses, 100.0, date(2023, 3, day)).unwrap();
        assert_eq!(projection.confidence, expected);
    }
}

// =============================================================================
// Comparison pipeline
// =============================================================================

#[test]
fn test_comparison_formula_and_messages() {
    let current = vec![
        expense(600.0, "food", "2023-03-05"),
        expense(400.0, "bills", "2023-03-10"),
    ];
    let previous = vec![expense(800.0, "food", "2023-02-05")];

    let comparison = calculate_month_comparison(&current, &previous).unwrap();
    assert!((comparison.percentage_change - 25.0).abs() < 0.01);
    assert!(comparison.is_increase);

    let message = format_comparison_message(Some(&comparison)).unwrap();
    assert!(message.contains("a mais"));
    assert!(message.contains('%'));
    assert!(message.contains("mês passado"));

    let reversed = calculate_month_comparison(&previous, &current).unwrap();
    assert!(!reversed.is_increase);
    let message = format_comparison_message(Some(&reversed)).unwrap();
    assert!(message.contains("a menos"));
    assert!(message.contains("mês passado"));
}

#[test]
fn test_comparison_absent_without_previous_month() {
    let current = vec![expense(100.0, "food", "2023-03-05")];
    let comparison = calculate_month_comparison(&current, &[]);
    assert!(comparison.is_none());
    assert!(format_comparison_message(None).is_none());
}

// =============================================================================
// Budget alerts
// =============================================================================

#[test]
fn test_budget_warning_at_85_percent() {
    let expenses = vec![
        expense(45.0, "food", "2023-02-03"),
        expense(40.0, "food", "2023-02-12"),
    ];
    let alerts = detect_budget_alerts(&expenses, &[budget("food", 100.0)]);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);
    assert!((alerts[0].percentage - 85.0).abs() < 0.01);
}

#[test]
fn test_budget_critical_at_120_percent() {
    let expenses = vec![
        expense(70.0, "food", "2023-02-03"),
        expense(50.0, "food", "2023-02-12"),
    ];
    let alerts = detect_budget_alerts(&expenses, &[budget("food", 100.0)]);

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Critical);
    assert!((alerts[0].percentage - 120.0).abs() < 0.01);
}

// =============================================================================
// Behavior detection and prioritization
// =============================================================================

#[test]
fn test_recurring_detected_for_weekly_charges() {
    let expenses = vec![
        expense(50.0, "food", "2023-02-01"),
        expense(50.0, "food", "2023-02-08"),
        expense(50.0, "food", "2023-02-15"),
        expense(50.0, "food", "2023-02-22"),
    ];

    let insights = detect_recurring_expenses(&expenses, &BehaviorConfig::default());
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].kind, InsightKind::Recurring);
}

#[test]
fn test_spike_detected_for_outlier() {
    let mut expenses: Vec<Expense> = (1..=9)
        .map(|d| expense(100.0, "food", &format!("2023-02-{:02}", d)))
        .collect();
    expenses.push(expense(1000.0, "shopping", "2023-02-10"));

    let insights = detect_spending_spikes(&expenses, &BehaviorConfig::default());
    assert!(insights
        .iter()
        .any(|i| i.kind == InsightKind::Spike && i.message.contains("Compras")));
}

#[test]
fn test_full_insight_pipeline_with_dismissal() {
    // Build a month that trips several detectors at once
    let mut expenses = vec![
        expense(50.0, "bills", "2023-02-01"),
        expense(50.0, "bills", "2023-02-08"),
        expense(50.0, "bills", "2023-02-15"),
        expense(50.0, "bills", "2023-02-22"),
    ];
    expenses.push(expense(900.0, "shopping", "2023-02-10"));

    let insights = generate_behavior_insights(&expenses);
    assert!(!insights.is_empty());

    let now = Utc::now();

    // First pass: capped at 3, highest priority first
    let shown = prioritize_and_filter_insights(insights.clone(), &[], now);
    assert!(shown.len() <= 3);
    for pair in shown.windows(2) {
        assert!(pair[0].priority >= pair[1].priority);
    }

    // User dismisses the top insight; it disappears for 24 hours
    let top = shown[0].clone();
    let marker = DismissedInsight::new("user1", insight_key(&top), now);
    let after_dismiss = prioritize_and_filter_insights(insights.clone(), &[marker.clone()], now);
    assert!(after_dismiss.iter().all(|i| insight_key(i) != marker.insight_key));

    // A day later the marker has expired and the insight returns
    let tomorrow = now + Duration::hours(25);
    let after_expiry = prioritize_and_filter_insights(insights, &[marker.clone()], tomorrow);
    assert!(after_expiry
        .iter()
        .any(|i| insight_key(i) == marker.insight_key));
}

#[test]
fn test_decode_batch_feeds_analyzers() {
    // Records as the storage collaborator hands them over, including a
    // malformed one that must be ignored, not fatal
    let json = r#"[
        {"id": "1", "user_id": "u", "description": "Mercado",
         "amount": 250.0, "category": "food", "date": "2023-02-04"},
        {"id": "2", "user_id": "u", "description": "Uber",
         "amount": 40.0, "category": "transport", "date": "2023-02-06T12:30:00"},
        {"id": "3", "user_id": "u", "description": "corrompido",
         "amount": null, "category": "food", "date": null}
    ]"#;

    let expenses = Expense::decode_batch(json).unwrap();
    let projection = calculate_monthly_projection(&expenses, 1500.0, date(2023, 2, 10)).unwrap();

    // Only the two valid records count: 290 over 10 elapsed days
    let expected_avg = (290.0 / 7.0) * 0.7 + (290.0 / 10.0) * 0.3;
    assert!((projection.average_daily_spending - expected_avg).abs() < 0.01);
}

#[test]
fn test_analyzers_are_idempotent() {
    let expenses = vec![
        expense(100.0, "food", "2023-02-01"),
        expense(105.0, "food", "2023-02-02"),
        expense(95.0, "food", "2023-02-03"),
        expense(500.0, "shopping", "2023-02-04"),
    ];
    let budgets = vec![budget("food", 350.0)];
    let reference = date(2023, 2, 10);

    assert_eq!(
        calculate_monthly_projection(&expenses, 2000.0, reference),
        calculate_monthly_projection(&expenses, 2000.0, reference)
    );
    assert_eq!(
        detect_budget_alerts(&expenses, &budgets),
        detect_budget_alerts(&expenses, &budgets)
    );
    assert_eq!(
        generate_behavior_insights(&expenses),
        generate_behavior_insights(&expenses)
    );
}

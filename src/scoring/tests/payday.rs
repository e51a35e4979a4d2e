use super::common::*;
use crate::scoring::rules::payday_groups;
use crate::scoring::{AffordabilityEngine, ScoringPolicy};

#[test]
fn same_day_each_month_is_a_payday() {
    let transactions = vec![
        salary(100_000, months_ago(0, 25)),
        salary(100_000, months_ago(1, 25)),
        salary(100_000, months_ago(2, 25)),
    ];

    let result = engine().assess(&transactions, today());

    assert!(result.payday_detected);
}

#[test]
fn payday_tolerates_two_day_drift() {
    let transactions = vec![
        salary(100_000, months_ago(0, 25)),
        salary(100_000, months_ago(1, 27)),
        salary(100_000, months_ago(2, 23)),
    ];

    let result = engine().assess(&transactions, today());

    assert!(result.payday_detected);
}

#[test]
fn single_salary_is_never_a_payday() {
    let transactions = vec![salary(100_000, months_ago(0, 25))];

    let result = engine().assess(&transactions, today());

    assert!(!result.payday_detected);
    assert_eq!(result.salary_transactions_count, 1);
}

#[test]
fn scattered_paydays_are_not_a_pattern() {
    let transactions = vec![
        salary(100_000, months_ago(0, 5)),
        salary(100_000, months_ago(1, 15)),
        salary(100_000, months_ago(2, 25)),
    ];

    let result = engine().assess(&transactions, today());

    assert!(!result.payday_detected);
    assert_eq!(result.salary_transactions_count, 3);
}

#[test]
fn month_end_and_month_start_cluster() {
    let transactions = vec![
        salary(100_000, months_ago(1, 30)),
        salary(100_000, months_ago(0, 1)),
    ];

    let result = engine().assess(&transactions, today());

    assert!(result.payday_detected);
}

#[test]
fn non_salary_credits_do_not_form_a_payday() {
    let transactions = vec![
        salary(100_000, months_ago(0, 10)),
        credit(5_000, "TRANSFER FROM JOHN", months_ago(1, 10)),
        debit(5_000, "RENT", months_ago(2, 10)),
    ];

    let result = engine().assess(&transactions, today());

    assert!(!result.payday_detected);
}

#[test]
fn groups_are_keyed_by_first_seen_day() {
    let policy = ScoringPolicy::default();

    assert_eq!(payday_groups(&[15, 17, 19], &policy), vec![(15, 2), (19, 1)]);
    assert_eq!(payday_groups(&[15, 18, 20], &policy), vec![(15, 1), (18, 2)]);
    assert_eq!(payday_groups(&[30, 1, 3], &policy), vec![(30, 2), (3, 1)]);
}

#[test]
fn first_matching_group_wins() {
    let policy = ScoringPolicy::default();

    // 17 is within tolerance of both 19 and 15; the older group absorbs it.
    assert_eq!(payday_groups(&[19, 15, 17], &policy), vec![(19, 2), (15, 1)]);
}

#[test]
fn grouping_depends_on_input_order() {
    let policy = ScoringPolicy {
        min_consistent_payments: 3,
        ..ScoringPolicy::default()
    };
    let engine = AffordabilityEngine::new(policy);

    let spread_from_edge = vec![
        salary(100_000, months_ago(0, 14)),
        salary(100_000, months_ago(1, 16)),
        salary(100_000, months_ago(2, 18)),
    ];
    let spread_from_centre = vec![
        salary(100_000, months_ago(0, 16)),
        salary(100_000, months_ago(1, 14)),
        salary(100_000, months_ago(2, 18)),
    ];

    assert!(!engine.assess(&spread_from_edge, today()).payday_detected);
    assert!(engine.assess(&spread_from_centre, today()).payday_detected);
}

#[test]
fn minimum_payments_gate_applies_before_grouping() {
    let policy = ScoringPolicy {
        min_consistent_payments: 3,
        ..ScoringPolicy::default()
    };
    let transactions = vec![
        salary(100_000, months_ago(0, 25)),
        salary(100_000, months_ago(1, 25)),
    ];

    let result = AffordabilityEngine::new(policy).assess(&transactions, today());

    assert!(!result.payday_detected);
}

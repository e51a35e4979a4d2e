use chrono::{Datelike, NaiveDate};

use super::calendar::{window_start, within_tolerance};
use super::config::ScoringPolicy;
use super::domain::Transaction;

/// Transactions inside the lookback window, split by direction.
pub(crate) struct StatementWindow<'a> {
    pub credits: Vec<&'a Transaction>,
    pub debits: Vec<&'a Transaction>,
}

pub(crate) fn recent_window<'a>(
    transactions: &'a [Transaction],
    today: NaiveDate,
    policy: &ScoringPolicy,
) -> StatementWindow<'a> {
    let cutoff = window_start(today, policy.lookback_months);
    let mut credits = Vec::new();
    let mut debits = Vec::new();

    for transaction in transactions {
        match transaction.date {
            Some(date) if date >= cutoff => {}
            _ => continue,
        }

        if transaction.is_credit() {
            credits.push(transaction);
        } else if transaction.is_debit() {
            debits.push(transaction);
        }
    }

    StatementWindow { credits, debits }
}

/// Substring match on the upper-cased narration; `PAY` also matches `PAYMENT`.
pub(crate) fn is_salary_like(narration: &str, keywords: &[String]) -> bool {
    let narration = narration.to_uppercase();
    keywords
        .iter()
        .any(|keyword| narration.contains(keyword.as_str()))
}

pub(crate) fn salary_credits<'a>(
    credits: &[&'a Transaction],
    keywords: &[String],
) -> Vec<&'a Transaction> {
    credits
        .iter()
        .copied()
        .filter(|transaction| is_salary_like(&transaction.narration, keywords))
        .collect()
}

/// Mean salary rounded half-up, computed without floating point.
pub(crate) fn average_salary(salaries: &[&Transaction]) -> u64 {
    if salaries.is_empty() {
        return 0;
    }

    let count = salaries.len() as u128;
    let total: u128 = salaries.iter().map(|t| u128::from(t.amount)).sum();
    let rounded = (2 * total + count) / (2 * count);
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// Greedy day-of-month grouping: each day joins the first group, in creation
/// order, whose key day is within tolerance; otherwise it opens a new group.
pub(crate) fn payday_groups(days: &[u32], policy: &ScoringPolicy) -> Vec<(u32, usize)> {
    let mut groups: Vec<(u32, usize)> = Vec::new();

    for &day in days {
        let existing = groups.iter_mut().find(|(key, _)| {
            within_tolerance(
                day,
                *key,
                policy.payday_tolerance_days,
                policy.payday_cycle_days,
            )
        });

        match existing {
            Some((_, members)) => *members += 1,
            None => groups.push((day, 1)),
        }
    }

    groups
}

pub(crate) fn payday_detected(salaries: &[&Transaction], policy: &ScoringPolicy) -> bool {
    if salaries.len() < policy.min_consistent_payments {
        return false;
    }

    let days: Vec<u32> = salaries
        .iter()
        .filter_map(|transaction| transaction.date.map(|date| date.day()))
        .collect();

    payday_groups(&days, policy)
        .iter()
        .any(|(_, members)| *members >= policy.min_consistent_payments)
}

/// Debits over credits for the window, rounded to two decimal places.
pub(crate) fn expense_ratio(credits: &[&Transaction], debits: &[&Transaction]) -> f64 {
    let total_credits: u128 = credits.iter().map(|t| u128::from(t.amount)).sum();
    let total_debits: u128 = debits.iter().map(|t| u128::from(t.amount)).sum();

    if total_credits == 0 {
        return 0.0;
    }

    let ratio = total_debits as f64 / total_credits as f64;
    (ratio * 100.0).round() / 100.0
}

/// Loan ceiling as a whole-percent share of the average salary, floored.
pub(crate) fn loan_ceiling(average_salary: u64, percent: u8) -> u64 {
    let ceiling = u128::from(average_salary) * u128::from(percent) / 100;
    u64::try_from(ceiling).unwrap_or(u64::MAX)
}

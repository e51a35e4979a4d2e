use chrono::{Datelike, Months, NaiveDate};

use crate::scoring::{AffordabilityEngine, ScoringPolicy, Transaction, TransactionDirection};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 28).expect("valid date")
}

/// Date `months` before `today()`, moved to `day` of that month.
pub(super) fn months_ago(months: u32, day: u32) -> NaiveDate {
    let shifted = today()
        .checked_sub_months(Months::new(months))
        .expect("valid shifted date");
    shifted.with_day(day).expect("valid day of month")
}

pub(super) fn engine() -> AffordabilityEngine {
    AffordabilityEngine::new(ScoringPolicy::default())
}

pub(super) fn transaction(
    direction: TransactionDirection,
    amount: u64,
    narration: &str,
    date: NaiveDate,
) -> Transaction {
    Transaction {
        id: format!("txn-{}-{amount}", date.format("%Y%m%d")),
        direction,
        amount,
        narration: narration.to_string(),
        date: Some(date),
        balance: 50_000,
    }
}

pub(super) fn credit(amount: u64, narration: &str, date: NaiveDate) -> Transaction {
    transaction(TransactionDirection::Credit, amount, narration, date)
}

pub(super) fn debit(amount: u64, narration: &str, date: NaiveDate) -> Transaction {
    transaction(TransactionDirection::Debit, amount, narration, date)
}

pub(super) fn salary(amount: u64, date: NaiveDate) -> Transaction {
    credit(amount, "SALARY PAYMENT", date)
}

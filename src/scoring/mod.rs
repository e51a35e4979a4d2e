//! Affordability scoring over a bank account's recent transaction history.
//!
//! The engine is a pure transform: it never fails, never mutates its input and
//! holds no state besides the scoring policy it was built with.

mod calendar;
mod config;
mod domain;
mod rules;

#[cfg(test)]
mod tests;

pub use config::{
    ScoringPolicy, LOAN_LIMIT_PERCENT, LOOKBACK_MONTHS, MIN_CONSISTENT_PAYMENTS,
    PAYDAY_CYCLE_DAYS, PAYDAY_TOLERANCE_DAYS, SALARY_KEYWORDS,
};
pub use domain::{AffordabilityResult, Transaction, TransactionDirection};

use chrono::{NaiveDate, Utc};
use tracing::debug;

/// Stateless evaluator that applies a scoring policy to a statement.
#[derive(Debug, Clone)]
pub struct AffordabilityEngine {
    policy: ScoringPolicy,
}

impl Default for AffordabilityEngine {
    fn default() -> Self {
        Self::new(ScoringPolicy::default())
    }
}

impl AffordabilityEngine {
    pub fn new(mut policy: ScoringPolicy) -> Self {
        policy.salary_keywords = policy
            .salary_keywords
            .iter()
            .map(|keyword| keyword.trim().to_uppercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score `transactions` against the lookback window ending at `today`.
    pub fn assess(&self, transactions: &[Transaction], today: NaiveDate) -> AffordabilityResult {
        if transactions.is_empty() {
            return AffordabilityResult::default();
        }

        let window = rules::recent_window(transactions, today, &self.policy);
        let salaries = rules::salary_credits(&window.credits, &self.policy.salary_keywords);

        let average_salary = rules::average_salary(&salaries);
        let payday_detected = rules::payday_detected(&salaries, &self.policy);
        let expense_ratio = rules::expense_ratio(&window.credits, &window.debits);
        let max_loan_amount = rules::loan_ceiling(average_salary, self.policy.loan_limit_percent);

        debug!(
            %today,
            credits = window.credits.len(),
            debits = window.debits.len(),
            salary_transactions = salaries.len(),
            average_salary,
            payday_detected,
            expense_ratio,
            max_loan_amount,
            "affordability assessed"
        );

        AffordabilityResult {
            average_salary,
            payday_detected,
            max_loan_amount,
            expense_ratio,
            salary_transactions_count: salaries.len(),
        }
    }

    /// Score an optional statement; an absent statement scores as empty.
    pub fn assess_statement(
        &self,
        transactions: Option<&[Transaction]>,
        today: NaiveDate,
    ) -> AffordabilityResult {
        match transactions {
            Some(transactions) => self.assess(transactions, today),
            None => AffordabilityResult::default(),
        }
    }
}

/// Today's UTC calendar date, the reference point for the lookback window.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Score a statement with the default policy as of today (UTC).
pub fn calculate_affordability(transactions: Option<&[Transaction]>) -> AffordabilityResult {
    AffordabilityEngine::default().assess_statement(transactions, utc_today())
}

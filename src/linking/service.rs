use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::provider::{AccountId, BankDataProvider, ProviderError};
use super::repository::{
    AuditAction, AuditError, AuditEvent, AuditTrail, BorrowerId, BorrowerRecord,
    BorrowerRepository, FinancialSnapshot, RepositoryError,
};
use crate::scoring::{utc_today, AffordabilityEngine};

/// Figures returned to the caller once an account is linked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccountSummary {
    pub account_id: AccountId,
    pub max_loan_amount: u64,
    pub average_salary: u64,
    pub payday_detected: bool,
    pub expense_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanLimitView {
    pub max_loan_amount: Option<u64>,
    pub has_linked_account: bool,
}

impl From<&BorrowerRecord> for LoanLimitView {
    fn from(record: &BorrowerRecord) -> Self {
        Self {
            max_loan_amount: record.max_loan_amount,
            has_linked_account: record.linked_account.is_some(),
        }
    }
}

/// Source of the reference date for the lookback window.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Service linking a borrower's bank account and deriving their loan limit.
pub struct LoanLinkingService<P, R, A> {
    provider: Arc<P>,
    repository: Arc<R>,
    audit: Arc<A>,
    engine: Arc<AffordabilityEngine>,
    clock: Clock,
}

impl<P, R, A> LoanLinkingService<P, R, A>
where
    P: BankDataProvider + 'static,
    R: BorrowerRepository + 'static,
    A: AuditTrail + 'static,
{
    pub fn new(
        provider: Arc<P>,
        repository: Arc<R>,
        audit: Arc<A>,
        engine: AffordabilityEngine,
    ) -> Self {
        Self {
            provider,
            repository,
            audit,
            engine: Arc::new(engine),
            clock: Arc::new(utc_today),
        }
    }

    /// Replace the UTC clock, pinning the window for reproducible runs.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Exchange `code`, score the account's statement and store the result.
    #[instrument(skip_all, fields(borrower = %borrower_id))]
    pub fn link_bank_account(
        &self,
        borrower_id: &BorrowerId,
        code: &str,
    ) -> Result<LinkedAccountSummary, LinkingError> {
        let borrower = self
            .repository
            .fetch(borrower_id)?
            .ok_or_else(|| LinkingError::BorrowerNotFound(borrower_id.0.clone()))?;

        let account_id = self.provider.exchange_token(code)?;
        self.audit.record(system_event(
            AuditAction::BankTokenExchanged,
            [("accountId", account_id.to_string())],
        ))?;

        let transactions = self.provider.statement(&account_id)?;
        self.audit.record(system_event(
            AuditAction::BankStatementRetrieved,
            [
                ("accountId", account_id.to_string()),
                ("transactionCount", transactions.len().to_string()),
            ],
        ))?;

        let today = (self.clock)();
        let affordability = self.engine.assess(&transactions, today);

        self.repository.save_snapshot(FinancialSnapshot {
            borrower_id: borrower.id.clone(),
            captured_on: today,
            average_salary: affordability.average_salary,
            payday_detected: affordability.payday_detected,
            expense_ratio: affordability.expense_ratio,
            raw_statement: transactions,
        })?;
        self.repository
            .record_loan_limit(&borrower.id, &account_id, affordability.max_loan_amount)?;

        self.audit.record(borrower_event(
            &borrower,
            AuditAction::FinancialDataLinked,
            [("accountId", account_id.to_string())],
        ))?;
        self.audit.record(borrower_event(
            &borrower,
            AuditAction::LoanLimitCalculated,
            [
                ("maxLoanAmount", affordability.max_loan_amount.to_string()),
                ("averageSalary", affordability.average_salary.to_string()),
                ("paydayDetected", affordability.payday_detected.to_string()),
            ],
        ))?;

        info!(
            account = %account_id,
            max_loan_amount = affordability.max_loan_amount,
            average_salary = affordability.average_salary,
            payday_detected = affordability.payday_detected,
            "loan limit calculated"
        );

        Ok(LinkedAccountSummary {
            account_id,
            max_loan_amount: affordability.max_loan_amount,
            average_salary: affordability.average_salary,
            payday_detected: affordability.payday_detected,
            expense_ratio: affordability.expense_ratio,
        })
    }

    pub fn loan_limit(&self, borrower_id: &BorrowerId) -> Result<LoanLimitView, LinkingError> {
        let record = self
            .repository
            .fetch(borrower_id)?
            .ok_or_else(|| LinkingError::BorrowerNotFound(borrower_id.0.clone()))?;
        Ok(LoanLimitView::from(&record))
    }

    pub fn loan_limit_by_email(&self, email: &str) -> Result<LoanLimitView, LinkingError> {
        let email = email.trim().to_lowercase();
        let record = self
            .repository
            .find_by_email(&email)?
            .ok_or(LinkingError::BorrowerNotFound(email))?;
        Ok(LoanLimitView::from(&record))
    }
}

fn metadata<const N: usize>(entries: [(&str, String); N]) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn system_event<const N: usize>(action: AuditAction, entries: [(&str, String); N]) -> AuditEvent {
    AuditEvent {
        actor: "system".to_string(),
        action,
        borrower_id: None,
        company_id: None,
        metadata: metadata(entries),
    }
}

fn borrower_event<const N: usize>(
    borrower: &BorrowerRecord,
    action: AuditAction,
    entries: [(&str, String); N],
) -> AuditEvent {
    AuditEvent {
        actor: borrower.email.clone(),
        action,
        borrower_id: Some(borrower.id.clone()),
        company_id: borrower.company_id.clone(),
        metadata: metadata(entries),
    }
}

/// Error raised by the linking service.
#[derive(Debug, thiserror::Error)]
pub enum LinkingError {
    #[error("borrower {0} not found")]
    BorrowerNotFound(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

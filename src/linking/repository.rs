use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::provider::AccountId;
use crate::scoring::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BorrowerId(pub String);

impl fmt::Display for BorrowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Borrower fields the linking workflow reads and updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerRecord {
    pub id: BorrowerId,
    pub email: String,
    pub company_id: Option<String>,
    pub linked_account: Option<AccountId>,
    pub max_loan_amount: Option<u64>,
}

/// Point-in-time affordability figures kept alongside the raw statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub borrower_id: BorrowerId,
    pub captured_on: NaiveDate,
    pub average_salary: u64,
    pub payday_detected: bool,
    pub expense_ratio: f64,
    pub raw_statement: Vec<Transaction>,
}

/// Storage abstraction so the linking service can be exercised in isolation.
pub trait BorrowerRepository: Send + Sync {
    fn fetch(&self, id: &BorrowerId) -> Result<Option<BorrowerRecord>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<BorrowerRecord>, RepositoryError>;
    fn save_snapshot(&self, snapshot: FinancialSnapshot) -> Result<(), RepositoryError>;
    fn record_loan_limit(
        &self,
        id: &BorrowerId,
        account: &AccountId,
        max_loan_amount: u64,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local repository, used by the CLI and tests.
#[derive(Debug, Default)]
pub struct InMemoryBorrowerRepository {
    borrowers: RwLock<BTreeMap<BorrowerId, BorrowerRecord>>,
    snapshots: RwLock<Vec<FinancialSnapshot>>,
}

impl InMemoryBorrowerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: BorrowerRecord) -> Result<(), RepositoryError> {
        let mut borrowers = self.borrowers.write().map_err(poisoned)?;
        borrowers.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn snapshots(&self) -> Result<Vec<FinancialSnapshot>, RepositoryError> {
        Ok(self.snapshots.read().map_err(poisoned)?.clone())
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("lock poisoned".to_string())
}

impl BorrowerRepository for InMemoryBorrowerRepository {
    fn fetch(&self, id: &BorrowerId) -> Result<Option<BorrowerRecord>, RepositoryError> {
        Ok(self.borrowers.read().map_err(poisoned)?.get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<BorrowerRecord>, RepositoryError> {
        let borrowers = self.borrowers.read().map_err(poisoned)?;
        Ok(borrowers
            .values()
            .find(|record| record.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn save_snapshot(&self, snapshot: FinancialSnapshot) -> Result<(), RepositoryError> {
        self.snapshots.write().map_err(poisoned)?.push(snapshot);
        Ok(())
    }

    fn record_loan_limit(
        &self,
        id: &BorrowerId,
        account: &AccountId,
        max_loan_amount: u64,
    ) -> Result<(), RepositoryError> {
        let mut borrowers = self.borrowers.write().map_err(poisoned)?;
        let record = borrowers.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.linked_account = Some(account.clone());
        record.max_loan_amount = Some(max_loan_amount);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    BankTokenExchanged,
    BankStatementRetrieved,
    FinancialDataLinked,
    LoanLimitCalculated,
}

impl AuditAction {
    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::BankTokenExchanged => "BankTokenExchanged",
            AuditAction::BankStatementRetrieved => "BankStatementRetrieved",
            AuditAction::FinancialDataLinked => "FinancialDataLinked",
            AuditAction::LoanLimitCalculated => "LoanLimitCalculated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub actor: String,
    pub action: AuditAction,
    pub borrower_id: Option<BorrowerId>,
    pub company_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// Outbound hook for the audit log.
pub trait AuditTrail: Send + Sync {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit transport unavailable: {0}")]
    Transport(String),
}

/// Audit trail that writes each event to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditTrail;

impl AuditTrail for TracingAuditTrail {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        let metadata = serde_json::to_string(&event.metadata)
            .map_err(|err| AuditError::Transport(err.to_string()))?;
        info!(
            target: "audit",
            actor = %event.actor,
            action = event.action.label(),
            borrower_id = event.borrower_id.as_ref().map(|id| id.0.as_str()),
            company_id = event.company_id.as_deref(),
            %metadata,
            "audit event"
        );
        Ok(())
    }
}

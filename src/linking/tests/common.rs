use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::linking::provider::{AccountId, BankDataProvider, ProviderError};
use crate::linking::repository::{
    AuditError, AuditEvent, AuditTrail, BorrowerId, BorrowerRecord, InMemoryBorrowerRepository,
};
use crate::linking::service::LoanLinkingService;
use crate::scoring::{AffordabilityEngine, Transaction, TransactionDirection};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 28).expect("valid date")
}

pub(super) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub(super) fn transaction(
    direction: TransactionDirection,
    amount: u64,
    narration: &str,
    date: NaiveDate,
) -> Transaction {
    Transaction {
        id: format!("txn-{narration}-{date}"),
        direction,
        amount,
        narration: narration.to_string(),
        date: Some(date),
        balance: 0,
    }
}

pub(super) fn salary_statement() -> Vec<Transaction> {
    vec![
        transaction(TransactionDirection::Credit, 100_000, "SALARY PAYMENT", date(10, 15)),
        transaction(TransactionDirection::Credit, 110_000, "SALARY PAYMENT", date(9, 15)),
        transaction(TransactionDirection::Credit, 105_000, "SALARY PAYMENT", date(8, 15)),
        transaction(TransactionDirection::Debit, 157_500, "RENT", date(9, 1)),
    ]
}

pub(super) fn borrower() -> BorrowerRecord {
    BorrowerRecord {
        id: BorrowerId("usr-001".to_string()),
        email: "ada@acme.test".to_string(),
        company_id: Some("cmp-acme".to_string()),
        linked_account: None,
        max_loan_amount: None,
    }
}

/// Provider serving canned statements keyed by link code.
#[derive(Default)]
pub(super) struct StubProvider {
    pub accounts: HashMap<String, (AccountId, Vec<Transaction>)>,
    pub unavailable: bool,
}

impl StubProvider {
    pub(super) fn with_account(code: &str, account: &str, statement: Vec<Transaction>) -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(
            code.to_string(),
            (AccountId(account.to_string()), statement),
        );
        Self {
            accounts,
            unavailable: false,
        }
    }
}

impl BankDataProvider for StubProvider {
    fn exchange_token(&self, code: &str) -> Result<AccountId, ProviderError> {
        if self.unavailable {
            return Err(ProviderError::Unavailable("stub offline".to_string()));
        }
        self.accounts
            .get(code)
            .map(|(account, _)| account.clone())
            .ok_or(ProviderError::InvalidCredentials)
    }

    fn statement(&self, account: &AccountId) -> Result<Vec<Transaction>, ProviderError> {
        self.accounts
            .values()
            .find(|(candidate, _)| candidate == account)
            .map(|(_, statement)| statement.clone())
            .ok_or_else(|| ProviderError::NotFound(account.clone()))
    }
}

#[derive(Default)]
pub(super) struct RecordingAudit {
    pub events: Mutex<Vec<AuditEvent>>,
    pub fail: bool,
}

impl RecordingAudit {
    pub(super) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditTrail for RecordingAudit {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        if self.fail {
            return Err(AuditError::Transport("audit sink down".to_string()));
        }
        self.events
            .lock()
            .expect("audit mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) type TestService =
    LoanLinkingService<StubProvider, InMemoryBorrowerRepository, RecordingAudit>;

pub(super) fn service_with(
    provider: StubProvider,
    audit: RecordingAudit,
) -> (
    TestService,
    Arc<InMemoryBorrowerRepository>,
    Arc<RecordingAudit>,
) {
    let repository = Arc::new(InMemoryBorrowerRepository::new());
    repository.insert(borrower()).expect("seed borrower");
    let audit = Arc::new(audit);

    let service = LoanLinkingService::new(
        Arc::new(provider),
        repository.clone(),
        audit.clone(),
        AffordabilityEngine::default(),
    )
    .with_clock(Arc::new(today));

    (service, repository, audit)
}

//! Bank account linking: statement import, provider and storage seams, and
//! the workflow that turns a one-time link code into a loan limit.

pub mod provider;
pub mod repository;
pub mod service;
pub mod statement;

#[cfg(test)]
mod tests;

pub use provider::{AccountId, BankDataProvider, ProviderError, StatementDirectoryProvider};
pub use repository::{
    AuditAction, AuditError, AuditEvent, AuditTrail, BorrowerId, BorrowerRecord,
    BorrowerRepository, FinancialSnapshot, InMemoryBorrowerRepository, RepositoryError,
    TracingAuditTrail,
};
pub use service::{Clock, LinkedAccountSummary, LinkingError, LoanLimitView, LoanLinkingService};
pub use statement::{
    parse_csv_statement, parse_json_statement, parse_statement, StatementError, StatementFormat,
};

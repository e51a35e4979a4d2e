use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::statement::{parse_statement, StatementError, StatementFormat};
use crate::scoring::Transaction;

/// Provider-issued identifier for a linked bank account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure classes reported by a bank-data provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid bank-data code or credentials")]
    InvalidCredentials,
    #[error("bank account {0} not found")]
    NotFound(AccountId),
    #[error("bank-data provider unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Statement(#[from] StatementError),
}

/// Upstream exchanging one-time link codes and serving account statements.
pub trait BankDataProvider: Send + Sync {
    fn exchange_token(&self, code: &str) -> Result<AccountId, ProviderError>;
    fn statement(&self, account: &AccountId) -> Result<Vec<Transaction>, ProviderError>;
}

/// Provider backed by a directory of `<account>.json` or `<account>.csv` statements.
///
/// The link code is the account identifier; exchange succeeds only when a
/// statement for it exists.
#[derive(Debug, Clone)]
pub struct StatementDirectoryProvider {
    root: PathBuf,
}

impl StatementDirectoryProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn locate(&self, account: &str) -> Result<Option<(PathBuf, StatementFormat)>, ProviderError> {
        if !self.root.is_dir() {
            return Err(ProviderError::Unavailable(format!(
                "statement directory {} is not readable",
                self.root.display()
            )));
        }

        for format in [StatementFormat::Json, StatementFormat::Csv] {
            let path = self
                .root
                .join(format!("{account}.{}", format.extension()));
            if path.is_file() {
                return Ok(Some((path, format)));
            }
        }

        Ok(None)
    }
}

impl BankDataProvider for StatementDirectoryProvider {
    fn exchange_token(&self, code: &str) -> Result<AccountId, ProviderError> {
        let code = code.trim();
        if code.is_empty() || code.contains(|c| c == '/' || c == '\\') || code.starts_with('.') {
            return Err(ProviderError::InvalidCredentials);
        }

        match self.locate(code)? {
            Some(_) => Ok(AccountId(code.to_string())),
            None => Err(ProviderError::InvalidCredentials),
        }
    }

    fn statement(&self, account: &AccountId) -> Result<Vec<Transaction>, ProviderError> {
        let (path, format) = self
            .locate(account.as_str())?
            .ok_or_else(|| ProviderError::NotFound(account.clone()))?;

        let file = File::open(&path).map_err(|err| {
            ProviderError::Unavailable(format!("failed to open {}: {err}", path.display()))
        })?;
        let transactions = parse_statement(file, format)?;

        debug!(
            account = %account,
            path = %path.display(),
            transactions = transactions.len(),
            "statement loaded"
        );
        Ok(transactions)
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of money movement as reported by the bank-data provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionDirection {
    Credit,
    Debit,
    /// Any other provider label. Excluded from both credit and debit totals.
    Other(String),
}

impl TransactionDirection {
    pub fn from_label(label: &str) -> Self {
        match label {
            "credit" => Self::Credit,
            "debit" => Self::Debit,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Other(label) => label,
        }
    }
}

impl Default for TransactionDirection {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for TransactionDirection {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<TransactionDirection> for String {
    fn from(value: TransactionDirection) -> Self {
        match value {
            TransactionDirection::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

/// Single bank transaction, amounts in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub direction: TransactionDirection,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub narration: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub balance: i64,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.direction == TransactionDirection::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.direction == TransactionDirection::Debit
    }
}

/// Affordability figures derived from a statement window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityResult {
    pub average_salary: u64,
    pub payday_detected: bool,
    pub max_loan_amount: u64,
    pub expense_ratio: f64,
    pub salary_transactions_count: usize,
}

impl AffordabilityResult {
    pub fn summary(&self) -> String {
        if self.salary_transactions_count == 0 {
            return "no salary detected; loan limit 0".to_string();
        }

        let cadence = if self.payday_detected {
            "regular payday"
        } else {
            "irregular payday"
        };
        format!(
            "{} salary credit(s) averaging {} ({cadence}), expense ratio {:.2}, loan limit {}",
            self.salary_transactions_count,
            self.average_salary,
            self.expense_ratio,
            self.max_loan_amount
        )
    }
}

use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::scoring::{Transaction, TransactionDirection};

/// Statement payload that could not be decoded at all.
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error("failed to read statement: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid statement JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid statement CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Supported on-disk statement encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Json,
    Csv,
}

impl StatementFormat {
    /// Pick a format from a file extension, defaulting to JSON.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("csv") => Self::Csv,
            _ => Self::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

pub fn parse_statement<R: Read>(
    reader: R,
    format: StatementFormat,
) -> Result<Vec<Transaction>, StatementError> {
    match format {
        StatementFormat::Json => parse_json_statement(reader),
        StatementFormat::Csv => parse_csv_statement(reader),
    }
}

/// Decode a provider statement, either `{ "data": [...] }` or a bare array.
pub fn parse_json_statement<R: Read>(reader: R) -> Result<Vec<Transaction>, StatementError> {
    let document: JsonStatement = serde_json::from_reader(reader)?;
    let rows = match document {
        JsonStatement::Envelope { data } => data,
        JsonStatement::Rows(rows) => rows,
    };

    Ok(rows.into_iter().map(JsonRow::into_transaction).collect())
}

pub fn parse_csv_statement<R: Read>(reader: R) -> Result<Vec<Transaction>, StatementError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut transactions = Vec::new();

    for record in csv_reader.deserialize::<CsvRow>() {
        let row = record?;
        transactions.push(row.into_transaction());
    }

    Ok(transactions)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonStatement {
    Envelope { data: Vec<JsonRow> },
    Rows(Vec<JsonRow>),
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(rename = "_id", alias = "id", default)]
    id: Value,
    #[serde(rename = "type", default)]
    direction: Value,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    narration: Value,
    #[serde(default)]
    date: Value,
    #[serde(default)]
    balance: Value,
}

impl JsonRow {
    fn into_transaction(self) -> Transaction {
        Transaction {
            id: value_text(&self.id).unwrap_or_default(),
            direction: value_text(&self.direction)
                .map(|label| TransactionDirection::from_label(&label))
                .unwrap_or_default(),
            amount: value_amount(&self.amount),
            narration: value_text(&self.narration).unwrap_or_default(),
            date: value_text(&self.date).as_deref().and_then(parse_date),
            balance: value_balance(&self.balance),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    direction: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    narration: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    balance: Option<String>,
}

impl CsvRow {
    fn into_transaction(self) -> Transaction {
        Transaction {
            id: self.id.unwrap_or_default(),
            direction: self
                .direction
                .map(|label| TransactionDirection::from_label(&label))
                .unwrap_or_default(),
            amount: self.amount.as_deref().map(parse_amount).unwrap_or(0),
            narration: self.narration.unwrap_or_default(),
            date: self.date.as_deref().and_then(parse_date),
            balance: self.balance.as_deref().map(parse_balance).unwrap_or(0),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn value_amount(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().map(truncate_amount))
            .unwrap_or(0),
        Value::String(text) => parse_amount(text),
        _ => 0,
    }
}

fn value_balance(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(truncate_balance))
            .unwrap_or(0),
        Value::String(text) => parse_balance(text),
        _ => 0,
    }
}

/// Smallest-unit amount; fractions are truncated, invalid or negative input is 0.
fn parse_amount(raw: &str) -> u64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(truncate_amount))
        .unwrap_or(0)
}

fn parse_balance(raw: &str) -> i64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(truncate_balance))
        .unwrap_or(0)
}

fn truncate_amount(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}

fn truncate_balance(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

/// Calendar date of a provider timestamp; offsets are normalised to UTC first.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

use serde::{Deserialize, Serialize};

pub const SALARY_KEYWORDS: [&str; 4] = ["SALARY", "PAYROLL", "WAGES", "PAY"];
pub const LOOKBACK_MONTHS: u32 = 3;
pub const PAYDAY_TOLERANCE_DAYS: u32 = 2;
pub const PAYDAY_CYCLE_DAYS: u32 = 31;
pub const MIN_CONSISTENT_PAYMENTS: usize = 2;
pub const LOAN_LIMIT_PERCENT: u8 = 33;

/// Scoring constants applied by the affordability engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub salary_keywords: Vec<String>,
    pub lookback_months: u32,
    pub payday_tolerance_days: u32,
    pub payday_cycle_days: u32,
    pub min_consistent_payments: usize,
    /// Share of the average salary offered as the loan ceiling, in whole percent.
    pub loan_limit_percent: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            salary_keywords: SALARY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            lookback_months: LOOKBACK_MONTHS,
            payday_tolerance_days: PAYDAY_TOLERANCE_DAYS,
            payday_cycle_days: PAYDAY_CYCLE_DAYS,
            min_consistent_payments: MIN_CONSISTENT_PAYMENTS,
            loan_limit_percent: LOAN_LIMIT_PERCENT,
        }
    }
}

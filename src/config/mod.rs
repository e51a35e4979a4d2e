use std::env;
use std::str::FromStr;

use crate::scoring::ScoringPolicy;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring: load_scoring_policy()?,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn load_scoring_policy() -> Result<ScoringPolicy, ConfigError> {
    let defaults = ScoringPolicy::default();

    let loan_limit_percent = parse_var("SCORING_LOAN_LIMIT_PERCENT", defaults.loan_limit_percent)?;
    if loan_limit_percent > 100 {
        return Err(ConfigError::Invalid {
            key: "SCORING_LOAN_LIMIT_PERCENT",
            value: loan_limit_percent.to_string(),
        });
    }

    let min_consistent_payments = parse_var(
        "SCORING_MIN_CONSISTENT_PAYMENTS",
        defaults.min_consistent_payments,
    )?;
    if min_consistent_payments < 2 {
        return Err(ConfigError::Invalid {
            key: "SCORING_MIN_CONSISTENT_PAYMENTS",
            value: min_consistent_payments.to_string(),
        });
    }

    let salary_keywords = match env::var("SCORING_SALARY_KEYWORDS") {
        Ok(raw) => {
            let keywords: Vec<String> = raw
                .split(',')
                .map(|keyword| keyword.trim().to_uppercase())
                .filter(|keyword| !keyword.is_empty())
                .collect();
            if keywords.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "SCORING_SALARY_KEYWORDS",
                    value: raw,
                });
            }
            keywords
        }
        Err(_) => defaults.salary_keywords,
    };

    Ok(ScoringPolicy {
        salary_keywords,
        lookback_months: parse_var("SCORING_LOOKBACK_MONTHS", defaults.lookback_months)?,
        payday_tolerance_days: parse_var(
            "SCORING_PAYDAY_TOLERANCE_DAYS",
            defaults.payday_tolerance_days,
        )?,
        payday_cycle_days: defaults.payday_cycle_days,
        min_consistent_payments,
        loan_limit_percent,
    })
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

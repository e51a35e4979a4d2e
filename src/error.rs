use crate::config::ConfigError;
use crate::linking::{LinkingError, StatementError};
use crate::telemetry::TelemetryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("statement error: {0}")]
    Statement(#[from] StatementError),
    #[error("linking error: {0}")]
    Linking(#[from] LinkingError),
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

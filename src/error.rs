//! Error types for scenario parsing and comparison

use thiserror::Error;

/// Errors raised by the engine for input it cannot work with
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("rate scenario not found: {0}")]
    UnknownScenario(String),

    #[error("malformed scenario payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EngineError {
    pub fn missing(field: impl Into<String>) -> Self {
        EngineError::MissingField { field: field.into() }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

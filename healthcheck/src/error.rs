//! Health-check error types
//!
//! Sub-checks never fail; these errors only cover the command-line surface
//! (bad arguments, report serialization).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HealthCheckError {
    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl HealthCheckError {
    pub fn config(field: impl Into<String>) -> Self {
        HealthCheckError::ConfigurationError { field: field.into() }
    }
}

pub type HealthCheckResult<T> = Result<T, HealthCheckError>;

//! Lifecycle controller error types

use shared::SharedError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Virtual environment not found: {path} does not exist (create it with `python3 -m venv venv`)")]
    MissingVenv { path: PathBuf },

    #[error("Configuration file not found: {path} (copy the template and fill it in)")]
    MissingConfig { path: PathBuf },

    #[error("{key} still holds the template placeholder; edit the .env before starting")]
    PlaceholderConfig { key: String },

    #[error("Worker is already running (PID: {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("Worker is not running")]
    NotRunning,

    #[error("Failed to spawn worker: {message}")]
    SpawnFailed { message: String },

    #[error("Failed to signal process {pid}: {message}")]
    SignalFailed { pid: u32, message: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ControllerError {
    pub fn config(field: impl Into<String>) -> Self {
        ControllerError::ConfigurationError { field: field.into() }
    }

    pub fn spawn(message: impl Into<String>) -> Self {
        ControllerError::SpawnFailed {
            message: message.into(),
        }
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;

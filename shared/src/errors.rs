//! Shared error types for the worker tooling

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Identifier file {path} is malformed: {content:?}")]
    MalformedPidFile { path: PathBuf, content: String },

    #[error("Failed to read environment file {path}: {message}")]
    EnvFileError { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type SharedResult<T> = Result<T, SharedError>;

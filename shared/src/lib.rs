//! Shared building blocks for the worker health check and lifecycle controller
//!
//! Holds the pieces both binaries agree on: where a worker deployment keeps
//! its files, how the identifier file and `.env` are read, the error type,
//! and tracing setup.

pub mod env_file;
pub mod errors;
pub mod layout;
pub mod logging;
pub mod pid_file;
pub mod types;

pub use env_file::{EnvFile, RequiredField};
pub use errors::*;
pub use layout::{WorkerLayout, DEFAULT_METRICS_PATH, DEFAULT_METRICS_PORT, WORKER_MODULE};
pub use pid_file::{PidFile, PidRecord};
pub use types::*;

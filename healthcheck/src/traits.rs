//! Trait definitions with mockall annotations for testing
//!
//! Each signal source of the health check sits behind one of these traits so
//! the aggregator can be driven by fakes. Every method is total: expected
//! absence (missing file, refused connection, unsupported platform) comes back
//! as a negative or empty value, never as an error.

use std::path::Path;
use std::time::Duration;

use crate::types::{ConfigStatus, HealthProbeResult, LogSnapshot, ProcessState, ResourceSnapshot};

/// OS-level process introspection
///
/// Kept separate from [`ProcessLocator`] so the locator's identifier-file
/// handling can be tested against a scripted process table.
#[mockall::automock]
pub trait ProcessTable: Send + Sync {
    /// Whether a process with this pid currently exists
    fn exists(&self, pid: u32) -> bool;

    /// Pids of processes whose command line contains `pattern`, ascending
    fn find_matching(&self, pattern: &str) -> Vec<u32>;
}

/// Locates the running worker
#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessLocator: Send + Sync {
    /// Determine whether the worker is running
    ///
    /// A stale identifier file is deleted as a side effect.
    async fn locate(&self) -> ProcessState;
}

/// Bounded HTTP health probing
#[mockall::automock]
#[async_trait::async_trait]
pub trait EndpointProbe: Send + Sync {
    /// Issue `GET {base_url}/health`, giving up after `timeout`
    async fn probe(&self, base_url: &str, timeout: Duration) -> HealthProbeResult;
}

/// Worker log inspection
#[mockall::automock]
#[async_trait::async_trait]
pub trait LogInspector: Send + Sync {
    /// Summarize the tail of the log at `path`
    async fn inspect(&self, path: &Path) -> LogSnapshot;
}

/// Worker configuration validation
#[mockall::automock]
#[async_trait::async_trait]
pub trait ConfigValidator: Send + Sync {
    /// Check the required settings in the `.env` at `path`
    async fn validate(&self, path: &Path) -> ConfigStatus;
}

/// Host and process resource sampling
#[mockall::automock]
#[async_trait::async_trait]
pub trait ResourceReporter: Send + Sync {
    /// Sample host memory and disk, plus process CPU when `pid` is alive
    async fn sample(&self, pid: Option<u32>) -> ResourceSnapshot;
}

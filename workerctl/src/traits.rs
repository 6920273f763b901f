//! Trait definitions with mockall annotations for testing

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ControllerResult;

/// How to launch the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// Receives stdout and stderr of a detached worker
    pub log_file: PathBuf,
}

/// Why an attached run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachedExit {
    /// The worker exited on its own with this code
    Exited(i32),
    /// The controller received SIGINT/SIGTERM and shut the worker down
    Interrupted,
}

/// How a running process went away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Graceful,
    Killed,
    AlreadyGone,
}

/// Spawning and signalling OS processes
#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessManager: Send + Sync {
    /// Spawn in a new process group with output appended to the log; returns the pid
    async fn spawn_detached(&self, spec: &LaunchSpec) -> ControllerResult<u32>;

    /// Spawn with inherited stdio and wait for exit or a shutdown signal
    async fn run_attached(&self, spec: &LaunchSpec, grace: Duration) -> ControllerResult<AttachedExit>;

    /// SIGTERM, wait up to `grace`, then SIGKILL
    async fn terminate(&self, pid: u32, grace: Duration) -> ControllerResult<Termination>;

    fn is_alive(&self, pid: u32) -> bool;
}

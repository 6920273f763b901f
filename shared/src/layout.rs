//! On-disk layout of a worker deployment directory
//!
//! Every path the tooling touches is derived from the worker's working
//! directory:
//!
//! ```text
//! <root>/
//! ├── .env             worker configuration (KEY=VALUE)
//! ├── worker.pid       identifier file written by `workerctl start --daemon`
//! ├── logs/worker.log  append-only worker log
//! └── venv/bin/python  interpreter used to launch the worker
//! ```

use std::path::{Path, PathBuf};

/// Default HTTP port of the worker's health/metrics server
pub const DEFAULT_METRICS_PORT: u16 = 8081;

/// Default path of the worker's Prometheus endpoint
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Module launched by the interpreter; also the process-table match pattern
pub const WORKER_MODULE: &str = "src.worker_app";

/// Paths of a single worker deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerLayout {
    root: PathBuf,
    log_file: Option<PathBuf>,
}

impl WorkerLayout {
    /// Create a layout rooted at the worker's working directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            log_file: None,
        }
    }

    /// Override the log file location (fluent API)
    ///
    /// Relative paths resolve against the worker root, matching how the
    /// worker itself interprets `LOG_FILE`.
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = Some(log_file.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn env_file(&self) -> PathBuf {
        self.root.join(".env")
    }

    pub fn pid_file(&self) -> PathBuf {
        self.root.join("worker.pid")
    }

    pub fn log_file(&self) -> PathBuf {
        match &self.log_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.root.join(path),
            None => self.root.join("logs").join("worker.log"),
        }
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.root.join("venv")
    }

    pub fn python(&self) -> PathBuf {
        if cfg!(windows) {
            self.venv_dir().join("Scripts").join("python.exe")
        } else {
            self.venv_dir().join("bin").join("python")
        }
    }
}

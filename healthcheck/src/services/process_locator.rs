//! Real process locator implementation
//!
//! Finds the worker via its identifier file first, then falls back to a scan
//! of the process table for the worker's invocation pattern.

use async_trait::async_trait;
use shared::{component_debug, component_warn, ComponentId, PidFile, WORKER_MODULE};

use crate::services::process_table::SystemProcessTable;
use crate::traits::{ProcessLocator, ProcessTable};
use crate::types::ProcessState;

/// Locator reading the identifier file and the host process table
pub struct RealProcessLocator<T: ProcessTable = SystemProcessTable> {
    pid_file: PidFile,
    pattern: String,
    table: T,
}

impl RealProcessLocator<SystemProcessTable> {
    /// Create a locator using the host process table and the default pattern
    pub fn new(pid_file: PidFile) -> Self {
        Self::with_table(pid_file, SystemProcessTable::new())
    }
}

impl<T: ProcessTable> RealProcessLocator<T> {
    /// Create a locator backed by a specific process table
    pub fn with_table(pid_file: PidFile, table: T) -> Self {
        Self {
            pid_file,
            pattern: WORKER_MODULE.to_string(),
            table,
        }
    }

    /// Configure the command-line pattern used by the fallback scan (fluent API)
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    async fn discard_identifier(&self) {
        match self.pid_file.remove().await {
            Ok(_) => {}
            Err(e) => component_warn!(
                ComponentId::current(),
                "⚠️ Could not remove stale identifier file {}: {}",
                self.pid_file.path().display(),
                e
            ),
        }
    }
}

#[async_trait]
impl<T: ProcessTable> ProcessLocator for RealProcessLocator<T> {
    async fn locate(&self) -> ProcessState {
        match self.pid_file.read().await {
            Ok(Some(record)) => {
                if self.table.exists(record.pid) {
                    component_debug!(ComponentId::current(), "🔎 Worker found via identifier file (PID: {})", record.pid);
                    return ProcessState::running(record.pid).with_started_at(record.created_at);
                }
                component_warn!(
                    ComponentId::current(),
                    "🧹 Identifier file points to dead process {}, removing it",
                    record.pid
                );
                self.discard_identifier().await;
            }
            Ok(None) => {}
            Err(e) => {
                component_warn!(ComponentId::current(), "🧹 Discarding unreadable identifier file: {}", e);
                self.discard_identifier().await;
            }
        }

        match self.table.find_matching(&self.pattern).first() {
            Some(&pid) => {
                component_debug!(ComponentId::current(), "🔎 Worker found by process scan (PID: {})", pid);
                ProcessState::running(pid)
            }
            None => ProcessState::stopped(),
        }
    }
}

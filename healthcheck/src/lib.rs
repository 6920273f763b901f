//! Health check for a long-running worker process
//!
//! Determines from indirect evidence (identifier file, process table, HTTP
//! probes, log tail, `.env` contents, host resources) whether the worker is
//! alive, reachable and configured, and reports a consolidated status.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

use shared::{PidFile, WorkerLayout};

// Re-export commonly used types
pub use crate::core::{CheckSettings, StatusAggregator};
pub use error::{HealthCheckError, HealthCheckResult};
pub use services::{
    EnvFileValidator, FileLogInspector, HttpEndpointProbe, RealProcessLocator, SysinfoResourceReporter,
    SystemProcessTable,
};
pub use traits::{ConfigValidator, EndpointProbe, LogInspector, ProcessLocator, ProcessTable, ResourceReporter};
pub use types::{
    ConfigStatus, FieldStatus, HealthProbeResult, LogSnapshot, Overall, ProcessState, Recommendation,
    ResourceSnapshot, StatusReport,
};

/// Aggregator wired to the real host services
pub type RealStatusAggregator = StatusAggregator<
    RealProcessLocator,
    HttpEndpointProbe,
    FileLogInspector,
    EnvFileValidator,
    SysinfoResourceReporter,
>;

/// Build an aggregator for a worker deployment using the real services
pub fn real_aggregator(layout: &WorkerLayout, settings: CheckSettings) -> RealStatusAggregator {
    StatusAggregator::new(
        RealProcessLocator::new(PidFile::new(layout.pid_file())),
        HttpEndpointProbe::new(),
        FileLogInspector::new(),
        EnvFileValidator::new(),
        SysinfoResourceReporter::new(layout.root()),
        settings,
    )
}

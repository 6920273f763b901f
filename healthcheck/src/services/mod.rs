//! Service implementations
//!
//! Real implementations of the service traits. These touch the filesystem,
//! the network and the OS process table.

pub mod config_validator;
pub mod endpoint_probe;
pub mod log_inspector;
pub mod process_locator;
pub mod process_table;
pub mod resource_reporter;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use config_validator::EnvFileValidator;
pub use endpoint_probe::{HttpEndpointProbe, DEFAULT_PROBE_TIMEOUT};
pub use log_inspector::FileLogInspector;
pub use process_locator::RealProcessLocator;
pub use process_table::SystemProcessTable;
pub use resource_reporter::SysinfoResourceReporter;

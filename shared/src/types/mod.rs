//! Core types used by every binary in the workspace

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global component identity - set once at startup
static COMPONENT_ID: OnceLock<ComponentId> = OnceLock::new();

/// Identifies which binary is emitting log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    /// The read-only health check
    HealthCheck,
    /// The start/stop lifecycle controller
    Controller,
}

impl ComponentId {
    /// Initialize the global identity for the health check binary
    pub fn init_health_check() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::HealthCheck)
    }

    /// Initialize the global identity for the lifecycle controller
    pub fn init_controller() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::Controller)
    }

    /// Get the global identity, defaulting to the health check when unset
    pub fn current() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(ComponentId::default)
    }

    /// Crate targets whose events this component logs by default
    pub fn log_targets(&self) -> &'static [&'static str] {
        match self {
            ComponentId::HealthCheck => &["health_check", "healthcheck", "shared"],
            ComponentId::Controller => &["workerctl", "healthcheck", "shared"],
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::HealthCheck => write!(f, "health_check"),
            ComponentId::Controller => write!(f, "workerctl"),
        }
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        ComponentId::HealthCheck
    }
}

/// Format a byte count with binary units, e.g. `12.3 MiB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_display() {
        assert_eq!(ComponentId::HealthCheck.to_string(), "health_check");
        assert_eq!(ComponentId::Controller.to_string(), "workerctl");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GiB");
    }
}

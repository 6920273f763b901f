//! Signals gathered by a single health-check run
//!
//! Every value here is recomputed from scratch on each invocation. Absence
//! of a resource is modelled with `Option`/`false`, never with an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::RequiredField;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Whether the worker process is alive, and under which pid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessState {
    pub running: bool,
    pub pid: Option<u32>,
    /// Creation time of the identifier record the pid was read from
    pub started_at: Option<DateTime<Utc>>,
}

impl ProcessState {
    pub fn stopped() -> Self {
        Self::default()
    }

    pub fn running(pid: u32) -> Self {
        Self {
            running: true,
            pid: Some(pid),
            started_at: None,
        }
    }

    pub fn with_started_at(mut self, started_at: Option<DateTime<Utc>>) -> Self {
        self.started_at = started_at;
        self
    }
}

/// Outcome of one `GET {base}/health`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthProbeResult {
    pub url: String,
    pub reachable: bool,
    pub raw_body: Option<String>,
    /// Present only when `raw_body` is a JSON object
    pub parsed: Option<Map<String, Value>>,
}

impl HealthProbeResult {
    pub fn unreachable(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Build a reachable result, parsing the body when it is a JSON object
    pub fn from_body(url: impl Into<String>, body: String) -> Self {
        let parsed = serde_json::from_str::<Map<String, Value>>(&body).ok();
        Self {
            url: url.into(),
            reachable: true,
            raw_body: Some(body),
            parsed,
        }
    }
}

/// Bounded view of the tail of the worker log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSnapshot {
    pub exists: bool,
    pub size_bytes: Option<u64>,
    /// At most [`MAX_RECENT_ERRORS`] lines, most recent last
    pub recent_errors: Vec<String>,
    pub last_line: Option<String>,
}

/// Number of trailing lines the log inspector reads
pub const LOG_TAIL_LINES: usize = 100;

/// Number of error lines kept from the tail window
pub const MAX_RECENT_ERRORS: usize = 5;

impl LogSnapshot {
    pub fn missing() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatus {
    pub configured: bool,
}

/// Completeness of the worker `.env`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStatus {
    pub present: bool,
    pub fields: BTreeMap<RequiredField, FieldStatus>,
}

impl ConfigStatus {
    /// Status of a configuration file that does not exist
    pub fn absent() -> Self {
        Self {
            present: false,
            fields: RequiredField::ALL
                .iter()
                .map(|field| (*field, FieldStatus { configured: false }))
                .collect(),
        }
    }

    pub fn is_configured(&self, field: RequiredField) -> bool {
        self.fields.get(&field).is_some_and(|status| status.configured)
    }

    /// Required fields that are not configured, in declaration order
    pub fn unconfigured(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .iter()
            .copied()
            .filter(|field| !self.is_configured(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.present && self.unconfigured().is_empty()
    }
}

/// Best-effort host and process resource usage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub memory_summary: Option<String>,
    pub disk_summary: Option<String>,
    pub cpu_percent: Option<f32>,
    pub process_memory_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Overall {
    Up,
    Down,
}

impl From<&ProcessState> for Overall {
    fn from(process: &ProcessState) -> Self {
        if process.running {
            Overall::Up
        } else {
            Overall::Down
        }
    }
}

impl fmt::Display for Overall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overall::Up => write!(f, "UP"),
            Overall::Down => write!(f, "DOWN"),
        }
    }
}

/// Operator action suggested by the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    StartWorker,
    ConfigureEnv { path: PathBuf, missing: Vec<RequiredField> },
    TailLogs { path: PathBuf },
    ViewMetrics { url: String },
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::StartWorker => write!(f, "Start the worker: workerctl start --daemon"),
            Recommendation::ConfigureEnv { path, missing } if missing.is_empty() => {
                write!(f, "Configure {}", path.display())
            }
            Recommendation::ConfigureEnv { path, missing } => {
                let keys: Vec<&str> = missing.iter().map(RequiredField::key).collect();
                write!(f, "Configure {}: set {}", path.display(), keys.join(", "))
            }
            Recommendation::TailLogs { path } => write!(f, "Follow the log: tail -f {}", path.display()),
            Recommendation::ViewMetrics { url } => write!(f, "View metrics: curl {url}"),
        }
    }
}

/// Consolidated result of one health-check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub process: ProcessState,
    pub endpoint: HealthProbeResult,
    /// Absent when no usable coordinator URL is configured
    pub coordinator: Option<HealthProbeResult>,
    pub log_path: PathBuf,
    pub log: LogSnapshot,
    pub config_path: PathBuf,
    pub config: ConfigStatus,
    pub resources: ResourceSnapshot,
    pub overall: Overall,
    pub recommendations: Vec<Recommendation>,
}

impl StatusReport {
    pub fn is_up(&self) -> bool {
        self.overall == Overall::Up
    }
}

//! Resolution of everything a health-check run needs to know up front
//!
//! Values come from, in order of precedence: command-line flags, the process
//! environment, the worker's `.env`, and built-in defaults. This mirrors how
//! the worker itself loads its settings.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use shared::{
    component_warn, ComponentId, EnvFile, RequiredField, WorkerLayout, DEFAULT_METRICS_PATH, DEFAULT_METRICS_PORT,
};

use crate::services::DEFAULT_PROBE_TIMEOUT;

/// Inputs of a single aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSettings {
    pub worker_base_url: String,
    pub coordinator_base_url: Option<String>,
    pub probe_timeout: Duration,
    pub log_path: PathBuf,
    pub config_path: PathBuf,
    pub metrics_url: String,
}

impl CheckSettings {
    /// Settings for a layout with every value at its default
    pub fn for_layout(layout: &WorkerLayout) -> Self {
        Self {
            worker_base_url: local_base_url(DEFAULT_METRICS_PORT),
            coordinator_base_url: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            log_path: layout.log_file(),
            config_path: layout.env_file(),
            metrics_url: format!("{}{}", local_base_url(DEFAULT_METRICS_PORT), DEFAULT_METRICS_PATH),
        }
    }

    /// Resolve settings from flags, the process environment and the worker `.env`
    pub async fn load(layout: WorkerLayout, port_flag: Option<u16>, probe_timeout: Duration) -> Self {
        let env_file = match EnvFile::load(layout.env_file()).await {
            Ok(env_file) => env_file,
            Err(e) => {
                component_warn!(ComponentId::current(), "⚠️ Ignoring unreadable {}: {}", layout.env_file().display(), e);
                None
            }
        };
        Self::resolve(layout, port_flag, probe_timeout, |key| std::env::var(key).ok(), env_file.as_ref())
    }

    /// Pure resolution step behind [`CheckSettings::load`]
    pub fn resolve<F>(
        layout: WorkerLayout,
        port_flag: Option<u16>,
        probe_timeout: Duration,
        process_env: F,
        env_file: Option<&EnvFile>,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| -> Option<String> {
            process_env(key)
                .or_else(|| env_file.and_then(|env| env.get(key)).map(str::to_string))
                .filter(|value| !value.trim().is_empty())
        };

        let layout = match lookup("LOG_FILE") {
            Some(log_file) => layout.with_log_file(log_file),
            None => layout,
        };

        let metrics_port = port_flag.unwrap_or_else(|| match lookup("METRICS_PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                component_warn!(
                    ComponentId::current(),
                    "⚠️ Invalid METRICS_PORT {:?}, using {}",
                    raw,
                    DEFAULT_METRICS_PORT
                );
                DEFAULT_METRICS_PORT
            }),
            None => DEFAULT_METRICS_PORT,
        });

        let metrics_path = lookup("METRICS_PATH").unwrap_or_else(|| DEFAULT_METRICS_PATH.to_string());

        let coordinator_base_url = lookup(RequiredField::CoordinatorWsUrl.key())
            .filter(|url| !url.contains(RequiredField::CoordinatorWsUrl.placeholder()))
            .and_then(|url| coordinator_base_url(&url));

        let worker_base_url = local_base_url(metrics_port);
        Self {
            metrics_url: format!("{worker_base_url}{metrics_path}"),
            worker_base_url,
            coordinator_base_url,
            probe_timeout,
            log_path: layout.log_file(),
            config_path: layout.env_file(),
        }
    }
}

/// Base URL of the worker's local HTTP server
pub fn local_base_url(port: u16) -> String {
    format!("http://localhost:{port}")
}

/// Derive the coordinator's HTTP base URL from its WebSocket URL
///
/// `ws` maps to `http` and `wss` to `https`; path, query, fragment and
/// credentials are dropped. Returns `None` for unparsable URLs or other schemes.
pub fn coordinator_base_url(ws_url: &str) -> Option<String> {
    let url = Url::parse(ws_url.trim()).ok()?;
    let scheme = match url.scheme() {
        "ws" | "http" => "http",
        "wss" | "https" => "https",
        _ => return None,
    };
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{scheme}://{host}:{port}")),
        None => Some(format!("{scheme}://{host}")),
    }
}

/// Parse a timeout in seconds, rejecting non-positive and non-finite values
pub fn parse_timeout(seconds: f64) -> Option<Duration> {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}

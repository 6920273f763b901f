//! HTTP health endpoint probe
//!
//! One attempt per call, no retries. Connection failures, timeouts and
//! non-2xx statuses all collapse into `reachable = false`.

use async_trait::async_trait;
use std::time::Duration;
use shared::{component_debug, ComponentId};

use crate::traits::EndpointProbe;
use crate::types::HealthProbeResult;

/// Path appended to every probed base URL
pub const HEALTH_PATH: &str = "/health";

/// Default bound on a single probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe issuing real HTTP requests
pub struct HttpEndpointProbe {
    client: reqwest::Client,
}

impl HttpEndpointProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Full health URL for a base URL, tolerating a trailing slash
    pub fn health_url(base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), HEALTH_PATH)
    }
}

impl Default for HttpEndpointProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EndpointProbe for HttpEndpointProbe {
    async fn probe(&self, base_url: &str, timeout: Duration) -> HealthProbeResult {
        let url = Self::health_url(base_url);

        // Request timeout spans connect through body; the outer one spans the whole future
        let request = async {
            let response = self.client.get(&url).timeout(timeout).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Ok::<_, reqwest::Error>(None);
            }
            response.text().await.map(Some)
        };

        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(Some(body))) => HealthProbeResult::from_body(url, body),
            Ok(Ok(None)) => {
                component_debug!(ComponentId::current(), "🌐 {} answered with a non-success status", url);
                HealthProbeResult::unreachable(url)
            }
            Ok(Err(e)) => {
                component_debug!(ComponentId::current(), "🌐 {} unreachable: {}", url, e);
                HealthProbeResult::unreachable(url)
            }
            Err(_) => {
                component_debug!(ComponentId::current(), "🌐 {} timed out after {:?}", url, timeout);
                HealthProbeResult::unreachable(url)
            }
        }
    }
}

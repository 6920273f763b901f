//! Consolidation of all health signals into one report
//!
//! The aggregator owns no state between runs: each call to
//! [`StatusAggregator::aggregate`] queries every collaborator afresh and
//! merges the answers. `overall` depends on process liveness alone; the other
//! signals are diagnostic context.

use shared::{component_debug, ComponentId};

use crate::core::settings::CheckSettings;
use crate::traits::{ConfigValidator, EndpointProbe, LogInspector, ProcessLocator, ResourceReporter};
use crate::types::{ConfigStatus, Overall, Recommendation, StatusReport};

/// Runs every sub-check and merges the results
pub struct StatusAggregator<P, E, L, C, R>
where
    P: ProcessLocator,
    E: EndpointProbe,
    L: LogInspector,
    C: ConfigValidator,
    R: ResourceReporter,
{
    /// Injected services
    locator: P,
    probe: E,
    logs: L,
    config: C,
    resources: R,

    settings: CheckSettings,
}

impl<P, E, L, C, R> StatusAggregator<P, E, L, C, R>
where
    P: ProcessLocator,
    E: EndpointProbe,
    L: LogInspector,
    C: ConfigValidator,
    R: ResourceReporter,
{
    /// Create new aggregator with injected dependencies
    pub fn new(locator: P, probe: E, logs: L, config: C, resources: R, settings: CheckSettings) -> Self {
        Self {
            locator,
            probe,
            logs,
            config,
            resources,
            settings,
        }
    }

    /// Run all checks concurrently and build the report
    ///
    /// Never fails: every collaborator returns a value for expected absence.
    pub async fn aggregate(&self) -> StatusReport {
        let timeout = self.settings.probe_timeout;

        let process_and_resources = async {
            let process = self.locator.locate().await;
            let pid = process.pid.filter(|_| process.running);
            let resources = self.resources.sample(pid).await;
            (process, resources)
        };

        let coordinator = async {
            match &self.settings.coordinator_base_url {
                Some(base_url) => Some(self.probe.probe(base_url, timeout).await),
                None => None,
            }
        };

        let ((process, resources), endpoint, coordinator, log, config) = tokio::join!(
            process_and_resources,
            self.probe.probe(&self.settings.worker_base_url, timeout),
            coordinator,
            self.logs.inspect(&self.settings.log_path),
            self.config.validate(&self.settings.config_path),
        );

        let overall = Overall::from(&process);
        let recommendations = recommend(overall, &config, &self.settings);

        component_debug!(
            ComponentId::current(),
            "📋 Aggregated report: overall={}, endpoint_reachable={}, recent_errors={}",
            overall,
            endpoint.reachable,
            log.recent_errors.len()
        );

        StatusReport {
            process,
            endpoint,
            coordinator,
            log_path: self.settings.log_path.clone(),
            log,
            config_path: self.settings.config_path.clone(),
            config,
            resources,
            overall,
            recommendations,
        }
    }
}

/// Fixed rule table turning signals into operator actions
pub fn recommend(overall: Overall, config: &ConfigStatus, settings: &CheckSettings) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if overall == Overall::Down {
        recommendations.push(Recommendation::StartWorker);
    }

    if !config.is_complete() {
        recommendations.push(Recommendation::ConfigureEnv {
            path: settings.config_path.clone(),
            missing: config.unconfigured(),
        });
    }

    recommendations.push(Recommendation::TailLogs {
        path: settings.log_path.clone(),
    });
    recommendations.push(Recommendation::ViewMetrics {
        url: settings.metrics_url.clone(),
    });

    recommendations
}

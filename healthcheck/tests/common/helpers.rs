//! Test helpers and builder patterns for health-check tests

use healthcheck::traits::{
    MockConfigValidator, MockEndpointProbe, MockLogInspector, MockProcessLocator, MockResourceReporter,
};
use healthcheck::{
    CheckSettings, ConfigStatus, HealthProbeResult, LogSnapshot, ProcessState, ResourceSnapshot, StatusAggregator,
};
use shared::WorkerLayout;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

use super::fixtures::TestFixtures;

pub type MockAggregator = StatusAggregator<
    MockProcessLocator,
    MockEndpointProbe,
    MockLogInspector,
    MockConfigValidator,
    MockResourceReporter,
>;

/// Builder for aggregators whose collaborators return fixed values
///
/// Defaults describe a healthy, fully configured worker.
pub struct AggregatorBuilder {
    process: ProcessState,
    endpoint: HealthProbeResult,
    coordinator: Option<HealthProbeResult>,
    log: LogSnapshot,
    config: ConfigStatus,
    resources: ResourceSnapshot,
    settings: CheckSettings,
}

impl AggregatorBuilder {
    pub fn new() -> Self {
        Self {
            process: TestFixtures::running_process(),
            endpoint: TestFixtures::healthy_probe(TestFixtures::HEALTH_URL),
            coordinator: None,
            log: TestFixtures::clean_log(),
            config: TestFixtures::complete_config(),
            resources: TestFixtures::sampled_resources(),
            settings: CheckSettings::for_layout(&WorkerLayout::new("/srv/worker")),
        }
    }

    pub fn with_process(mut self, process: ProcessState) -> Self {
        self.process = process;
        self
    }

    pub fn with_endpoint(mut self, endpoint: HealthProbeResult) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Configure a coordinator URL and the answer its probe gets
    pub fn with_coordinator(mut self, base_url: &str, result: HealthProbeResult) -> Self {
        self.settings.coordinator_base_url = Some(base_url.to_string());
        self.coordinator = Some(result);
        self
    }

    pub fn with_log(mut self, log: LogSnapshot) -> Self {
        self.log = log;
        self
    }

    pub fn with_config(mut self, config: ConfigStatus) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> MockAggregator {
        let mut locator = MockProcessLocator::new();
        let process = self.process.clone();
        locator.expect_locate().returning(move || process.clone());

        let mut probe = MockEndpointProbe::new();
        let worker_url = self.settings.worker_base_url.clone();
        let endpoint = self.endpoint.clone();
        probe
            .expect_probe()
            .withf(move |base_url, _| base_url == worker_url)
            .returning(move |_, _| endpoint.clone());
        if let (Some(base), Some(result)) = (self.settings.coordinator_base_url.clone(), self.coordinator.clone()) {
            probe
                .expect_probe()
                .withf(move |base_url, _| base_url == base)
                .returning(move |_, _| result.clone());
        }

        let mut logs = MockLogInspector::new();
        let log = self.log.clone();
        logs.expect_inspect().returning(move |_| log.clone());

        let mut config = MockConfigValidator::new();
        let status = self.config.clone();
        config.expect_validate().returning(move |_| status.clone());

        let mut resources = MockResourceReporter::new();
        let snapshot = self.resources.clone();
        resources.expect_sample().returning(move |_| snapshot.clone());

        StatusAggregator::new(locator, probe, logs, config, resources, self.settings)
    }
}

impl Default for AggregatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper functions for working with on-disk worker deployments
pub struct TestHelpers;

impl TestHelpers {
    /// Empty worker directory
    pub fn worker_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    pub fn write_env(dir: &TempDir, content: &str) -> PathBuf {
        let path = WorkerLayout::new(dir.path()).env_file();
        std::fs::write(&path, content).expect("Failed to write .env");
        path
    }

    pub fn write_log(dir: &TempDir, content: &str) -> PathBuf {
        let path = WorkerLayout::new(dir.path()).log_file();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create logs dir");
        }
        std::fs::write(&path, content).expect("Failed to write log");
        path
    }

    pub fn write_pid(dir: &TempDir, pid: u32) -> PathBuf {
        let path = WorkerLayout::new(dir.path()).pid_file();
        std::fs::write(&path, format!("{pid}\n")).expect("Failed to write pid file");
        path
    }

    /// Default settings for `dir`, probing `worker_base_url` without a coordinator
    pub fn settings(dir: &TempDir, worker_base_url: &str) -> CheckSettings {
        let mut settings = CheckSettings::for_layout(&WorkerLayout::new(dir.path()));
        settings.worker_base_url = worker_base_url.to_string();
        settings.probe_timeout = Duration::from_secs(2);
        settings
    }

    /// A local port with nothing listening
    pub fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("No local address").port()
    }

    /// Base URL of a local port with nothing listening
    pub fn closed_base_url() -> String {
        format!("http://127.0.0.1:{}", Self::closed_port())
    }
}

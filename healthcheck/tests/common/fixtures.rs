//! Test fixtures and data for health-check tests

use healthcheck::{ConfigStatus, FieldStatus, HealthProbeResult, LogSnapshot, ProcessState, ResourceSnapshot};
use shared::RequiredField;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Pid used for a scripted running worker
    pub const WORKER_PID: u32 = 4321;

    /// Worker `.env` with every required field filled in
    pub const COMPLETE_ENV: &'static str = "\
COORDINATOR_WS_URL=ws://coordinator.internal:8000/ws
API_KEY=sk_live_abc123
SOLANA_PRIVATE_KEY=5Kb8kLf9zgWQnogidDA76MzPL6TsZZY36hWXMssSzNydYXYB9KF
";

    /// Worker `.env` as shipped, never edited
    pub const TEMPLATE_ENV: &'static str = "\
COORDINATOR_WS_URL=ws://your-coordinator:8000/ws
API_KEY=your-api-key-here
SOLANA_PRIVATE_KEY=your-solana-private-key-here
";

    /// Clean worker log without error lines
    pub const CLEAN_LOG: &'static str = "\
2024-01-01 12:00:00 INFO Worker starting
2024-01-01 12:00:01 INFO Connected to coordinator
2024-01-01 12:00:02 INFO Waiting for jobs
";

    pub const HEALTH_URL: &'static str = "http://localhost:8081/health";
    pub const COORDINATOR_HEALTH_URL: &'static str = "http://coordinator.internal:8000/health";

    pub fn running_process() -> ProcessState {
        ProcessState::running(Self::WORKER_PID)
    }

    pub fn healthy_probe(url: &str) -> HealthProbeResult {
        HealthProbeResult::from_body(url, r#"{"status":"healthy","worker_id":"worker-1"}"#.to_string())
    }

    pub fn clean_log() -> LogSnapshot {
        LogSnapshot {
            exists: true,
            size_bytes: Some(Self::CLEAN_LOG.len() as u64),
            recent_errors: vec![],
            last_line: Some("2024-01-01 12:00:02 INFO Waiting for jobs".to_string()),
        }
    }

    pub fn complete_config() -> ConfigStatus {
        ConfigStatus {
            present: true,
            fields: RequiredField::ALL
                .iter()
                .map(|field| (*field, FieldStatus { configured: true }))
                .collect(),
        }
    }

    pub fn sampled_resources() -> ResourceSnapshot {
        ResourceSnapshot {
            memory_summary: Some("4.0 GiB / 16.0 GiB used (12.0 GiB available)".to_string()),
            disk_summary: Some("20.0 GiB / 100.0 GiB used (20%) on /".to_string()),
            cpu_percent: Some(1.5),
            process_memory_bytes: Some(64 * 1024 * 1024),
        }
    }
}

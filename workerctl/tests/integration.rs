//! End-to-end lifecycle tests against a stand-in worker interpreter
//!
//! The deployment's `venv/bin/python` is a shell script that ignores its
//! arguments and sleeps, so start/stop exercise real process handling.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;

use healthcheck::core::CheckSettings;
use healthcheck::services::process_table::process_exists;
use healthcheck::Overall;
use shared::{PidFile, WorkerLayout};
use workerctl::{real_controller, ControllerError, StartOutcome, StopOutcome};

const COMPLETE_ENV: &str = "\
COORDINATOR_WS_URL=ws://coordinator.internal:8000/ws
API_KEY=sk_live_abc123
SOLANA_PRIVATE_KEY=5Kb8kLf9zgWQnogidDA76MzPL6TsZZY36hWXMssSzNydYXYB9KF
";

/// Serializes tests that write and then execute scripts (avoids ETXTBSY)
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Deployment whose interpreter runs `body` as a shell script
fn deployment(env: &str, body: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let layout = WorkerLayout::new(dir.path());

    let python = layout.python();
    std::fs::create_dir_all(python.parent().unwrap()).unwrap();
    std::fs::write(&python, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

    std::fs::write(layout.env_file(), env).unwrap();
    dir
}

#[tokio::test]
async fn test_daemon_start_and_stop_round_trip() {
    let _guard = spawn_lock();
    let dir = deployment(COMPLETE_ENV, "echo worker booting\nexec sleep 30");
    let layout = WorkerLayout::new(dir.path());

    let controller = real_controller(layout.clone()).with_grace(Duration::from_secs(5));
    let StartOutcome::Daemonized { pid } = controller.start(true).await.unwrap() else {
        panic!("Daemon start should report a pid");
    };

    let record = PidFile::new(layout.pid_file()).read().await.unwrap().unwrap();
    assert_eq!(record.pid, pid);
    assert!(process_exists(pid));

    // A second start is refused while the first worker runs
    let again = controller.start(true).await;
    assert!(matches!(again, Err(ControllerError::AlreadyRunning { pid: running }) if running == pid));

    // The health check sees the worker through the identifier file
    let settings = CheckSettings::for_layout(&layout);
    let report = healthcheck::real_aggregator(&layout, settings).aggregate().await;
    assert_eq!(report.overall, Overall::Up);
    assert_eq!(report.process.pid, Some(pid));

    let outcome = controller.stop().await.unwrap();
    assert!(matches!(outcome, StopOutcome::Stopped { pid: stopped, .. } if stopped == pid));
    assert!(!layout.pid_file().exists());
    assert!(!process_exists(pid));

    let log = std::fs::read_to_string(layout.log_file()).unwrap();
    assert!(log.contains("worker booting"));

    // Nothing left to stop
    assert!(matches!(controller.stop().await, Err(ControllerError::NotRunning)));
}

#[tokio::test]
async fn test_placeholder_coordinator_url_blocks_start() {
    let _guard = spawn_lock();
    let env = COMPLETE_ENV.replace("coordinator.internal", "your-coordinator");
    let dir = deployment(&env, "exec sleep 30");
    let layout = WorkerLayout::new(dir.path());

    let result = real_controller(layout.clone()).start(true).await;

    match result {
        Err(ControllerError::PlaceholderConfig { key }) => assert_eq!(key, "COORDINATOR_WS_URL"),
        other => panic!("Expected PlaceholderConfig, got {other:?}"),
    }
    assert!(!layout.pid_file().exists());
}

#[tokio::test]
async fn test_attached_start_returns_worker_exit_code() {
    let _guard = spawn_lock();
    let dir = deployment(COMPLETE_ENV, "exit 4");
    let layout = WorkerLayout::new(dir.path());

    let outcome = real_controller(layout.clone()).start(false).await.unwrap();

    assert_eq!(outcome, StartOutcome::Attached(workerctl::AttachedExit::Exited(4)));
    assert!(!layout.pid_file().exists());
}

#[tokio::test]
async fn test_restart_replaces_worker() {
    let _guard = spawn_lock();
    let dir = deployment(COMPLETE_ENV, "exec sleep 30");
    let layout = WorkerLayout::new(dir.path());
    let controller = real_controller(layout.clone()).with_grace(Duration::from_secs(5));

    let StartOutcome::Daemonized { pid: first } = controller.start(true).await.unwrap() else {
        panic!("Daemon start should report a pid");
    };
    let StartOutcome::Daemonized { pid: second } = controller.restart().await.unwrap() else {
        panic!("Restart should report a pid");
    };

    assert_ne!(first, second);
    assert!(!process_exists(first));
    assert!(process_exists(second));

    controller.stop().await.unwrap();
    assert!(!process_exists(second));
}

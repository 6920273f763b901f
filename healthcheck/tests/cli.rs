//! Command-line behaviour of the built `health-check` binary

mod common;
use common::TestHelpers;

use std::process::{Command, Output};
use tempfile::TempDir;

fn run_health_check(dir: &TempDir, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_health-check"))
        .arg("--dir")
        .arg(dir.path())
        .arg("--metrics-port")
        .arg(TestHelpers::closed_port().to_string())
        .args(["--timeout", "1"])
        .args(extra)
        .output()
        .expect("Failed to run health-check")
}

#[test]
fn test_down_worker_exits_zero_by_default() {
    let dir = TestHelpers::worker_dir();

    let output = run_health_check(&dir, &[]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DOWN"));
}

#[test]
fn test_exit_code_flag_fails_when_down() {
    let dir = TestHelpers::worker_dir();

    let output = run_health_check(&dir, &["--exit-code"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_exit_code_flag_succeeds_when_up() {
    let dir = TestHelpers::worker_dir();
    TestHelpers::write_pid(&dir, std::process::id());

    let output = run_health_check(&dir, &["--exit-code"]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_json_output_is_machine_readable() {
    let dir = TestHelpers::worker_dir();
    TestHelpers::write_env(&dir, "COORDINATOR_WS_URL=ws://127.0.0.1:1/ws\nAPI_KEY=sk live abc\n");

    let output = run_health_check(&dir, &["--json"]);

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(json["overall"], "DOWN");
    assert_eq!(json["process"]["running"], false);
    assert_eq!(json["config"]["present"], true);
    assert_eq!(json["config"]["fields"]["API_KEY"]["configured"], true);
    assert_eq!(json["config"]["fields"]["COORDINATOR_WS_URL"]["configured"], true);
    assert_eq!(json["config"]["fields"]["SOLANA_PRIVATE_KEY"]["configured"], false);

    let configure = json["recommendations"]
        .as_array()
        .expect("recommendations is not a list")
        .iter()
        .find(|rec| rec["kind"] == "configure_env")
        .expect("no configure_env recommendation");
    assert_eq!(configure["missing"], serde_json::json!(["SOLANA_PRIVATE_KEY"]));
}

//! Service-specific tests
//!
//! Each real service has its own test file. Filesystem tests work inside
//! temporary directories; network tests use a local mock server.


// Common test utilities for services
#[cfg(test)]
pub mod common {
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A pid far above any default `pid_max`, so it never names a live process
    pub const DEAD_PID: u32 = 4_194_400;

    /// Write `content` to `name` inside `dir` and return the full path
    pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Log file made of `count` numbered INFO lines
    pub fn info_lines(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("2024-01-01 12:00:00 INFO tick {i}")).collect()
    }

    /// Join lines with newlines, terminating the final one
    pub fn as_log(lines: &[String]) -> String {
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    pub fn exists(path: &Path) -> bool {
        std::fs::metadata(path).is_ok()
    }
}

//! Host and worker resource sampling via `sysinfo`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use sysinfo::{Disks, Pid, System};
use shared::{component_warn, format_bytes, ComponentId};

use crate::traits::ResourceReporter;
use crate::types::ResourceSnapshot;

/// Reporter sampling the local host
#[derive(Debug, Clone)]
pub struct SysinfoResourceReporter {
    working_dir: PathBuf,
}

impl SysinfoResourceReporter {
    /// Create a reporter measuring disk usage for `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    fn memory_summary(system: &System) -> Option<String> {
        let total = system.total_memory();
        if total == 0 {
            return None;
        }
        Some(format!(
            "{} / {} used ({} available)",
            format_bytes(system.used_memory()),
            format_bytes(total),
            format_bytes(system.available_memory())
        ))
    }

    fn disk_summary(working_dir: &Path) -> Option<String> {
        let dir = working_dir.canonicalize().unwrap_or_else(|_| working_dir.to_path_buf());
        let disks = Disks::new_with_refreshed_list();

        let disk = disks
            .list()
            .iter()
            .filter(|disk| dir.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())?;

        let total = disk.total_space();
        if total == 0 {
            return None;
        }
        let used = total.saturating_sub(disk.available_space());
        let percent = used as f64 * 100.0 / total as f64;
        Some(format!(
            "{} / {} used ({:.0}%) on {}",
            format_bytes(used),
            format_bytes(total),
            percent,
            disk.mount_point().display()
        ))
    }

    /// CPU usage needs two refreshes spaced by the minimum update interval
    fn process_usage(system: &mut System, pid: u32) -> (Option<f32>, Option<u64>) {
        let pid = Pid::from_u32(pid);
        if !system.refresh_process(pid) {
            return (None, None);
        }
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        if !system.refresh_process(pid) {
            return (None, None);
        }
        match system.process(pid) {
            Some(process) => (Some(process.cpu_usage()), Some(process.memory())),
            None => (None, None),
        }
    }

    fn sample_blocking(working_dir: &Path, pid: Option<u32>) -> ResourceSnapshot {
        let mut system = System::new();
        system.refresh_memory();

        let (cpu_percent, process_memory_bytes) = match pid {
            Some(pid) => Self::process_usage(&mut system, pid),
            None => (None, None),
        };

        ResourceSnapshot {
            memory_summary: Self::memory_summary(&system),
            disk_summary: Self::disk_summary(working_dir),
            cpu_percent,
            process_memory_bytes,
        }
    }
}

#[async_trait]
impl ResourceReporter for SysinfoResourceReporter {
    async fn sample(&self, pid: Option<u32>) -> ResourceSnapshot {
        let working_dir = self.working_dir.clone();
        match tokio::task::spawn_blocking(move || Self::sample_blocking(&working_dir, pid)).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                component_warn!(ComponentId::current(), "⚠️ Resource sampling aborted: {}", e);
                ResourceSnapshot::default()
            }
        }
    }
}

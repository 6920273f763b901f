//! Process table backed by OS syscalls and `sysinfo`

use sysinfo::System;

use crate::traits::ProcessTable;

/// Live view of the host's processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessTable;

impl SystemProcessTable {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTable for SystemProcessTable {
    fn exists(&self, pid: u32) -> bool {
        process_exists(pid)
    }

    fn find_matching(&self, pattern: &str) -> Vec<u32> {
        if !sysinfo::IS_SUPPORTED_SYSTEM || pattern.is_empty() {
            return Vec::new();
        }

        let mut system = System::new();
        system.refresh_processes();

        let own_pid = std::process::id();
        let mut pids: Vec<u32> = system
            .processes()
            .iter()
            .filter(|(pid, process)| pid.as_u32() != own_pid && process.cmd().join(" ").contains(pattern))
            .map(|(pid, _)| pid.as_u32())
            .collect();
        pids.sort_unstable();
        pids
    }
}

/// Probe for a process with signal 0
///
/// `EPERM` means the process exists but belongs to another user. A zombie
/// still answers the probe but counts as gone.
#[cfg(unix)]
pub fn process_exists(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    // pid 0 and values past i32::MAX would address process groups
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    if raw <= 0 {
        return false;
    }

    match kill(Pid::from_raw(raw), None::<Signal>) {
        Ok(()) => !is_zombie(pid),
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(unix)]
fn is_zombie(pid: u32) -> bool {
    let pid = sysinfo::Pid::from_u32(pid);
    let mut system = System::new();
    if !system.refresh_process(pid) {
        return false;
    }
    system
        .process(pid)
        .is_some_and(|process| process.status() == sysinfo::ProcessStatus::Zombie)
}

#[cfg(not(unix))]
pub fn process_exists(pid: u32) -> bool {
    let mut system = System::new();
    system.refresh_process(sysinfo::Pid::from_u32(pid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_process_exists() {
        assert!(SystemProcessTable::new().exists(std::process::id()));
    }

    #[test]
    fn test_impossible_pids_do_not_exist() {
        let table = SystemProcessTable::new();
        assert!(!table.exists(0));
        assert!(!table.exists(u32::MAX));
    }

    #[test]
    fn test_scan_excludes_self_and_empty_pattern() {
        let table = SystemProcessTable::new();
        assert!(table.find_matching("").is_empty());

        let matches = table.find_matching("no-process-has-this-command-line-7f3a9c");
        assert!(!matches.contains(&std::process::id()));
    }
}

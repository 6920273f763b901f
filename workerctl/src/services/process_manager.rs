//! Real process management service implementation
//!
//! Spawns the worker interpreter, either detached into its own process group
//! or attached to the controller's terminal, and delivers termination signals.

use async_trait::async_trait;
use std::fs::OpenOptions;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::sleep;

use healthcheck::services::process_table::process_exists;
use shared::{component_debug, component_info, component_warn, ComponentId};

use crate::error::{ControllerError, ControllerResult};
use crate::traits::{AttachedExit, LaunchSpec, ProcessManager, Termination};

/// Interval between liveness polls while waiting for a process to exit
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Time allowed for SIGKILL to take effect
const KILL_SETTLE: Duration = Duration::from_millis(500);

/// Real process manager implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct RealProcessManager;

impl RealProcessManager {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &LaunchSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).current_dir(&spec.working_dir);
        cmd
    }

    /// Poll until `pid` is gone or `timeout` elapses
    async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if !process_exists(pid) {
                return true;
            }
            sleep(POLL_INTERVAL).await;
        }
        !process_exists(pid)
    }

    /// Send `signal` to `pid`; with `group`, to the whole group when `pid` leads it
    #[cfg(unix)]
    fn send_signal(pid: u32, signal: nix::sys::signal::Signal, group: bool) -> ControllerResult<bool> {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::{getpgid, Pid};

        let raw = i32::try_from(pid).map_err(|_| ControllerError::SignalFailed {
            pid,
            message: "pid out of range".to_string(),
        })?;
        let target = Pid::from_raw(raw);

        let leads_group = group && getpgid(Some(target)).is_ok_and(|pgid| pgid == target);
        if leads_group && kill(Pid::from_raw(-raw), signal).is_ok() {
            return Ok(true);
        }
        match kill(target, signal) {
            Ok(()) => Ok(true),
            Err(Errno::ESRCH) => Ok(false),
            Err(e) => Err(ControllerError::SignalFailed {
                pid,
                message: e.to_string(),
            }),
        }
    }

    #[cfg(unix)]
    async fn terminate_pid(pid: u32, grace: Duration) -> ControllerResult<Termination> {
        use nix::sys::signal::Signal;

        if !Self::send_signal(pid, Signal::SIGTERM, false)? {
            return Ok(Termination::AlreadyGone);
        }
        component_debug!(ComponentId::current(), "📤 Sent SIGTERM to process {}", pid);

        if Self::wait_for_exit(pid, grace).await {
            return Ok(Termination::Graceful);
        }

        component_warn!(
            ComponentId::current(),
            "🔨 Process {} didn't exit within {:?}, using SIGKILL",
            pid,
            grace
        );
        Self::send_signal(pid, Signal::SIGKILL, true)?;

        if Self::wait_for_exit(pid, KILL_SETTLE).await {
            Ok(Termination::Killed)
        } else {
            Err(ControllerError::SignalFailed {
                pid,
                message: "process still exists after SIGKILL".to_string(),
            })
        }
    }

    #[cfg(not(unix))]
    async fn terminate_pid(pid: u32, _grace: Duration) -> ControllerResult<Termination> {
        use sysinfo::{Pid, System};

        let mut system = System::new();
        let pid_handle = Pid::from_u32(pid);
        if !system.refresh_process(pid_handle) {
            return Ok(Termination::AlreadyGone);
        }
        match system.process(pid_handle) {
            Some(process) if process.kill() => {
                Self::wait_for_exit(pid, KILL_SETTLE).await;
                Ok(Termination::Killed)
            }
            Some(_) => Err(ControllerError::SignalFailed {
                pid,
                message: "kill request refused".to_string(),
            }),
            None => Ok(Termination::AlreadyGone),
        }
    }
}

/// Resolves on SIGINT or SIGTERM
#[cfg(unix)]
async fn shutdown_signal() -> ControllerResult<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|_| "Ctrl+C").map_err(Into::into),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> ControllerResult<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}

#[async_trait]
impl ProcessManager for RealProcessManager {
    async fn spawn_detached(&self, spec: &LaunchSpec) -> ControllerResult<u32> {
        if let Some(parent) = spec.log_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let log = OpenOptions::new().create(true).append(true).open(&spec.log_file)?;
        let log_err = log.try_clone()?;

        let mut cmd = Self::command(spec);
        cmd.stdin(Stdio::null()).stdout(Stdio::from(log)).stderr(Stdio::from(log_err));
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd
            .spawn()
            .map_err(|e| ControllerError::spawn(format!("{}: {e}", spec.program.display())))?;
        let pid = child
            .id()
            .ok_or_else(|| ControllerError::spawn("worker exited before its pid was known"))?;

        component_debug!(ComponentId::current(), "🚀 Spawned detached worker (PID: {})", pid);
        Ok(pid)
    }

    async fn run_attached(&self, spec: &LaunchSpec, grace: Duration) -> ControllerResult<AttachedExit> {
        let mut cmd = Self::command(spec);
        cmd.stdin(Stdio::inherit()).stdout(Stdio::inherit()).stderr(Stdio::inherit());

        let mut child = cmd
            .spawn()
            .map_err(|e| ControllerError::spawn(format!("{}: {e}", spec.program.display())))?;
        let pid = child.id();
        component_info!(ComponentId::current(), "🚀 Worker running in foreground (PID: {:?})", pid);

        let exited = tokio::select! {
            status = child.wait() => Some(status?),
            reason = shutdown_signal() => {
                let reason = reason?;
                component_info!(ComponentId::current(), "🛑 Received {}, stopping worker", reason);
                None
            }
        };

        if let Some(status) = exited {
            return Ok(AttachedExit::Exited(status.code().unwrap_or(1)));
        }

        if let Some(pid) = pid {
            Self::terminate_pid(pid, grace).await?;
        }
        // Reap the child
        child.wait().await?;
        Ok(AttachedExit::Interrupted)
    }

    async fn terminate(&self, pid: u32, grace: Duration) -> ControllerResult<Termination> {
        Self::terminate_pid(pid, grace).await
    }

    fn is_alive(&self, pid: u32) -> bool {
        process_exists(pid)
    }
}

//! Worker lifecycle controller
//!
//! Validates the deployment, launches the worker (detached or attached) and
//! stops it through its identifier file. There is no supervision: once a
//! detached worker is spawned and its pid recorded, the controller is done.

use std::path::PathBuf;
use std::time::Duration;

use healthcheck::ProcessLocator;
use shared::{
    component_info, component_warn, logging, ComponentId, EnvFile, PidFile, PidRecord, RequiredField, SharedError,
    WorkerLayout, WORKER_MODULE,
};

use crate::error::{ControllerError, ControllerResult};
use crate::traits::{AttachedExit, LaunchSpec, ProcessManager, Termination};

/// Default time a worker gets to exit after SIGTERM
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(10);

/// Fields whose template placeholder blocks a start
const BLOCKING_FIELDS: [RequiredField; 2] = [RequiredField::CoordinatorWsUrl, RequiredField::ApiKey];

/// Result of a successful start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Detached worker spawned and recorded
    Daemonized { pid: u32 },
    /// Attached worker finished
    Attached(AttachedExit),
}

/// Result of a successful stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped { pid: u32, termination: Termination },
    /// The identifier file named no live process and was removed
    StaleRemoved,
}

/// Lifecycle controller for one worker deployment
pub struct Controller<M, L>
where
    M: ProcessManager,
    L: ProcessLocator,
{
    layout: WorkerLayout,
    pid_file: PidFile,
    log_file: PathBuf,

    /// Injected services
    manager: M,
    locator: L,

    grace: Duration,
}

impl<M, L> Controller<M, L>
where
    M: ProcessManager,
    L: ProcessLocator,
{
    /// Create new controller with injected dependencies
    pub fn new(layout: WorkerLayout, manager: M, locator: L) -> Self {
        Self {
            pid_file: PidFile::new(layout.pid_file()),
            log_file: layout.log_file(),
            layout,
            manager,
            locator,
            grace: DEFAULT_STOP_GRACE,
        }
    }

    /// Configure the log file receiving detached output (fluent API)
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }

    /// Configure the stop grace period (fluent API)
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Command line launching the worker module with the venv interpreter
    pub fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec {
            program: self.layout.python(),
            args: vec!["-m".to_string(), WORKER_MODULE.to_string()],
            working_dir: self.layout.root().to_path_buf(),
            log_file: self.log_file.clone(),
        }
    }

    /// Fail unless the interpreter and a filled-in `.env` are present
    pub async fn check_prerequisites(&self) -> ControllerResult<()> {
        let python = self.layout.python();
        if tokio::fs::metadata(&python).await.is_err() {
            return Err(ControllerError::MissingVenv { path: python });
        }

        let env_path = self.layout.env_file();
        let Some(env) = EnvFile::load(&env_path).await? else {
            return Err(ControllerError::MissingConfig { path: env_path });
        };

        if let Some(field) = BLOCKING_FIELDS.iter().find(|field| env.contains_placeholder(**field)) {
            return Err(ControllerError::PlaceholderConfig {
                key: field.key().to_string(),
            });
        }
        Ok(())
    }

    /// Start the worker, detached when `daemon` is set
    pub async fn start(&self, daemon: bool) -> ControllerResult<StartOutcome> {
        self.check_prerequisites().await?;

        let current = self.locator.locate().await;
        if let (true, Some(pid)) = (current.running, current.pid) {
            return Err(ControllerError::AlreadyRunning { pid });
        }

        let spec = self.launch_spec();
        logging::log_startup(
            ComponentId::current(),
            &format!("worker: {} -m {}", spec.program.display(), WORKER_MODULE),
        );

        if !daemon {
            let exit = self.manager.run_attached(&spec, self.grace).await?;
            return Ok(StartOutcome::Attached(exit));
        }

        let pid = self.manager.spawn_detached(&spec).await?;
        if let Err(e) = self.pid_file.write(&PidRecord::new(pid)).await {
            // Never leave an unrecorded worker running
            if let Err(kill_err) = self.manager.terminate(pid, self.grace).await {
                component_warn!(
                    ComponentId::current(),
                    "⚠️ Could not stop unrecorded worker (PID: {}): {}",
                    pid,
                    kill_err
                );
            }
            return Err(e.into());
        }

        logging::log_success(
            ComponentId::current(),
            &format!("Worker started in background (PID: {pid}), logging to {}", spec.log_file.display()),
        );
        Ok(StartOutcome::Daemonized { pid })
    }

    /// Stop the worker recorded in the identifier file
    pub async fn stop(&self) -> ControllerResult<StopOutcome> {
        let record = match self.pid_file.read().await {
            Ok(Some(record)) => record,
            Ok(None) => return Err(ControllerError::NotRunning),
            Err(SharedError::MalformedPidFile { path, content }) => {
                component_warn!(
                    ComponentId::current(),
                    "🧹 Removing malformed identifier file {} ({:?})",
                    path.display(),
                    content
                );
                self.pid_file.remove().await?;
                return Ok(StopOutcome::StaleRemoved);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.manager.is_alive(record.pid) {
            component_warn!(
                ComponentId::current(),
                "🧹 Worker {} is not running, removing stale identifier file",
                record.pid
            );
            self.pid_file.remove().await?;
            return Ok(StopOutcome::StaleRemoved);
        }

        component_info!(ComponentId::current(), "🛑 Stopping worker (PID: {})", record.pid);
        let termination = self.manager.terminate(record.pid, self.grace).await?;
        self.pid_file.remove().await?;

        logging::log_success(ComponentId::current(), &format!("Worker {} stopped", record.pid));
        Ok(StopOutcome::Stopped {
            pid: record.pid,
            termination,
        })
    }

    /// Stop the worker if it runs, then start it detached
    pub async fn restart(&self) -> ControllerResult<StartOutcome> {
        match self.stop().await {
            Ok(_) | Err(ControllerError::NotRunning) => {}
            Err(e) => return Err(e),
        }
        self.start(true).await
    }
}

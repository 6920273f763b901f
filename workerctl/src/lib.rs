//! Lifecycle controller for the worker process
//!
//! Starts the worker from its virtual environment (in the foreground or as a
//! detached background process), stops it through its identifier file and
//! reports its health.

pub mod controller;
pub mod error;
pub mod services;
pub mod traits;

use healthcheck::RealProcessLocator;
use shared::{PidFile, WorkerLayout};

// Re-export commonly used types
pub use controller::{Controller, StartOutcome, StopOutcome, DEFAULT_STOP_GRACE};
pub use error::{ControllerError, ControllerResult};
pub use services::RealProcessManager;
pub use traits::{AttachedExit, LaunchSpec, ProcessManager, Termination};

/// Controller wired to the real host services
pub type RealController = Controller<RealProcessManager, RealProcessLocator>;

/// Build a controller for a worker deployment using the real services
pub fn real_controller(layout: WorkerLayout) -> RealController {
    let locator = RealProcessLocator::new(PidFile::new(layout.pid_file()));
    Controller::new(layout, RealProcessManager::new(), locator)
}

//! Service implementations

pub mod process_manager;

pub use process_manager::RealProcessManager;

//! Core health-check logic
//!
//! Settings resolution, the aggregator merging every signal, and report
//! rendering. Nothing in here performs I/O directly except
//! [`CheckSettings::load`], which reads the worker `.env`.

pub mod aggregator;
pub mod render;
pub mod settings;

pub use aggregator::{recommend, StatusAggregator};
pub use settings::{coordinator_base_url, local_base_url, parse_timeout, CheckSettings};

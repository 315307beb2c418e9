//! Test orchestration: the load executor, the per-test state machine, and
//! the sequential suite orchestrator.
mod executor;
mod orchestrator;
mod state;


pub use executor::{LoadGenerator, RunMode, WrkExecutor};
pub use orchestrator::Orchestrator;
pub use state::{TestEvent, TestPhase, advance};

/// Timestamp format shared by artifact and report file names.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

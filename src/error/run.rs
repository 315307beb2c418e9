use std::time::Duration;

use thiserror::Error;

/// Errors raised while running the load generator for a single test.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to launch load generator '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Load generator exceeded its time budget of {limit:?}.")]
    Timeout { limit: Duration },
    #[error("Failed to capture load generator output: {source}")]
    Capture {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write raw artifact '{path}': {source}")]
    WriteArtifact {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{failed} of {total} tests failed.")]
    TestsFailed { failed: usize, total: usize },
    #[error("Run interrupted before every test resolved.")]
    Interrupted,
}

/// An event was applied to a per-test state it is not valid in.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid transition from '{from}' on '{event}'.")]
pub struct StateError {
    pub from: &'static str,
    pub event: &'static str,
}

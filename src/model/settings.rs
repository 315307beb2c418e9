use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default measured-run duration in seconds.
const DEFAULT_DURATION_SECS: u64 = 30;
/// Default number of generator connections.
const DEFAULT_CONNECTIONS: u64 = 1000;
/// Default number of generator threads.
const DEFAULT_THREADS: u64 = 8;
/// Default warmup pass length in seconds (0 skips the warmup pass).
const DEFAULT_WARMUP_SECS: u64 = 5;
/// Default timeout waiting for a managed server to accept connections.
const DEFAULT_READY_TIMEOUT_SECS: u64 = 30;

/// Suite-wide settings. Immutable once a run starts; individual tests may
/// override any field through [`TestOverrides`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub duration: u64,
    pub connections: u64,
    pub threads: u64,
    pub warmup: u64,
    pub output_dir: PathBuf,
    pub script: Option<PathBuf>,
    pub ready_timeout: u64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_SECS,
            connections: DEFAULT_CONNECTIONS,
            threads: DEFAULT_THREADS,
            warmup: DEFAULT_WARMUP_SECS,
            output_dir: PathBuf::from("results"),
            script: None,
            ready_timeout: DEFAULT_READY_TIMEOUT_SECS,
        }
    }
}

/// Per-test overrides of [`GlobalSettings`] fields. `None` inherits the
/// global value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOverrides {
    pub duration: Option<u64>,
    pub connections: Option<u64>,
    pub threads: Option<u64>,
    pub warmup: Option<u64>,
    pub script: Option<PathBuf>,
}

/// Settings a single test actually runs with, produced once per test by
/// [`TestOverrides::merge`] and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSettings {
    pub duration: u64,
    pub connections: u64,
    pub threads: u64,
    pub warmup: u64,
    pub script: Option<PathBuf>,
    pub ready_timeout: u64,
}

impl TestOverrides {
    /// Resolves the cascade: every override falls back to the global value.
    #[must_use]
    pub fn merge(&self, global: &GlobalSettings) -> EffectiveSettings {
        EffectiveSettings {
            duration: self.duration.unwrap_or(global.duration),
            connections: self.connections.unwrap_or(global.connections),
            threads: self.threads.unwrap_or(global.threads),
            warmup: self.warmup.unwrap_or(global.warmup),
            script: self.script.clone().or_else(|| global.script.clone()),
            ready_timeout: global.ready_timeout,
        }
    }
}

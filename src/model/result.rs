use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GlobalSettings;

/// Latency summary from the generator's thread-stats block, normalized to
/// seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub mean: f64,
    pub stdev: f64,
    pub max: f64,
    /// Share of samples within one standard deviation, in percent.
    pub stdev_pct: f64,
}

/// Structured metrics derived from one raw generator report. Base SI units
/// throughout: seconds and bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WrkMetrics {
    pub requests_per_sec: f64,
    /// Bytes per second.
    pub transfer_per_sec: f64,
    pub latency: Option<LatencyStats>,
    /// Percentile label ("p50", "p99.9", ...) to latency in seconds.
    pub percentiles: BTreeMap<String, f64>,
    pub total_requests: u64,
    pub total_bytes: u64,
    pub errors: u64,
    /// Wall-clock duration the generator reports for the measured window.
    pub duration_secs: f64,
}

/// Why a test resolved to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ServerStartFailed,
    ServerUnavailable,
    ExecutionTimeout,
    ExecutionFailed,
    ParseFailed,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::ServerStartFailed => "server_start_failed",
            FailureKind::ServerUnavailable => "server_unavailable",
            FailureKind::ExecutionTimeout => "execution_timeout",
            FailureKind::ExecutionFailed => "execution_failed",
            FailureKind::ParseFailed => "parse_failed",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Success { metrics: WrkMetrics },
    Failed { kind: FailureKind, message: String },
}

impl TestOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, TestOutcome::Success { .. })
    }

    #[must_use]
    pub const fn metrics(&self) -> Option<&WrkMetrics> {
        match self {
            TestOutcome::Success { metrics } => Some(metrics),
            TestOutcome::Failed { .. } => None,
        }
    }
}

/// One resolved test. Every declared test yields exactly one of these, in
/// declaration order, even on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub url: String,
    /// Run timestamp used in artifact file names (`%Y%m%d_%H%M%S`).
    pub timestamp: String,
    pub outcome: TestOutcome,
    /// Raw captured generator output, retained for post-mortem inspection.
    pub artifact: Option<PathBuf>,
}

/// Ordered results of one suite invocation, plus the settings it ran with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub started_at: DateTime<Utc>,
    pub settings: GlobalSettings,
    pub output_dir: PathBuf,
    pub results: Vec<TestResult>,
}

impl SuiteResult {
    #[must_use]
    pub fn failed(&self) -> impl Iterator<Item = &TestResult> {
        self.results
            .iter()
            .filter(|result| !result.outcome.is_success())
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|result| result.outcome.is_success())
    }
}

/// Transient capture of one generator invocation; discarded after parsing,
/// with the stdout text persisted to disk as a side artifact first.
#[derive(Debug)]
pub struct RawRunOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Where the raw stdout was persisted; `None` for warmup passes.
    pub artifact: Option<PathBuf>,
}

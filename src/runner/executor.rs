use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;

use crate::error::{ConfigError, RunError};
use crate::model::{EffectiveSettings, RawRunOutput, TestSpec};

use super::TIMESTAMP_FORMAT;

/// Default load generator binary, resolved via PATH.
const DEFAULT_BINARY: &str = "wrk";
/// Fixed slack added to the generator's hard timeout.
const GRACE_MARGIN_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Shortened pass to avoid cold-start skew; output is discarded.
    Warmup,
    /// The measured pass whose report becomes the test's metrics.
    Measured,
}

/// Capability the orchestrator uses to drive one generator invocation.
#[async_trait]
pub trait LoadGenerator: Send + Sync {
    /// Runs the generator and captures its report.
    ///
    /// # Errors
    ///
    /// Returns an error when the generator cannot be launched, overruns its
    /// time budget, or its output cannot be captured or persisted. A
    /// non-zero generator exit is not an error here; the captured output is
    /// returned for the caller to judge.
    async fn run(
        &self,
        test: &TestSpec,
        settings: &EffectiveSettings,
        mode: RunMode,
    ) -> Result<RawRunOutput, RunError>;
}

/// Real [`LoadGenerator`] that shells out to wrk.
pub struct WrkExecutor {
    binary: PathBuf,
    output_dir: PathBuf,
}

impl WrkExecutor {
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            output_dir,
        }
    }

    /// Uses a specific generator binary instead of resolving wrk on PATH.
    #[must_use]
    pub const fn with_binary(binary: PathBuf, output_dir: PathBuf) -> Self {
        Self { binary, output_dir }
    }

    /// Verifies the generator binary is reachable before any test runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GeneratorMissing`] when the binary cannot be
    /// found on PATH (or at its explicit path).
    pub fn preflight(&self) -> Result<(), ConfigError> {
        let missing = || ConfigError::GeneratorMissing {
            binary: self.binary.display().to_string(),
        };
        if self.binary.components().count() > 1 {
            if self.binary.is_file() {
                return Ok(());
            }
            return Err(missing());
        }
        let path = std::env::var_os("PATH").ok_or_else(missing)?;
        if std::env::split_paths(&path).any(|dir| dir.join(&self.binary).is_file()) {
            return Ok(());
        }
        Err(missing())
    }

    /// Argument order and flag names are fixed so invocations are
    /// diff-stable across runs.
    fn build_args(test: &TestSpec, settings: &EffectiveSettings, duration: u64) -> Vec<String> {
        let mut args = vec![
            format!("-t{}", settings.threads),
            format!("-c{}", settings.connections),
            format!("-d{}s", duration),
            "--latency".to_owned(),
        ];
        if let Some(script) = settings.script.as_deref() {
            args.push("-s".to_owned());
            args.push(script.display().to_string());
        }
        args.push(test.url.clone());
        args
    }

    async fn persist_artifact(&self, test: &TestSpec, stamp: &str, stdout: &str) -> Result<PathBuf, RunError> {
        let path = self
            .output_dir
            .join(format!("wrk_{}_{}.txt", test.name, stamp));
        tokio::fs::write(&path, stdout)
            .await
            .map_err(|source| RunError::WriteArtifact {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

#[async_trait]
impl LoadGenerator for WrkExecutor {
    async fn run(
        &self,
        test: &TestSpec,
        settings: &EffectiveSettings,
        mode: RunMode,
    ) -> Result<RawRunOutput, RunError> {
        let (duration, limit_secs) = match mode {
            RunMode::Warmup => (
                settings.warmup,
                settings.warmup.saturating_add(GRACE_MARGIN_SECS),
            ),
            RunMode::Measured => (
                settings.duration,
                settings
                    .duration
                    .saturating_add(settings.warmup)
                    .saturating_add(GRACE_MARGIN_SECS),
            ),
        };
        let limit = Duration::from_secs(limit_secs);
        let args = Self::build_args(test, settings, duration);
        tracing::debug!(binary = %self.binary.display(), ?args, "Invoking load generator");

        let started_at = Utc::now();
        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        // On timeout the dropped child is killed via kill_on_drop.
        let output = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| RunError::Timeout { limit })?
            .map_err(|source| RunError::Capture { source })?;
        let finished_at = Utc::now();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        // Raw evidence is persisted before any parsing is attempted, so it
        // survives a later parse failure.
        let artifact = match mode {
            RunMode::Measured => {
                let stamp = started_at.format(TIMESTAMP_FORMAT).to_string();
                Some(self.persist_artifact(test, &stamp, &stdout).await?)
            }
            RunMode::Warmup => None,
        };

        Ok(RawRunOutput {
            stdout,
            stderr,
            exit_code: output.status.code(),
            success: output.status.success(),
            started_at,
            finished_at,
            artifact,
        })
    }
}

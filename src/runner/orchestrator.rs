use std::time::Duration;

use chrono::Utc;

use crate::error::RunError;
use crate::model::{FailureKind, GlobalSettings, SuiteResult, TestOutcome, TestResult, TestSpec};
use crate::parser;
use crate::process::ServerSupervisor;
use crate::shutdown::ShutdownReceiver;

use super::state::{TestEvent, TestPhase, advance};
use super::{LoadGenerator, RunMode, TIMESTAMP_FORMAT};

/// Longest stderr excerpt carried into a failure message.
const STDERR_EXCERPT_LEN: usize = 200;

/// Sequences a suite of tests on a single control flow, owning per-test
/// server lifecycle around each generator invocation. Tests run strictly
/// sequentially: concurrent tests would contend for the local machine and
/// invalidate each other's latency measurements.
pub struct Orchestrator<S, G> {
    supervisor: S,
    generator: G,
    settings: GlobalSettings,
}

impl<S, G> Orchestrator<S, G>
where
    S: ServerSupervisor,
    G: LoadGenerator,
{
    pub const fn new(supervisor: S, generator: G, settings: GlobalSettings) -> Self {
        Self {
            supervisor,
            generator,
            settings,
        }
    }

    /// Runs every test in declaration order and returns the ordered suite
    /// result. A shutdown signal terminates the in-flight test's child
    /// processes and skips the remaining tests; the returned suite contains
    /// only fully-resolved tests.
    pub async fn run_suite(
        &self,
        tests: &[TestSpec],
        mut shutdown: ShutdownReceiver,
    ) -> SuiteResult {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(tests.len());

        for test in tests {
            tracing::info!(test = %test.name, url = %test.url, "Running test");
            tokio::select! {
                result = self.run_test(test) => results.push(result),
                _ = shutdown.recv() => {
                    // Dropping the in-flight future kills its children via
                    // kill_on_drop; the unresolved test is not recorded.
                    tracing::warn!(test = %test.name, "Interrupted; skipping remaining tests");
                    break;
                }
            }
        }

        SuiteResult {
            started_at,
            settings: self.settings.clone(),
            output_dir: self.settings.output_dir.clone(),
            results,
        }
    }

    /// Resolves one test to exactly one [`TestResult`]. Failures are
    /// absorbed here; they never propagate to the rest of the suite.
    async fn run_test(&self, test: &TestSpec) -> TestResult {
        let effective = test.overrides.merge(&self.settings);
        let mut phase = TestPhase::Pending;
        let mut handle = None;
        let mut artifact = None;
        let mut timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();

        if let Some(server) = test.server.as_ref() {
            phase = step(phase, TestEvent::ServerRequested);
            match self.supervisor.start(server).await {
                Ok(mut started) => {
                    let ready = self
                        .supervisor
                        .await_ready(
                            &mut started,
                            &server.host,
                            server.port,
                            Duration::from_secs(effective.ready_timeout),
                        )
                        .await;
                    handle = Some(started);
                    phase = match ready {
                        Ok(()) => step(phase, TestEvent::ServerBecameReady),
                        Err(err) => step(
                            phase,
                            TestEvent::Failure {
                                kind: FailureKind::ServerUnavailable,
                                message: err.to_string(),
                            },
                        ),
                    };
                }
                Err(err) => {
                    phase = step(
                        phase,
                        TestEvent::Failure {
                            kind: FailureKind::ServerStartFailed,
                            message: err.to_string(),
                        },
                    );
                }
            }
        }

        if !phase.is_terminal() && effective.warmup > 0 {
            phase = step(phase, TestEvent::WarmupStarted);
            tracing::info!(test = %test.name, warmup = effective.warmup, "Warmup pass");
            if let Err(err) = self.generator.run(test, &effective, RunMode::Warmup).await {
                phase = step(
                    phase,
                    TestEvent::Failure {
                        kind: failure_kind(&err),
                        message: err.to_string(),
                    },
                );
            }
        }

        if !phase.is_terminal() {
            phase = step(phase, TestEvent::RunStarted);
            match self.generator.run(test, &effective, RunMode::Measured).await {
                Ok(raw) => {
                    artifact.clone_from(&raw.artifact);
                    timestamp = raw.started_at.format(TIMESTAMP_FORMAT).to_string();
                    phase = match parser::parse(&raw.stdout) {
                        Ok(metrics) => {
                            if !raw.success {
                                tracing::warn!(
                                    test = %test.name,
                                    code = ?raw.exit_code,
                                    "Generator exited abnormally but produced a parseable report"
                                );
                            }
                            step(phase, TestEvent::OutputParsed(metrics))
                        }
                        Err(parse_err) if raw.success => step(
                            phase,
                            TestEvent::Failure {
                                kind: FailureKind::ParseFailed,
                                message: parse_err.to_string(),
                            },
                        ),
                        Err(parse_err) => step(
                            phase,
                            TestEvent::Failure {
                                kind: FailureKind::ExecutionFailed,
                                message: format!(
                                    "exit code {:?}; {}; stderr: {}",
                                    raw.exit_code,
                                    parse_err,
                                    excerpt(&raw.stderr)
                                ),
                            },
                        ),
                    };
                }
                Err(err) => {
                    phase = step(
                        phase,
                        TestEvent::Failure {
                            kind: failure_kind(&err),
                            message: err.to_string(),
                        },
                    );
                }
            }
        }

        // Teardown runs whenever a server was started, no matter where the
        // pipeline failed. Best-effort: a stop failure is logged only.
        if let Some(mut server) = handle {
            if matches!(phase, TestPhase::Parsed(_)) {
                phase = step(phase, TestEvent::ServerStopRequested);
            }
            if let Err(err) = self.supervisor.stop(&mut server).await {
                tracing::warn!(test = %test.name, error = %err, "Failed to stop server");
            }
        }
        if !phase.is_terminal() {
            phase = step(phase, TestEvent::Resolved);
        }

        let outcome = match phase {
            TestPhase::Done(metrics) => TestOutcome::Success { metrics },
            TestPhase::Failed { kind, message } => {
                tracing::error!(test = %test.name, kind = %kind, %message, "Test failed");
                TestOutcome::Failed { kind, message }
            }
            other => TestOutcome::Failed {
                kind: FailureKind::ExecutionFailed,
                message: format!("test ended in unexpected phase '{}'", other.name()),
            },
        };

        TestResult {
            name: test.name.clone(),
            url: test.url.clone(),
            timestamp,
            outcome,
            artifact,
        }
    }
}

/// Applies one event, converting a rejected transition into a failed test
/// rather than a crash.
fn step(phase: TestPhase, event: TestEvent) -> TestPhase {
    match advance(phase, event) {
        Ok(next) => next,
        Err(err) => {
            tracing::error!(%err, "State machine rejected transition");
            TestPhase::Failed {
                kind: FailureKind::ExecutionFailed,
                message: err.to_string(),
            }
        }
    }
}

const fn failure_kind(err: &RunError) -> FailureKind {
    match err {
        RunError::Timeout { .. } => FailureKind::ExecutionTimeout,
        RunError::Spawn { .. }
        | RunError::Capture { .. }
        | RunError::WriteArtifact { .. }
        | RunError::TestsFailed { .. }
        | RunError::Interrupted => FailureKind::ExecutionFailed,
    }
}

fn excerpt(text: &str) -> &str {
    let trimmed = text.trim_end();
    match trimmed.char_indices().nth(STDERR_EXCERPT_LEN) {
        Some((index, _)) => trimmed.get(..index).unwrap_or(trimmed),
        None => trimmed,
    }
}

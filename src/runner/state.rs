use crate::error::StateError;
use crate::model::{FailureKind, WrkMetrics};

/// Per-test lifecycle. One test walks
/// `Pending → (ServerStarting → ServerReady)? → Warmup? → Running → Parsed
/// → ServerStopping? → Done`, with `Failed` absorbing from every
/// non-terminal phase.
#[derive(Debug, Clone, PartialEq)]
pub enum TestPhase {
    Pending,
    ServerStarting,
    ServerReady,
    Warmup,
    Running,
    Parsed(WrkMetrics),
    ServerStopping(WrkMetrics),
    Done(WrkMetrics),
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestEvent {
    ServerRequested,
    ServerBecameReady,
    WarmupStarted,
    RunStarted,
    OutputParsed(WrkMetrics),
    ServerStopRequested,
    Resolved,
    Failure { kind: FailureKind, message: String },
}

impl TestPhase {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            TestPhase::Pending => "pending",
            TestPhase::ServerStarting => "server_starting",
            TestPhase::ServerReady => "server_ready",
            TestPhase::Warmup => "warmup",
            TestPhase::Running => "running",
            TestPhase::Parsed(_) => "parsed",
            TestPhase::ServerStopping(_) => "server_stopping",
            TestPhase::Done(_) => "done",
            TestPhase::Failed { .. } => "failed",
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, TestPhase::Done(_) | TestPhase::Failed { .. })
    }
}

impl TestEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            TestEvent::ServerRequested => "server_requested",
            TestEvent::ServerBecameReady => "server_became_ready",
            TestEvent::WarmupStarted => "warmup_started",
            TestEvent::RunStarted => "run_started",
            TestEvent::OutputParsed(_) => "output_parsed",
            TestEvent::ServerStopRequested => "server_stop_requested",
            TestEvent::Resolved => "resolved",
            TestEvent::Failure { .. } => "failure",
        }
    }
}

/// Pure transition function over the per-test state machine.
///
/// # Errors
///
/// Returns a [`StateError`] when `event` is not valid in `phase`; the
/// caller treats that as a test failure, never a crash.
pub fn advance(phase: TestPhase, event: TestEvent) -> Result<TestPhase, StateError> {
    match (phase, event) {
        (TestPhase::Pending, TestEvent::ServerRequested) => Ok(TestPhase::ServerStarting),
        (TestPhase::ServerStarting, TestEvent::ServerBecameReady) => Ok(TestPhase::ServerReady),
        (TestPhase::Pending | TestPhase::ServerReady, TestEvent::WarmupStarted) => {
            Ok(TestPhase::Warmup)
        }
        (
            TestPhase::Pending | TestPhase::ServerReady | TestPhase::Warmup,
            TestEvent::RunStarted,
        ) => Ok(TestPhase::Running),
        (TestPhase::Running, TestEvent::OutputParsed(metrics)) => Ok(TestPhase::Parsed(metrics)),
        (TestPhase::Parsed(metrics), TestEvent::ServerStopRequested) => {
            Ok(TestPhase::ServerStopping(metrics))
        }
        (
            TestPhase::Parsed(metrics) | TestPhase::ServerStopping(metrics),
            TestEvent::Resolved,
        ) => Ok(TestPhase::Done(metrics)),
        (phase, TestEvent::Failure { kind, message }) if !phase.is_terminal() => {
            Ok(TestPhase::Failed { kind, message })
        }
        (phase, event) => Err(StateError {
            from: phase.name(),
            event: event.name(),
        }),
    }
}

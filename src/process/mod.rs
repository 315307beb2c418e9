//! Server process lifecycle: start, readiness polling, and teardown.
//!
//! The orchestrator talks to a [`ServerSupervisor`] capability rather than
//! OS processes directly, so failure-isolation logic can be tested against a
//! deterministic fake.
mod supervisor;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProcessError;
use crate::model::ServerSpec;

pub use supervisor::{ServerHandle, TokioSupervisor};

#[async_trait]
pub trait ServerSupervisor: Send + Sync {
    type Handle: Send;

    /// Launches the configured command with its environment merged over the
    /// ambient environment, capturing output for post-mortem diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error when the command is empty or cannot be spawned.
    async fn start(&self, spec: &ServerSpec) -> Result<Self::Handle, ProcessError>;

    /// Polls a TCP connect to `(host, port)` until it succeeds or `timeout`
    /// elapses. A successful connect is closed immediately; this is a pure
    /// liveness probe. Fails fast if the child exits before becoming ready.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout or when the child exits early. On
    /// timeout the process is still running; the caller decides whether to
    /// stop it.
    async fn await_ready(
        &self,
        handle: &mut Self::Handle,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<(), ProcessError>;

    /// Terminates the process gracefully, force-killing after a bounded
    /// grace period. Idempotent; safe on an already-exited process.
    ///
    /// # Errors
    ///
    /// Returns an error when the process cannot be signalled or reaped.
    async fn stop(&self, handle: &mut Self::Handle) -> Result<(), ProcessError>;
}

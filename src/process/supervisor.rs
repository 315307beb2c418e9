use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::Instant;

use crate::error::ProcessError;
use crate::model::ServerSpec;

use super::ServerSupervisor;

/// Interval between TCP readiness probes.
const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Upper bound for a single connect attempt.
const PROBE_TIMEOUT: Duration = Duration::from_millis(500);
/// Grace period between SIGTERM and SIGKILL.
const STOP_GRACE: Duration = Duration::from_secs(5);

/// A started server process. The child is killed on drop, so an interrupted
/// run cannot leak it.
pub struct ServerHandle {
    child: Child,
    stopped: bool,
}

/// Real [`ServerSupervisor`] backed by OS processes.
pub struct TokioSupervisor {
    log_dir: PathBuf,
}

impl TokioSupervisor {
    #[must_use]
    pub const fn new(log_dir: PathBuf) -> Self {
        Self { log_dir }
    }
}

#[async_trait]
impl ServerSupervisor for TokioSupervisor {
    type Handle = ServerHandle;

    async fn start(&self, spec: &ServerSpec) -> Result<Self::Handle, ProcessError> {
        let program = spec.command.first().ok_or(ProcessError::EmptyCommand)?;

        let log_path = self.log_dir.join(format!("server_{}.log", spec.name));
        let open_log_err = |source| ProcessError::OpenLog {
            path: log_path.clone(),
            source,
        };
        let stdout_log = std::fs::File::create(&log_path).map_err(open_log_err)?;
        let stderr_log = stdout_log.try_clone().map_err(open_log_err)?;

        let child = Command::new(program)
            .args(spec.command.iter().skip(1))
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_log))
            .stderr(Stdio::from(stderr_log))
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                command: spec.command.join(" "),
                source,
            })?;

        tracing::info!(server = %spec.name, log = %log_path.display(), "Started server process");
        Ok(ServerHandle {
            child,
            stopped: false,
        })
    }

    async fn await_ready(
        &self,
        handle: &mut Self::Handle,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<(), ProcessError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = handle
                .child
                .try_wait()
                .map_err(|source| ProcessError::Wait { source })?
            {
                return Err(ProcessError::ExitedEarly {
                    code: status.code(),
                });
            }

            if let Ok(Ok(stream)) =
                tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await
            {
                drop(stream);
                tracing::debug!(host, port, "Server is accepting connections");
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(ProcessError::ReadyTimeout {
                    host: host.to_owned(),
                    port,
                    waited: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn stop(&self, handle: &mut Self::Handle) -> Result<(), ProcessError> {
        if handle.stopped {
            return Ok(());
        }
        if handle
            .child
            .try_wait()
            .map_err(|source| ProcessError::Wait { source })?
            .is_some()
        {
            handle.stopped = true;
            return Ok(());
        }

        terminate(&handle.child);

        match tokio::time::timeout(STOP_GRACE, handle.child.wait()).await {
            Ok(waited) => {
                waited.map_err(|source| ProcessError::Stop { source })?;
            }
            Err(_) => {
                tracing::warn!("Server ignored graceful termination; killing");
                handle
                    .child
                    .start_kill()
                    .map_err(|source| ProcessError::Stop { source })?;
                handle
                    .child
                    .wait()
                    .await
                    .map_err(|source| ProcessError::Stop { source })?;
            }
        }
        handle.stopped = true;
        Ok(())
    }
}

#[cfg(unix)]
fn terminate(child: &Child) {
    if let Some(pid) = child.id().and_then(|pid| i32::try_from(pid).ok()) {
        // SAFETY: pid names a child this process spawned and has not reaped.
        let _ = unsafe { libc::kill(pid, libc::SIGTERM) };
    }
}

#[cfg(not(unix))]
fn terminate(child: &Child) {
    let _ = child;
}

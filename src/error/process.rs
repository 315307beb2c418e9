use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Server command is empty.")]
    EmptyCommand,
    #[error("Failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server exited before becoming ready (exit code {code:?}).")]
    ExitedEarly { code: Option<i32> },
    #[error("Server at {host}:{port} not ready after {waited:?}.")]
    ReadyTimeout {
        host: String,
        port: u16,
        waited: Duration,
    },
    #[error("Failed to poll server process: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to stop server process: {source}")]
    Stop {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to open server log '{path}': {source}")]
    OpenLog {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

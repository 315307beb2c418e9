use thiserror::Error;

use super::{ConfigError, ParseError, ProcessError, RunError};

/// Exit code for configuration problems (the suite never started).
const EXIT_CONFIG: u8 = 2;
/// Exit code for runtime failures (at least one test did not finish).
const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("YAML error: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),
    #[error("Run error: {0}")]
    Run(#[from] RunError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Process exit code reported for this error: configuration problems
    /// abort before any test runs and are distinguished from test failures.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => EXIT_CONFIG,
            AppError::Io { .. }
            | AppError::Clap { .. }
            | AppError::Json { .. }
            | AppError::Yaml { .. }
            | AppError::Join { .. }
            | AppError::Parse(_)
            | AppError::Process(_)
            | AppError::Run(_) => EXIT_FAILURE,
        }
    }
}

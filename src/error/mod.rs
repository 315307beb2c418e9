mod app;
mod config;
mod parse;
mod process;
mod run;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use parse::ParseError;
pub use process::ProcessError;
pub use run::{RunError, StateError};

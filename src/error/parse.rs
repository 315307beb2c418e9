use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Report is empty.")]
    EmptyInput,
    #[error("No recognizable Requests/sec or Transfer/sec line in report.")]
    MissingThroughput,
    #[error("Invalid metric value in line '{line}'.")]
    InvalidValue { line: String },
}

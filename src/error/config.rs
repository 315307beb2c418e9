use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML config '{path}': {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .yaml, .yml, or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have a .yaml, .yml, or .json extension.")]
    MissingExtension,
    #[error("No config file found (looked for wrkbench.yaml, wrkbench.json) and no URL given.")]
    NoConfigFound,
    #[error("Config must define at least one test.")]
    NoTests,
    #[error("Duplicate test name '{name}'.")]
    DuplicateTestName { name: String },
    #[error("Test name '{name}' is not filesystem-safe (use letters, digits, '-', '_', '.').")]
    UnsafeTestName { name: String },
    #[error("'{field}' must be >= 1{scope}.")]
    FieldMustBePositive { field: &'static str, scope: String },
    #[error("threads ({threads}) must not exceed connections ({connections}){scope}.")]
    ThreadsExceedConnections {
        threads: u64,
        connections: u64,
        scope: String,
    },
    #[error("Test '{name}' has an invalid URL: {source}")]
    InvalidUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Test '{name}' declares a server with an empty command.")]
    EmptyServerCommand { name: String },
    #[error("Test '{name}' declares a server with port 0.")]
    ServerPortZero { name: String },
    #[error(
        "Load generator '{binary}' not found on PATH. Install wrk \
         (macOS: brew install wrk; Ubuntu: apt-get install wrk)."
    )]
    GeneratorMissing { binary: String },
    #[error("'{path}' already exists (use --force to overwrite).")]
    OutputExists { path: PathBuf },
    #[error("Failed to create output directory '{path}': {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Sequential wrk benchmark orchestrator - starts servers, drives wrk against them, and turns raw reports into structured results."
)]
pub struct BenchArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug-level logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a benchmark suite from a config file, or a single ad-hoc URL
    Run(RunArgs),
    /// Write a starter config file
    Init(InitArgs),
    /// Validate a config file without running anything
    Validate(ValidateArgs),
    /// Parse a saved wrk report and print its metrics
    Parse(ParseArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Ad-hoc target URL; skips the config file lookup
    pub url: Option<String>,

    /// Config file path (.yaml, .yml, or .json)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Measured run duration in seconds
    #[arg(long, short = 'd')]
    pub duration: Option<u64>,

    /// Concurrent generator connections
    #[arg(long)]
    pub connections: Option<u64>,

    /// Generator threads
    #[arg(long)]
    pub threads: Option<u64>,

    /// Warmup pass length in seconds (0 disables the warmup pass)
    #[arg(long, short = 'w')]
    pub warmup: Option<u64>,

    /// Output directory for reports and raw artifacts
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Lua script forwarded to the generator
    #[arg(long, short = 's')]
    pub script: Option<PathBuf>,

    /// Test name in ad-hoc URL mode
    #[arg(long)]
    pub name: Option<String>,

    /// Seconds to wait for a managed server to accept connections
    #[arg(long = "ready-timeout")]
    pub ready_timeout: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct InitArgs {
    /// Config format to generate
    #[arg(long, short = 'f', default_value = "yaml", ignore_case = true)]
    pub format: ConfigFormat,

    /// Destination path (defaults to wrkbench.yaml or wrkbench.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

#[derive(Debug, Args, Clone)]
pub struct ValidateArgs {
    /// Config file path; default locations are probed when omitted
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ParseArgs {
    /// Saved generator report; stdin is read when omitted
    pub file: Option<PathBuf>,

    /// Parse every wrk_*.txt artifact under this directory
    #[arg(long = "results-dir", conflicts_with = "file")]
    pub results_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "table", ignore_case = true)]
    pub format: ParseFormat,

    /// Write the output to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParseFormat {
    Table,
    Json,
}

use std::path::PathBuf;

use clap::Parser as _;
use colored::Colorize;

use crate::args::{
    BenchArgs, Command, ConfigFormat, InitArgs, ParseArgs, ParseFormat, RunArgs, ValidateArgs,
};
use crate::config::types::{ConfigFile, TestEntry};
use crate::error::{AppResult, ConfigError, RunError};
use crate::process::TokioSupervisor;
use crate::report;
use crate::runner::{Orchestrator, WrkExecutor};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

/// Quick defaults for ad-hoc single-URL runs, where the full measured
/// defaults would be overkill.
const ADHOC_DURATION_SECS: u64 = 10;
const ADHOC_CONNECTIONS: u64 = 100;
const ADHOC_THREADS: u64 = 4;
/// Test name used in ad-hoc mode when none is given.
const ADHOC_TEST_NAME: &str = "adhoc";

/// Parses the CLI, initializes logging, and dispatches the subcommand.
///
/// # Errors
///
/// Returns an error when the configuration is invalid (exit code 2) or the
/// run itself fails (exit code 1).
pub fn run() -> AppResult<()> {
    let args = BenchArgs::parse();
    crate::logger::init_logging(args.verbose);

    match args.command {
        Command::Run(run_args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_suite(&run_args))
        }
        Command::Init(init_args) => run_init(&init_args),
        Command::Validate(validate_args) => run_validate(&validate_args),
        Command::Parse(parse_args) => run_parse(&parse_args),
    }
}

async fn run_suite(args: &RunArgs) -> AppResult<()> {
    let file = resolve_config(args)?;
    let suite = crate::config::build_suite(&file)?;

    std::fs::create_dir_all(&suite.settings.output_dir).map_err(|source| {
        ConfigError::CreateOutputDir {
            path: suite.settings.output_dir.clone(),
            source,
        }
    })?;

    let executor = WrkExecutor::new(suite.settings.output_dir.clone());
    executor.preflight()?;
    let supervisor = TokioSupervisor::new(suite.settings.output_dir.clone());

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_task = setup_signal_shutdown_handler(&shutdown_tx);

    let total = suite.tests.len();
    tracing::info!(tests = total, "Starting benchmark suite");
    let orchestrator = Orchestrator::new(supervisor, executor, suite.settings.clone());
    let outcome = orchestrator.run_suite(&suite.tests, shutdown_rx).await;
    signal_task.abort();

    let paths = report::write_reports(&outcome)?;
    report::print_summary(&outcome);
    println!("\n  Report: {}", paths.markdown.display());

    if outcome.results.len() < total {
        return Err(RunError::Interrupted.into());
    }
    let failed = outcome.failed().count();
    if failed > 0 {
        return Err(RunError::TestsFailed { failed, total }.into());
    }
    Ok(())
}

/// Resolves the run's raw config: an in-memory single-test config in
/// ad-hoc URL mode, the config file otherwise. CLI overrides win in both
/// modes.
fn resolve_config(args: &RunArgs) -> Result<ConfigFile, ConfigError> {
    let mut file = match args.url.clone() {
        Some(url) => ConfigFile {
            duration: Some(ADHOC_DURATION_SECS),
            connections: Some(ADHOC_CONNECTIONS),
            threads: Some(ADHOC_THREADS),
            warmup: Some(0),
            tests: vec![TestEntry {
                name: args
                    .name
                    .clone()
                    .unwrap_or_else(|| ADHOC_TEST_NAME.to_owned()),
                url,
                ..TestEntry::default()
            }],
            ..ConfigFile::default()
        },
        None => crate::config::load_config(args.config.as_deref())?
            .ok_or(ConfigError::NoConfigFound)?,
    };

    if args.duration.is_some() {
        file.duration = args.duration;
    }
    if args.connections.is_some() {
        file.connections = args.connections;
    }
    if args.threads.is_some() {
        file.threads = args.threads;
    }
    if args.warmup.is_some() {
        file.warmup = args.warmup;
    }
    if args.output.is_some() {
        file.output_dir.clone_from(&args.output);
    }
    if args.script.is_some() {
        file.script.clone_from(&args.script);
    }
    if args.ready_timeout.is_some() {
        file.ready_timeout = args.ready_timeout;
    }
    Ok(file)
}

fn run_init(args: &InitArgs) -> AppResult<()> {
    let (default_name, content) = match args.format {
        ConfigFormat::Yaml => (
            "wrkbench.yaml",
            serde_yaml::to_string(&ConfigFile::sample())?,
        ),
        ConfigFormat::Json => (
            "wrkbench.json",
            serde_json::to_string_pretty(&ConfigFile::sample())?,
        ),
    };
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_name));

    if path.exists() && !args.force {
        return Err(ConfigError::OutputExists { path }.into());
    }
    std::fs::write(&path, content)?;
    println!("Wrote starter config to {}", path.display());
    Ok(())
}

fn run_validate(args: &ValidateArgs) -> AppResult<()> {
    let file =
        crate::config::load_config(args.config.as_deref())?.ok_or(ConfigError::NoConfigFound)?;
    let suite = crate::config::build_suite(&file)?;

    println!("{}", "Config OK".green().bold());
    for test in &suite.tests {
        let server = match test.server.as_ref() {
            Some(server) => format!(" (managed server on port {})", server.port),
            None => String::new(),
        };
        println!("  {} -> {}{}", test.name, test.url, server);
    }
    Ok(())
}

fn run_parse(args: &ParseArgs) -> AppResult<()> {
    let inputs = collect_parse_inputs(args)?;
    let mut sections = Vec::with_capacity(inputs.len());
    for (source, raw) in &inputs {
        let metrics = crate::parser::parse(raw)?;
        let rendered = match args.format {
            ParseFormat::Json => serde_json::to_string_pretty(&metrics)?,
            ParseFormat::Table => render_metrics_table(&metrics),
        };
        if inputs.len() > 1 {
            sections.push(format!("== {source} ==\n{rendered}"));
        } else {
            sections.push(rendered);
        }
    }

    let rendered = sections.join("\n");
    match args.output.as_deref() {
        Some(path) => std::fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Gathers `(label, raw report)` pairs from a directory scan, a single
/// file, or stdin.
fn collect_parse_inputs(args: &ParseArgs) -> AppResult<Vec<(String, String)>> {
    if let Some(dir) = args.results_dir.as_deref() {
        let mut paths = Vec::new();
        for dir_entry in std::fs::read_dir(dir)? {
            let path = dir_entry?.path();
            let is_artifact = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("wrk_") && name.ends_with(".txt"));
            if is_artifact {
                paths.push(path);
            }
        }
        paths.sort();
        let mut inputs = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = std::fs::read_to_string(&path)?;
            inputs.push((path.display().to_string(), raw));
        }
        return Ok(inputs);
    }

    let input = match args.file.as_deref() {
        Some(path) => (path.display().to_string(), std::fs::read_to_string(path)?),
        None => (
            "stdin".to_owned(),
            std::io::read_to_string(std::io::stdin())?,
        ),
    };
    Ok(vec![input])
}

fn render_metrics_table(metrics: &crate::model::WrkMetrics) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "Requests/sec:  {:.2}", metrics.requests_per_sec);
    let _ = writeln!(
        out,
        "Transfer/sec:  {}",
        report::format_bytes(metrics.transfer_per_sec)
    );
    if let Some(latency) = metrics.latency {
        let _ = writeln!(
            out,
            "Latency:       mean {}, stdev {}, max {}",
            report::format_latency(latency.mean),
            report::format_latency(latency.stdev),
            report::format_latency(latency.max)
        );
    }
    for (label, value) in &metrics.percentiles {
        let _ = writeln!(out, "Latency {label}:   {}", report::format_latency(*value));
    }
    let _ = writeln!(
        out,
        "Requests:      {} in {:.2}s ({} errors)",
        metrics.total_requests, metrics.duration_secs, metrics.errors
    );
    out
}

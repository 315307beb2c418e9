//! Report rendering: the markdown suite report, JSON artifacts, and the
//! colored terminal summary.
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::error::RunError;
use crate::model::{SuiteResult, TestOutcome, TestResult};
use crate::runner::TIMESTAMP_FORMAT;


/// Everything one suite run persisted, for the final console pointer.
#[derive(Debug)]
pub struct ReportPaths {
    pub markdown: PathBuf,
    pub suite_json: PathBuf,
    pub metrics_json: Vec<PathBuf>,
}

/// Writes the markdown report, the suite JSON, and one metrics JSON per
/// successful test into the suite's output directory.
///
/// # Errors
///
/// Returns an error when any report file cannot be written or the suite
/// cannot be serialized.
pub fn write_reports(suite: &SuiteResult) -> Result<ReportPaths, RunError> {
    let stamp = suite.started_at.format(TIMESTAMP_FORMAT).to_string();

    let markdown = suite.output_dir.join(format!("report_{stamp}.md"));
    persist(&markdown, &render_markdown(suite))?;

    let suite_json = suite.output_dir.join(format!("suite_{stamp}.json"));
    let serialized =
        serde_json::to_string_pretty(suite).map_err(|source| RunError::WriteArtifact {
            path: suite_json.clone(),
            source: source.into(),
        })?;
    persist(&suite_json, &serialized)?;

    let mut metrics_json = Vec::new();
    for result in &suite.results {
        if let TestOutcome::Success { metrics } = &result.outcome {
            let path = suite
                .output_dir
                .join(format!("wrk_{}_{}.json", result.name, result.timestamp));
            let serialized =
                serde_json::to_string_pretty(metrics).map_err(|source| RunError::WriteArtifact {
                    path: path.clone(),
                    source: source.into(),
                })?;
            persist(&path, &serialized)?;
            metrics_json.push(path);
        }
    }

    Ok(ReportPaths {
        markdown,
        suite_json,
        metrics_json,
    })
}

fn persist(path: &Path, content: &str) -> Result<(), RunError> {
    std::fs::write(path, content).map_err(|source| RunError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders the human-readable suite report.
#[must_use]
pub fn render_markdown(suite: &SuiteResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Benchmark Report\n");
    let _ = writeln!(
        out,
        "Started: {}\n",
        suite.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let _ = writeln!(out, "## Configuration\n");
    let _ = writeln!(out, "| Setting | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Duration | {}s |", suite.settings.duration);
    let _ = writeln!(out, "| Connections | {} |", suite.settings.connections);
    let _ = writeln!(out, "| Threads | {} |", suite.settings.threads);
    let _ = writeln!(out, "| Warmup | {}s |", suite.settings.warmup);
    if let Some(script) = suite.settings.script.as_deref() {
        let _ = writeln!(out, "| Script | {} |", script.display());
    }
    let _ = writeln!(out);

    let passed = suite
        .results
        .iter()
        .filter(|result| result.outcome.is_success())
        .count();
    let _ = writeln!(
        out,
        "## Results ({passed}/{} passed)\n",
        suite.results.len()
    );

    for result in &suite.results {
        render_test(&mut out, result);
    }
    out
}

fn render_test(out: &mut String, result: &TestResult) {
    match &result.outcome {
        TestOutcome::Success { metrics } => {
            let _ = writeln!(out, "### {} — PASS\n", result.name);
            let _ = writeln!(out, "- URL: `{}`", result.url);
            let _ = writeln!(
                out,
                "- Requests/sec: {:.2}",
                metrics.requests_per_sec
            );
            let _ = writeln!(
                out,
                "- Transfer/sec: {}",
                format_bytes(metrics.transfer_per_sec)
            );
            if let Some(latency) = metrics.latency {
                let _ = writeln!(
                    out,
                    "- Latency: mean {}, max {}",
                    format_latency(latency.mean),
                    format_latency(latency.max)
                );
            }
            for (label, value) in &metrics.percentiles {
                let _ = writeln!(out, "- Latency {}: {}", label, format_latency(*value));
            }
            let _ = writeln!(
                out,
                "- Requests: {} in {:.2}s ({} errors)",
                metrics.total_requests, metrics.duration_secs, metrics.errors
            );
        }
        TestOutcome::Failed { kind, message } => {
            let _ = writeln!(out, "### {} — FAIL ({kind})\n", result.name);
            let _ = writeln!(out, "- URL: `{}`", result.url);
            let _ = writeln!(out, "- Error: {message}");
        }
    }
    // Raw generator output is embedded when the artifact is still readable.
    if let Some(raw) = result
        .artifact
        .as_deref()
        .and_then(|path| std::fs::read_to_string(path).ok())
    {
        let _ = writeln!(out, "\n<details><summary>Raw output</summary>\n");
        let _ = writeln!(out, "```\n{}\n```", raw.trim_end());
        let _ = writeln!(out, "\n</details>");
    }
    let _ = writeln!(out);
}

/// Prints the per-test pass/fail summary to the terminal.
pub fn print_summary(suite: &SuiteResult) {
    println!();
    for result in &suite.results {
        match &result.outcome {
            TestOutcome::Success { metrics } => {
                println!(
                    "  {} {:<24} {:>12.2} req/s  {:>12}/s",
                    "PASS".green().bold(),
                    result.name,
                    metrics.requests_per_sec,
                    format_bytes(metrics.transfer_per_sec)
                );
            }
            TestOutcome::Failed { kind, message } => {
                println!(
                    "  {} {:<24} {}: {}",
                    "FAIL".red().bold(),
                    result.name,
                    kind,
                    message
                );
            }
        }
    }
    let failed = suite.failed().count();
    let total = suite.results.len();
    println!();
    if failed == 0 {
        println!("  {}", format!("{total}/{total} tests passed").green());
    } else {
        println!(
            "  {}",
            format!("{}/{total} tests passed, {failed} failed", total - failed).red()
        );
    }
}

/// Formats a byte quantity with the binary ladder wrk reports in.
#[must_use]
pub fn format_bytes(bytes: f64) -> String {
    const LADDER: [(f64, &str); 4] = [
        (1024.0 * 1024.0 * 1024.0 * 1024.0, "TB"),
        (1024.0 * 1024.0 * 1024.0, "GB"),
        (1024.0 * 1024.0, "MB"),
        (1024.0, "KB"),
    ];
    for (scale, unit) in LADDER {
        if bytes >= scale {
            return format!("{:.2}{unit}", bytes / scale);
        }
    }
    format!("{bytes:.0}B")
}

/// Formats a latency in seconds with an adaptive unit.
#[must_use]
pub fn format_latency(secs: f64) -> String {
    if secs < 0.001 {
        format!("{:.0}us", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else {
        format!("{secs:.2}s")
    }
}

//! Parser for the load generator's text report.
//!
//! The report grammar is known but loose: a thread-stats block, an optional
//! latency distribution, a totals line, and the authoritative
//! `Requests/sec:` / `Transfer/sec:` summary lines. Each metric has an
//! independent matcher; a field that fails to match is absent, not fatal.
//! The parse as a whole fails only for empty input, a report with no
//! recognizable throughput line, or a negative/non-finite value.
mod units;

#[cfg(test)]
mod tests;

use crate::error::ParseError;
use crate::model::{LatencyStats, WrkMetrics};

use units::{parse_latency_secs, parse_magnitude};

/// Tolerated relative mismatch between `requests_per_sec * duration` and
/// the reported request total before a warning is logged.
const CONSISTENCY_TOLERANCE: f64 = 0.25;

/// Parses one raw generator report into structured metrics.
///
/// # Errors
///
/// Returns [`ParseError::EmptyInput`] for blank input,
/// [`ParseError::MissingThroughput`] when neither summary throughput line is
/// present, and [`ParseError::InvalidValue`] when a matched line carries a
/// negative or non-finite number.
pub fn parse(raw: &str) -> Result<WrkMetrics, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut metrics = WrkMetrics::default();
    let mut saw_throughput = false;

    for line in raw.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("Requests/sec:") {
            metrics.requests_per_sec = parse_rate(rest, trimmed)?;
            saw_throughput = true;
        } else if let Some(rest) = trimmed.strip_prefix("Transfer/sec:") {
            metrics.transfer_per_sec =
                parse_magnitude(rest.trim()).ok_or_else(|| ParseError::InvalidValue {
                    line: trimmed.to_owned(),
                })?;
            saw_throughput = true;
        } else if trimmed.starts_with("Req/Sec") {
            // Per-thread stats overlap the summary figures; the summary
            // lines stay authoritative.
            tracing::debug!(line = trimmed, "Skipping informational per-thread stats");
        } else if trimmed.starts_with("Latency") && !trimmed.starts_with("Latency Distribution") {
            metrics.latency = parse_latency_stats(trimmed);
        } else if trimmed.contains(" requests in ") {
            parse_totals(trimmed, &mut metrics);
        } else if let Some(rest) = trimmed.strip_prefix("Socket errors:") {
            metrics.errors = metrics.errors.saturating_add(sum_error_counts(rest));
        } else if let Some(rest) = trimmed.strip_prefix("Non-2xx or 3xx responses:") {
            let count = rest.trim().parse::<u64>().unwrap_or(0);
            metrics.errors = metrics.errors.saturating_add(count);
        } else if let Some((label, value)) = parse_percentile_row(trimmed) {
            metrics.percentiles.insert(label, value);
        }
    }

    if !saw_throughput {
        return Err(ParseError::MissingThroughput);
    }

    check_consistency(&metrics);
    Ok(metrics)
}

fn parse_rate(rest: &str, line: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidValue {
        line: line.to_owned(),
    };
    let value: f64 = rest.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Thread-stats row: `Latency  1.91ms  2.30ms  45.00ms  87.50%`.
fn parse_latency_stats(line: &str) -> Option<LatencyStats> {
    let mut tokens = line.split_whitespace().skip(1);
    let mean = parse_latency_secs(tokens.next()?)?;
    let stdev = parse_latency_secs(tokens.next()?)?;
    let max = parse_latency_secs(tokens.next()?)?;
    let stdev_pct = tokens.next()?.strip_suffix('%')?.parse().ok()?;
    Some(LatencyStats {
        mean,
        stdev,
        max,
        stdev_pct,
    })
}

/// Totals line: `1081563 requests in 30.05s, 165.77MB read`.
fn parse_totals(line: &str, metrics: &mut WrkMetrics) {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(position) = tokens.iter().position(|token| *token == "requests") else {
        return;
    };
    if let Some(total) = position
        .checked_sub(1)
        .and_then(|index| tokens.get(index))
        .and_then(|token| parse_magnitude(token))
    {
        metrics.total_requests = total as u64;
    }
    if let Some(duration) = tokens
        .get(position.saturating_add(2))
        .map(|token| token.trim_end_matches(','))
        .and_then(parse_latency_secs)
    {
        metrics.duration_secs = duration;
    }
    if let Some(bytes) = tokens
        .get(position.saturating_add(3))
        .and_then(|token| parse_magnitude(token))
    {
        metrics.total_bytes = bytes as u64;
    }
}

/// Error summary: `connect 0, read 12, write 0, timeout 3`.
fn sum_error_counts(rest: &str) -> u64 {
    rest.split(',')
        .filter_map(|segment| segment.split_whitespace().last())
        .filter_map(|token| token.parse::<u64>().ok())
        .fold(0u64, u64::saturating_add)
}

/// Distribution row: `50%  1.20ms` becomes `("p50", 0.0012)`.
fn parse_percentile_row(line: &str) -> Option<(String, f64)> {
    let mut tokens = line.split_whitespace();
    let label = tokens.next()?.strip_suffix('%')?;
    label.parse::<f64>().ok()?;
    let value = parse_latency_secs(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }
    Some((format!("p{}", label), value))
}

fn check_consistency(metrics: &WrkMetrics) {
    if metrics.requests_per_sec <= 0.0
        || metrics.duration_secs <= 0.0
        || metrics.total_requests == 0
    {
        return;
    }
    let expected = metrics.requests_per_sec * metrics.duration_secs;
    let observed = metrics.total_requests as f64;
    let drift = (expected - observed).abs() / observed;
    if drift > CONSISTENCY_TOLERANCE {
        tracing::warn!(
            expected,
            observed,
            "Throughput summary does not match the reported request total"
        );
    }
}

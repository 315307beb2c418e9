use super::parse;
use crate::error::ParseError;

const FULL_REPORT: &str = "\
Running 30s test @ http://localhost:8080/api
  8 threads and 1000 connections
  Thread Stats   Avg      Stdev     Max   +/- Stdev
    Latency     1.91ms    2.30ms  45.00ms   87.50%
    Req/Sec     4.50k   456.78     5.20k    78.00%
  Latency Distribution
     50%    1.20ms
     75%    2.10ms
     90%    3.80ms
     99%   18.10ms
  1081563 requests in 30.05s, 165.77MB read
  Socket errors: connect 0, read 12, write 0, timeout 3
  Non-2xx or 3xx responses: 42
Requests/sec:  35990.66
Transfer/sec:      5.52MB
";

fn close(left: f64, right: f64) -> bool {
    let scale = right.abs().max(1.0);
    (left - right).abs() / scale < 1e-3
}

#[test]
fn parses_full_report() -> Result<(), String> {
    let metrics = parse(FULL_REPORT).map_err(|err| err.to_string())?;

    if !close(metrics.requests_per_sec, 35_990.66) {
        return Err(format!("Unexpected rps: {}", metrics.requests_per_sec));
    }
    if !close(metrics.transfer_per_sec, 5.52 * 1024.0 * 1024.0) {
        return Err(format!(
            "Unexpected transfer: {}",
            metrics.transfer_per_sec
        ));
    }
    if metrics.total_requests != 1_081_563 {
        return Err(format!("Unexpected total: {}", metrics.total_requests));
    }
    if !close(metrics.duration_secs, 30.05) {
        return Err(format!("Unexpected duration: {}", metrics.duration_secs));
    }
    if metrics.total_bytes != (165.77f64 * 1024.0 * 1024.0) as u64 {
        return Err(format!("Unexpected bytes: {}", metrics.total_bytes));
    }
    if metrics.errors != 15 + 42 {
        return Err(format!("Unexpected errors: {}", metrics.errors));
    }

    let latency = metrics.latency.ok_or("Missing latency stats")?;
    if !close(latency.mean, 0.001_91) {
        return Err(format!("Unexpected mean latency: {}", latency.mean));
    }
    if !close(latency.max, 0.045) {
        return Err(format!("Unexpected max latency: {}", latency.max));
    }
    if !close(latency.stdev_pct, 87.5) {
        return Err(format!("Unexpected stdev pct: {}", latency.stdev_pct));
    }

    let p50 = metrics.percentiles.get("p50").ok_or("Missing p50")?;
    if !close(*p50, 0.001_2) {
        return Err(format!("Unexpected p50: {}", p50));
    }
    let p99 = metrics.percentiles.get("p99").ok_or("Missing p99")?;
    if !close(*p99, 0.018_1) {
        return Err(format!("Unexpected p99: {}", p99));
    }
    Ok(())
}

#[test]
fn summary_lines_alone_are_sufficient() -> Result<(), String> {
    let metrics = parse("Requests/sec:   1234.56\nTransfer/sec:    193.45KB\n")
        .map_err(|err| err.to_string())?;
    if !close(metrics.requests_per_sec, 1234.56) {
        return Err(format!("Unexpected rps: {}", metrics.requests_per_sec));
    }
    if !close(metrics.transfer_per_sec, 198_092.8) {
        return Err(format!(
            "Unexpected transfer: {}",
            metrics.transfer_per_sec
        ));
    }
    if metrics.latency.is_some() {
        return Err("Latency should be absent".to_owned());
    }
    if !metrics.percentiles.is_empty() {
        return Err("Percentiles should be absent".to_owned());
    }
    Ok(())
}

#[test]
fn magnitude_suffixes_normalize_consistently() -> Result<(), String> {
    let kilobytes = parse("Transfer/sec: 193.45KB\n").map_err(|err| err.to_string())?;
    let megabytes = parse("Transfer/sec: 0.1893MB\n").map_err(|err| err.to_string())?;
    if !close(kilobytes.transfer_per_sec, megabytes.transfer_per_sec) {
        return Err(format!(
            "Suffix normalization diverged: {} vs {}",
            kilobytes.transfer_per_sec, megabytes.transfer_per_sec
        ));
    }
    Ok(())
}

#[test]
fn per_thread_stats_do_not_override_summary() -> Result<(), String> {
    let report = "\
    Req/Sec     99.99k   1.00k   120.00k    70.00%
Requests/sec:  1000.00
";
    let metrics = parse(report).map_err(|err| err.to_string())?;
    if !close(metrics.requests_per_sec, 1000.0) {
        return Err(format!(
            "Summary line must be authoritative, got {}",
            metrics.requests_per_sec
        ));
    }
    Ok(())
}

#[test]
fn empty_input_is_an_error() -> Result<(), String> {
    match parse("   \n  \n") {
        Err(ParseError::EmptyInput) => Ok(()),
        Err(other) => Err(format!("Unexpected error: {}", other)),
        Ok(_) => Err("Empty input must not parse".to_owned()),
    }
}

#[test]
fn missing_throughput_is_an_error() -> Result<(), String> {
    let report = "wrk: unable to connect to localhost:9999: Connection refused\n";
    match parse(report) {
        Err(ParseError::MissingThroughput) => Ok(()),
        Err(other) => Err(format!("Unexpected error: {}", other)),
        Ok(_) => Err("Report without throughput must not parse".to_owned()),
    }
}

#[test]
fn negative_rate_is_an_error() -> Result<(), String> {
    match parse("Requests/sec: -12.5\n") {
        Err(ParseError::InvalidValue { line }) => {
            if line.contains("-12.5") {
                Ok(())
            } else {
                Err(format!("Error should carry the offending line: {}", line))
            }
        }
        Err(other) => Err(format!("Unexpected error: {}", other)),
        Ok(_) => Err("Negative rate must not parse".to_owned()),
    }
}

#[test]
fn missing_percentiles_are_optional() -> Result<(), String> {
    let report = "\
  2 threads and 10 connections
  1000 requests in 1.00s, 0.98MB read
Requests/sec:  1000.00
Transfer/sec:      0.98MB
";
    let metrics = parse(report).map_err(|err| err.to_string())?;
    if !metrics.percentiles.is_empty() {
        return Err("Expected no percentiles".to_owned());
    }
    if metrics.total_requests != 1000 {
        return Err(format!("Unexpected total: {}", metrics.total_requests));
    }
    Ok(())
}

#[test]
fn microsecond_latency_normalizes_to_seconds() -> Result<(), String> {
    let report = "\
    Latency   250.00us   50.00us    1.20ms   90.00%
Requests/sec:  50000.00
";
    let metrics = parse(report).map_err(|err| err.to_string())?;
    let latency = metrics.latency.ok_or("Missing latency stats")?;
    if !close(latency.mean, 0.000_25) {
        return Err(format!("Unexpected mean: {}", latency.mean));
    }
    if !close(latency.max, 0.001_2) {
        return Err(format!("Unexpected max: {}", latency.max));
    }
    Ok(())
}

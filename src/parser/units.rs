/// Splits a token like `45.00ms` into its numeric prefix and suffix.
fn split_numeric(token: &str) -> Option<(f64, &str)> {
    let token = token.trim();
    let mut digits_len = 0usize;
    for ch in token.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            digits_len = digits_len.saturating_add(ch.len_utf8());
        } else {
            break;
        }
    }
    if digits_len == 0 {
        return None;
    }
    let (num_part, suffix) = token.split_at(digits_len);
    let value: f64 = num_part.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value, suffix))
}

/// Parses a latency token (`250us`, `1.91ms`, `2.05s`, `1.20m`) into
/// seconds. Bare numbers are treated as seconds.
pub(crate) fn parse_latency_secs(token: &str) -> Option<f64> {
    let (value, suffix) = split_numeric(token)?;
    let scale = match suffix {
        "us" | "\u{b5}s" => 1e-6,
        "ms" => 1e-3,
        "" | "s" => 1.0,
        "m" => 60.0,
        "h" => 3600.0,
        _ => return None,
    };
    Some(value * scale)
}

/// Parses a count or byte token with an optional magnitude suffix
/// (`4.50k`, `165.77MB`, `1.2G`) into a base value. Magnitudes are binary,
/// matching how wrk formats them.
pub(crate) fn parse_magnitude(token: &str) -> Option<f64> {
    let (value, suffix) = split_numeric(token)?;
    let mut suffix = suffix.trim().to_ascii_uppercase();
    if suffix.len() > 1 && suffix.ends_with('B') {
        suffix.pop();
    }
    let scale = match suffix.as_str() {
        "" | "B" => 1.0,
        "K" => 1024.0,
        "M" => 1024.0 * 1024.0,
        "G" => 1024.0 * 1024.0 * 1024.0,
        "T" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };
    Some(value * scale)
}

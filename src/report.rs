//! Text rendering of the aggregate results and writing them to disk.

use std::path::Path;

use crate::error::{ReportError, Result};
use crate::stats::CountyDelta;

/// Header of the most-valuable report. The column name is kept as the
/// downstream consumers expect it.
pub const TOP_COUNTIES_HEADER: &str = "country,value";

pub fn format_count(count: usize) -> String {
    count.to_string()
}

/// Render a double with the shortest round-trip digits.
///
/// Magnitudes in `[1e-3, 1e7)` print as plain decimals with at least one
/// fractional digit (`390.0`); anything else uses scientific notation with
/// an uppercase `E` (`1.2345678E8`, `1.0E-5`).
pub fn format_total(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    if (1e-3..1e7).contains(&value.abs()) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let scientific = format!("{value:E}");
        match scientific.split_once('E') {
            Some((mantissa, exponent)) if !mantissa.contains('.') => {
                format!("{mantissa}.0E{exponent}")
            }
            _ => scientific,
        }
    }
}

/// Fixed-point rendering with `places` decimals, rounding half-up on the
/// shortest decimal representation of `value` (so `1.005` gives `1.01`).
pub fn format_fixed(value: f64, places: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let shortest = value.abs().to_string();
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    let mut digits: Vec<u8> = int_part.bytes().collect();
    let frac = frac_part.as_bytes();
    digits.extend((0..places).map(|i| frac.get(i).copied().unwrap_or(b'0')));

    if frac.get(places).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|&d| d as char));
    if places > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|&d| d as char));
    }
    out
}

/// Header line plus one `county,delta` line per entry, all `\n`-terminated.
pub fn format_top_counties(top: &[CountyDelta]) -> String {
    let mut out = String::with_capacity(TOP_COUNTIES_HEADER.len() + 1 + top.len() * 32);
    out.push_str(TOP_COUNTIES_HEADER);
    out.push('\n');
    for entry in top {
        out.push_str(&entry.county);
        out.push(',');
        out.push_str(&format_fixed(entry.delta, 2));
        out.push('\n');
    }
    out
}

/// Create or truncate `path` and write `contents` to it.
pub async fn write_report(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote report");
    Ok(())
}

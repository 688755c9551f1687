use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60_000_000_000.0),
];

/// Parse pacing strings like "1s", "250ms", "0.5s" or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if let Ok(secs) = s.parse::<f64>() {
        return to_duration(secs * 1_000_000_000.0, s);
    }

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            return to_duration(val * multiplier, s);
        }
    }

    bail!("Unknown duration format: {}", s)
}

fn to_duration(nanos: f64, original: &str) -> Result<Duration> {
    if !nanos.is_finite() || nanos < 0.0 {
        bail!("Duration must be non-negative: {}", original);
    }
    Ok(Duration::from_nanos(nanos as u64))
}

/// Format an elapsed time for the status bar ("0.4s", "12s", "3m05s").
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 10 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}

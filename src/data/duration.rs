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
    ("h", 3_600_000_000_000.0),
];

/// Parse duration strings like "500ms", "2s", "1m"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.parse()?;
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Format a duration for display
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        "0ns".to_string()
    } else if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}µs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

/// Format an uptime duration in coarse, human units ("2d 4h", "3h 12m").
///
/// Anything under a minute reads as "just now".
pub fn format_uptime(d: Duration) -> String {
    let total_minutes = d.as_secs() / 60;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("2s").unwrap();
        assert_eq!(d.as_secs(), 2);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let d = parse_duration("1.5s").unwrap();
        assert!((d.as_secs_f64() - 1.5).abs() < 0.0001);
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("500ms").unwrap();
        assert_eq!(d.as_millis(), 500);
    }

    #[test]
    fn test_parse_minutes() {
        let d = parse_duration("1m").unwrap();
        assert_eq!(d.as_secs(), 60);
    }

    #[test]
    fn test_parse_hours() {
        let d = parse_duration("2h").unwrap();
        assert_eq!(d.as_secs(), 7200);
    }

    #[test]
    fn test_parse_unknown_suffix() {
        assert!(parse_duration("3 fortnights").is_err());
    }

    #[test]
    fn test_format_latency_ms() {
        assert_eq!(format_duration(Duration::from_millis(120)), "120.00ms");
    }

    #[test]
    fn test_format_uptime_days() {
        let d = Duration::from_secs(2 * 24 * 3600 + 4 * 3600 + 30 * 60);
        assert_eq!(format_uptime(d), "2d 4h");
    }

    #[test]
    fn test_format_uptime_hours() {
        let d = Duration::from_secs(3 * 3600 + 12 * 60);
        assert_eq!(format_uptime(d), "3h 12m");
    }

    #[test]
    fn test_format_uptime_just_now() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "just now");
    }
}

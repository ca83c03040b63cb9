//! Latency sample parsing.
//!
//! Converts serialized history entries into samples with a parsed
//! timestamp. Parsing is deliberately lenient: a timestamp that cannot be
//! parsed keeps the sample (the raw string is retained) and the chart layer
//! renders a placeholder label for it instead of failing the whole render.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::source::SerializedSample;

/// One `(timestamp, latency)` observation, ready for display.
///
/// The renderer only reads samples; it never mutates or stores them.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySample {
    /// Parsed observation time; `None` when the raw string was malformed.
    pub timestamp: Option<DateTime<Utc>>,
    /// The raw timestamp string as received, kept for display and export.
    pub raw_timestamp: String,
    /// Observed latency in milliseconds, taken verbatim from the producer.
    pub latency_ms: f64,
}

impl LatencySample {
    /// Build a sample with a known-good timestamp.
    pub fn new(timestamp: DateTime<Utc>, latency_ms: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            raw_timestamp: timestamp.to_rfc3339(),
            latency_ms,
        }
    }

    /// Parse a serialized history entry.
    pub fn from_serialized(raw: &SerializedSample) -> Self {
        Self {
            timestamp: parse_timestamp(&raw.timestamp),
            raw_timestamp: raw.timestamp.clone(),
            latency_ms: raw.latency_ms,
        }
    }
}

/// Parse a producer timestamp.
///
/// Accepts RFC 3339 (what the collector writes) and the naive
/// `YYYY-MM-DD HH:MM:SS` form some storage backends emit; naive times are
/// taken as UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2024-05-01T10:30:00Z").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        // 10:30 at +07:00 is 03:30 UTC
        let ts = parse_timestamp("2024-05-01T10:30:00+07:00").unwrap();
        assert_eq!(ts.hour(), 3);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_naive() {
        let ts = parse_timestamp("2024-05-01 10:30:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_malformed_is_none() {
        assert!(parse_timestamp("yesterday-ish").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_from_serialized_keeps_malformed_sample() {
        let raw = SerializedSample {
            url: "https://example.com".into(),
            latency_ms: 42.0,
            timestamp: "not a date".into(),
        };
        let sample = LatencySample::from_serialized(&raw);
        assert!(sample.timestamp.is_none());
        assert_eq!(sample.raw_timestamp, "not a date");
        assert_eq!(sample.latency_ms, 42.0);
    }
}

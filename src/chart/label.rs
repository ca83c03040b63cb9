//! Timestamp-to-label formatting.
//!
//! Axis labels use the Indonesian short clock style the original dashboard
//! shipped with: a 24-hour clock with `.` separating the components
//! ("14.05", or "14.05.30" with seconds). Formatting sits behind a small
//! trait so tests can inject a fixed UTC offset instead of relying on the
//! host timezone.

use chrono::{FixedOffset, Local, Offset, TimeZone, Utc};

use crate::data::LatencySample;

/// Label shown for a sample whose timestamp could not be parsed.
///
/// A malformed timestamp never aborts a render; the point stays on the
/// chart with this placeholder instead.
pub const PLACEHOLDER_LABEL: &str = "--.--";

/// Formats a sample's timestamp into a short axis label.
pub trait LabelFormatter {
    fn label(&self, sample: &LatencySample) -> String;
}

/// Short localized clock label ("HH.MM" or "HH.MM.SS").
#[derive(Debug, Clone)]
pub struct ClockLabel {
    with_seconds: bool,
    offset: FixedOffset,
}

impl ClockLabel {
    /// Create a formatter using the host's local UTC offset.
    pub fn new(with_seconds: bool) -> Self {
        Self {
            with_seconds,
            offset: Local::now().offset().fix(),
        }
    }

    /// Create a formatter with an explicit UTC offset (deterministic tests,
    /// or pinning the display to the monitored system's timezone).
    pub fn with_offset(with_seconds: bool, offset: FixedOffset) -> Self {
        Self {
            with_seconds,
            offset,
        }
    }
}

impl LabelFormatter for ClockLabel {
    fn label(&self, sample: &LatencySample) -> String {
        let Some(ts) = sample.timestamp else {
            return PLACEHOLDER_LABEL.to_string();
        };

        let local = self.offset.from_utc_datetime(&ts.naive_utc());
        if self.with_seconds {
            local.format("%H.%M.%S").to_string()
        } else {
            local.format("%H.%M").to_string()
        }
    }
}

/// A formatter pinned to UTC, used by tests and headless exports.
pub fn utc_clock(with_seconds: bool) -> ClockLabel {
    ClockLabel::with_offset(with_seconds, Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn sample_at(raw: &str) -> LatencySample {
        LatencySample::new(raw.parse::<DateTime<Utc>>().unwrap(), 1.0)
    }

    #[test]
    fn test_clock_label_minutes() {
        let formatter = utc_clock(false);
        assert_eq!(formatter.label(&sample_at("2024-05-01T14:05:30Z")), "14.05");
    }

    #[test]
    fn test_clock_label_seconds() {
        let formatter = utc_clock(true);
        assert_eq!(
            formatter.label(&sample_at("2024-05-01T14:05:30Z")),
            "14.05.30"
        );
    }

    #[test]
    fn test_clock_label_applies_offset() {
        // 03:30 UTC is 10:30 at +07:00 (western Indonesia)
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let formatter = ClockLabel::with_offset(false, offset);
        assert_eq!(formatter.label(&sample_at("2024-05-01T03:30:00Z")), "10.30");
    }

    #[test]
    fn test_malformed_timestamp_gets_placeholder() {
        let formatter = utc_clock(false);
        let sample = LatencySample {
            timestamp: None,
            raw_timestamp: "garbage".into(),
            latency_ms: 9.0,
        };
        assert_eq!(formatter.label(&sample), PLACEHOLDER_LABEL);
    }
}

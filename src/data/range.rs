//! Chart time windows.

use chrono::{DateTime, Duration, Utc};

/// The time window applied to the dashboard chart.
///
/// Samples older than the window's cutoff are excluded from the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    LastHour,
    Last4Hours,
    LastDay,
    LastWeek,
    LastMonth,
    /// No cutoff; every available sample is charted.
    #[default]
    All,
}

impl TimeRange {
    /// Cycle to the next range.
    pub fn next(self) -> Self {
        match self {
            TimeRange::LastHour => TimeRange::Last4Hours,
            TimeRange::Last4Hours => TimeRange::LastDay,
            TimeRange::LastDay => TimeRange::LastWeek,
            TimeRange::LastWeek => TimeRange::LastMonth,
            TimeRange::LastMonth => TimeRange::All,
            TimeRange::All => TimeRange::LastHour,
        }
    }

    /// Returns the display label for this range.
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::LastHour => "1h",
            TimeRange::Last4Hours => "4h",
            TimeRange::LastDay => "1d",
            TimeRange::LastWeek => "1w",
            TimeRange::LastMonth => "1m",
            TimeRange::All => "all",
        }
    }

    /// Parse a range label as given on the command line.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "1h" => Some(TimeRange::LastHour),
            "4h" => Some(TimeRange::Last4Hours),
            "1d" => Some(TimeRange::LastDay),
            "1w" => Some(TimeRange::LastWeek),
            "1m" => Some(TimeRange::LastMonth),
            "all" => Some(TimeRange::All),
            _ => None,
        }
    }

    /// The earliest timestamp included in this window, or `None` for All.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let span = match self {
            TimeRange::LastHour => Duration::hours(1),
            TimeRange::Last4Hours => Duration::hours(4),
            TimeRange::LastDay => Duration::days(1),
            TimeRange::LastWeek => Duration::weeks(1),
            TimeRange::LastMonth => Duration::days(30),
            TimeRange::All => return None,
        };
        Some(now - span)
    }
}

//! Chart series shaping.
//!
//! Transforms latency samples into the label/value pairs handed to the
//! drawing layer. Shaping is a pure computation: built fresh on every
//! render call, never cached, and side-effect free.

use ratatui::style::Color;

use super::label::LabelFormatter;
use super::style::SortPolicy;
use crate::data::LatencySample;

/// An ordered label/value series derived from latency samples.
///
/// Invariant: `labels.len() == values.len() == input.len()`. Built per
/// render call and discarded after the draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Clock labels, one per sample, in display order.
    pub labels: Vec<String>,
    /// Latency values in ms, index-aligned with `labels`.
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Shape samples into a series under the given ordering policy.
    ///
    /// Returns `None` for empty input: the no-data guard, not an error.
    /// Latency values are taken verbatim except that non-finite values are
    /// coerced to 0.0 so axis bounds stay meaningful.
    pub fn build(
        samples: &[LatencySample],
        policy: SortPolicy,
        formatter: &dyn LabelFormatter,
    ) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let ordered: Vec<&LatencySample> = match policy {
            SortPolicy::TimeAscending => {
                let mut sorted: Vec<&LatencySample> = samples.iter().collect();
                // Stable sort: unparseable timestamps (None) sort first and
                // keep their relative input order.
                sorted.sort_by_key(|s| s.timestamp);
                sorted
            }
            SortPolicy::ReverseInput => samples.iter().rev().collect(),
        };

        let labels = ordered.iter().map(|s| formatter.label(s)).collect();
        let values = ordered
            .iter()
            .map(|s| {
                if s.latency_ms.is_finite() {
                    s.latency_ms
                } else {
                    0.0
                }
            })
            .collect();

        Some(Self { labels, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Series as (index, value) points for the drawing layer.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect()
    }

    /// Min and max of the values.
    pub fn value_bounds(&self) -> (f64, f64) {
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    }
}

/// Color for the segment ending at `index`.
///
/// A segment is "up" (non-decreasing latency) when `values[index] >=
/// values[index - 1]`. The first segment has no predecessor and is always
/// the up color. Pure and index-bounded: out-of-range indices fall back to
/// the up color.
pub fn segment_color(values: &[f64], index: usize, up: Color, down: Color) -> Color {
    if index == 0 || index >= values.len() {
        return up;
    }
    if values[index] >= values[index - 1] {
        up
    } else {
        down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::label::utc_clock;
    use chrono::{DateTime, Utc};

    fn sample(raw_ts: &str, latency_ms: f64) -> LatencySample {
        match raw_ts.parse::<DateTime<Utc>>() {
            Ok(ts) => LatencySample::new(ts, latency_ms),
            Err(_) => LatencySample {
                timestamp: None,
                raw_timestamp: raw_ts.to_string(),
                latency_ms,
            },
        }
    }

    const UP: Color = Color::Green;
    const DOWN: Color = Color::Red;

    #[test]
    fn test_empty_input_builds_nothing() {
        let formatter = utc_clock(false);
        assert_eq!(
            ChartSeries::build(&[], SortPolicy::TimeAscending, &formatter),
            None
        );
        assert_eq!(
            ChartSeries::build(&[], SortPolicy::ReverseInput, &formatter),
            None
        );
    }

    #[test]
    fn test_lengths_match_input() {
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:00:00Z", 50.0),
            sample("2024-05-01T10:01:00Z", 40.0),
            sample("not-a-date", 30.0),
        ];
        let series =
            ChartSeries::build(&samples, SortPolicy::TimeAscending, &formatter).unwrap();
        assert_eq!(series.labels.len(), 3);
        assert_eq!(series.values.len(), 3);
        assert_eq!(series.len(), samples.len());
    }

    #[test]
    fn test_ascending_scenario() {
        // Two samples: 10:00 at 50ms, 10:01 at 40ms (given newest-first)
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:01:00Z", 40.0),
            sample("2024-05-01T10:00:00Z", 50.0),
        ];
        let series =
            ChartSeries::build(&samples, SortPolicy::TimeAscending, &formatter).unwrap();

        assert_eq!(series.labels, vec!["10.00", "10.01"]);
        assert_eq!(series.values, vec![50.0, 40.0]);
        assert_eq!(segment_color(&series.values, 0, UP, DOWN), UP);
        // 40 < 50: the segment ending at index 1 is a decrease
        assert_eq!(segment_color(&series.values, 1, UP, DOWN), DOWN);
    }

    #[test]
    fn test_ascending_order_is_chronological() {
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:02:00Z", 1.0),
            sample("2024-05-01T10:00:00Z", 2.0),
            sample("2024-05-01T10:01:00Z", 3.0),
        ];
        let series =
            ChartSeries::build(&samples, SortPolicy::TimeAscending, &formatter).unwrap();
        assert_eq!(series.labels, vec!["10.00", "10.01", "10.02"]);

        let mut sorted_labels = series.labels.clone();
        sorted_labels.sort();
        assert_eq!(series.labels, sorted_labels);
    }

    #[test]
    fn test_reverse_input_is_exact_reversal() {
        // Newest-first producer order: 10:02, 10:01, 10:00
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:02:00Z", 30.0),
            sample("2024-05-01T10:01:00Z", 20.0),
            sample("2024-05-01T10:00:00Z", 10.0),
        ];
        let series = ChartSeries::build(&samples, SortPolicy::ReverseInput, &formatter).unwrap();
        assert_eq!(series.labels, vec!["10.00", "10.01", "10.02"]);
        assert_eq!(series.values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_reverse_input_does_not_sort() {
        // Input deliberately not time-ordered; reversal must not fix it.
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:00:00Z", 1.0),
            sample("2024-05-01T10:02:00Z", 2.0),
            sample("2024-05-01T10:01:00Z", 3.0),
        ];
        let series = ChartSeries::build(&samples, SortPolicy::ReverseInput, &formatter).unwrap();
        assert_eq!(series.labels, vec!["10.01", "10.02", "10.00"]);
    }

    #[test]
    fn test_malformed_timestamps_sort_first_and_stay_stable() {
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:00:00Z", 1.0),
            sample("bad-a", 2.0),
            sample("bad-b", 3.0),
        ];
        let series =
            ChartSeries::build(&samples, SortPolicy::TimeAscending, &formatter).unwrap();
        assert_eq!(series.labels[0], "--.--");
        assert_eq!(series.labels[1], "--.--");
        assert_eq!(series.values, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_non_finite_latency_coerced_to_zero() {
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:00:00Z", f64::NAN),
            sample("2024-05-01T10:01:00Z", f64::INFINITY),
            sample("2024-05-01T10:02:00Z", 5.0),
        ];
        let series =
            ChartSeries::build(&samples, SortPolicy::TimeAscending, &formatter).unwrap();
        assert_eq!(series.values, vec![0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_segment_color_rule() {
        let values = vec![50.0, 40.0, 40.0, 60.0];
        // Segment 0 has no predecessor: always up
        assert_eq!(segment_color(&values, 0, UP, DOWN), UP);
        // 40 < 50
        assert_eq!(segment_color(&values, 1, UP, DOWN), DOWN);
        // 40 == 40: non-decreasing counts as up
        assert_eq!(segment_color(&values, 2, UP, DOWN), UP);
        // 60 > 40
        assert_eq!(segment_color(&values, 3, UP, DOWN), UP);
        // Out of range falls back to up
        assert_eq!(segment_color(&values, 99, UP, DOWN), UP);
    }

    #[test]
    fn test_build_is_idempotent() {
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:01:00Z", 40.0),
            sample("2024-05-01T10:00:00Z", 50.0),
            sample("2024-05-01T10:02:00Z", 45.0),
        ];
        let a = ChartSeries::build(&samples, SortPolicy::TimeAscending, &formatter).unwrap();
        let b = ChartSeries::build(&samples, SortPolicy::TimeAscending, &formatter).unwrap();
        assert_eq!(a, b);

        let seg_a: Vec<Color> =
            (0..a.len()).map(|i| segment_color(&a.values, i, UP, DOWN)).collect();
        let seg_b: Vec<Color> =
            (0..b.len()).map(|i| segment_color(&b.values, i, UP, DOWN)).collect();
        assert_eq!(seg_a, seg_b);
    }

    #[test]
    fn test_points_and_bounds() {
        let formatter = utc_clock(false);
        let samples = vec![
            sample("2024-05-01T10:00:00Z", 10.0),
            sample("2024-05-01T10:01:00Z", 30.0),
        ];
        let series =
            ChartSeries::build(&samples, SortPolicy::TimeAscending, &formatter).unwrap();
        assert_eq!(series.points(), vec![(0.0, 10.0), (1.0, 30.0)]);
        assert_eq!(series.value_bounds(), (10.0, 30.0));
    }
}

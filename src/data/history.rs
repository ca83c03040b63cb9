//! Historical data tracking for sparklines and trend indicators.
//!
//! Records the latest latency reading for each target on every snapshot so
//! the Targets table can show a short trend sparkline even when a producer
//! only ships current stats.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use super::target::ProbeData;

/// Maximum number of historical readings to keep per target.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks recent latency readings per target.
#[derive(Debug, Clone)]
pub struct History {
    /// Latest observed latency per target URL, oldest first.
    pub target_latency: HashMap<String, VecDeque<f64>>,
    /// Timestamps of recorded snapshots.
    pub timestamps: VecDeque<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            target_latency: HashMap::new(),
            timestamps: VecDeque::new(),
        }
    }

    /// Record a new data snapshot
    pub fn record(&mut self, data: &ProbeData) {
        for target in &data.targets {
            let readings = self.target_latency.entry(target.url.clone()).or_default();
            readings.push_back(target.last_latency_ms);
            if readings.len() > MAX_HISTORY_SIZE {
                readings.pop_front();
            }
        }

        self.timestamps.push_back(data.last_updated);
        if self.timestamps.len() > MAX_HISTORY_SIZE {
            self.timestamps.pop_front();
        }
    }

    /// Get sparkline data for a target (normalized to 0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn latency_sparkline(&self, url: &str) -> Vec<u8> {
        normalize_sparkline(self.target_latency.get(url))
    }

    /// Change between the two most recent readings, in ms.
    ///
    /// Positive means latency got worse. Returns None with fewer than two
    /// readings.
    pub fn latency_delta(&self, url: &str) -> Option<f64> {
        let readings = self.target_latency.get(url)?;
        if readings.len() < 2 {
            return None;
        }
        let current = *readings.back()?;
        let previous = *readings.get(readings.len() - 2)?;
        Some(current - previous)
    }
}

/// Normalize gauge readings to the 0-7 range for sparkline display.
///
/// Latency is a gauge, so raw values are scaled against the window's
/// min/max rather than differenced like a counter would be.
fn normalize_sparkline(data: Option<&VecDeque<f64>>) -> Vec<u8> {
    let Some(values) = data else {
        return Vec::new();
    };

    if values.len() < 2 {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let range = (max - min).max(f64::EPSILON);

    values
        .iter()
        .map(|&v| {
            let normalized = ((v - min) / range * 7.0) as u8;
            normalized.min(7)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ProbeData, Thresholds};
    use crate::source::{ProbeSnapshot, SerializedTarget};

    fn data_with_latency(latency_ms: f64) -> ProbeData {
        let snapshot = ProbeSnapshot {
            targets: vec![SerializedTarget {
                url: "https://a.example".into(),
                last_status: 200,
                last_latency_ms: latency_ms,
                last_checked: None,
                is_up: true,
                first_up_time: None,
                total_probe_count: 1,
                total_latency_sum: latency_ms,
            }],
            history: Vec::new(),
        };
        ProbeData::from_snapshot(snapshot, &Thresholds::default())
    }

    #[test]
    fn test_record_and_sparkline() {
        let mut history = History::new();
        for latency in [10.0, 20.0, 30.0, 40.0] {
            history.record(&data_with_latency(latency));
        }

        let spark = history.latency_sparkline("https://a.example");
        assert_eq!(spark.len(), 4);
        assert_eq!(spark[0], 0);
        assert_eq!(spark[3], 7);
        // Monotonic input gives a monotonic sparkline
        assert!(spark.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sparkline_needs_two_readings() {
        let mut history = History::new();
        history.record(&data_with_latency(10.0));
        assert!(history.latency_sparkline("https://a.example").is_empty());
        assert!(history.latency_sparkline("https://unknown.example").is_empty());
    }

    #[test]
    fn test_latency_delta() {
        let mut history = History::new();
        history.record(&data_with_latency(100.0));
        history.record(&data_with_latency(140.0));
        assert_eq!(history.latency_delta("https://a.example"), Some(40.0));

        history.record(&data_with_latency(90.0));
        assert_eq!(history.latency_delta("https://a.example"), Some(-50.0));
    }

    #[test]
    fn test_history_is_capped() {
        let mut history = History::new();
        for i in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(&data_with_latency(i as f64));
        }
        assert_eq!(
            history.target_latency["https://a.example"].len(),
            MAX_HISTORY_SIZE
        );
        assert_eq!(history.timestamps.len(), MAX_HISTORY_SIZE);
    }
}

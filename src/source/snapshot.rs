//! Shared types for probe snapshots.
//!
//! These types match the JSON produced by the probe collector (and by the
//! original dashboard backend this tool grew out of). They serve as the
//! common data format between a snapshot producer and this viewer.

use serde::{Deserialize, Serialize};

/// A complete snapshot of probe state.
///
/// This is the top-level structure exchanged with every data source: the
/// current per-target statistics plus the recent latency history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeSnapshot {
    /// Current statistics for every monitored target.
    #[serde(default)]
    pub targets: Vec<SerializedTarget>,
    /// Recent latency observations, newest-first or oldest-first depending
    /// on the producer; the viewer does not assume an order.
    #[serde(default)]
    pub history: Vec<SerializedSample>,
}

impl ProbeSnapshot {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.history.is_empty()
    }
}

/// Running statistics for a single monitored target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedTarget {
    #[serde(rename = "URL")]
    pub url: String,

    /// HTTP status of the last probe; 0 means a network-level failure.
    #[serde(rename = "LastStatus", default)]
    pub last_status: u16,

    #[serde(rename = "LastLatencyMs", default)]
    pub last_latency_ms: f64,

    /// Timestamp of the last probe, RFC 3339.
    #[serde(rename = "LastChecked", default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,

    #[serde(rename = "IsUp", default)]
    pub is_up: bool,

    /// When the target most recently transitioned to up; cleared on a
    /// transition back to down.
    #[serde(rename = "FirstUpTime", default, skip_serializing_if = "Option::is_none")]
    pub first_up_time: Option<String>,

    #[serde(rename = "TotalProbeCount", default)]
    pub total_probe_count: u64,

    /// Sum of all observed latencies in ms, for average computation.
    #[serde(rename = "TotalLatencySum", default)]
    pub total_latency_sum: f64,
}

/// One historical latency observation for a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedSample {
    #[serde(rename = "URL", default)]
    pub url: String,

    #[serde(rename = "LatencyMs")]
    pub latency_ms: f64,

    /// Observation time as a string; parsed leniently by the data layer so
    /// a malformed value degrades to a placeholder label instead of an
    /// error.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "targets": [
                {
                    "URL": "https://example.com",
                    "LastStatus": 200,
                    "LastLatencyMs": 123.0,
                    "LastChecked": "2024-05-01T10:00:00Z",
                    "IsUp": true,
                    "FirstUpTime": "2024-04-30T08:00:00Z",
                    "TotalProbeCount": 40,
                    "TotalLatencySum": 4800.0
                }
            ],
            "history": [
                { "URL": "https://example.com", "LatencyMs": 120.0, "Timestamp": "2024-05-01T09:59:00Z" },
                { "URL": "https://example.com", "LatencyMs": 123.0, "Timestamp": "2024-05-01T10:00:00Z" }
            ]
        }"#;

        let snapshot: ProbeSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.targets.len(), 1);
        assert_eq!(snapshot.history.len(), 2);

        let target = &snapshot.targets[0];
        assert_eq!(target.url, "https://example.com");
        assert_eq!(target.last_status, 200);
        assert!(target.is_up);
        assert_eq!(target.total_probe_count, 40);

        let sample = &snapshot.history[0];
        assert_eq!(sample.latency_ms, 120.0);
        assert_eq!(sample.timestamp, "2024-05-01T09:59:00Z");
    }

    #[test]
    fn test_deserialize_minimal_sample() {
        // URL defaults to empty for single-target producers
        let json = r#"{ "history": [ { "LatencyMs": 50, "Timestamp": "bogus" } ] }"#;
        let snapshot: ProbeSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.targets.is_empty());
        assert_eq!(snapshot.history[0].url, "");
        assert_eq!(snapshot.history[0].latency_ms, 50.0);
    }

    #[test]
    fn test_roundtrip_target() {
        let target = SerializedTarget {
            url: "https://a.example".into(),
            last_status: 0,
            last_latency_ms: 5000.0,
            last_checked: None,
            is_up: false,
            first_up_time: None,
            total_probe_count: 3,
            total_latency_sum: 900.0,
        };
        let json = serde_json::to_string(&target).unwrap();
        // Absent optionals are skipped entirely
        assert!(!json.contains("FirstUpTime"));
        let back: SerializedTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(back.url, target.url);
        assert_eq!(back.total_probe_count, 3);
    }
}

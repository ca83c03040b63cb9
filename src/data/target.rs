//! Probe data parsing and health computation.
//!
//! This module transforms raw probe snapshots into processed data with
//! health status computed from configurable latency thresholds.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::sample::{parse_timestamp, LatencySample};
use crate::source::ProbeSnapshot;

/// Thresholds for health status computation.
///
/// These thresholds determine when a target is considered slow enough to
/// warrant attention. A target that is down is always critical regardless
/// of latency.
#[derive(Debug, Clone)]
pub struct Thresholds {
    /// Latency at which a target is flagged as degraded.
    pub latency_warning: Duration,
    /// Latency at which a target is flagged as critical.
    pub latency_critical: Duration,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            latency_warning: Duration::from_millis(500),
            latency_critical: Duration::from_secs(2),
        }
    }
}

/// Health status for a monitored target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "UP",
            HealthStatus::Warning => "SLOW",
            HealthStatus::Critical => "DOWN",
        }
    }
}

/// Parsed per-target statistics with computed health status.
#[derive(Debug, Clone)]
pub struct TargetData {
    pub url: String,
    /// HTTP status of the last probe; 0 means a network-level failure.
    pub last_status: u16,
    pub last_latency_ms: f64,
    pub last_checked: Option<DateTime<Utc>>,
    pub is_up: bool,
    /// When the target most recently came up; `None` while down.
    pub first_up_time: Option<DateTime<Utc>>,
    pub total_probe_count: u64,
    pub total_latency_sum: f64,
    pub health: HealthStatus,
}

impl TargetData {
    /// Average latency over the target's lifetime, in milliseconds.
    ///
    /// Returns `None` before the first probe completes.
    pub fn avg_latency_ms(&self) -> Option<f64> {
        if self.total_probe_count == 0 {
            return None;
        }
        Some(self.total_latency_sum / self.total_probe_count as f64)
    }

    /// How long the target has been continuously up, as of `now`.
    pub fn uptime(&self, now: DateTime<Utc>) -> Option<Duration> {
        let since = self.first_up_time?;
        (now - since).to_std().ok()
    }
}

/// Complete parsed probe data ready for display.
#[derive(Debug, Clone)]
pub struct ProbeData {
    /// Targets sorted worst health first, then by URL.
    pub targets: Vec<TargetData>,
    /// Latency history per target URL, in producer order.
    pub history: HashMap<String, Vec<LatencySample>>,
    pub last_updated: Instant,
}

impl ProbeData {
    /// Load and parse probe data from a JSON snapshot file.
    pub fn load(path: &Path, thresholds: &Thresholds) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, thresholds)
    }

    /// Parse probe data from a JSON string.
    pub fn parse(content: &str, thresholds: &Thresholds) -> Result<Self> {
        let snapshot: ProbeSnapshot = serde_json::from_str(content)?;
        Ok(Self::from_snapshot(snapshot, thresholds))
    }

    /// Convert a ProbeSnapshot into processed ProbeData.
    ///
    /// This is the primary conversion method used by all data sources.
    pub fn from_snapshot(snapshot: ProbeSnapshot, thresholds: &Thresholds) -> Self {
        let mut targets: Vec<TargetData> = snapshot
            .targets
            .into_iter()
            .map(|raw| {
                let health = compute_health(
                    raw.is_up,
                    Duration::from_secs_f64(raw.last_latency_ms.max(0.0) / 1000.0),
                    thresholds,
                );
                TargetData {
                    last_checked: raw.last_checked.as_deref().and_then(parse_timestamp),
                    first_up_time: raw.first_up_time.as_deref().and_then(parse_timestamp),
                    url: raw.url,
                    last_status: raw.last_status,
                    last_latency_ms: raw.last_latency_ms,
                    is_up: raw.is_up,
                    total_probe_count: raw.total_probe_count,
                    total_latency_sum: raw.total_latency_sum,
                    health,
                }
            })
            .collect();

        // Sort by health status (critical first), then by URL
        targets.sort_by(|a, b| b.health.cmp(&a.health).then_with(|| a.url.cmp(&b.url)));

        let mut history: HashMap<String, Vec<LatencySample>> = HashMap::new();
        for raw in &snapshot.history {
            history
                .entry(raw.url.clone())
                .or_default()
                .push(LatencySample::from_serialized(raw));
        }

        Self {
            targets,
            history,
            last_updated: Instant::now(),
        }
    }

    /// Latency history for one target, in producer order.
    pub fn samples_for(&self, url: &str) -> &[LatencySample] {
        self.history.get(url).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Average latency across all targets, weighted by probe count.
    pub fn global_avg_latency_ms(&self) -> Option<f64> {
        let total_sum: f64 = self.targets.iter().map(|t| t.total_latency_sum).sum();
        let total_count: u64 = self.targets.iter().map(|t| t.total_probe_count).sum();
        if total_count == 0 {
            return None;
        }
        Some(total_sum / total_count as f64)
    }

    /// Number of targets currently up.
    pub fn up_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_up).count()
    }

    /// Percentage of targets currently up, 0-100.
    pub fn uptime_percent(&self) -> u32 {
        if self.targets.is_empty() {
            return 0;
        }
        (100 * self.up_count() / self.targets.len()) as u32
    }

    /// The most recent probe time across all targets.
    pub fn latest_probe_time(&self) -> Option<DateTime<Utc>> {
        self.targets.iter().filter_map(|t| t.last_checked).max()
    }
}

fn compute_health(is_up: bool, last_latency: Duration, thresholds: &Thresholds) -> HealthStatus {
    if !is_up {
        return HealthStatus::Critical;
    }
    if last_latency >= thresholds.latency_critical {
        HealthStatus::Critical
    } else if last_latency >= thresholds.latency_warning {
        HealthStatus::Warning
    } else {
        HealthStatus::Healthy
    }
}

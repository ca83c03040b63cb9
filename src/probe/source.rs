//! Background probe collection.
//!
//! Spawns a tokio task that probes every configured target on an interval,
//! maintains per-target running statistics, and publishes a fresh
//! [`ProbeSnapshot`] through the standard channel source after each round.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::prober::{ProbeOutcome, Prober};
use crate::source::{ChannelSource, ProbeSnapshot, SerializedSample, SerializedTarget};

/// Latency history kept per target. Old samples roll off the front.
const MAX_SAMPLES_PER_TARGET: usize = 500;

/// Running state for one monitored target.
#[derive(Debug, Clone)]
struct TargetState {
    url: String,
    last_status: u16,
    last_latency_ms: f64,
    last_checked: Option<DateTime<Utc>>,
    is_up: bool,
    first_up_time: Option<DateTime<Utc>>,
    total_probe_count: u64,
    total_latency_sum: f64,
    samples: VecDeque<SerializedSample>,
}

impl TargetState {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            last_status: 0,
            last_latency_ms: 0.0,
            last_checked: None,
            is_up: false,
            first_up_time: None,
            total_probe_count: 0,
            total_latency_sum: 0.0,
            samples: VecDeque::new(),
        }
    }

    /// Fold one probe outcome into the running state.
    ///
    /// An up transition stamps `first_up_time`, a down transition clears
    /// it. Totals and the sample history only grow for probes that got an
    /// HTTP response; network failures update the last-seen fields only.
    fn apply(&mut self, outcome: &ProbeOutcome, now: DateTime<Utc>) {
        let was_up = self.last_status == 200;
        let is_now_up = outcome.status == 200;

        if !was_up && is_now_up {
            self.first_up_time = Some(now);
        } else if was_up && !is_now_up {
            self.first_up_time = None;
        }

        self.last_status = outcome.status;
        self.last_latency_ms = outcome.latency_ms;
        self.last_checked = Some(now);
        self.is_up = is_now_up;

        if outcome.status > 0 {
            self.total_probe_count += 1;
            self.total_latency_sum += outcome.latency_ms;

            self.samples.push_back(SerializedSample {
                url: self.url.clone(),
                latency_ms: outcome.latency_ms,
                timestamp: now.to_rfc3339(),
            });
            if self.samples.len() > MAX_SAMPLES_PER_TARGET {
                self.samples.pop_front();
            }
        }
    }

    fn serialized(&self) -> SerializedTarget {
        SerializedTarget {
            url: self.url.clone(),
            last_status: self.last_status,
            last_latency_ms: self.last_latency_ms,
            last_checked: self.last_checked.map(|t| t.to_rfc3339()),
            is_up: self.is_up,
            first_up_time: self.first_up_time.map(|t| t.to_rfc3339()),
            total_probe_count: self.total_probe_count,
            total_latency_sum: self.total_latency_sum,
        }
    }
}

fn build_snapshot(states: &[TargetState]) -> ProbeSnapshot {
    ProbeSnapshot {
        targets: states.iter().map(TargetState::serialized).collect(),
        history: states.iter().flat_map(|s| s.samples.iter().cloned()).collect(),
    }
}

/// Start the background collector.
///
/// Probes every target concurrently each interval and publishes a snapshot
/// after each round. Returns the channel source for the TUI and the task
/// handle so the caller can abort on shutdown.
pub async fn start_collector(
    targets: Vec<String>,
    interval: Duration,
) -> Result<(ChannelSource, tokio::task::JoinHandle<()>)> {
    let prober = Prober::new()?;
    let (tx, source) = ChannelSource::create("prober");

    let handle = tokio::spawn(async move {
        let mut states: Vec<TargetState> =
            targets.iter().map(|url| TargetState::new(url)).collect();
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            let outcomes =
                futures_util::future::join_all(states.iter().map(|s| prober.check(&s.url))).await;

            let now = Utc::now();
            for (state, outcome) in states.iter_mut().zip(&outcomes) {
                state.apply(outcome, now);
            }

            if tx.send(build_snapshot(&states)).is_err() {
                // Receiver dropped: the TUI is gone
                break;
            }
        }
    });

    Ok((source, handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_outcome(latency_ms: f64) -> ProbeOutcome {
        ProbeOutcome {
            status: 200,
            latency_ms,
            network_err: false,
        }
    }

    fn failed_outcome() -> ProbeOutcome {
        ProbeOutcome {
            status: 0,
            latency_ms: 5000.0,
            network_err: true,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-05-01T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_up_transition_sets_first_up_time() {
        let mut state = TargetState::new("https://example.com");
        assert!(state.first_up_time.is_none());

        state.apply(&ok_outcome(100.0), now());
        assert_eq!(state.first_up_time, Some(now()));
        assert!(state.is_up);
        assert_eq!(state.total_probe_count, 1);
        assert_eq!(state.total_latency_sum, 100.0);
        assert_eq!(state.samples.len(), 1);
    }

    #[test]
    fn test_down_transition_clears_first_up_time() {
        let mut state = TargetState::new("https://example.com");
        state.apply(&ok_outcome(100.0), now());
        state.apply(&failed_outcome(), now());

        assert!(state.first_up_time.is_none());
        assert!(!state.is_up);
        assert_eq!(state.last_status, 0);
        // Network failures don't grow totals or history
        assert_eq!(state.total_probe_count, 1);
        assert_eq!(state.samples.len(), 1);
    }

    #[test]
    fn test_staying_up_keeps_first_up_time() {
        let mut state = TargetState::new("https://example.com");
        let first = now();
        state.apply(&ok_outcome(100.0), first);

        let later = "2024-05-01T10:05:00Z".parse().unwrap();
        state.apply(&ok_outcome(120.0), later);

        assert_eq!(state.first_up_time, Some(first));
        assert_eq!(state.total_probe_count, 2);
        assert_eq!(state.total_latency_sum, 220.0);
    }

    #[test]
    fn test_http_error_still_counts() {
        // A 500 is a response: the target is down but the probe completed
        let mut state = TargetState::new("https://example.com");
        state.apply(
            &ProbeOutcome {
                status: 500,
                latency_ms: 80.0,
                network_err: false,
            },
            now(),
        );

        assert!(!state.is_up);
        assert_eq!(state.total_probe_count, 1);
        assert_eq!(state.samples.len(), 1);
    }

    #[test]
    fn test_sample_history_is_capped() {
        let mut state = TargetState::new("https://example.com");
        for _ in 0..(MAX_SAMPLES_PER_TARGET + 20) {
            state.apply(&ok_outcome(50.0), now());
        }
        assert_eq!(state.samples.len(), MAX_SAMPLES_PER_TARGET);
    }

    #[test]
    fn test_build_snapshot() {
        let mut a = TargetState::new("https://a.example");
        let mut b = TargetState::new("https://b.example");
        a.apply(&ok_outcome(10.0), now());
        b.apply(&ok_outcome(20.0), now());

        let snapshot = build_snapshot(&[a, b]);
        assert_eq!(snapshot.targets.len(), 2);
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.targets[0].url, "https://a.example");
    }
}

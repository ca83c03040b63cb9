//! Single-shot HTTP probing.

use std::time::{Duration, Instant};

use anyhow::Result;

/// Per-request timeout. Anything slower counts as a network failure.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// The result of one probe against one target.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    /// HTTP status code; 0 for network-level failures (DNS, timeout,
    /// connection refused).
    pub status: u16,
    /// Wall time of the whole request in milliseconds, measured whether or
    /// not the request succeeded.
    pub latency_ms: f64,
    pub network_err: bool,
}

impl ProbeOutcome {
    fn network_error(latency_ms: f64) -> Self {
        Self {
            status: 0,
            latency_ms,
            network_err: true,
        }
    }
}

/// Issues HTTP GET probes and measures wall time.
///
/// Network failures never propagate as errors; they fold into the outcome
/// with status 0 so a flapping target degrades its stats instead of
/// killing the collector.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Probe one URL once.
    pub async fn check(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();
        let response = self.client.get(url).send().await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        match response {
            Ok(response) => ProbeOutcome {
                status: response.status().as_u16(),
                latency_ms,
                network_err: false,
            },
            Err(_) => ProbeOutcome::network_error(latency_ms),
        }
    }
}

//! Example: Feeding snapshots through a channel
//!
//! This example demonstrates how to integrate probewatch into your own
//! application by sending snapshots through a channel.
//!
//! This is useful when you want to:
//! - Feed results from an existing probing pipeline
//! - Generate synthetic data for testing
//! - Bridge from any async data source
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_source
//! ```

use std::thread;
use std::time::Duration;

use probewatch::{ChannelSource, DataSource, ProbeSnapshot, SerializedSample, SerializedTarget};

fn main() {
    println!("Channel source example");
    println!("Generating synthetic probe data...\n");

    // Create a channel source - this returns both a sender and the source
    let (tx, mut source) = ChannelSource::create("synthetic-data");

    // Spawn a thread to generate synthetic snapshots
    thread::spawn(move || {
        let mut round = 0u64;
        let mut history: Vec<SerializedSample> = Vec::new();

        loop {
            round += 1;

            // A sawtooth latency pattern so the chart has some shape
            let latency_ms = 40.0 + (round % 10) as f64 * 15.0;
            let timestamp = format!("2024-05-01T10:{:02}:00Z", round % 60);

            history.push(SerializedSample {
                url: "https://example.com".to_string(),
                latency_ms,
                timestamp,
            });

            let snapshot = ProbeSnapshot {
                targets: vec![SerializedTarget {
                    url: "https://example.com".to_string(),
                    last_status: 200,
                    last_latency_ms: latency_ms,
                    last_checked: Some("2024-05-01T10:00:00Z".to_string()),
                    is_up: true,
                    first_up_time: Some("2024-05-01T08:00:00Z".to_string()),
                    total_probe_count: round,
                    total_latency_sum: latency_ms * round as f64,
                }],
                history: history.clone(),
            };

            // Send the snapshot
            if tx.send(snapshot).is_err() {
                break; // Receiver dropped
            }

            thread::sleep(Duration::from_secs(1));
        }
    });

    // Poll the source in the main thread
    println!("Receiving snapshots (press Ctrl+C to stop):\n");

    loop {
        if let Some(snapshot) = source.poll() {
            println!("Received snapshot:");
            for target in &snapshot.targets {
                println!(
                    "  Target: {} (up: {}, last: {:.0}ms, probes: {})",
                    target.url, target.is_up, target.last_latency_ms, target.total_probe_count
                );
            }
            println!("  History: {} samples", snapshot.history.len());
            println!();
        }

        thread::sleep(Duration::from_millis(100));
    }
}

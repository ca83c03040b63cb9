//! Channel-based data source.
//!
//! Receives probe snapshots via a tokio watch channel. This is how the
//! built-in prober feeds the TUI, and how embedders can push snapshots
//! from their own collection pipeline.

use tokio::sync::watch;

use super::{DataSource, ProbeSnapshot};

/// A data source that receives probe snapshots via a channel.
///
/// The producer (the prober task, or an embedder's collector) sends
/// snapshots through the channel, and this source provides them to the TUI.
///
/// # Example
///
/// ```
/// use probewatch::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("prober");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<ProbeSnapshot>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where snapshots come from
    ///   (e.g., "prober", "collector:pipeline")
    pub fn new(receiver: watch::Receiver<ProbeSnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// Returns (sender, source) where the sender can be used to push
    /// snapshots and the source can be used with the TUI.
    pub fn create(source_description: &str) -> (watch::Sender<ProbeSnapshot>, Self) {
        let (tx, rx) = watch::channel(ProbeSnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<ProbeSnapshot> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // Check if there's a new value without blocking
        if self.receiver.has_changed().unwrap_or(false) {
            let snapshot = self.receiver.borrow_and_update().clone();
            Some(snapshot)
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // Channel sources don't have file-based errors; a dead producer
        // simply stops sending new snapshots
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SerializedTarget;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) snapshot
        let snapshot = source.poll();
        assert!(snapshot.is_some());
        assert!(snapshot.unwrap().is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        // Send a new snapshot
        let new_snapshot = ProbeSnapshot {
            targets: vec![SerializedTarget {
                url: "https://example.com".into(),
                last_status: 200,
                last_latency_ms: 50.0,
                last_checked: None,
                is_up: true,
                first_up_time: None,
                total_probe_count: 1,
                total_latency_sum: 50.0,
            }],
            history: Vec::new(),
        };
        tx.send(new_snapshot).unwrap();

        // Now poll returns the new snapshot
        let snapshot = source.poll();
        assert!(snapshot.is_some());
        assert_eq!(snapshot.unwrap().targets.len(), 1);
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("prober");
        assert_eq!(source.description(), "channel: prober");
    }
}

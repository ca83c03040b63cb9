//! Data source abstraction for receiving probe snapshots.
//!
//! This module provides a trait-based abstraction for receiving probe data
//! from various sources (files, channels, network streams, or the built-in
//! prober).

mod channel;
mod file;
mod snapshot;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use snapshot::{ProbeSnapshot, SerializedSample, SerializedTarget};
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving probe data from various sources.
///
/// Implementations of this trait provide probe snapshots from different
/// backends - file polling, the live prober, or in-memory channels.
///
/// # Example
///
/// ```
/// use probewatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("probes.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} targets", snapshot.targets.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<ProbeSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    fn error(&self) -> Option<&str>;
}

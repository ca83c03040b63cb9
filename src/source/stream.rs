//! Stream-based data source.
//!
//! Receives probe snapshots from an async byte stream. This is useful for
//! network-based sources like TCP connections or the piped output of
//! another collector.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use super::{DataSource, ProbeSnapshot};

/// A data source that receives probe snapshots from an async stream.
///
/// This source spawns a background task that reads newline-delimited JSON
/// from the provided async reader and makes snapshots available via `poll()`.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use probewatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<ProbeSnapshot>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// The reader should provide newline-delimited JSON snapshots.
    /// Each line is parsed as a complete `ProbeSnapshot`.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF
                        *error_handle.lock().unwrap() = Some("Connection closed".to_string());
                        break;
                    }
                    Ok(_) => {
                        match serde_json::from_str::<ProbeSnapshot>(line.trim()) {
                            Ok(snapshot) => {
                                *error_handle.lock().unwrap() = None;
                                if tx.send(snapshot).await.is_err() {
                                    // Receiver dropped
                                    break;
                                }
                            }
                            Err(e) => {
                                *error_handle.lock().unwrap() =
                                    Some(format!("Parse error: {}", e));
                            }
                        }
                    }
                    Err(e) => {
                        *error_handle.lock().unwrap() = Some(format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<ProbeSnapshot> {
        // Try to receive without blocking
        match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                *self.last_error.lock().unwrap() = Some("Stream disconnected".to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        // The error lives behind a mutex for the reader task; expose it
        // through `last_error()` instead of a borrowed str
        None
    }
}

impl StreamSource {
    /// Get the last error message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

//! Data models and processing for probe snapshots.
//!
//! This module handles the transformation of raw probe snapshots into
//! structured, health-annotated data suitable for display.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "2s", "500ms")
//! - [`history`]: Historical tracking for sparklines and trend indicators
//! - [`range`]: Chart time windows (1h/4h/1d/1w/1m/all)
//! - [`sample`]: Latency sample parsing with lenient timestamps
//! - [`target`]: Core data models ([`ProbeData`], [`TargetData`], [`HealthStatus`])
//!
//! ## Data Flow
//!
//! ```text
//! ProbeSnapshot (raw JSON)
//!        │
//!        ▼
//! ProbeData::from_snapshot()
//!        │
//!        ├──▶ TargetData (with health status computed from Thresholds)
//!        │
//!        ├──▶ LatencySample history (feeds the chart)
//!        │
//!        └──▶ History::record() (for sparklines)
//! ```

pub mod duration;
pub mod history;
pub mod range;
pub mod sample;
pub mod target;

pub use history::History;
pub use range::TimeRange;
pub use sample::LatencySample;
pub use target::{HealthStatus, ProbeData, TargetData, Thresholds};

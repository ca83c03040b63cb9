// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # probewatch
//!
//! A diagnostic TUI and library for monitoring HTTP endpoint latency and
//! uptime.
//!
//! This crate probes a set of target URLs (or replays snapshots produced
//! elsewhere), tracks per-target latency history and uptime statistics,
//! and displays them in an interactive terminal UI whose centerpiece is a
//! time-series latency chart with per-segment trend coloring.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│ ui+chart│───▶│ Terminal│ │
//! │  │ (state) │    │(processing)   │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  │ (input) │◀── probe collector (feature "probe")          │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with
//!   implementations for file polling, TCP streams, and channel-based input
//! - **[`probe`]**: Live HTTP probing on an interval (feature "probe")
//! - **[`data`]**: Data models and processing - converts raw snapshots into
//!   health-annotated [`ProbeData`], parses latency samples, tracks history
//!   for sparklines
//! - **[`chart`]**: Latency chart shaping and rendering - series building,
//!   the per-segment color rule, presets, and the mount-point registry
//! - **[`ui`]**: Terminal rendering using ratatui - dashboard, target table,
//!   probe history, and theme support
//!
//! ## Features
//!
//! - **Dashboard**: Global latency/uptime tiles and the per-target chart
//! - **Trend coloring**: Chart segments colored by latency direction
//! - **Target table**: Health status, averages, uptime, sparkline trends
//! - **Historical tracking**: Rolling per-target latency history
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Probe targets from a config file
//! probewatch --probe targets.toml
//!
//! # Watch a snapshot file written by another collector
//! probewatch --file probes.json
//!
//! # Monitor via TCP connection
//! probewatch --connect localhost:9090
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use probewatch::{App, FileSource, Thresholds};
//!
//! let source = Box::new(FileSource::new("probes.json"));
//! let app = App::new(source, Thresholds::default());
//! ```
//!
//! ### As a library with channel source (custom collectors)
//!
//! ```
//! use probewatch::{App, ChannelSource, Thresholds};
//!
//! // Create a channel for pushing snapshots
//! let (tx, source) = ChannelSource::create("my-collector");
//!
//! // Create the app
//! let app = App::new(Box::new(source), Thresholds::default());
//! ```
//!
//! ### Shaping chart data without a terminal
//!
//! ```
//! use probewatch::chart::{ChartSeries, SortPolicy};
//! use probewatch::chart::label::utc_clock;
//! use probewatch::data::LatencySample;
//! use chrono::Utc;
//!
//! let samples = vec![LatencySample::new(Utc::now(), 42.0)];
//! let series =
//!     ChartSeries::build(&samples, SortPolicy::TimeAscending, &utc_clock(false)).unwrap();
//! assert_eq!(series.values, vec![42.0]);
//! ```

pub mod app;
pub mod chart;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Live probing module (requires "probe" feature)
#[cfg(feature = "probe")]
pub mod probe;

// Re-export main types for convenience
pub use app::App;
pub use chart::{ChartPreset, ChartSeries, LatencyChart, MountPoints, LATENCY_CHART};
pub use data::{HealthStatus, LatencySample, ProbeData, TargetData, Thresholds, TimeRange};
pub use source::{
    ChannelSource, DataSource, FileSource, ProbeSnapshot, SerializedSample, SerializedTarget,
    StreamSource,
};

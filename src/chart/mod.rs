//! Latency chart shaping and rendering.
//!
//! Turns a slice of latency samples into a declarative chart configuration
//! and hands it to ratatui for drawing. The module owns data shaping and
//! configuration only; pixel work belongs to the drawing collaborator.
//!
//! ## Submodules
//!
//! - [`label`]: Timestamp-to-clock-label formatting behind [`LabelFormatter`]
//! - [`series`]: [`ChartSeries`] shaping and the per-segment color rule
//! - [`style`]: The two named presets and the chart palette
//! - [`renderer`]: [`LatencyChart`] widget assembly and the mount-point registry
//!
//! ## Behavior contract
//!
//! - Empty input: nothing is built or drawn, no error.
//! - Missing mount surface: the series is shaped, the draw is skipped.
//! - Each render call is an independent, idempotent computation followed by
//!   one delegated draw; nothing is cached between calls.

pub mod label;
pub mod renderer;
pub mod series;
pub mod style;

pub use label::{ClockLabel, LabelFormatter, PLACEHOLDER_LABEL};
pub use renderer::{tooltip, LatencyChart, MountPoints, LATENCY_CHART};
pub use series::{segment_color, ChartSeries};
pub use style::{ChartPalette, ChartPreset, FillStyle, PointStyle, SortPolicy};

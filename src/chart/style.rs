//! Chart presets and palette.
//!
//! The two shipped chart configurations are presets of one parameterized
//! renderer rather than two copies of the logic. A preset enumerates the
//! decisions that differ between them: ordering policy, fill style, point
//! style, label precision, and legend visibility.

use ratatui::style::Color;

/// How samples are ordered before charting.
///
/// The two policies are not equivalent: `ReverseInput` trusts the caller's
/// order (typically newest-first) and merely reverses it, while
/// `TimeAscending` sorts a copy by parsed timestamp. A renderer uses
/// exactly one policy per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    /// Sort a copy of the input by timestamp ascending (oldest on the left).
    TimeAscending,
    /// Reverse the input order verbatim, without sorting.
    ReverseInput,
}

/// How the area under the line is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStyle {
    /// Shade resolved against the drawable area at draw time; falls back
    /// to the flat tone when the area is not measurable.
    Gradient,
    /// Fixed translucent tone.
    Flat,
}

/// Whether individual samples get a visible marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStyle {
    Hidden,
    Marker,
}

/// A named visual configuration for the latency chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPreset {
    pub name: &'static str,
    pub sort: SortPolicy,
    pub fill: FillStyle,
    pub points: PointStyle,
    /// Include seconds in the axis clock labels.
    pub with_seconds: bool,
    pub show_legend: bool,
    /// Color each segment by direction (up when latency is non-decreasing).
    pub segment_trend: bool,
}

impl ChartPreset {
    /// Trend preset: chronological, gradient-filled, segment-colored line
    /// with no point markers. This is the dashboard default.
    pub fn trend() -> Self {
        Self {
            name: "trend",
            sort: SortPolicy::TimeAscending,
            fill: FillStyle::Gradient,
            points: PointStyle::Hidden,
            with_seconds: false,
            show_legend: false,
            segment_trend: true,
        }
    }

    /// Recent preset: reversed input order (newest-first producers read
    /// oldest-first), flat fill, visible point markers, seconds in labels.
    pub fn recent() -> Self {
        Self {
            name: "recent",
            sort: SortPolicy::ReverseInput,
            fill: FillStyle::Flat,
            points: PointStyle::Marker,
            with_seconds: true,
            show_legend: true,
            segment_trend: false,
        }
    }

    /// The other preset.
    pub fn toggled(&self) -> Self {
        if self.sort == SortPolicy::TimeAscending {
            Self::recent()
        } else {
            Self::trend()
        }
    }
}

impl Default for ChartPreset {
    fn default() -> Self {
        Self::trend()
    }
}

/// Colors used by the chart renderer.
///
/// The defaults carry the original dashboard's scheme: green for flat or
/// improving latency, red for a worsening segment.
#[derive(Debug, Clone)]
pub struct ChartPalette {
    /// Line color for non-decreasing segments.
    pub up: Color,
    /// Line color for decreasing segments.
    pub down: Color,
    /// Fill tone used at full shade (gradient top).
    pub fill_strong: Color,
    /// Flat translucent-equivalent fill tone.
    pub fill_flat: Color,
    pub axis: Color,
    pub border: Color,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            up: Color::Rgb(37, 193, 126),
            down: Color::Rgb(255, 107, 107),
            fill_strong: Color::Rgb(21, 84, 57),
            fill_flat: Color::Rgb(14, 52, 37),
            axis: Color::Gray,
            border: Color::Gray,
        }
    }
}

//! Latency chart rendering.
//!
//! Shapes samples into a [`ChartSeries`] and hands a declarative widget
//! configuration to ratatui, which does the actual drawing. The renderer
//! never errors: empty input and a missing mount surface are both silent
//! no-ops.

use std::collections::HashMap;

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use super::label::LabelFormatter;
use super::series::{segment_color, ChartSeries};
use super::style::{ChartPalette, ChartPreset, FillStyle, PointStyle};
use crate::data::LatencySample;

/// Well-known id of the dashboard's latency chart surface.
pub const LATENCY_CHART: &str = "latencyChart";

/// Maximum number of tick labels on the time axis.
const MAX_X_TICKS: usize = 8;

/// Registry of named drawable surfaces.
///
/// The dashboard layout registers the rectangles it carved out each frame;
/// renderers look their surface up by id. A missing id means the surface
/// is not part of the current view and drawing is skipped silently.
#[derive(Debug, Default)]
pub struct MountPoints {
    surfaces: HashMap<&'static str, Rect>,
}

impl MountPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or move) a surface for this frame.
    pub fn register(&mut self, id: &'static str, area: Rect) {
        self.surfaces.insert(id, area);
    }

    /// Look up a surface by id.
    pub fn resolve(&self, id: &str) -> Option<Rect> {
        self.surfaces.get(id).copied()
    }

    /// Drop all registrations, typically at the start of a frame.
    pub fn clear(&mut self) {
        self.surfaces.clear();
    }
}

/// One-shot latency chart renderer.
///
/// Construct per frame; `render` shapes the data and issues at most one
/// draw call. Holds no state across calls.
pub struct LatencyChart<'a> {
    title: &'a str,
    samples: &'a [LatencySample],
    preset: &'a ChartPreset,
    palette: &'a ChartPalette,
    formatter: &'a dyn LabelFormatter,
    cursor: Option<usize>,
}

impl<'a> LatencyChart<'a> {
    pub fn new(
        title: &'a str,
        samples: &'a [LatencySample],
        preset: &'a ChartPreset,
        palette: &'a ChartPalette,
        formatter: &'a dyn LabelFormatter,
    ) -> Self {
        Self {
            title,
            samples,
            preset,
            palette,
            formatter,
            cursor: None,
        }
    }

    /// Highlight the sample at `index` and surface its value readout.
    pub fn cursor(mut self, index: Option<usize>) -> Self {
        self.cursor = index;
        self
    }

    /// Shape the input into a series without drawing.
    ///
    /// `None` means there is nothing to chart (the no-data guard).
    pub fn shape(&self) -> Option<ChartSeries> {
        ChartSeries::build(self.samples, self.preset.sort, self.formatter)
    }

    /// Shape the data and draw onto the registered surface.
    ///
    /// No surface registered under [`LATENCY_CHART`] means the chart is not
    /// part of the current view; the series is still shaped, the draw call
    /// is skipped, and no error is raised.
    pub fn render(&self, frame: &mut Frame, mounts: &MountPoints) {
        let Some(series) = self.shape() else {
            return;
        };
        let Some(area) = mounts.resolve(LATENCY_CHART) else {
            return;
        };
        self.draw(frame, area, &series);
    }

    fn draw(&self, frame: &mut Frame, area: Rect, series: &ChartSeries) {
        let block = Block::default()
            .title(self.title_text(series))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.border));

        // The gradient shade is resolved against the actual drawable area;
        // an unmeasurable plot area falls back to the flat tone.
        let inner = block.inner(area);
        let fill_color = match self.preset.fill {
            FillStyle::Flat => self.palette.fill_flat,
            FillStyle::Gradient if inner.height == 0 => self.palette.fill_flat,
            FillStyle::Gradient => self.palette.fill_strong,
        };

        let points = series.points();
        let segments: Vec<[(f64, f64); 2]> =
            points.windows(2).map(|w| [w[0], w[1]]).collect();
        let cursor_point: Vec<(f64, f64)> = self
            .cursor
            .and_then(|i| points.get(i).copied())
            .map(|p| vec![p])
            .unwrap_or_default();

        let mut datasets: Vec<Dataset> = Vec::new();

        // Fill under the line, drawn first so the line paints over it
        datasets.push(
            Dataset::default()
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(fill_color))
                .data(&points),
        );

        if self.preset.segment_trend && !segments.is_empty() {
            for (i, segment) in segments.iter().enumerate() {
                let color =
                    segment_color(&series.values, i + 1, self.palette.up, self.palette.down);
                datasets.push(
                    Dataset::default()
                        .marker(Marker::Braille)
                        .graph_type(GraphType::Line)
                        .style(Style::default().fg(color))
                        .data(segment),
                );
            }
        } else {
            let mut line = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.palette.up))
                .data(&points);
            if self.preset.show_legend {
                line = line.name("Latency (ms)");
            }
            datasets.push(line);
        }

        if self.preset.points == PointStyle::Marker || points.len() == 1 {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(self.palette.up))
                    .data(&points),
            );
        }

        if !cursor_point.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Block)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(self.palette.down))
                    .data(&cursor_point),
            );
        }

        let x_max = (series.len().saturating_sub(1)).max(1) as f64;
        let (y_lo, y_hi) = value_axis_bounds(series);

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(thin_labels(&series.labels, MAX_X_TICKS))
                    .style(Style::default().fg(self.palette.axis)),
            )
            .y_axis(
                Axis::default()
                    .bounds([y_lo, y_hi])
                    .labels(vec![
                        format_ms(y_lo),
                        format_ms((y_lo + y_hi) / 2.0),
                        format_ms(y_hi),
                    ])
                    .style(Style::default().fg(self.palette.axis)),
            );

        frame.render_widget(chart, area);
    }

    fn title_text(&self, series: &ChartSeries) -> String {
        match self.cursor.and_then(|i| {
            tooltip(series, i).map(|readout| (readout, series.labels[i].clone()))
        }) {
            Some((readout, label)) => {
                format!(" {} · {} @ {} ", self.title, readout, label)
            }
            None => format!(" {} ", self.title),
        }
    }
}

/// Value readout for the sample at `index`: the latency suffixed with
/// `" ms"`, or `None` out of range.
pub fn tooltip(series: &ChartSeries, index: usize) -> Option<String> {
    series.values.get(index).map(|&v| format_ms(v))
}

/// Format a millisecond value for axis ticks and readouts.
fn format_ms(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{:.0} ms", v)
    } else {
        format!("{:.1} ms", v)
    }
}

/// Value-axis bounds: padded around the observed range, clamped at zero.
///
/// The axis does not start at zero (matching the original dashboard) so a
/// flat-ish series still shows structure.
fn value_axis_bounds(series: &ChartSeries) -> (f64, f64) {
    let (min, max) = series.value_bounds();
    let range = max - min;
    let pad = if range > f64::EPSILON {
        range * 0.1
    } else {
        max.abs() * 0.1 + 1.0
    };
    ((min - pad).max(0.0), max + pad)
}

/// Pick at most `max` evenly spaced labels, keeping the first and last.
fn thin_labels(labels: &[String], max: usize) -> Vec<String> {
    if labels.len() <= max {
        return labels.to_vec();
    }
    let last = labels.len() - 1;
    let step = last as f64 / (max - 1) as f64;
    (0..max)
        .map(|i| labels[((i as f64 * step).round() as usize).min(last)].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::label::utc_clock;
    use chrono::{DateTime, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    fn sample(raw_ts: &str, latency_ms: f64) -> LatencySample {
        LatencySample::new(raw_ts.parse::<DateTime<Utc>>().unwrap(), latency_ms)
    }

    fn samples() -> Vec<LatencySample> {
        vec![
            sample("2024-05-01T10:00:00Z", 50.0),
            sample("2024-05-01T10:01:00Z", 40.0),
            sample("2024-05-01T10:02:00Z", 60.0),
        ]
    }

    fn buffer_has_content(terminal: &Terminal<TestBackend>) -> bool {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .any(|cell| cell.symbol() != " ")
    }

    #[test]
    fn test_mount_points_register_resolve() {
        let mut mounts = MountPoints::new();
        assert_eq!(mounts.resolve(LATENCY_CHART), None);

        let area = Rect::new(0, 0, 40, 10);
        mounts.register(LATENCY_CHART, area);
        assert_eq!(mounts.resolve(LATENCY_CHART), Some(area));

        mounts.clear();
        assert_eq!(mounts.resolve(LATENCY_CHART), None);
    }

    #[test]
    fn test_render_draws_when_mounted() {
        let samples = samples();
        let preset = ChartPreset::trend();
        let palette = ChartPalette::default();
        let formatter = utc_clock(false);

        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let mut mounts = MountPoints::new();
                mounts.register(LATENCY_CHART, frame.area());
                LatencyChart::new(" Latency ", &samples, &preset, &palette, &formatter)
                    .render(frame, &mounts);
            })
            .unwrap();

        assert!(buffer_has_content(&terminal));
    }

    #[test]
    fn test_render_skips_without_mount_point() {
        // Scenario: data is shaped but the surface is absent from the view
        let samples = samples();
        let preset = ChartPreset::trend();
        let palette = ChartPalette::default();
        let formatter = utc_clock(false);

        let chart = LatencyChart::new(" Latency ", &samples, &preset, &palette, &formatter);
        assert!(chart.shape().is_some());

        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let mounts = MountPoints::new();
                chart.render(frame, &mounts);
            })
            .unwrap();

        assert!(!buffer_has_content(&terminal));
    }

    #[test]
    fn test_render_skips_on_empty_input() {
        let preset = ChartPreset::trend();
        let palette = ChartPalette::default();
        let formatter = utc_clock(false);

        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let mut mounts = MountPoints::new();
                mounts.register(LATENCY_CHART, frame.area());
                let chart = LatencyChart::new(" Latency ", &[], &preset, &palette, &formatter);
                assert!(chart.shape().is_none());
                chart.render(frame, &mounts);
            })
            .unwrap();

        assert!(!buffer_has_content(&terminal));
    }

    #[test]
    fn test_recent_preset_renders() {
        let samples = samples();
        let preset = ChartPreset::recent();
        let palette = ChartPalette::default();
        let formatter = utc_clock(true);

        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let mut mounts = MountPoints::new();
                mounts.register(LATENCY_CHART, frame.area());
                LatencyChart::new(" Latency ", &samples, &preset, &palette, &formatter)
                    .cursor(Some(1))
                    .render(frame, &mounts);
            })
            .unwrap();

        assert!(buffer_has_content(&terminal));
    }

    #[test]
    fn test_tooltip_format() {
        let series = ChartSeries {
            labels: vec!["10.00".into(), "10.01".into()],
            values: vec![42.0, 37.5],
        };
        assert_eq!(tooltip(&series, 0), Some("42 ms".to_string()));
        assert_eq!(tooltip(&series, 1), Some("37.5 ms".to_string()));
        assert_eq!(tooltip(&series, 2), None);
    }

    #[test]
    fn test_value_axis_bounds_padded() {
        let series = ChartSeries {
            labels: vec!["a".into(), "b".into()],
            values: vec![100.0, 200.0],
        };
        let (lo, hi) = value_axis_bounds(&series);
        assert!(lo < 100.0 && lo >= 0.0);
        assert!(hi > 200.0);
    }

    #[test]
    fn test_value_axis_bounds_flat_series() {
        let series = ChartSeries {
            labels: vec!["a".into()],
            values: vec![50.0],
        };
        let (lo, hi) = value_axis_bounds(&series);
        assert!(lo < hi);
    }

    #[test]
    fn test_thin_labels() {
        let labels: Vec<String> = (0..20).map(|i| format!("l{}", i)).collect();
        let thinned = thin_labels(&labels, 8);
        assert_eq!(thinned.len(), 8);
        assert_eq!(thinned.first().unwrap(), "l0");
        assert_eq!(thinned.last().unwrap(), "l19");

        let few: Vec<String> = (0..3).map(|i| format!("l{}", i)).collect();
        assert_eq!(thin_labels(&few, 8), few);
    }
}

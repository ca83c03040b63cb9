//! Dashboard view rendering.
//!
//! Stat tiles with the global aggregates, plus the latency chart for the
//! currently selected target.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::app::App;
use crate::chart::{ClockLabel, LatencyChart, MountPoints, LATENCY_CHART};
use crate::ui::targets::format_latency_ms;

/// Minimum rows for the chart to be worth mounting.
const MIN_CHART_HEIGHT: u16 = 4;

/// Render the Dashboard view: stat tiles on top, chart below.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let [tiles_area, chart_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .areas(area);

    render_tiles(frame, app, tiles_area);
    render_chart(frame, app, chart_area);
}

/// Render the four stat tiles: average latency, uptime, targets, last probe.
fn render_tiles(frame: &mut Frame, app: &App, area: Rect) {
    let [avg_panel, uptime_panel, targets_panel, checked_panel] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ])
        .areas(area);

    let (avg, uptime, targets, checked) = match app.data {
        Some(ref data) => (
            data.global_avg_latency_ms()
                .map(format_latency_ms)
                .unwrap_or_else(|| "-".to_string()),
            format!("{}%", data.uptime_percent()),
            format!("{}/{}", data.up_count(), data.targets.len()),
            data.latest_probe_time()
                .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        None => (
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
        ),
    };

    render_tile(frame, app, avg_panel, " Avg Latency ", &avg);
    render_tile(frame, app, uptime_panel, " Uptime ", &uptime);
    render_tile(frame, app, targets_panel, " Targets Up ", &targets);
    render_tile(frame, app, checked_panel, " Last Probe ", &checked);
}

fn render_tile(frame: &mut Frame, app: &App, area: Rect, title: &str, value: &str) {
    let block = Block::bordered()
        .title(title)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
        .padding(Padding::new(1, 1, 0, 0));

    let paragraph = Paragraph::new(value.to_string())
        .block(block)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .centered();

    frame.render_widget(paragraph, area);
}

/// Render the latency chart for the selected target.
///
/// The layout registers the chart surface under its well-known id and the
/// renderer looks it up; a terminal too small to fit the chart simply
/// leaves the surface unregistered and nothing is drawn.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let Some(target) = app.selected_target() else {
        render_empty_chart(frame, app, area, "No targets yet");
        return;
    };

    let samples = app.chart_samples();
    if samples.is_empty() {
        render_empty_chart(frame, app, area, "No samples in timeframe");
        return;
    }

    let mut mounts = MountPoints::new();
    if area.height >= MIN_CHART_HEIGHT {
        mounts.register(LATENCY_CHART, area);
    }

    let title = format!(
        "Latency · {} · {} [{}] [←→:inspect t:range p:preset]",
        target.url,
        app.time_range.label(),
        app.chart_preset.name,
    );
    let formatter = ClockLabel::new(app.chart_preset.with_seconds);

    LatencyChart::new(&title, &samples, &app.chart_preset, &app.theme.chart, &formatter)
        .cursor(app.sample_cursor)
        .render(frame, &mounts);
}

fn render_empty_chart(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
        .title(" Latency ");

    let placeholder = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(placeholder.block(block), area);
}

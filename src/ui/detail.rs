//! Detail overlay rendering.
//!
//! Displays a modal overlay with detailed information about a selected
//! target.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::chart::{ClockLabel, LabelFormatter};
use crate::data::duration::format_uptime;
use crate::ui::targets::format_latency_ms;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the target detail as a modal overlay.
///
/// Shows the target's health, lifetime statistics, and its most recent
/// probe results.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref data) = app.data else {
        return;
    };

    let Some(target) = app.selected_target() else {
        return;
    };

    // Calculate overlay size - use most of the screen
    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    // Split overlay into header and content sections
    let chunks = Layout::vertical([
        Constraint::Length(6), // Header with target info
        Constraint::Min(8),    // Recent probes table
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let health_style = app.theme.status_style(target.health);
    let health_label = match target.health {
        crate::data::HealthStatus::Healthy => "Healthy",
        crate::data::HealthStatus::Warning => "Degraded",
        crate::data::HealthStatus::Critical => "Down",
    };

    let code = if target.last_status == 0 {
        "network error".to_string()
    } else {
        format!("HTTP {}", target.last_status)
    };

    let avg = target
        .avg_latency_ms()
        .map(format_latency_ms)
        .unwrap_or_else(|| "-".to_string());

    let uptime = target
        .uptime(Utc::now())
        .map(format_uptime)
        .unwrap_or_else(|| "-".to_string());

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", target.url),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(
                format!("{} {}", target.health.symbol(), health_label),
                health_style.add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("    Last: {} ({})", code, format_latency_ms(target.last_latency_ms))),
        ]),
        Line::from(vec![
            Span::raw(" Avg: "),
            Span::styled(avg, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("    Uptime: "),
            Span::styled(uptime, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("    Probes: {}", target.total_probe_count)),
        ]),
    ];

    let header_block = Block::default()
        .title(" Target Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let header = Paragraph::new(header_lines).block(header_block);
    frame.render_widget(header, chunks[0]);

    // ===== RECENT PROBES TABLE =====
    let samples = data.samples_for(&target.url);

    if !samples.is_empty() {
        let probes_header = Row::new(vec![Cell::from("Time"), Cell::from("Latency")])
            .height(1)
            .style(app.theme.header);

        let formatter = ClockLabel::new(true);
        let probe_rows: Vec<Row> = samples
            .iter()
            .rev() // newest first
            .map(|s| {
                Row::new(vec![
                    Cell::from(formatter.label(s)),
                    Cell::from(format_latency_ms(s.latency_ms)),
                ])
            })
            .collect();

        let probe_widths = [Constraint::Length(12), Constraint::Fill(1)];

        let probes_table = Table::new(probe_rows, probe_widths).header(probes_header).block(
            Block::default()
                .title(format!(" Recent Probes ({}) ", samples.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );

        frame.render_widget(probes_table, chunks[1]);
    } else {
        let empty_block = Block::default()
            .title(" Recent Probes (0) ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No probes recorded",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(empty_block);
        frame.render_widget(empty, chunks[1]);
    }

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}

//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::HealthStatus;
use crate::ui::targets::format_latency_ms;

/// Render the header bar with fleet health overview.
///
/// Displays: status indicator, target counts by health, global latency.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                " PROBEWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    // Count targets by health status
    let mut healthy = 0;
    let mut warning = 0;
    let mut critical = 0;

    for target in &data.targets {
        match target.health {
            HealthStatus::Healthy => healthy += 1,
            HealthStatus::Warning => warning += 1,
            HealthStatus::Critical => critical += 1,
        }
    }

    let total = data.targets.len();

    let global_avg = data
        .global_avg_latency_ms()
        .map(format_latency_ms)
        .unwrap_or_else(|| "-".to_string());

    // Overall status indicator
    let (status_icon, status_style) = if critical > 0 {
        ("●", app.theme.status_style(HealthStatus::Critical))
    } else if warning > 0 {
        ("●", app.theme.status_style(HealthStatus::Warning))
    } else {
        ("●", app.theme.status_style(HealthStatus::Healthy))
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("PROBEWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}", healthy),
            Style::default().fg(app.theme.healthy),
        ),
        Span::raw(" up "),
        if warning > 0 {
            Span::styled(
                format!("{}", warning),
                Style::default().fg(app.theme.warning),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" slow "),
        if critical > 0 {
            Span::styled(
                format!("{}", critical),
                Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" down │ "),
        Span::styled(
            format!("{}", total),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" targets │ "),
        Span::raw(format!("avg {} │ {}% up", global_avg, data.uptime_percent())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Dashboard "),
        Line::from(" 2:Targets "),
        Line::from(" 3:History "),
    ];

    let selected = match app.current_view {
        View::Dashboard => 0,
        View::Targets => 1,
        View::History => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: current view, data source, time since last update, available
/// controls. Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let elapsed = data.last_updated.elapsed();

        // Context-sensitive controls
        let controls = match app.current_view {
            View::Dashboard => {
                "↑↓:target ←→:inspect t:range p:preset Tab:switch Enter:detail ?:help q:quit"
            }
            View::Targets => {
                if app.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search s:sort Tab:switch Enter:detail ?:help q:quit"
                }
            }
            View::History => {
                if app.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search ↑↓:scroll Tab:switch ?:help q:quit"
                }
            }
        };

        format!(
            " {} | {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            app.source_description(),
            elapsed.as_secs_f64(),
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       View target detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Dashboard",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→       Inspect samples"),
        Line::from("  t         Cycle time range"),
        Line::from("  p         Toggle chart preset"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Targets & History",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 46u16.min(area.width.saturating_sub(4));
    let help_height = 30u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

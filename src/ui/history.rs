//! History view rendering.
//!
//! Flat log of recent probes across all targets, newest first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::chart::{ClockLabel, LabelFormatter};
use crate::ui::targets::format_latency_ms;

/// Render the History view as a table of recent probes.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.data.is_none() {
        return;
    }

    let all_rows = app.history_rows();

    // Filter by search text
    let filtered: Vec<_> = all_rows
        .iter()
        .filter(|(url, _)| {
            if app.filter_text.is_empty() {
                return true;
            }
            url.to_lowercase().contains(&app.filter_text.to_lowercase())
        })
        .collect();

    if filtered.is_empty() {
        render_empty_message(frame, app, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Target"),
        Cell::from("Latency"),
    ])
    .height(1)
    .style(app.theme.header);

    let formatter = ClockLabel::new(true);
    let rows: Vec<Row> = filtered
        .iter()
        .map(|(url, sample)| {
            Row::new(vec![
                Cell::from(formatter.label(sample)),
                Cell::from(url.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(format_latency_ms(sample.latency_ms)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(10),
        Constraint::Fill(3),
        Constraint::Fill(1),
    ];

    let selected = app.history_index.min(filtered.len().saturating_sub(1));

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let title = format!(
        " History ({}/{}){} [{}/{}] ",
        filtered.len(),
        all_rows.len(),
        filter_info,
        selected + 1,
        filtered.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_empty_message(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" History ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let message = if app.filter_text.is_empty() {
        "No probes recorded yet"
    } else {
        "No probes match the filter"
    };

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(block);

    frame.render_widget(paragraph, area);
}

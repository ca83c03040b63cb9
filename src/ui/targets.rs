//! Targets view rendering.
//!
//! Displays a table of all monitored targets with health status, latency,
//! uptime, and sparkline trends.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_uptime;
use crate::data::TargetData;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Column to sort by in the Targets view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by target URL alphabetically.
    #[default]
    Url,
    /// Sort by last observed latency.
    Latency,
    /// Sort by lifetime average latency.
    AvgLatency,
    /// Sort by continuous uptime.
    Uptime,
    /// Sort by health status.
    Status,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Url => SortColumn::Latency,
            SortColumn::Latency => SortColumn::AvgLatency,
            SortColumn::AvgLatency => SortColumn::Uptime,
            SortColumn::Uptime => SortColumn::Status,
            SortColumn::Status => SortColumn::Url,
        }
    }
}

/// Render the Targets view showing all targets in a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    // Get filtered and sorted target indices
    let mut targets: Vec<(usize, &TargetData)> =
        data.targets.iter().enumerate().filter(|(_, t)| app.matches_filter(&t.url)).collect();
    sort_targets_by(&mut targets, app.sort_column, app.sort_ascending);

    let header = Row::new(vec![
        Cell::from(format_header("Target", SortColumn::Url, app)),
        Cell::from(format_header("Code", SortColumn::Status, app)),
        Cell::from(format_header("Latency", SortColumn::Latency, app)),
        Cell::from(format_header("Avg", SortColumn::AvgLatency, app)),
        Cell::from("Δ"),
        Cell::from(format_header("Uptime", SortColumn::Uptime, app)),
        Cell::from("Trend"),
        Cell::from(format_header("Status", SortColumn::Status, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let now = Utc::now();
    let rows: Vec<Row> = targets
        .iter()
        .map(|(_, t)| {
            let status_style = app.theme.status_style(t.health);

            let code = if t.last_status == 0 {
                "ERR".to_string()
            } else {
                t.last_status.to_string()
            };

            let avg = t
                .avg_latency_ms()
                .map(format_latency_ms)
                .unwrap_or_else(|| "-".to_string());

            let delta = app
                .history
                .latency_delta(&t.url)
                .map(|d| format!("{:+.0}ms", d))
                .unwrap_or_else(|| "-".to_string());

            let uptime = t
                .uptime(now)
                .map(format_uptime)
                .unwrap_or_else(|| "-".to_string());

            let sparkline = render_sparkline(&app.history.latency_sparkline(&t.url));

            Row::new(vec![
                Cell::from(t.url.clone()),
                Cell::from(code),
                Cell::from(format_latency_ms(t.last_latency_ms)),
                Cell::from(avg),
                Cell::from(delta),
                Cell::from(uptime),
                Cell::from(sparkline),
                Cell::from(t.health.symbol()).style(status_style),
            ])
        })
        .collect();

    // Use Fill to distribute space evenly while respecting minimum widths
    let widths = [
        Constraint::Fill(3), // Target URL - gets 3x share (largest)
        Constraint::Min(5),  // Code
        Constraint::Fill(1), // Latency
        Constraint::Fill(1), // Avg
        Constraint::Fill(1), // Delta
        Constraint::Fill(1), // Uptime
        Constraint::Min(8),  // Trend/Sparkline - fixed 8 for sparkline chars
        Constraint::Min(6),  // Status - fixed minimum
    ];

    // selected_target_index is treated as visual index; clamp to range
    let selected_visual_index = app.selected_target_index.min(targets.len().saturating_sub(1));

    let sort_indicator = match app.sort_column {
        SortColumn::Url => "url",
        SortColumn::Latency => "latency",
        SortColumn::AvgLatency => "avg",
        SortColumn::Uptime => "uptime",
        SortColumn::Status => "status",
    };
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    // Build title with filter info
    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    // Show scroll position if there are items
    let position_info = if !targets.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, targets.len())
    } else {
        String::new()
    };

    let title = format!(
        " Targets ({}/{}) [s:sort {}{}]{}{} ",
        targets.len(),
        data.targets.len(),
        sort_indicator,
        sort_dir,
        filter_info,
        position_info
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
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort targets by the given column and direction (public for use in app.rs)
pub fn sort_targets_by(targets: &mut [(usize, &TargetData)], column: SortColumn, ascending: bool) {
    let now = Utc::now();
    targets.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Url => a.1.url.cmp(&b.1.url),
            SortColumn::Latency => a.1.last_latency_ms.total_cmp(&b.1.last_latency_ms),
            SortColumn::AvgLatency => {
                let a_avg = a.1.avg_latency_ms().unwrap_or(0.0);
                let b_avg = b.1.avg_latency_ms().unwrap_or(0.0);
                a_avg.total_cmp(&b_avg)
            }
            SortColumn::Uptime => {
                let a_up = a.1.uptime(now).unwrap_or_default();
                let b_up = b.1.uptime(now).unwrap_or_default();
                a_up.cmp(&b_up)
            }
            SortColumn::Status => a.1.health.cmp(&b.1.health),
        };

        // Apply direction to primary comparison
        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        // Use secondary sort by URL for stability when primary values are equal
        if primary == std::cmp::Ordering::Equal {
            a.1.url.cmp(&b.1.url)
        } else {
            primary
        }
    });
}

fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string(); // 8 spaces placeholder
    }

    // Take last 8 values
    let values: Vec<u8> = data.iter().rev().take(8).rev().copied().collect();

    values.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

/// Format a millisecond latency compactly ("85ms", "1.25s")
pub fn format_latency_ms(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        format!("{:.0}ms", ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HealthStatus;

    fn target(url: &str, latency: f64, health: HealthStatus) -> TargetData {
        TargetData {
            url: url.into(),
            last_status: 200,
            last_latency_ms: latency,
            last_checked: None,
            is_up: health != HealthStatus::Critical,
            first_up_time: None,
            total_probe_count: 4,
            total_latency_sum: latency * 4.0,
            health,
        }
    }

    #[test]
    fn test_sort_by_latency() {
        let a = target("https://a.example", 300.0, HealthStatus::Healthy);
        let b = target("https://b.example", 100.0, HealthStatus::Healthy);
        let c = target("https://c.example", 200.0, HealthStatus::Healthy);

        let mut targets: Vec<(usize, &TargetData)> =
            vec![(0, &a), (1, &b), (2, &c)];
        sort_targets_by(&mut targets, SortColumn::Latency, true);
        let order: Vec<_> = targets.iter().map(|(_, t)| t.url.as_str()).collect();
        assert_eq!(
            order,
            vec!["https://b.example", "https://c.example", "https://a.example"]
        );

        sort_targets_by(&mut targets, SortColumn::Latency, false);
        let order: Vec<_> = targets.iter().map(|(_, t)| t.url.as_str()).collect();
        assert_eq!(order[0], "https://a.example");
    }

    #[test]
    fn test_sort_ties_break_by_url() {
        let a = target("https://b.example", 100.0, HealthStatus::Healthy);
        let b = target("https://a.example", 100.0, HealthStatus::Healthy);

        let mut targets: Vec<(usize, &TargetData)> = vec![(0, &a), (1, &b)];
        sort_targets_by(&mut targets, SortColumn::Latency, true);
        assert_eq!(targets[0].1.url, "https://a.example");
    }

    #[test]
    fn test_sort_column_cycles() {
        let mut col = SortColumn::Url;
        for _ in 0..5 {
            col = col.next();
        }
        assert_eq!(col, SortColumn::Url);
    }

    #[test]
    fn test_format_latency_ms() {
        assert_eq!(format_latency_ms(85.0), "85ms");
        assert_eq!(format_latency_ms(1250.0), "1.25s");
    }

    #[test]
    fn test_render_sparkline() {
        assert_eq!(render_sparkline(&[]), "        ");
        assert_eq!(render_sparkline(&[0, 7]), "▁█");
        // Only the last 8 values are shown
        let long: Vec<u8> = (0..12).map(|i| (i % 8) as u8).collect();
        assert_eq!(render_sparkline(&long).chars().count(), 8);
    }
}

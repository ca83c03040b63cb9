//! Application state and navigation logic.

use anyhow::Result;
use chrono::Utc;

use crate::chart::ChartPreset;
use crate::data::{History, LatencySample, ProbeData, Thresholds, TimeRange};
use crate::source::DataSource;
use crate::ui::targets::SortColumn;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Target detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Stat tiles plus the latency chart for the selected target.
    Dashboard,
    /// Table of all targets with health status.
    Targets,
    /// Flat log of recent probes across all targets.
    History,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Targets,
            View::Targets => View::History,
            View::History => View::Dashboard,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Dashboard => View::History,
            View::Targets => View::Dashboard,
            View::History => View::Targets,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Targets => "Targets",
            View::History => "History",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub data: Option<ProbeData>,
    pub history: History,
    pub load_error: Option<String>,
    pub thresholds: Thresholds,

    // Navigation state
    pub selected_target_index: usize,
    pub history_index: usize,
    /// Inspected sample on the dashboard chart.
    pub sample_cursor: Option<usize>,

    // Sorting (Targets view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // Chart configuration
    pub chart_preset: ChartPreset,
    pub time_range: TimeRange,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App with the given data source and thresholds.
    pub fn new(source: Box<dyn DataSource>, thresholds: Thresholds) -> Self {
        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            show_detail_overlay: false,
            source,
            data: None,
            history: History::new(),
            load_error: None,
            thresholds,
            selected_target_index: 0,
            history_index: 0,
            sample_cursor: None,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            filter_text: String::new(),
            filter_active: false,
            chart_preset: ChartPreset::default(),
            time_range: TimeRange::default(),
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for new data.
    ///
    /// Returns Ok(true) if new data was received, Ok(false) if no new data,
    /// or Err if there was an error.
    pub fn reload_data(&mut self) -> Result<bool> {
        // Poll first so a recovered source can clear its error state
        if let Some(snapshot) = self.source.poll() {
            let data = ProbeData::from_snapshot(snapshot, &self.thresholds);

            // Record history before updating
            self.history.record(&data);
            self.data = Some(data);
            self.load_error = None;

            self.clamp_selection();
            Ok(true)
        } else {
            if let Some(err) = self.source.error() {
                self.load_error = Some(err.to_string());
            }
            Ok(false)
        }
    }

    fn clamp_selection(&mut self) {
        let Some(ref data) = self.data else {
            return;
        };
        if self.selected_target_index >= data.targets.len() {
            self.selected_target_index = data.targets.len().saturating_sub(1);
        }
        let chart_len = self.chart_samples().len();
        if let Some(cursor) = self.sample_cursor {
            if chart_len == 0 {
                self.sample_cursor = None;
            } else if cursor >= chart_len {
                self.sample_cursor = Some(chart_len - 1);
            }
        }
        let rows = self.history_row_count();
        if self.history_index >= rows {
            self.history_index = rows.saturating_sub(1);
        }
    }

    /// Switch to the next view (cycles Dashboard → Targets → History).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view (cycles History → Targets → Dashboard).
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Dashboard => {
                // Dashboard selects targets by raw index (no filtering)
                if let Some(ref data) = self.data {
                    let max = data.targets.len().saturating_sub(1);
                    self.selected_target_index = (self.selected_target_index + n).min(max);
                    self.sample_cursor = None;
                }
            }
            View::Targets => {
                // Navigate by visual position in filtered/sorted list
                if let Some(ref data) = self.data {
                    let filtered_count = self.filtered_target_count(data);
                    let max = filtered_count.saturating_sub(1);
                    self.selected_target_index = (self.selected_target_index + n).min(max);
                }
            }
            View::History => {
                let max = self.history_row_count().saturating_sub(1);
                self.history_index = (self.history_index + n).min(max);
            }
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Dashboard => {
                self.selected_target_index = self.selected_target_index.saturating_sub(n);
                self.sample_cursor = None;
            }
            View::Targets => {
                self.selected_target_index = self.selected_target_index.saturating_sub(n);
            }
            View::History => {
                self.history_index = self.history_index.saturating_sub(n);
            }
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        match self.current_view {
            View::Dashboard | View::Targets => self.selected_target_index = 0,
            View::History => self.history_index = 0,
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        match self.current_view {
            View::Dashboard => {
                if let Some(ref data) = self.data {
                    self.selected_target_index = data.targets.len().saturating_sub(1);
                }
            }
            View::Targets => {
                if let Some(ref data) = self.data {
                    let filtered_count = self.filtered_target_count(data);
                    self.selected_target_index = filtered_count.saturating_sub(1);
                }
            }
            View::History => {
                self.history_index = self.history_row_count().saturating_sub(1);
            }
        }
    }

    /// Get count of targets after applying filter.
    pub fn filtered_target_count(&self, data: &ProbeData) -> usize {
        if self.filter_text.is_empty() {
            return data.targets.len();
        }
        data.targets.iter().filter(|t| self.matches_filter(&t.url)).count()
    }

    /// Get the actual target index from the visual index (after
    /// sorting/filtering).
    ///
    /// The Targets view applies sorting and filtering, so the visual row
    /// index differs from the underlying data index. The Dashboard selects
    /// by raw index directly.
    pub fn get_selected_target_raw_index(&self) -> Option<usize> {
        let data = self.data.as_ref()?;

        match self.current_view {
            View::Targets => {
                let mut targets: Vec<(usize, &crate::data::TargetData)> = data
                    .targets
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| self.matches_filter(&t.url))
                    .collect();
                crate::ui::targets::sort_targets_by(
                    &mut targets,
                    self.sort_column,
                    self.sort_ascending,
                );

                targets.get(self.selected_target_index).map(|(idx, _)| *idx)
            }
            View::Dashboard | View::History => {
                if self.selected_target_index < data.targets.len() {
                    Some(self.selected_target_index)
                } else {
                    None
                }
            }
        }
    }

    /// The target driving the chart and the detail overlay.
    pub fn selected_target(&self) -> Option<&crate::data::TargetData> {
        let raw = self.get_selected_target_raw_index()?;
        self.data.as_ref()?.targets.get(raw)
    }

    /// Samples for the selected target, windowed by the active time range.
    pub fn chart_samples(&self) -> Vec<LatencySample> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };
        let Some(target) = self.selected_target() else {
            return Vec::new();
        };

        let samples = data.samples_for(&target.url);
        match self.time_range.cutoff(Utc::now()) {
            // Samples with unparseable timestamps survive windowing; the
            // chart shows them with a placeholder label
            Some(cutoff) => samples
                .iter()
                .filter(|s| s.timestamp.map_or(true, |ts| ts >= cutoff))
                .cloned()
                .collect(),
            None => samples.to_vec(),
        }
    }

    /// All history rows across targets, newest first.
    pub fn history_rows(&self) -> Vec<(String, LatencySample)> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };
        let mut rows: Vec<(String, LatencySample)> = data
            .history
            .iter()
            .flat_map(|(url, samples)| samples.iter().map(|s| (url.clone(), s.clone())))
            .collect();
        // Newest first; unparseable timestamps sink to the bottom
        rows.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
        rows
    }

    pub fn history_row_count(&self) -> usize {
        self.data
            .as_ref()
            .map(|d| d.history.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Move the chart sample cursor left (towards older samples).
    pub fn cursor_left(&mut self) {
        let len = self.chart_samples().len();
        if len == 0 {
            return;
        }
        self.sample_cursor = Some(match self.sample_cursor {
            Some(i) => i.saturating_sub(1),
            None => len - 1,
        });
    }

    /// Move the chart sample cursor right (towards newer samples).
    pub fn cursor_right(&mut self) {
        let len = self.chart_samples().len();
        if len == 0 {
            return;
        }
        self.sample_cursor = Some(match self.sample_cursor {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        });
    }

    /// Toggle between the two chart presets.
    pub fn toggle_chart_preset(&mut self) {
        self.chart_preset = self.chart_preset.toggled();
        self.sample_cursor = None;
    }

    /// Cycle the chart time range.
    pub fn cycle_time_range(&mut self) {
        self.time_range = self.time_range.next();
        self.sample_cursor = None;
    }

    /// Open the detail overlay for the currently selected target.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Dashboard || self.current_view == View::Targets {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to the Dashboard.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.sample_cursor.is_some() {
            self.sample_cursor = None;
            return;
        }
        if self.current_view != View::Dashboard {
            self.current_view = View::Dashboard;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column (Targets view).
    pub fn cycle_sort(&mut self) {
        if self.current_view == View::Targets {
            self.sort_column = self.sort_column.next();
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        if self.current_view == View::Targets {
            self.sort_ascending = !self.sort_ascending;
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a target URL matches the current filter.
    pub fn matches_filter(&self, url: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        url.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        let mut export = serde_json::Map::new();

        // Summary
        let mut summary = serde_json::Map::new();
        summary.insert(
            "total_targets".to_string(),
            serde_json::json!(data.targets.len()),
        );

        let healthy = data
            .targets
            .iter()
            .filter(|t| t.health == crate::data::HealthStatus::Healthy)
            .count();
        let warning = data
            .targets
            .iter()
            .filter(|t| t.health == crate::data::HealthStatus::Warning)
            .count();
        let critical = data
            .targets
            .iter()
            .filter(|t| t.health == crate::data::HealthStatus::Critical)
            .count();

        summary.insert("healthy".to_string(), serde_json::json!(healthy));
        summary.insert("warning".to_string(), serde_json::json!(warning));
        summary.insert("critical".to_string(), serde_json::json!(critical));
        summary.insert(
            "global_avg_latency_ms".to_string(),
            serde_json::json!(data.global_avg_latency_ms()),
        );
        summary.insert(
            "uptime_percent".to_string(),
            serde_json::json!(data.uptime_percent()),
        );

        export.insert("summary".to_string(), serde_json::Value::Object(summary));

        // Targets
        let targets: Vec<serde_json::Value> = data
            .targets
            .iter()
            .map(|t| {
                serde_json::json!({
                    "url": t.url,
                    "last_status": t.last_status,
                    "last_latency_ms": t.last_latency_ms,
                    "is_up": t.is_up,
                    "avg_latency_ms": t.avg_latency_ms(),
                    "total_probe_count": t.total_probe_count,
                    "health": format!("{:?}", t.health)
                })
            })
            .collect();
        export.insert("targets".to_string(), serde_json::Value::Array(targets));

        // History
        let history: Vec<serde_json::Value> = self
            .history_rows()
            .iter()
            .map(|(url, sample)| {
                serde_json::json!({
                    "url": url,
                    "latency_ms": sample.latency_ms,
                    "timestamp": sample.raw_timestamp
                })
            })
            .collect();
        export.insert("history".to_string(), serde_json::Value::Array(history));

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, ProbeSnapshot, SerializedSample, SerializedTarget};

    fn snapshot() -> ProbeSnapshot {
        ProbeSnapshot {
            targets: vec![
                SerializedTarget {
                    url: "https://a.example".into(),
                    last_status: 200,
                    last_latency_ms: 50.0,
                    last_checked: Some("2024-05-01T10:02:00Z".into()),
                    is_up: true,
                    first_up_time: Some("2024-05-01T08:00:00Z".into()),
                    total_probe_count: 3,
                    total_latency_sum: 150.0,
                },
                SerializedTarget {
                    url: "https://b.example".into(),
                    last_status: 0,
                    last_latency_ms: 5000.0,
                    last_checked: Some("2024-05-01T10:02:00Z".into()),
                    is_up: false,
                    first_up_time: None,
                    total_probe_count: 2,
                    total_latency_sum: 400.0,
                },
            ],
            history: vec![
                SerializedSample {
                    url: "https://a.example".into(),
                    latency_ms: 40.0,
                    timestamp: "2024-05-01T10:00:00Z".into(),
                },
                SerializedSample {
                    url: "https://a.example".into(),
                    latency_ms: 50.0,
                    timestamp: "2024-05-01T10:01:00Z".into(),
                },
            ],
        }
    }

    fn app_with_data() -> App {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Thresholds::default());
        tx.send(snapshot()).unwrap();
        let _ = app.reload_data();
        app
    }

    #[test]
    fn test_reload_populates_data() {
        let app = app_with_data();
        let data = app.data.as_ref().unwrap();
        assert_eq!(data.targets.len(), 2);
        // Worst first: the down target leads
        assert_eq!(data.targets[0].url, "https://b.example");
    }

    #[test]
    fn test_view_cycling() {
        let mut app = app_with_data();
        assert_eq!(app.current_view, View::Dashboard);
        app.next_view();
        assert_eq!(app.current_view, View::Targets);
        app.next_view();
        assert_eq!(app.current_view, View::History);
        app.next_view();
        assert_eq!(app.current_view, View::Dashboard);
        app.prev_view();
        assert_eq!(app.current_view, View::History);
    }

    #[test]
    fn test_chart_samples_follow_selected_target() {
        let mut app = app_with_data();
        // Sorted worst-first, so index 0 is b.example with no history
        assert!(app.chart_samples().is_empty());

        app.select_next();
        assert_eq!(app.selected_target().unwrap().url, "https://a.example");
        assert_eq!(app.chart_samples().len(), 2);
    }

    #[test]
    fn test_sample_cursor_bounds() {
        let mut app = app_with_data();
        app.select_next(); // a.example, 2 samples

        app.cursor_left();
        assert_eq!(app.sample_cursor, Some(1));
        app.cursor_left();
        assert_eq!(app.sample_cursor, Some(0));
        app.cursor_left();
        assert_eq!(app.sample_cursor, Some(0));

        app.cursor_right();
        assert_eq!(app.sample_cursor, Some(1));
        app.cursor_right();
        assert_eq!(app.sample_cursor, Some(1));
    }

    #[test]
    fn test_history_rows_newest_first() {
        let app = app_with_data();
        let rows = app.history_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1.latency_ms, 50.0);
        assert_eq!(rows[1].1.latency_ms, 40.0);
        assert_eq!(app.history_row_count(), 2);
    }

    #[test]
    fn test_filter_matches_urls() {
        let mut app = app_with_data();
        app.filter_text = "a.exam".into();
        assert!(app.matches_filter("https://a.example"));
        assert!(!app.matches_filter("https://b.example"));
        assert_eq!(app.filtered_target_count(app.data.as_ref().unwrap()), 1);
    }

    #[test]
    fn test_go_back_closes_overlay_then_returns_to_dashboard() {
        let mut app = app_with_data();
        app.set_view(View::Targets);
        app.enter_detail();
        assert!(app.show_detail_overlay);

        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Targets);

        app.go_back();
        assert_eq!(app.current_view, View::Dashboard);
    }

    #[test]
    fn test_export_state() {
        let app = app_with_data();
        let file = tempfile::NamedTempFile::new().unwrap();
        app.export_state(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["summary"]["total_targets"], 2);
        assert_eq!(parsed["targets"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["history"].as_array().unwrap().len(), 2);
    }
}

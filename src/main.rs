// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod chart;
mod data;
mod events;
mod source;
mod ui;

#[cfg(feature = "probe")]
mod probe;

use app::{App, View};
use data::TimeRange;
use source::{DataSource, FileSource, StreamSource};

#[derive(Parser, Debug)]
#[command(name = "probewatch")]
#[command(about = "Diagnostic TUI for monitoring HTTP endpoint latency and uptime")]
struct Args {
    /// Path to a probe snapshot JSON file
    #[cfg_attr(
        feature = "probe",
        arg(short, long, default_value = "probes.json", conflicts_with_all = ["connect", "probe", "target"])
    )]
    #[cfg_attr(
        not(feature = "probe"),
        arg(short, long, default_value = "probes.json", conflicts_with_all = ["connect"])
    )]
    file: PathBuf,

    /// Connect to a TCP endpoint for live snapshots (host:port)
    #[cfg_attr(
        feature = "probe",
        arg(short, long, conflicts_with_all = ["file", "probe", "target"])
    )]
    #[cfg_attr(
        not(feature = "probe"),
        arg(short, long, conflicts_with_all = ["file"])
    )]
    connect: Option<String>,

    /// Probe targets listed in a TOML config file.
    /// See ProbeSettings for the file format.
    #[cfg(feature = "probe")]
    #[arg(short, long, conflicts_with_all = ["file", "connect", "target"])]
    probe: Option<PathBuf>,

    /// Probe an ad-hoc target URL (repeatable)
    #[cfg(feature = "probe")]
    #[arg(short, long, conflicts_with_all = ["file", "connect", "probe"])]
    target: Vec<String>,

    /// Probe interval (used with --target; --probe reads it from the file)
    #[cfg(feature = "probe")]
    #[arg(long, default_value = "1m")]
    interval: String,

    /// Refresh interval in seconds (only used with --file)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Latency warning threshold (e.g., "500ms", "1s")
    #[arg(long, default_value = "500ms")]
    latency_warn: String,

    /// Latency critical threshold (e.g., "2s", "5s")
    #[arg(long, default_value = "2s")]
    latency_crit: String,

    /// Initial chart time range (1h, 4h, 1d, 1w, 1m, all)
    #[arg(long, default_value = "all")]
    range: String,

    /// Export current state to JSON file and exit
    #[cfg_attr(
        feature = "probe",
        arg(short, long, conflicts_with_all = ["connect", "probe", "target"])
    )]
    #[cfg_attr(
        not(feature = "probe"),
        arg(short, long, conflicts_with_all = ["connect"])
    )]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Parse threshold durations
    let latency_warn = data::duration::parse_duration(&args.latency_warn)
        .unwrap_or(Duration::from_millis(500));
    let latency_crit =
        data::duration::parse_duration(&args.latency_crit).unwrap_or(Duration::from_secs(2));

    let thresholds = data::Thresholds {
        latency_warning: latency_warn,
        latency_critical: latency_crit,
    };

    let range = TimeRange::from_label(&args.range).unwrap_or_default();

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&args.file, &export_path, &thresholds);
    }

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, thresholds, range);
    }

    // Handle probe mode (live HTTP probing)
    #[cfg(feature = "probe")]
    {
        if let Some(ref config_path) = args.probe {
            let settings = probe::ProbeSettings::load(config_path)?;
            return run_with_probe(settings, thresholds, range);
        }
        if !args.target.is_empty() {
            let settings = probe::ProbeSettings::from_targets(args.target.clone(), &args.interval)?;
            return run_with_probe(settings, thresholds, range);
        }
    }

    // Default: file-based mode
    run_with_file(&args.file, thresholds, range, Duration::from_secs(args.refresh))
}

/// Run with a file-based data source
fn run_with_file(
    path: &PathBuf,
    thresholds: data::Thresholds,
    range: TimeRange,
    refresh: Duration,
) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, thresholds, range, refresh)
}

/// Run with the built-in HTTP prober
#[cfg(feature = "probe")]
fn run_with_probe(
    settings: probe::ProbeSettings,
    thresholds: data::Thresholds,
    range: TimeRange,
) -> Result<()> {
    // Build a tokio runtime for the collector
    let rt = tokio::runtime::Runtime::new()?;

    let interval = settings.interval();
    let (source, handle) = rt.block_on(async {
        let (source, handle) = probe::start_collector(settings.targets, interval).await?;
        Ok::<_, anyhow::Error>((source, handle))
    })?;

    // Run the TUI in the main thread while the collector runs in the background
    let result = run_tui(Box::new(source), thresholds, range, Duration::from_millis(100));

    // Signal shutdown
    handle.abort();

    result
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, thresholds: data::Thresholds, range: TimeRange) -> Result<()> {
    // Build a tokio runtime for the TCP connection
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn DataSource>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    // For TCP, we poll continuously (no refresh interval needed)
    run_tui(source, thresholds, range, Duration::from_millis(100))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    thresholds: data::Thresholds,
    range: TimeRange,
    refresh_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, thresholds);
    app.time_range = range;
    let _ = app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with fleet health
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Dashboard => ui::dashboard::render(frame, app, chunks[2]),
                View::Targets => ui::targets::render(frame, app, chunks[2]),
                View::History => ui::history::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Export current probe state to a JSON file
fn export_to_file(
    snapshot_path: &std::path::Path,
    export_path: &std::path::Path,
    thresholds: &data::Thresholds,
) -> Result<()> {
    use std::io::Write;

    let probe_data = data::ProbeData::load(snapshot_path, thresholds)?;

    // Build export structure
    let mut export = serde_json::Map::new();

    // Summary
    let mut summary = serde_json::Map::new();
    summary.insert(
        "total_targets".to_string(),
        serde_json::json!(probe_data.targets.len()),
    );

    let healthy =
        probe_data.targets.iter().filter(|t| t.health == data::HealthStatus::Healthy).count();
    let warning =
        probe_data.targets.iter().filter(|t| t.health == data::HealthStatus::Warning).count();
    let critical =
        probe_data.targets.iter().filter(|t| t.health == data::HealthStatus::Critical).count();

    summary.insert("healthy".to_string(), serde_json::json!(healthy));
    summary.insert("warning".to_string(), serde_json::json!(warning));
    summary.insert("critical".to_string(), serde_json::json!(critical));
    summary.insert(
        "global_avg_latency_ms".to_string(),
        serde_json::json!(probe_data.global_avg_latency_ms()),
    );
    summary.insert(
        "uptime_percent".to_string(),
        serde_json::json!(probe_data.uptime_percent()),
    );

    export.insert("summary".to_string(), serde_json::Value::Object(summary));

    // Targets
    let targets: Vec<serde_json::Value> = probe_data
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

    // Targets needing attention
    let unhealthy: Vec<serde_json::Value> = probe_data
        .targets
        .iter()
        .filter(|t| t.health != data::HealthStatus::Healthy)
        .map(|t| {
            serde_json::json!({
                "url": t.url,
                "status": format!("{:?}", t.health),
                "last_status": t.last_status,
                "last_latency_ms": t.last_latency_ms
            })
        })
        .collect();
    export.insert("unhealthy".to_string(), serde_json::Value::Array(unhealthy));

    // Write to file
    let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
    let mut file = std::fs::File::create(export_path)?;
    file.write_all(json.as_bytes())?;

    println!("Exported probe state to: {}", export_path.display());
    Ok(())
}

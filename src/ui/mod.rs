//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`dashboard`]: Stat tiles plus the latency chart for the selected target
//! - [`targets`]: Sortable table of all targets with health status
//! - [`history`]: Flat log of recent probes across all targets
//! - [`detail`]: Modal overlay showing detailed target information
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` calls into these modules based on the current view:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (dashboard/targets/history::render)  │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod dashboard;
pub mod detail;
pub mod history;
pub mod targets;
pub mod theme;

pub use targets::SortColumn;
pub use theme::Theme;

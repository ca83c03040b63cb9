use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow scrolling through targets while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::PageUp => app.select_prev_n(10),
            KeyCode::PageDown => app.select_next_n(10),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    // If filter input is active, handle text input
    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access (Detail is overlay-only, accessed via Enter)
        KeyCode::Char('1') => app.set_view(View::Dashboard),
        KeyCode::Char('2') => app.set_view(View::Targets),
        KeyCode::Char('3') => app.set_view(View::History),

        // Navigation (up/down for items; left/right inspect samples on the
        // dashboard and switch views elsewhere)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left => {
            if app.current_view == View::Dashboard {
                app.cursor_left();
            } else {
                app.prev_view();
            }
        }
        KeyCode::Right => {
            if app.current_view == View::Dashboard {
                app.cursor_right();
            } else {
                app.next_view();
            }
        }
        KeyCode::Char('h') => app.prev_view(),
        KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Enter detail overlay
        KeyCode::Enter => app.enter_detail(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Reload
        KeyCode::Char('r') => {
            let _ = app.reload_data();
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Chart controls (Dashboard view)
        KeyCode::Char('t') => {
            if app.current_view == View::Dashboard {
                app.cycle_time_range();
            }
        }
        KeyCode::Char('p') => {
            if app.current_view == View::Dashboard {
                app.toggle_chart_preset();
            }
        }

        // Sorting (Targets view)
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('S') => app.toggle_sort_direction(),

        // Filter (start typing to filter)
        KeyCode::Char('/') => {
            if app.current_view != View::Dashboard {
                app.start_filter();
            }
        }

        // Clear filter
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Export
        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from("probewatch_export.json");
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm filter
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Cancel filter (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_filter();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        // Backspace
        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        // Type characters
        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => {
            app.select_prev();
        }
        MouseEventKind::ScrollDown => {
            app.select_next();
        }

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            // Calculate which row was clicked (accounting for header/tabs)
            let clicked_row = mouse.row;

            // Check if clicking in content area (after header, tabs, table header)
            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;

                match app.current_view {
                    View::Targets => {
                        if let Some(ref data) = app.data {
                            let filtered_count = app.filtered_target_count(data);
                            // Set visual index directly
                            if item_row < filtered_count {
                                app.selected_target_index = item_row;
                            }
                        }
                    }
                    View::History => {
                        if item_row < app.history_row_count() {
                            app.history_index = item_row;
                        }
                    }
                    View::Dashboard => {
                        // The dashboard has no row list to click
                    }
                }
            }

            // Check for tab clicks (row 1, after header)
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Dashboard (0-13), Targets (14-25), History (26-37)
                if col < 14 {
                    app.set_view(View::Dashboard);
                } else if col < 26 {
                    app.set_view(View::Targets);
                } else if col < 38 {
                    app.set_view(View::History);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => {
            app.go_back();
        }

        _ => {}
    }
}

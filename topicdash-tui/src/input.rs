//! Keyboard input dispatch: overlays, then global keys, then the focused pane.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Focus, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    let tables = app.shell.table_count();
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Tab => {
            app.focus = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus.prev(tables)
            } else {
                app.focus.next(tables)
            };
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev(tables);
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('f') => {
            app.toggle_encoding();
            return;
        }
        _ => {}
    }

    // 3. Pane-specific keys.
    match app.focus {
        Focus::Timecourse => handle_timecourse_key(app, key),
        Focus::Table(i) => handle_table_key(app, i, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_timecourse_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_facet(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_facet(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_timepoint(1),
        KeyCode::Char('h') | KeyCode::Left => app.move_timepoint(-1),
        KeyCode::Char(']') => app.move_topic(1),
        KeyCode::Char('[') => app.move_topic(-1),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_cursor(),
        _ => {}
    }
}

fn handle_table_key(app: &mut AppState, table: usize, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
            app.page_forward(table)
        }
        KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
            app.page_back(table)
        }
        KeyCode::Char('s') => app.toggle_sign(table),
        KeyCode::Char('r') => app.reset_table(table),
        _ => {}
    }
}

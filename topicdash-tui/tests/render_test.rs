//! Full-frame rendering against ratatui's TestBackend, plus a key-mashing
//! property test over the demo dataset.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

use topicdash_panels::{DashboardShell, TableOptions};
use topicdash_tui::app::Overlay;
use topicdash_tui::{input, sample_data, ui, AppState};

fn demo_app() -> AppState {
    let dataset = sample_data::sample_dataset().unwrap();
    let tissues = dataset.timecourse.tissues().to_vec();
    let shell = DashboardShell::from_dataset(&dataset, &TableOptions::default()).unwrap();
    AppState::new(shell, tissues)
}

fn draw(app: &AppState, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn first_frame_shows_chart_and_both_tables() {
    let app = demo_app();
    let screen = text(&draw(&app, 140, 48));
    assert!(screen.contains("Topic Timecourse (by tissue)"));
    assert!(screen.contains("Genes Correlated with k1"));
    assert!(screen.contains("Genes Correlated with k1 in liver"));
    assert!(screen.contains("Next Genes"));
    assert!(app.error_history.is_empty());
}

#[test]
fn paging_is_visible_in_the_next_frame() {
    let mut app = demo_app();
    input::handle_key(&mut app, press(KeyCode::Tab));
    input::handle_key(&mut app, press(KeyCode::Char('n')));
    let view = app.view.tables[0].as_ref().unwrap();
    assert_eq!(view.page_start, view.page_size.min(view.total - view.page_size));

    let screen = text(&draw(&app, 140, 48));
    assert!(screen.contains(&format!("{}-", view.page_start)));
}

#[test]
fn pooled_mode_retitles_the_chart() {
    let mut app = demo_app();
    input::handle_key(&mut app, press(KeyCode::Char('f')));
    let screen = text(&draw(&app, 140, 48));
    assert!(screen.contains("Topic Timecourse (pooled)"));
}

#[test]
fn help_overlay_draws_over_the_dashboard() {
    let mut app = demo_app();
    input::handle_key(&mut app, press(KeyCode::Char('?')));
    assert_eq!(app.overlay, Overlay::Help);
    let screen = text(&draw(&app, 140, 48));
    assert!(screen.contains("Keys [Esc]close"));
}

#[test]
fn tiny_terminal_does_not_panic() {
    let app = demo_app();
    draw(&app, 10, 4);
    draw(&app, 1, 1);
}

fn key_strategy() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Tab),
        Just(KeyCode::BackTab),
        Just(KeyCode::Enter),
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Esc),
        prop::sample::select(vec!['n', 'p', 's', 'r', 'f', '[', ']', 'h', 'j', 'k', 'l', 'e', '?'])
            .prop_map(KeyCode::Char),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_key_sequence_keeps_state_in_bounds(keys in prop::collection::vec(key_strategy(), 0..60)) {
        let mut app = demo_app();
        for code in keys {
            input::handle_key(&mut app, press(code));

            let tc = &app.view.timecourse;
            prop_assert!(app.cursor.facet < tc.facets.len().max(1));
            prop_assert!(app.cursor.timepoint < tc.timepoints.len().max(1));
            prop_assert!(app.cursor.topic < tc.topics.len().max(1));

            for view in app.view.tables.iter().flatten() {
                let max_start = view.total.saturating_sub(view.page_size);
                prop_assert!(view.page_start <= max_start);
                prop_assert!(view.rows.len() <= view.page_size);
            }
        }
        prop_assert!(app.running);
        draw(&app, 100, 30);
    }
}

//! Top-level layout: timecourse on the left, gene tables on the right,
//! color key above the tables, status bar along the bottom.

pub mod gene_table;
pub mod legend;
pub mod mini_plot;
pub mod overlays;
pub mod status_bar;
pub mod timecourse_chart;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use topicdash_panels::ChartEncoding;

use crate::app::{AppState, Focus, Overlay};
use crate::theme;

use self::timecourse_chart::TimecourseChart;

pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let main_area = chunks[0];
    let status_area = chunks[1];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_area);

    draw_timecourse(f, columns[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(columns[1]);
    legend::render(f, right[0], app);
    draw_tables(f, right[1], app);

    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

fn draw_timecourse(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Timecourse;
    let mode = match app.view.timecourse.encoding {
        ChartEncoding::TissueTopic => "by tissue",
        ChartEncoding::TopicOnly => "pooled",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(format!(" Topic Timecourse ({mode}) "))
        .title_style(theme::panel_title(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chart = TimecourseChart::new(&app.view.timecourse, focused.then_some(app.cursor));
    f.render_widget(chart, inner);
}

fn draw_tables(f: &mut Frame, area: Rect, app: &AppState) {
    let n = app.view.tables.len();
    if n == 0 {
        return;
    }
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, n as u32); n])
        .split(area);

    for (i, (table, rect)) in app.view.tables.iter().zip(areas.iter()).enumerate() {
        let focused = app.focus == Focus::Table(i);
        let title = match table {
            Ok(view) => format!(" {} [{}] ", view.title, i + 1),
            Err(_) => format!(" Table [{}] ", i + 1),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::panel_border(focused))
            .title(title)
            .title_style(theme::panel_title(focused));
        let inner = block.inner(*rect);
        f.render_widget(block, *rect);
        gene_table::render(f, inner, table, &app.tissues);
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

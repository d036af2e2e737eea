//! One gene table: paging controls, header, and rows with mini-plots.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use topicdash_core::Sign;
use topicdash_panels::{PanelError, TableView};

use crate::theme;
use crate::ui::mini_plot;

pub const ROW_HEIGHT: u16 = 3;
const RANK_W: usize = 5;
const GENE_W: usize = 10;
const SCORE_W: usize = 7;
const TEXT_W: u16 = (RANK_W + GENE_W + SCORE_W + 3) as u16;

pub fn render(f: &mut Frame, area: Rect, table: &Result<TableView, PanelError>, tissues: &[String]) {
    match table {
        Ok(view) => render_view(f, area, view, tissues),
        Err(err) => {
            let lines = vec![
                Line::from(Span::styled(err.to_string(), theme::negative())),
                Line::from(Span::styled("press e for error history", theme::muted())),
            ];
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
        }
    }
}

fn render_view(f: &mut Frame, area: Rect, view: &TableView, tissues: &[String]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(Paragraph::new(controls_line(view)), chunks[0]);

    let [rank, gene, score, cpm] = view.header();
    let header = format!(
        "{rank:>RANK_W$} {gene:<GENE_W$} {score:>SCORE_W$}  {cpm}"
    );
    f.render_widget(Paragraph::new(Span::styled(header, theme::accent_bold())), chunks[1]);

    let body = chunks[2];
    if view.rows.is_empty() {
        let msg = format!("No genes with a {} score.", view.sign);
        f.render_widget(Paragraph::new(Span::styled(msg, theme::muted())), body);
        return;
    }

    let score_style = match view.sign {
        Sign::Positive => theme::positive(),
        Sign::Negative => theme::negative(),
    };
    for (i, row) in view.rows.iter().enumerate() {
        let y = body.y + i as u16 * ROW_HEIGHT;
        if y + ROW_HEIGHT > body.bottom() {
            break;
        }
        let text_area = Rect::new(body.x, y + 1, TEXT_W.min(body.width), 1);
        let line = Line::from(vec![
            Span::styled(format!("{:>RANK_W$} ", row.rank), theme::muted()),
            Span::styled(format!("{:<GENE_W$.GENE_W$} ", row.gene), theme::text()),
            Span::styled(format!("{:>SCORE_W$}", row.score_label), score_style),
        ]);
        f.render_widget(Paragraph::new(line), text_area);

        let chart_x = body.x + TEXT_W + 1;
        if chart_x >= body.right() || row.charts.is_empty() {
            continue;
        }
        let chart_area = Rect::new(chart_x, y, body.right() - chart_x, ROW_HEIGHT);
        let slots = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, row.charts.len() as u32); row.charts.len()])
            .split(chart_area);
        for (plot, slot) in row.charts.iter().zip(slots.iter()) {
            mini_plot::render(f, *slot, plot, tissues);
        }
    }
}

fn controls_line(view: &TableView) -> Line<'static> {
    let range = if view.total == 0 {
        "0 of 0".to_string()
    } else {
        let end = (view.page_start + view.rows.len()).min(view.total);
        format!("{}-{} of {}", view.page_start, end.saturating_sub(1), view.total)
    };
    Line::from(vec![
        Span::styled(format!("[{}]", view.sign.label()), theme::accent()),
        Span::raw("  "),
        Span::styled(range, theme::text_dim()),
        Span::raw("  "),
        Span::styled("< Previous Genes", theme::control(view.can_page_back)),
        Span::raw("  "),
        Span::styled("Next Genes >", theme::control(view.can_page_forward)),
    ])
}

//! Per-gene expression sparkline: one Braille line per tissue.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use topicdash_panels::MiniPlot;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, plot: &MiniPlot, tissues: &[String]) {
    let Some((y_min, y_max)) = plot.y_bounds() else {
        f.render_widget(Paragraph::new(Span::styled("no data", theme::muted())), area);
        return;
    };
    let x_max = plot
        .lines
        .iter()
        .flat_map(|l| l.points.iter().map(|p| p.x))
        .fold(1.0, f64::max);

    let data: Vec<Vec<(f64, f64)>> = plot
        .lines
        .iter()
        .map(|l| l.points.iter().map(|p| (p.x, p.value)).collect())
        .collect();

    let datasets: Vec<Dataset> = plot
        .lines
        .iter()
        .zip(&data)
        .map(|(line, points)| {
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::tissue_color(tissues, &line.tissue)))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(Axis::default().bounds([y_min, y_max]));
    f.render_widget(chart, area);
}

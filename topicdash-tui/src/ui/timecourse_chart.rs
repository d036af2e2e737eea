//! Faceted stacked-bar chart of mean topic weights.
//!
//! One facet per tissue (or a single pooled facet), one bar per timepoint,
//! segments stacked bottom-up in topic order and colored by topic. The
//! cursor segment is drawn with a shaded glyph.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use topicdash_panels::{Facet, TimecourseView};

use crate::app::ChartCursor;
use crate::theme;

const FULL: &str = "\u{2588}"; // █
const SELECTED: &str = "\u{2593}"; // ▓

pub struct TimecourseChart<'a> {
    view: &'a TimecourseView,
    cursor: Option<ChartCursor>,
}

impl<'a> TimecourseChart<'a> {
    pub fn new(view: &'a TimecourseView, cursor: Option<ChartCursor>) -> Self {
        Self { view, cursor }
    }

    fn render_facet(&self, index: usize, facet: &Facet, area: Rect, buf: &mut Buffer) {
        let title = facet.tissue.as_deref().unwrap_or("all tissues");
        let title_style = match self.cursor {
            Some(c) if c.facet == index => theme::accent_bold(),
            _ => theme::text_dim(),
        };
        buf.set_stringn(area.x, area.y, title, area.width as usize, title_style);

        let columns = facet.columns.len() as u16;
        if columns == 0 || area.height < 3 {
            return;
        }
        let col_w = (area.width / columns).max(1);
        let bar_w = col_w.saturating_sub(1).max(1);
        let label_y = area.bottom() - 1;
        let bar_bottom = label_y - 1;
        let bar_h = area.height - 2;
        let scale = if self.view.max_total > 0.0 {
            bar_h as f64 / self.view.max_total
        } else {
            0.0
        };

        for (c, column) in facet.columns.iter().enumerate() {
            let x0 = area.x + c as u16 * col_w;
            if x0 >= area.right() {
                break;
            }
            let width = bar_w.min(area.right() - x0);
            let on_column = matches!(self.cursor, Some(cur) if cur.facet == index && cur.timepoint == c);

            let mut cumulative = 0.0;
            for segment in &column.segments {
                let lo = (cumulative * scale).round() as u16;
                cumulative += segment.weight;
                let hi = ((cumulative * scale).round() as u16).min(bar_h);
                let topic_index = self
                    .view
                    .topics
                    .iter()
                    .position(|t| *t == segment.topic)
                    .unwrap_or(0);
                let selected = on_column
                    && matches!(self.cursor, Some(cur) if cur.topic == topic_index);
                let (glyph, style) = if selected {
                    (
                        SELECTED,
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    (
                        FULL,
                        Style::default().fg(theme::topic_color(segment.topic.as_str(), topic_index)),
                    )
                };
                for row in lo..hi {
                    let y = bar_bottom - row;
                    for dx in 0..width {
                        buf.set_string(x0 + dx, y, glyph, style);
                    }
                }
            }

            let label_style = if on_column {
                theme::accent_bold()
            } else {
                theme::muted()
            };
            buf.set_stringn(
                x0,
                label_y,
                column.timepoint.as_str(),
                col_w as usize,
                label_style,
            );
        }
    }
}

impl Widget for TimecourseChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.view.facets.is_empty() || area.width < 4 || area.height < 4 {
            return;
        }

        // Footer row names the topic under the cursor.
        let chart_h = area.height - 1;
        if let Some(cur) = self.cursor {
            if let Some(topic) = self.view.topics.get(cur.topic) {
                let text = format!("topic {topic}  [ ] change  Enter select");
                let style = Style::default().fg(theme::topic_color(topic.as_str(), cur.topic));
                buf.set_stringn(area.x, area.bottom() - 1, text, area.width as usize, style);
            }
        }

        let facets = self.view.facets.len() as u16;
        let facet_h = (chart_h / facets).max(4);
        for (i, facet) in self.view.facets.iter().enumerate() {
            let y = area.y + i as u16 * facet_h;
            if y + facet_h > area.y + chart_h {
                break;
            }
            let rect = Rect {
                x: area.x,
                y,
                width: area.width,
                height: facet_h,
            };
            self.render_facet(i, facet, rect, buf);
        }
    }
}

//! Color keys: tissue colors for the mini-plots, topic colors for the bars.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

const SWATCH: &str = "\u{25A0}"; // ■

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Key ")
        .title_style(theme::text_dim());

    let mut tissues = vec![Span::styled("tissue ", theme::text_dim())];
    for tissue in &app.tissues {
        tissues.push(Span::styled(
            SWATCH,
            Style::default().fg(theme::tissue_color(&app.tissues, tissue)),
        ));
        tissues.push(Span::styled(format!(" {tissue}  "), theme::text()));
    }

    let mut topics = vec![Span::styled("topic  ", theme::text_dim())];
    for (i, topic) in app.view.timecourse.topics.iter().enumerate() {
        topics.push(Span::styled(
            SWATCH,
            Style::default().fg(theme::topic_color(topic.as_str(), i)),
        ));
        topics.push(Span::styled(format!("{topic} "), theme::text()));
    }

    let para = Paragraph::new(vec![Line::from(tissues), Line::from(topics)])
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

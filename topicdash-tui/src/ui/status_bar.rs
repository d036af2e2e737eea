//! Bottom status bar: key hints for the focused pane, then the last message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Focus, StatusLevel};
use crate::theme;

pub fn hints(focus: Focus) -> &'static str {
    match focus {
        Focus::Timecourse => " hjkl:move [ ]:topic Enter:select f:pool Tab:focus ?:help q:quit",
        Focus::Table(_) => " n/p:page s:sign r:reset f:pool Tab:focus ?:help q:quit",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::styled(hints(app.focus), theme::muted())];

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    if !app.error_history.is_empty() {
        spans.push(Span::styled(
            format!(" [{} errors: e]", app.error_history.len()),
            theme::negative(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

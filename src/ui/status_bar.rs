use crate::app::App;
use ratatui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

const STATUS_TTL_SECS: u64 = 5;

pub fn draw_status_bar<B: Backend>(f: &mut Frame, app: &mut App, area: Rect) {
    let expired = match &app.status_message {
        Some((_, timestamp)) => timestamp.elapsed().as_secs() >= STATUS_TTL_SECS,
        None => return,
    };
    if expired {
        app.clear_status_message();
        return;
    }

    if let Some((message, _)) = &app.status_message {
        let lower = message.to_lowercase();
        let style = if lower.starts_with("error") || lower.contains("failed") {
            Style::default().fg(Color::Red)
        } else if lower.starts_with("warning") {
            Style::default().fg(Color::Yellow)
        } else if lower.starts_with("launched")
            || lower.contains("added")
            || lower.contains("updated")
            || lower.contains("deleted")
            || lower.contains("copied")
        {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let paragraph = Paragraph::new(message.as_str())
            .style(style)
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, area);
    }
}

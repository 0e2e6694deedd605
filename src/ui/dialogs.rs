use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::app::App;

pub fn draw_prompt<B: Backend>(f: &mut Frame, app: &App) {
    let Some(prompt) = &app.prompt else {
        return;
    };
    let area = centered_rect(60, 7, f.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}/2) ", prompt.title(), prompt.step() + 1))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(prompt.label()).style(Style::default().fg(Color::Gray)),
        rows[0],
    );

    // Keep the tail of long input visible
    let width = rows[2].width.saturating_sub(1) as usize;
    let chars: Vec<char> = prompt.input.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(width)..].iter().collect();
    let cursor_x = rows[2].x + visible.chars().count() as u16;
    f.render_widget(
        Paragraph::new(Span::styled(visible, Style::default().fg(Color::White))),
        rows[2],
    );
    f.set_cursor(cursor_x, rows[2].y);
}

pub fn draw_confirm<B: Backend>(f: &mut Frame, app: &App) {
    let question = app
        .pending_delete_description()
        .unwrap_or_else(|| "Delete selected item?".to_string());
    let area = centered_rect(50, 6, f.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Confirm ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(vec![
        Line::from(question),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Yes   [any other key] No",
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(block)
    .wrap(Wrap { trim: true })
    .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

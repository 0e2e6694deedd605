use ratatui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

pub fn draw_entries<B: Backend>(f: &mut Frame, app: &mut App, area: Rect) {
    let title = match app.input_mode {
        InputMode::Search => format!(" 🔍 Search: {}_ ", app.search_query),
        _ => " sshcl - SSH command launcher ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .title(title);

    if app.entries.is_empty() {
        let hint = if app.search_query.is_empty() {
            "No groups yet. Press [g] to add one."
        } else {
            "No matches."
        };
        let paragraph = Paragraph::new(hint)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .entries
        .iter()
        .map(|entry| {
            let spans = if entry.depth == 0 {
                vec![
                    Span::styled(
                        entry.label.clone(),
                        Style::default()
                            .fg(Color::LightYellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", entry.detail),
                        Style::default().fg(Color::Gray),
                    ),
                ]
            } else {
                vec![
                    Span::raw("  └ "),
                    Span::styled(entry.label.clone(), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("  → {}", entry.detail),
                        Style::default()
                            .fg(Color::Gray)
                            .add_modifier(Modifier::DIM),
                    ),
                ]
            };
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, area, &mut app.list_state);
}

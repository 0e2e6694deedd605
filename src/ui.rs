pub mod dialogs;
pub mod entries_list;
pub mod footer;
pub mod help_popup;
pub mod status_bar;

use crate::app::{App, InputMode};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub fn draw<B: Backend>(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(3),    // Main content
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(f.size());

    entries_list::draw_entries::<B>(f, app, chunks[0]);
    status_bar::draw_status_bar::<B>(f, app, chunks[1]);
    footer::draw_footer::<B>(f, app, chunks[2]);

    match app.input_mode {
        InputMode::Prompt => dialogs::draw_prompt::<B>(f, app),
        InputMode::Confirm => dialogs::draw_confirm::<B>(f, app),
        InputMode::Help => help_popup::render_help_popup::<B>(f, app),
        InputMode::Normal | InputMode::Search => {}
    }
}

/// Centers a box of `percent_x` width and fixed `height` inside `r`
pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height)) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

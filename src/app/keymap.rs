use crate::app::{App, InputMode};
use crate::models::Confirm;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Search => self.handle_search_key(key),
            InputMode::Prompt => self.handle_prompt_key(key),
            InputMode::Confirm => self.handle_confirm_key(key),
            InputMode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Enter => self.launch_selected(),
            KeyCode::Char('g') => self.start_add_group(),
            KeyCode::Char('a') => self.start_add_command(),
            KeyCode::Char('r') => self.start_edit(),
            KeyCode::Char('d') | KeyCode::Delete => self.start_delete(),
            KeyCode::Char('/') | KeyCode::Char('s') => self.enter_search_mode(),
            KeyCode::Char('y') => self.copy_selected(),
            KeyCode::Char('e') => self.edit_data_file(),
            KeyCode::Char('R') => self.reload(),
            KeyCode::Char('?') => {
                self.help_scroll_position = 0;
                self.input_mode = InputMode::Help;
            }
            KeyCode::Esc => self.clear_status_message(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.clear_search(),
            KeyCode::Enter => self.launch_selected(),
            KeyCode::Down => self.select_next(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Backspace => {
                self.search_query.pop();
                self.update_search();
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.update_search();
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_prompt(),
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Backspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.backspace();
                }
            }
            KeyCode::Char(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.push_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let confirm = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        self.answer_delete(Confirm::from(confirm));
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.help_scroll_position = self.help_scroll_position.saturating_add(1)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.help_scroll_position = self.help_scroll_position.saturating_sub(1)
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.input_mode = InputMode::Normal
            }
            _ => {}
        }
    }
}

use crate::launcher::LaunchSettings;
use crate::model::Model;
use crate::models::{Entry, NodeHandle};

use super::prompt::Prompt;
use ratatui::widgets::ListState;
use std::time::{Instant, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Prompt,
    Confirm,
    Help,
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub model: Model,
    pub settings: LaunchSettings,
    pub input_mode: InputMode,

    pub status_message: Option<(String, Instant)>,

    // Visible rows, the flattened hierarchy or a filtered subset of it
    pub entries: Vec<Entry>,
    pub selected: usize,
    pub list_state: ListState,

    // Search Mode
    pub search_query: String,

    // Dialogs
    pub prompt: Option<Prompt>,
    pub pending_delete: Option<NodeHandle>,
    pub help_scroll_position: u16,

    // Set once the document was handed to an external editor
    pub watched_mtime: Option<SystemTime>,
}

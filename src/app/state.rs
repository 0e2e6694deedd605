use crate::app::App;
use crate::error::{EntityKind, LauncherError};
use crate::launcher::{self, LaunchSettings};
use crate::model::{Model, Removed};
use crate::models::{Confirm, Entity, NodeHandle, Selection};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::widgets::ListState;
use std::time::Instant;

use super::prompt::{Prompt, PromptAction};
use super::types::InputMode;

impl App {
    /// `warnings` are startup problems (config, logging, a broken document)
    /// shown once in the status bar.
    pub fn new(model: Model, settings: LaunchSettings, warnings: Vec<String>) -> Self {
        let mut app = Self {
            should_quit: false,
            model,
            settings,
            input_mode: InputMode::Normal,
            status_message: None,
            entries: Vec::new(),
            selected: 0,
            list_state: ListState::default(),
            search_query: String::new(),
            prompt: None,
            pending_delete: None,
            help_scroll_position: 0,
            watched_mtime: None,
        };
        app.refresh_entries();
        if !warnings.is_empty() {
            app.set_status(format!("Warning: {}", warnings.join("; ")));
        }
        app
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    /// Shows an error in the status bar. Nothing here is fatal.
    pub fn report(&mut self, error: LauncherError) {
        match error {
            LauncherError::Cancelled => self.set_status("Cancelled"),
            e if e.is_persistence() => {
                tracing::warn!("{}", e);
                self.set_status(format!("Warning: {}", e));
            }
            e => {
                tracing::info!("Operation rejected: {}", e);
                self.set_status(format!("Error: {}", e));
            }
        }
    }

    fn selected_handle(&self) -> Option<NodeHandle> {
        self.entries.get(self.selected).map(|e| e.handle)
    }

    /// What the core should act on. Filtered views select by handle since
    /// their row numbers are not flattened positions.
    pub fn current_selection(&self) -> Selection {
        match self.selected_handle() {
            None => Selection::None,
            Some(handle) if !self.search_query.is_empty() => Selection::Node(handle),
            Some(handle) => self
                .model
                .hierarchy()
                .index_of(handle)
                .map_or(Selection::None, Selection::Index),
        }
    }

    /// Rebuilds the visible rows from the model, keeping the selected node
    /// when it still exists.
    pub fn refresh_entries(&mut self) {
        let keep = self.selected_handle();
        let all = self.model.hierarchy().entries();

        self.entries = if self.search_query.is_empty() {
            all
        } else {
            let matcher = SkimMatcherV2::default();
            all.into_iter()
                .filter(|e| {
                    matcher
                        .fuzzy_match(&format!("{} {}", e.label, e.detail), &self.search_query)
                        .is_some()
                })
                .collect()
        };

        self.selected = keep
            .and_then(|h| self.entries.iter().position(|e| e.handle == h))
            .unwrap_or_else(|| self.selected.min(self.entries.len().saturating_sub(1)));
        self.sync_list_state();
    }

    fn sync_list_state(&mut self) {
        if self.entries.is_empty() {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.selected));
        }
    }

    fn focus(&mut self, handle: NodeHandle) {
        if let Some(pos) = self.entries.iter().position(|e| e.handle == handle) {
            self.selected = pos;
            self.sync_list_state();
        }
    }

    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.entries.len();
        self.sync_list_state();
    }

    pub fn select_previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let total = self.entries.len();
        self.selected = (self.selected + total - 1) % total;
        self.sync_list_state();
    }

    // Search logic
    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_query.clear();
        self.refresh_entries();
    }

    pub fn update_search(&mut self) {
        self.selected = 0;
        self.refresh_entries();
    }

    /// Leaves search, keeping the node that was selected in the filtered view.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.input_mode = InputMode::Normal;
        self.refresh_entries();
    }

    pub fn reload(&mut self) {
        match self.model.reload() {
            Some(e) => self.report(e),
            None => self.set_status(format!(
                "Reloaded {} groups",
                self.model.hierarchy().groups().len()
            )),
        }
        self.refresh_entries();
    }

    // Launching
    pub fn launch_selected(&mut self) {
        let selection = self.current_selection();
        let line = match self.model.launch_string(&selection, self.settings.style) {
            Ok(line) => line,
            Err(e) => return self.report(e),
        };
        match launcher::launch(&line, &self.settings) {
            Ok(()) => self.set_status(format!("Launched: {}", line)),
            Err(e) => self.report(e),
        }
    }

    pub fn copy_selected(&mut self) {
        let selection = self.current_selection();
        let line = match self.model.launch_string(&selection, self.settings.style) {
            Ok(line) => line,
            Err(e) => return self.report(e),
        };
        match arboard::Clipboard::new().and_then(|mut c| c.set_text(line)) {
            Ok(()) => self.set_status("Copied launch command to clipboard"),
            Err(e) => {
                tracing::error!("Clipboard error: {}", e);
                self.set_status(format!("Error: clipboard unavailable: {}", e));
            }
        }
    }

    // Dialogs
    pub fn start_add_group(&mut self) {
        self.open_prompt(Prompt::new(PromptAction::AddGroup));
    }

    pub fn start_add_command(&mut self) {
        let selection = self.current_selection();
        match self.model.hierarchy().resolve(&selection) {
            Ok(Entity::Group(g)) => {
                let action = PromptAction::AddCommand(NodeHandle::Group(g.id));
                self.open_prompt(Prompt::new(action));
            }
            Ok(Entity::Command(_)) => self.report(LauncherError::WrongKind {
                expected: EntityKind::Group,
                found: EntityKind::Command,
            }),
            Err(e) => self.report(e),
        }
    }

    pub fn start_edit(&mut self) {
        let selection = self.current_selection();
        let prompt = match self.model.hierarchy().resolve(&selection) {
            Ok(Entity::Group(g)) => Prompt::with_initial(
                PromptAction::EditGroup(NodeHandle::Group(g.id)),
                [g.name.clone(), g.host.clone()],
            ),
            Ok(Entity::Command(c)) => Prompt::with_initial(
                PromptAction::EditCommand(NodeHandle::Command(c.id)),
                [c.name.clone(), c.command.clone()],
            ),
            Err(e) => return self.report(e),
        };
        self.open_prompt(prompt);
    }

    fn open_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
        self.input_mode = InputMode::Prompt;
    }

    fn close_dialog(&mut self) {
        self.prompt = None;
        self.pending_delete = None;
        self.input_mode = if self.search_query.is_empty() {
            InputMode::Normal
        } else {
            InputMode::Search
        };
    }

    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        if let Some((name, value)) = prompt.submit() {
            let action = prompt.action;
            self.close_dialog();
            self.apply_prompt(action, Some(name.as_str()), Some(value.as_str()));
        }
    }

    pub fn cancel_prompt(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            let (name, value) = prompt.cancelled();
            self.close_dialog();
            self.apply_prompt(prompt.action, name.as_deref(), value.as_deref());
        }
    }

    fn apply_prompt(&mut self, action: PromptAction, name: Option<&str>, value: Option<&str>) {
        let result = match action {
            PromptAction::AddGroup => self
                .model
                .add_group(name, value)
                .map(|id| (NodeHandle::Group(id), "Group added")),
            PromptAction::EditGroup(h) => self
                .model
                .rename_group(&h.into(), name, value)
                .map(|_| (h, "Group updated")),
            PromptAction::AddCommand(h) => self
                .model
                .add_command(&h.into(), name, value)
                .map(|id| (NodeHandle::Command(id), "Command added")),
            PromptAction::EditCommand(h) => self
                .model
                .rename_command(&h.into(), name, value)
                .map(|_| (h, "Command updated")),
        };

        // A failed save still changed the hierarchy, so always refresh.
        self.refresh_entries();
        match result {
            Ok((handle, message)) => {
                self.focus(handle);
                self.set_status(message);
            }
            Err(e) => self.report(e),
        }
    }

    pub fn start_delete(&mut self) {
        let selection = self.current_selection();
        match self.model.hierarchy().resolve(&selection) {
            Ok(entity) => {
                self.pending_delete = Some(entity.handle());
                self.input_mode = InputMode::Confirm;
            }
            Err(e) => self.report(e),
        }
    }

    /// Name and kind of the entry awaiting delete confirmation.
    pub fn pending_delete_description(&self) -> Option<String> {
        let handle = self.pending_delete?;
        match self.model.hierarchy().resolve(&handle.into()).ok()? {
            Entity::Group(g) => Some(format!(
                "Delete group '{}' and its {} command(s)?",
                g.name,
                g.commands.len()
            )),
            Entity::Command(c) => Some(format!("Delete command '{}'?", c.name)),
        }
    }

    pub fn answer_delete(&mut self, confirm: Confirm) {
        let Some(handle) = self.pending_delete.take() else {
            return;
        };
        self.close_dialog();
        let result = self.model.delete(&handle.into(), confirm);
        self.refresh_entries();
        match result {
            Ok(Removed::Group { name, commands }) => {
                self.set_status(format!("Deleted group '{}' ({} commands)", name, commands))
            }
            Ok(Removed::Command { name }) => self.set_status(format!("Deleted command '{}'", name)),
            Err(LauncherError::NotConfirmed) => self.set_status("Delete cancelled"),
            Err(e) => self.report(e),
        }
    }

    /// Opens the document in the system editor. Saves made there are picked
    /// up by [`tick`](Self::tick).
    pub fn edit_data_file(&mut self) {
        let path = self.model.store().path().to_path_buf();
        if !path.exists() {
            if let Err(e) = self.model.store().save(self.model.hierarchy()) {
                return self.report(e);
            }
        }

        self.watch_data_file();
        if let Err(e) = open::that_detached(&path) {
            tracing::error!("Failed to open editor: {}", e);
            self.set_status(format!("Error: failed to open editor: {}", e));
            return;
        }
        self.set_status(format!("Opened {}, changes reload on save", path.display()));
    }

    fn watch_data_file(&mut self) {
        self.watched_mtime = self.model.store().modified();
    }

    /// Called on every pass of the event loop. Reloads the document once
    /// it changes on disk after `e`, unless it only holds what is already
    /// in memory (our own saves).
    pub fn tick(&mut self) {
        let Some(seen) = self.watched_mtime else {
            return;
        };
        let current = self.model.store().modified();
        if current.is_none() || current == Some(seen) {
            return;
        }
        self.watched_mtime = current;

        let on_disk = self.model.store().load();
        if on_disk.warning.is_none() && on_disk.hierarchy == *self.model.hierarchy() {
            return;
        }
        tracing::info!("Commands file changed on disk, reloading");
        self.reload();
    }
}

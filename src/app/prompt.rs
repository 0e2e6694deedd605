use crate::models::NodeHandle;

/// What a finished prompt is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    AddGroup,
    EditGroup(NodeHandle),
    AddCommand(NodeHandle),
    EditCommand(NodeHandle),
}

impl PromptAction {
    fn title(&self) -> &'static str {
        match self {
            PromptAction::AddGroup => "Add Group",
            PromptAction::EditGroup(_) => "Edit Group",
            PromptAction::AddCommand(_) => "Add Command",
            PromptAction::EditCommand(_) => "Edit Command",
        }
    }

    fn labels(&self) -> [&'static str; 2] {
        match self {
            PromptAction::AddGroup | PromptAction::EditGroup(_) => {
                ["Group name:", "Host (e.g., ssh user@host -p 22):"]
            }
            PromptAction::AddCommand(_) | PromptAction::EditCommand(_) => {
                ["Command name:", "Remote command (e.g., sudo systemctl status app):"]
            }
        }
    }
}

/// Two-field input dialog, one field at a time.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub action: PromptAction,
    pub input: String,
    initial: [String; 2],
    answers: Vec<String>,
}

impl Prompt {
    pub fn new(action: PromptAction) -> Self {
        Self::with_initial(action, [String::new(), String::new()])
    }

    /// Pre-fills each field, used when editing an existing entry.
    pub fn with_initial(action: PromptAction, initial: [String; 2]) -> Self {
        Self {
            action,
            input: initial[0].clone(),
            initial,
            answers: Vec::with_capacity(2),
        }
    }

    pub fn title(&self) -> &'static str {
        self.action.title()
    }

    pub fn label(&self) -> &'static str {
        self.action.labels()[self.step()]
    }

    /// Zero-based index of the field being edited.
    pub fn step(&self) -> usize {
        self.answers.len().min(1)
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Accepts the current field. Returns both answers once the last field
    /// is accepted.
    pub fn submit(&mut self) -> Option<(String, String)> {
        self.answers.push(std::mem::take(&mut self.input));
        if self.answers.len() < 2 {
            self.input = self.initial[1].clone();
            return None;
        }
        let value = self.answers.pop().unwrap_or_default();
        let name = self.answers.pop().unwrap_or_default();
        Some((name, value))
    }

    /// Answers collected so far, with `None` for every field not yet
    /// accepted. This is what a dismissed prompt hands to the model.
    pub fn cancelled(&self) -> (Option<String>, Option<String>) {
        (self.answers.first().cloned(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_two_fields() {
        let mut prompt = Prompt::new(PromptAction::AddGroup);
        assert_eq!(prompt.step(), 0);
        "web".chars().for_each(|c| prompt.push_char(c));
        assert_eq!(prompt.submit(), None);
        assert_eq!(prompt.step(), 1);
        "ssh web".chars().for_each(|c| prompt.push_char(c));
        assert_eq!(
            prompt.submit(),
            Some(("web".to_string(), "ssh web".to_string()))
        );
    }

    #[test]
    fn edit_prefills_each_field() {
        let mut prompt = Prompt::with_initial(
            PromptAction::AddGroup,
            ["old".to_string(), "ssh old".to_string()],
        );
        assert_eq!(prompt.input, "old");
        prompt.backspace();
        assert_eq!(prompt.submit(), None);
        assert_eq!(prompt.input, "ssh old");
        assert_eq!(
            prompt.submit(),
            Some(("ol".to_string(), "ssh old".to_string()))
        );
    }

    #[test]
    fn cancel_after_first_field_keeps_only_that_answer() {
        let mut prompt = Prompt::new(PromptAction::AddGroup);
        prompt.push_char('x');
        prompt.submit();
        assert_eq!(prompt.cancelled(), (Some("x".to_string()), None));
    }
}

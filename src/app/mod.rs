mod keymap;
mod prompt;
mod state;
mod types;

pub use types::{App, InputMode};

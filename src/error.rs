//! Error types for sshcl
//!
//! Every failure the launcher can report is a variant of [`LauncherError`].
//! None of them are fatal: callers turn them into a status message and the
//! application keeps running.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The two kinds of entity a selection can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Group,
    Command,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Group => f.write_str("group"),
            EntityKind::Command => f.write_str("command"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LauncherError {
    /// A required field was empty, or a group name is already taken
    #[error("Validation error: {0}")]
    Validation(String),

    /// Nothing is selected
    #[error("No item selected")]
    NoSelection,

    /// The selection resolved, but to the wrong kind of entity
    #[error("Selected item is a {found}, not a {expected}")]
    WrongKind {
        expected: EntityKind,
        found: EntityKind,
    },

    /// The index is out of range or the handle no longer exists
    #[error("Selected item does not exist")]
    NotFound,

    /// An irreversible delete was requested without confirmation
    #[error("Deletion was not confirmed")]
    NotConfirmed,

    /// The user dismissed an input prompt
    #[error("Cancelled")]
    Cancelled,

    /// A command was given to the builder without its owning group
    #[error("No owning group found for the selected command")]
    MissingOwner,

    /// The document exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document exists but is not a valid hierarchy
    #[error("Failed to parse {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be written
    #[error("Failed to save {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The terminal process could not be spawned
    #[error("Launch failed: {0}")]
    Launch(String),
}

impl LauncherError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// True for failures of the persisted document, as opposed to rejected
    /// operations. A failed save still leaves the in-memory change applied.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Read { .. } | Self::Corrupt { .. } | Self::Persistence { .. }
        )
    }
}

pub type Result<T, E = LauncherError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_kind_message_names_both_kinds() {
        let err = LauncherError::WrongKind {
            expected: EntityKind::Group,
            found: EntityKind::Command,
        };
        assert_eq!(err.to_string(), "Selected item is a command, not a group");
    }

    #[test]
    fn persistence_errors_are_flagged() {
        let err = LauncherError::Persistence {
            path: PathBuf::from("/tmp/commands.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_persistence());
        assert!(err.to_string().contains("/tmp/commands.json"));
        assert!(!LauncherError::NoSelection.is_persistence());
    }
}

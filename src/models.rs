use serde::{Deserialize, Serialize};

/// Opaque identity of a group, assigned when the group enters a hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) u64);

/// Opaque identity of a sub-command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CommandId(pub(crate) u64);

/// A named remote command run on the owning group's host after connecting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCommand {
    #[serde(skip)]
    pub id: CommandId,
    pub name: String,
    pub command: String,
}

/// A remote host shortcut with its ordered sub-commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(skip)]
    pub id: GroupId,
    pub name: String,
    pub host: String,
    #[serde(default)]
    pub commands: Vec<SubCommand>,
}

// Equality is structural; identity lives in the ids.
impl PartialEq for SubCommand {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.command == other.command
    }
}

impl Eq for SubCommand {}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.host == other.host && self.commands == other.commands
    }
}

impl Eq for Group {}

impl SubCommand {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: CommandId::default(),
            name: name.into(),
            command: command.into(),
        }
    }
}

impl Group {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            id: GroupId::default(),
            name: name.into(),
            host: host.into(),
            commands: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_command(mut self, command: SubCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn owns(&self, id: CommandId) -> bool {
        self.commands.iter().any(|c| c.id == id)
    }
}

/// Handle to a node of the hierarchy, stable across inserts and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeHandle {
    Group(GroupId),
    Command(CommandId),
}

/// What the presentation layer hands to the core to say "this one".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    /// Zero-based position in the flattened order
    Index(usize),
    Node(NodeHandle),
}

impl From<NodeHandle> for Selection {
    fn from(handle: NodeHandle) -> Self {
        Selection::Node(handle)
    }
}

/// A resolved selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity<'a> {
    Group(&'a Group),
    Command(&'a SubCommand),
}

impl Entity<'_> {
    pub fn handle(&self) -> NodeHandle {
        match self {
            Entity::Group(g) => NodeHandle::Group(g.id),
            Entity::Command(c) => NodeHandle::Command(c.id),
        }
    }
}

/// One row of the flattened view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub handle: NodeHandle,
    pub depth: u8,
    pub label: String,
    pub detail: String,
}

/// Confirmation token for irreversible deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
}

impl From<bool> for Confirm {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirm::Yes
        } else {
            Confirm::No
        }
    }
}

//! In-memory group / command hierarchy
//!
//! The flattened order (each group followed by its commands) is the only
//! mapping from a position to an entity. Index selections, [`Hierarchy::entries`]
//! and [`Hierarchy::index_of`] all walk it the same way.

use crate::error::{EntityKind, LauncherError, Result};
use crate::models::{
    CommandId, Confirm, Entity, Entry, Group, GroupId, NodeHandle, Selection, SubCommand,
};

#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    groups: Vec<Group>,
    next_id: u64,
}

/// Position of a resolved entity inside `groups`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Group(usize),
    Command(usize, usize),
}

impl PartialEq for Hierarchy {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl Eq for Hierarchy {}

/// Rejects cancelled input and answers that are blank once trimmed.
fn non_blank<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    let value = value.ok_or(LauncherError::Cancelled)?;
    if value.trim().is_empty() {
        return Err(LauncherError::validation(format!("{} must not be empty", field)));
    }
    Ok(value)
}

/// Names are stored trimmed.
fn trimmed_name(field: &str, value: Option<&str>) -> Result<String> {
    Ok(non_blank(field, value)?.trim().to_string())
}

/// Hosts and command lines go to the shell exactly as entered.
fn verbatim(field: &str, value: Option<&str>) -> Result<String> {
    Ok(non_blank(field, value)?.to_string())
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hierarchy from loaded groups, assigning fresh ids.
    pub fn from_groups(groups: Vec<Group>) -> Self {
        let mut hierarchy = Self::new();
        for mut group in groups {
            group.id = hierarchy.next_group_id();
            for command in &mut group.commands {
                command.id = hierarchy.next_command_id();
            }
            hierarchy.groups.push(group);
        }
        hierarchy
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of rows in the flattened order.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| 1 + g.commands.len()).sum()
    }

    fn next_group_id(&mut self) -> GroupId {
        self.next_id += 1;
        GroupId(self.next_id)
    }

    fn next_command_id(&mut self) -> CommandId {
        self.next_id += 1;
        CommandId(self.next_id)
    }

    fn name_taken(&self, name: &str, except: Option<GroupId>) -> bool {
        self.groups
            .iter()
            .any(|g| g.name == name && Some(g.id) != except)
    }

    fn locate(&self, selection: &Selection) -> Result<Location> {
        match *selection {
            Selection::None => Err(LauncherError::NoSelection),
            Selection::Index(index) => {
                let mut pos = 0;
                for (gi, group) in self.groups.iter().enumerate() {
                    if index == pos {
                        return Ok(Location::Group(gi));
                    }
                    pos += 1;
                    if index < pos + group.commands.len() {
                        return Ok(Location::Command(gi, index - pos));
                    }
                    pos += group.commands.len();
                }
                Err(LauncherError::NotFound)
            }
            Selection::Node(NodeHandle::Group(id)) => self
                .groups
                .iter()
                .position(|g| g.id == id)
                .map(Location::Group)
                .ok_or(LauncherError::NotFound),
            Selection::Node(NodeHandle::Command(id)) => self
                .groups
                .iter()
                .enumerate()
                .find_map(|(gi, g)| {
                    g.commands
                        .iter()
                        .position(|c| c.id == id)
                        .map(|ci| Location::Command(gi, ci))
                })
                .ok_or(LauncherError::NotFound),
        }
    }

    fn locate_group(&self, selection: &Selection) -> Result<usize> {
        match self.locate(selection)? {
            Location::Group(gi) => Ok(gi),
            Location::Command(..) => Err(LauncherError::WrongKind {
                expected: EntityKind::Group,
                found: EntityKind::Command,
            }),
        }
    }

    fn locate_command(&self, selection: &Selection) -> Result<(usize, usize)> {
        match self.locate(selection)? {
            Location::Command(gi, ci) => Ok((gi, ci)),
            Location::Group(_) => Err(LauncherError::WrongKind {
                expected: EntityKind::Command,
                found: EntityKind::Group,
            }),
        }
    }

    /// Returns the entity a selection points at.
    pub fn resolve(&self, selection: &Selection) -> Result<Entity<'_>> {
        Ok(match self.locate(selection)? {
            Location::Group(gi) => Entity::Group(&self.groups[gi]),
            Location::Command(gi, ci) => Entity::Command(&self.groups[gi].commands[ci]),
        })
    }

    /// Finds the group holding this exact command instance.
    pub fn find_owner(&self, command: CommandId) -> Option<&Group> {
        self.groups.iter().find(|g| g.owns(command))
    }

    pub fn add_group(&mut self, name: Option<&str>, host: Option<&str>) -> Result<GroupId> {
        let name = trimmed_name("Group name", name)?;
        let host = verbatim("Host", host)?;
        if self.name_taken(&name, None) {
            return Err(LauncherError::validation(format!(
                "A group named '{}' already exists",
                name
            )));
        }

        let id = self.next_group_id();
        self.groups.push(Group {
            id,
            ..Group::new(name, host)
        });
        Ok(id)
    }

    pub fn rename_group(
        &mut self,
        selection: &Selection,
        name: Option<&str>,
        host: Option<&str>,
    ) -> Result<()> {
        let gi = self.locate_group(selection)?;
        let name = trimmed_name("Group name", name)?;
        let host = verbatim("Host", host)?;
        let id = self.groups[gi].id;
        if self.name_taken(&name, Some(id)) {
            return Err(LauncherError::validation(format!(
                "A group named '{}' already exists",
                name
            )));
        }

        let group = &mut self.groups[gi];
        group.name = name;
        group.host = host;
        Ok(())
    }

    /// Removes a group together with all of its commands.
    pub fn delete_group(&mut self, selection: &Selection, confirm: Confirm) -> Result<Group> {
        let gi = self.locate_group(selection)?;
        if confirm != Confirm::Yes {
            return Err(LauncherError::NotConfirmed);
        }
        Ok(self.groups.remove(gi))
    }

    pub fn add_command(
        &mut self,
        selection: &Selection,
        name: Option<&str>,
        command: Option<&str>,
    ) -> Result<CommandId> {
        let gi = self.locate_group(selection)?;
        let name = trimmed_name("Command name", name)?;
        let command = verbatim("Command", command)?;

        let id = self.next_command_id();
        self.groups[gi].commands.push(SubCommand {
            id,
            ..SubCommand::new(name, command)
        });
        Ok(id)
    }

    pub fn rename_command(
        &mut self,
        selection: &Selection,
        name: Option<&str>,
        command: Option<&str>,
    ) -> Result<()> {
        let (gi, ci) = self.locate_command(selection)?;
        let name = trimmed_name("Command name", name)?;
        let command = verbatim("Command", command)?;

        let entry = &mut self.groups[gi].commands[ci];
        entry.name = name;
        entry.command = command;
        Ok(())
    }

    pub fn delete_command(
        &mut self,
        selection: &Selection,
        confirm: Confirm,
    ) -> Result<SubCommand> {
        let (gi, ci) = self.locate_command(selection)?;
        if confirm != Confirm::Yes {
            return Err(LauncherError::NotConfirmed);
        }
        Ok(self.groups[gi].commands.remove(ci))
    }

    /// The flattened view: every group followed by its commands.
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries = Vec::with_capacity(self.len());
        for group in &self.groups {
            entries.push(Entry {
                handle: NodeHandle::Group(group.id),
                depth: 0,
                label: group.name.clone(),
                detail: group.host.clone(),
            });
            for command in &group.commands {
                entries.push(Entry {
                    handle: NodeHandle::Command(command.id),
                    depth: 1,
                    label: command.name.clone(),
                    detail: command.command.clone(),
                });
            }
        }
        entries
    }

    /// Flattened position of a handle, if it still exists.
    pub fn index_of(&self, handle: NodeHandle) -> Option<usize> {
        let mut pos = 0;
        for group in &self.groups {
            if handle == NodeHandle::Group(group.id) {
                return Some(pos);
            }
            pos += 1;
            if let NodeHandle::Command(id) = handle {
                if let Some(ci) = group.commands.iter().position(|c| c.id == id) {
                    return Some(pos + ci);
                }
            }
            pos += group.commands.len();
        }
        None
    }
}

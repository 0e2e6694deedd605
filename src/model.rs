//! Hierarchy plus its store
//!
//! Every successful mutation is saved right away. When the save fails the
//! change stays applied in memory and the [`LauncherError::Persistence`] is
//! returned so the caller can tell the user; a rejected operation never
//! reaches the store.

use crate::error::{LauncherError, Result};
use crate::hierarchy::Hierarchy;
use crate::launcher::{self, CommandStyle};
use crate::models::{CommandId, Confirm, Entity, GroupId, Selection};
use crate::store::Store;

#[derive(Debug)]
pub struct Model {
    hierarchy: Hierarchy,
    store: Store,
}

/// What a kind-agnostic delete removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removed {
    Group { name: String, commands: usize },
    Command { name: String },
}

impl Model {
    /// Loads the store; a load failure comes back next to the (empty) model.
    pub fn open(store: Store) -> (Self, Option<LauncherError>) {
        let loaded = store.load();
        (
            Self {
                hierarchy: loaded.hierarchy,
                store,
            },
            loaded.warning,
        )
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Discards in-memory state and reads the document again.
    pub fn reload(&mut self) -> Option<LauncherError> {
        let loaded = self.store.load();
        self.hierarchy = loaded.hierarchy;
        loaded.warning
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.hierarchy).map_err(|e| {
            tracing::error!("{}", e);
            e
        })
    }

    pub fn add_group(&mut self, name: Option<&str>, host: Option<&str>) -> Result<GroupId> {
        let id = self.hierarchy.add_group(name, host)?;
        tracing::info!("Added group {}", name.unwrap_or_default());
        self.persist()?;
        Ok(id)
    }

    pub fn rename_group(
        &mut self,
        selection: &Selection,
        name: Option<&str>,
        host: Option<&str>,
    ) -> Result<()> {
        self.hierarchy.rename_group(selection, name, host)?;
        tracing::info!("Updated group {}", name.unwrap_or_default());
        self.persist()
    }

    pub fn delete_group(&mut self, selection: &Selection, confirm: Confirm) -> Result<()> {
        let group = self.hierarchy.delete_group(selection, confirm)?;
        tracing::info!(
            "Deleted group {:?} with {} commands",
            group.name,
            group.commands.len()
        );
        self.persist()
    }

    pub fn add_command(
        &mut self,
        selection: &Selection,
        name: Option<&str>,
        command: Option<&str>,
    ) -> Result<CommandId> {
        let id = self.hierarchy.add_command(selection, name, command)?;
        tracing::info!("Added command {}", name.unwrap_or_default());
        self.persist()?;
        Ok(id)
    }

    pub fn rename_command(
        &mut self,
        selection: &Selection,
        name: Option<&str>,
        command: Option<&str>,
    ) -> Result<()> {
        self.hierarchy.rename_command(selection, name, command)?;
        tracing::info!("Updated command {}", name.unwrap_or_default());
        self.persist()
    }

    pub fn delete_command(&mut self, selection: &Selection, confirm: Confirm) -> Result<()> {
        let command = self.hierarchy.delete_command(selection, confirm)?;
        tracing::info!("Deleted command {:?}", command.name);
        self.persist()
    }

    /// Deletes whatever the selection points at.
    pub fn delete(&mut self, selection: &Selection, confirm: Confirm) -> Result<Removed> {
        let removed = match self.hierarchy.resolve(selection)? {
            Entity::Group(g) => Removed::Group {
                name: g.name.clone(),
                commands: g.commands.len(),
            },
            Entity::Command(c) => Removed::Command {
                name: c.name.clone(),
            },
        };
        match removed {
            Removed::Group { .. } => self.delete_group(selection, confirm)?,
            Removed::Command { .. } => self.delete_command(selection, confirm)?,
        }
        Ok(removed)
    }

    /// Launch string for the selected group or command.
    pub fn launch_string(&self, selection: &Selection, style: CommandStyle) -> Result<String> {
        let entity = self.hierarchy.resolve(selection)?;
        let owner = match entity {
            Entity::Group(_) => None,
            Entity::Command(c) => self.hierarchy.find_owner(c.id),
        };
        launcher::build_launch_string(entity, owner, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> Model {
        let (model, warning) = Model::open(Store::new(dir.path().join("commands.json")));
        assert!(warning.is_none());
        model
    }

    fn seeded(dir: &TempDir) -> Model {
        let mut model = open(dir);
        model
            .add_group(Some("web"), Some("ssh user@192.168.1.1"))
            .unwrap();
        model
            .add_command(
                &Selection::Index(0),
                Some("View Config"),
                Some("sudo cat /var/default/app.properties"),
            )
            .unwrap();
        model
    }

    #[test]
    fn every_mutation_is_persisted() {
        let dir = TempDir::new().unwrap();
        let mut model = seeded(&dir);
        assert_eq!(open(&dir).hierarchy(), model.hierarchy());

        model
            .rename_command(&Selection::Index(1), Some("Config"), Some("cat /etc/app"))
            .unwrap();
        assert_eq!(open(&dir).hierarchy(), model.hierarchy());

        model.delete(&Selection::Index(0), Confirm::Yes).unwrap();
        assert!(open(&dir).hierarchy().is_empty());
    }

    #[test]
    fn cancelled_rename_does_not_touch_the_document() {
        let dir = TempDir::new().unwrap();
        let mut model = seeded(&dir);
        let path = dir.path().join("commands.json");
        fs::write(&path, "sentinel").unwrap();

        let err = model
            .rename_group(&Selection::Index(0), None, Some("ssh other"))
            .unwrap_err();
        assert!(matches!(err, LauncherError::Cancelled));
        assert_eq!(model.hierarchy().groups()[0].host, "ssh user@192.168.1.1");
        assert_eq!(fs::read_to_string(&path).unwrap(), "sentinel");
    }

    #[test]
    fn failed_save_keeps_the_change_in_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let (mut model, _) = Model::open(Store::new(blocker.join("commands.json")));

        let err = model.add_group(Some("web"), Some("ssh web")).unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(model.hierarchy().groups().len(), 1);
    }

    #[test]
    fn delete_reports_what_was_removed() {
        let dir = TempDir::new().unwrap();
        let mut model = seeded(&dir);
        assert!(matches!(
            model.delete(&Selection::Index(0), Confirm::No),
            Err(LauncherError::NotConfirmed)
        ));
        assert_eq!(
            model.delete(&Selection::Index(0), Confirm::Yes).unwrap(),
            Removed::Group {
                name: "web".to_string(),
                commands: 1
            }
        );
    }

    #[test]
    fn launch_string_finds_the_owner() {
        let dir = TempDir::new().unwrap();
        let model = seeded(&dir);
        assert_eq!(
            model
                .launch_string(&Selection::Index(1), CommandStyle::Elevated)
                .unwrap(),
            r#"ssh user@192.168.1.1 -t "sudo -i bash -c 'sudo cat /var/default/app.properties; exec bash'""#
        );
        assert_eq!(
            model
                .launch_string(&Selection::Index(0), CommandStyle::Elevated)
                .unwrap(),
            "ssh user@192.168.1.1"
        );
        assert!(matches!(
            model.launch_string(&Selection::None, CommandStyle::Elevated),
            Err(LauncherError::NoSelection)
        ));
    }

    #[test]
    fn corrupt_document_opens_empty_with_warning() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("commands.json"), "[{]").unwrap();
        let (model, warning) = Model::open(Store::new(dir.path().join("commands.json")));
        assert!(model.hierarchy().is_empty());
        assert!(matches!(warning, Some(LauncherError::Corrupt { .. })));
    }
}

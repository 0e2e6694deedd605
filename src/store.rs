use crate::error::{LauncherError, Result};
use crate::hierarchy::Hierarchy;
use crate::models::Group;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Result of loading the document. A broken document still yields an
/// (empty) hierarchy; the failure rides along as a warning.
#[derive(Debug)]
pub struct Loaded {
    pub hierarchy: Hierarchy,
    pub warning: Option<LauncherError>,
}

/// JSON document holding the whole hierarchy.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time of the document, if it exists.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    pub fn load(&self) -> Loaded {
        match self.try_load() {
            Ok(hierarchy) => Loaded {
                hierarchy,
                warning: None,
            },
            Err(e) => {
                tracing::warn!("Falling back to an empty hierarchy: {}", e);
                Loaded {
                    hierarchy: Hierarchy::new(),
                    warning: Some(e),
                }
            }
        }
    }

    fn try_load(&self) -> Result<Hierarchy> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No document at {:?}, starting empty", self.path);
                return Ok(Hierarchy::new());
            }
            Err(source) => {
                return Err(LauncherError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let groups: Vec<Group> =
            serde_json::from_str(&content).map_err(|source| LauncherError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!("Loaded {} groups from {:?}", groups.len(), self.path);
        Ok(Hierarchy::from_groups(groups))
    }

    /// Replaces the document with the full hierarchy.
    ///
    /// Writes a sibling temp file first and renames it over the target, so
    /// readers never observe a half-written document.
    pub fn save(&self, hierarchy: &Hierarchy) -> Result<()> {
        let persistence = |source: io::Error| LauncherError::Persistence {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(hierarchy.groups())
            .map_err(|e| persistence(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(persistence)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(persistence)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            persistence(e)
        })?;

        tracing::debug!("Saved {} groups to {:?}", hierarchy.groups().len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubCommand;
    use tempfile::TempDir;

    fn sample() -> Hierarchy {
        Hierarchy::from_groups(vec![
            Group::new("web", "ssh user@192.168.1.1")
                .with_command(SubCommand::new("View Config", "sudo cat /var/default/app.properties"))
                .with_command(SubCommand::new("Quoted", r#"echo "it's fine""#)),
            Group::new("empty", "ssh nobody@nowhere"),
        ])
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("commands.json"));
        let h = sample();

        store.save(&h).unwrap();
        let loaded = store.load();
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.hierarchy, h);

        store.save(&loaded.hierarchy).unwrap();
        assert_eq!(store.load().hierarchy, h);
    }

    #[test]
    fn missing_document_is_empty_without_warning() {
        let dir = TempDir::new().unwrap();
        let loaded = Store::new(dir.path().join("absent.json")).load();
        assert!(loaded.hierarchy.is_empty());
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn corrupt_document_is_empty_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("commands.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = Store::new(&path).load();
        assert!(loaded.hierarchy.is_empty());
        assert!(matches!(loaded.warning, Some(LauncherError::Corrupt { .. })));
        // The broken file is left alone until something is saved.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn document_uses_plain_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("commands.json");
        let store = Store::new(&path);
        store.save(&sample()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["name"], "web");
        assert_eq!(value[0]["host"], "ssh user@192.168.1.1");
        assert_eq!(value[0]["commands"][0]["command"], "sudo cat /var/default/app.properties");
        assert!(value[0].get("id").is_none());
        assert!(!dir.path().join("nested").join("commands.json.tmp").exists());
    }

    #[test]
    fn groups_without_commands_field_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("commands.json");
        fs::write(&path, r#"[{"name":"a","host":"ssh a"}]"#).unwrap();

        let loaded = Store::new(&path).load();
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.hierarchy.groups()[0].commands.len(), 0);
    }

    #[test]
    fn save_into_unwritable_location_reports_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let store = Store::new(blocker.join("commands.json"));

        let err = store.save(&sample()).unwrap_err();
        assert!(matches!(err, LauncherError::Persistence { .. }));
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::launcher::{CommandStyle, LaunchSettings};

const APP_DIR: &str = "sshcl";
const CONFIG_FILE: &str = "sshcl.toml";
const DATA_FILE: &str = "commands.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where the group hierarchy is stored; defaults next to the config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    /// Terminal emulator program; auto-detected when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// Arguments placed before the shell, e.g. `-e`
    pub terminal_args: Vec<String>,
    /// Shell run inside the terminal; `$SHELL` or bash when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    pub command_style: CommandStyle,
    /// Number of log files kept in the logs directory
    pub log_retention: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            terminal: None,
            terminal_args: vec!["-e".to_string()],
            shell: None,
            command_style: CommandStyle::default(),
            log_retention: 10,
        }
    }
}

impl AppConfig {
    pub fn launch_settings(&self) -> LaunchSettings {
        LaunchSettings {
            terminal: self.terminal.clone(),
            terminal_args: self.terminal_args.clone(),
            shell: self.shell.clone(),
            style: self.command_style,
        }
    }
}

#[derive(Debug)]
pub struct ConfigManager {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigManager {
    /// Uses `<config_dir>/sshcl`, or the parent directory of `config_file`
    /// when one is given.
    pub fn new(config_file: Option<PathBuf>) -> Result<Self> {
        let manager = match config_file {
            Some(file) => {
                let dir = file
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                Self {
                    config_dir: dir,
                    config_file: file,
                }
            }
            None => Self::with_dir(
                dirs::config_dir()
                    .context("Could not find config directory")?
                    .join(APP_DIR),
            ),
        };

        // Create config directory if it doesn't exist
        if !manager.config_dir.exists() {
            fs::create_dir_all(&manager.config_dir)
                .context("Failed to create config directory")?;
        }

        Ok(manager)
    }

    /// Stand-in used when the real config directory is unavailable.
    pub fn temporary() -> Self {
        Self::with_dir(std::env::temp_dir().join(APP_DIR))
    }

    pub fn with_dir(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join(CONFIG_FILE);
        Self {
            config_dir,
            config_file,
        }
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        // If config file doesn't exist, create it with default values
        if !self.config_file.exists() {
            let default_config = AppConfig::default();
            self.save_config(&default_config)?;
            return Ok(default_config);
        }

        let content =
            fs::read_to_string(&self.config_file).context("Failed to read config file")?;

        let config: AppConfig = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Like [`load_config`](Self::load_config), but a missing or broken
    /// file yields the defaults and the error comes back as a warning.
    /// A broken file is left as it is.
    pub fn load_or_default(&self) -> (AppConfig, Option<anyhow::Error>) {
        match self.load_config() {
            Ok(config) => (config, None),
            Err(e) => (AppConfig::default(), Some(e)),
        }
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.config_file, toml).context("Failed to write config file")?;
        Ok(())
    }

    /// Data file from the config, relative paths taken from the config dir.
    pub fn data_file(&self, config: &AppConfig) -> PathBuf {
        match &config.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.config_dir.join(path),
            None => self.config_dir.join(DATA_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf());

        let config = manager.load_config().unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
        assert_eq!(manager.load_config().unwrap(), config);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "terminal = \"kitty\"\ncommand_style = \"direct\"\n",
        )
        .unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf());

        let config = manager.load_config().unwrap();
        assert_eq!(config.terminal.as_deref(), Some("kitty"));
        assert_eq!(config.command_style, CommandStyle::Direct);
        assert_eq!(config.terminal_args, vec!["-e"]);
        assert_eq!(config.log_retention, 10);
    }

    #[test]
    fn bad_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "command_style = 3").unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf());
        assert!(manager.load_config().is_err());
    }

    #[test]
    fn broken_config_falls_back_to_defaults_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "command_style = 3").unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf());

        let (config, warning) = manager.load_or_default();
        assert_eq!(config, AppConfig::default());
        let warning = warning.unwrap();
        assert!(format!("{:#}", warning).contains("Failed to parse config file"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "command_style = 3");

        // Still usable
        assert_eq!(manager.data_file(&config), dir.path().join(DATA_FILE));
    }

    #[test]
    fn unwritable_config_dir_still_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let manager = ConfigManager::with_dir(blocker.join("sshcl"));

        let (config, warning) = manager.load_or_default();
        assert_eq!(config, AppConfig::default());
        assert!(warning.is_some());
    }

    #[test]
    fn data_file_resolution() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf());
        let mut config = AppConfig::default();
        assert_eq!(manager.data_file(&config), dir.path().join(DATA_FILE));

        config.data_file = Some(PathBuf::from("work.json"));
        assert_eq!(manager.data_file(&config), dir.path().join("work.json"));
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::hierarchy::Hierarchy;
use crate::launcher::{self, LaunchSettings};
use crate::model::{Model, Removed};
use crate::models::{Confirm, Selection};

#[derive(Parser, Debug)]
#[command(
    name = "sshcl",
    version,
    about = "Launch SSH sessions and remote commands from a saved list"
)]
pub struct Cli {
    /// Path to the sshcl.toml config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the commands document, overriding the config
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Terminal emulator to launch sessions in
    #[arg(long, value_name = "PROGRAM")]
    pub terminal: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print every group and command with its index
    List,
    /// Print the command line an entry would launch
    Show { index: usize },
    /// Open a terminal for an entry
    Run { index: usize },
    /// Add a group
    AddGroup { name: String, host: String },
    /// Add a command to the group at INDEX
    AddCommand {
        index: usize,
        name: String,
        command: String,
    },
    /// Remove the group or command at INDEX
    Remove {
        index: usize,
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
}

/// Indexed listing of the flattened hierarchy.
pub fn render_list(hierarchy: &Hierarchy) -> String {
    let mut out = String::new();
    for (i, entry) in hierarchy.entries().iter().enumerate() {
        let indent = "  ".repeat(entry.depth as usize);
        out.push_str(&format!(
            "{:>3}  {}{}  ({})\n",
            i, indent, entry.label, entry.detail
        ));
    }
    out
}

pub fn run(command: CliCommand, model: &mut Model, settings: &LaunchSettings) -> Result<()> {
    match command {
        CliCommand::List => {
            if model.hierarchy().is_empty() {
                println!("No groups yet. Add one with `sshcl add-group <NAME> <HOST>`.");
            } else {
                print!("{}", render_list(model.hierarchy()));
            }
        }
        CliCommand::Show { index } => {
            println!(
                "{}",
                model.launch_string(&Selection::Index(index), settings.style)?
            );
        }
        CliCommand::Run { index } => {
            let line = model.launch_string(&Selection::Index(index), settings.style)?;
            launcher::launch(&line, settings).context("Could not open a terminal")?;
            println!("Launched: {}", line);
        }
        CliCommand::AddGroup { name, host } => {
            model.add_group(Some(name.as_str()), Some(host.as_str()))?;
            println!("Added group '{}'", name.trim());
        }
        CliCommand::AddCommand {
            index,
            name,
            command,
        } => {
            model.add_command(
                &Selection::Index(index),
                Some(name.as_str()),
                Some(command.as_str()),
            )?;
            println!("Added command '{}'", name.trim());
        }
        CliCommand::Remove { index, yes } => {
            if !yes {
                anyhow::bail!("Refusing to remove without --yes");
            }
            match model.delete(&Selection::Index(index), Confirm::Yes)? {
                Removed::Group { name, commands } => {
                    println!("Removed group '{}' and {} command(s)", name, commands)
                }
                Removed::Command { name } => println!("Removed command '{}'", name),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, SubCommand};
    use crate::store::Store;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["sshcl", "--data", "x.json", "remove", "3", "--yes"]).unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("x.json")));
        assert_eq!(cli.command, Some(CliCommand::Remove { index: 3, yes: true }));

        let cli = Cli::try_parse_from(["sshcl"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn list_shows_indices_in_flattened_order() {
        let h = Hierarchy::from_groups(vec![
            Group::new("web", "ssh web").with_command(SubCommand::new("Logs", "tail log")),
            Group::new("db", "ssh db"),
        ]);
        let out = render_list(&h);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  0  web  (ssh web)");
        assert_eq!(lines[1], "  1    Logs  (tail log)");
        assert_eq!(lines[2], "  2  db  (ssh db)");
    }

    #[test]
    fn remove_needs_yes() {
        let dir = TempDir::new().unwrap();
        let (mut model, _) = Model::open(Store::new(dir.path().join("c.json")));
        let settings = LaunchSettings::default();
        run(
            CliCommand::AddGroup {
                name: "web".into(),
                host: "ssh web".into(),
            },
            &mut model,
            &settings,
        )
        .unwrap();

        assert!(run(CliCommand::Remove { index: 0, yes: false }, &mut model, &settings).is_err());
        assert_eq!(model.hierarchy().groups().len(), 1);
        run(CliCommand::Remove { index: 0, yes: true }, &mut model, &settings).unwrap();
        assert!(model.hierarchy().is_empty());
    }
}

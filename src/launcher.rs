use crate::error::{LauncherError, Result};
use crate::models::{Entity, Group};
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};

/// How a sub-command is wrapped when it is sent to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStyle {
    /// `{host} -t "sudo -i bash -c '{command}; exec bash'"`
    #[default]
    Elevated,
    /// `{host} -t '{command}'`, for commands saved before the elevated form
    Direct,
}

/// Terminal emulators tried in order when none is configured.
const POSIX_TERMINALS: &[&str] = &[
    "x-terminal-emulator",
    "gnome-terminal",
    "konsole",
    "xfce4-terminal",
    "alacritty",
    "kitty",
    "xterm",
];

/// Everything `launch` needs besides the command line itself.
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    pub terminal: Option<String>,
    pub terminal_args: Vec<String>,
    pub shell: Option<String>,
    pub style: CommandStyle,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            terminal: None,
            terminal_args: vec!["-e".to_string()],
            shell: None,
            style: CommandStyle::default(),
        }
    }
}

/// Program and argv of the process `launch` will spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
}

/// Quote-escape for text placed inside `'...'`.
fn escape_single(text: &str) -> String {
    text.replace('\'', r"'\''")
}

/// Quote-escape for text placed inside `"..."` on a POSIX shell.
fn escape_double(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Quote-escape for text placed inside `"..."` on a Windows command line.
///
/// The receiving program splits its arguments with the MSVC rules:
/// backslashes are literal unless they precede a quote, so only runs of
/// backslashes in front of a `"` (or the closing quote) are doubled.
fn escape_double_windows(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut backslashes = 0;
    for c in text.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                out.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.extend(std::iter::repeat('\\').take(backslashes));
                out.push(c);
                backslashes = 0;
            }
        }
    }
    out.extend(std::iter::repeat('\\').take(backslashes * 2));
    out
}

fn escape_outer(text: &str) -> String {
    if cfg!(windows) {
        escape_double_windows(text)
    } else {
        escape_double(text)
    }
}

/// Builds the shell command line for a group or one of its commands.
///
/// A group launches as its host string verbatim. A command needs its owner
/// for the host and is wrapped according to `style`.
pub fn build_launch_string(
    entity: Entity<'_>,
    owner: Option<&Group>,
    style: CommandStyle,
) -> Result<String> {
    match entity {
        Entity::Group(group) => Ok(group.host.clone()),
        Entity::Command(command) => {
            let owner = owner.ok_or(LauncherError::MissingOwner)?;
            Ok(match style {
                CommandStyle::Elevated => {
                    let inner = format!(
                        "sudo -i bash -c '{}; exec bash'",
                        escape_single(&command.command)
                    );
                    format!("{} -t \"{}\"", owner.host, escape_outer(&inner))
                }
                CommandStyle::Direct => format!(
                    "{} -t '{}'",
                    owner.host,
                    command.command.replace('\'', r#"'"'"'"#)
                ),
            })
        }
    }
}

fn default_shell(settings: &LaunchSettings) -> String {
    settings
        .shell
        .clone()
        .or_else(|| {
            std::env::var("SHELL")
                .ok()
                .filter(|s| !s.trim().is_empty())
        })
        .unwrap_or_else(|| "bash".to_string())
}

fn detect_terminal() -> Option<String> {
    POSIX_TERMINALS
        .iter()
        .find(|cmd| which::which(cmd).is_ok())
        .map(|cmd| cmd.to_string())
}

/// Spawn plan for a terminal emulator running `launch`, then leaving the
/// user in `shell`.
///
/// The launch line is POSIX quoted, so it always runs under bash whatever
/// the login shell is; only the session left open afterwards is `shell`.
pub fn posix_plan(launch: &str, terminal: &str, terminal_args: &[String], shell: &str) -> LaunchPlan {
    let mut args: Vec<String> = terminal_args.to_vec();
    args.push("bash".to_string());
    args.push("-c".to_string());
    args.push(format!("{}; exec '{}'", launch, escape_single(shell)));
    LaunchPlan {
        program: terminal.to_string(),
        args,
    }
}

/// Spawn plan for a new console window that keeps running after `launch`.
///
/// cmd still expands `%VAR%` inside the line; there is no escape for it
/// that survives both `cmd` invocations.
pub fn windows_plan(launch: &str) -> LaunchPlan {
    LaunchPlan {
        program: "cmd".to_string(),
        args: vec![format!("/C start \"\" cmd /K {}", launch)],
    }
}

pub fn plan(launch: &str, settings: &LaunchSettings) -> Result<LaunchPlan> {
    if cfg!(windows) {
        return Ok(windows_plan(launch));
    }

    let terminal = match &settings.terminal {
        Some(terminal) => terminal.clone(),
        None => detect_terminal().ok_or_else(|| {
            LauncherError::launch(format!(
                "No terminal emulator found (tried {})",
                POSIX_TERMINALS.join(", ")
            ))
        })?,
    };
    Ok(posix_plan(
        launch,
        &terminal,
        &settings.terminal_args,
        &default_shell(settings),
    ))
}

/// Opens a terminal running `launch` and returns without waiting for it.
///
/// Only spawn failures are reported; the child's exit status and output
/// are never observed.
pub fn launch(launch: &str, settings: &LaunchSettings) -> Result<()> {
    let plan = plan(launch, settings)?;

    tracing::info!("Launching: {} {:?}", plan.program, plan.args);

    let mut cmd = Command::new(&plan.program);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        for arg in &plan.args {
            cmd.raw_arg(arg);
        }
    }

    #[cfg(not(windows))]
    {
        use std::os::unix::process::CommandExt;
        cmd.args(&plan.args);
        // Own process group, so the terminal outlives us and ignores our signals.
        cmd.process_group(0);
    }

    // The child handle is dropped on purpose: fire and forget.
    cmd.spawn().map(|_| ()).map_err(|e| {
        tracing::error!("Failed to spawn {}: {}", plan.program, e);
        LauncherError::launch(format!("Failed to start {}: {}", plan.program, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubCommand;

    fn group() -> Group {
        Group::new("web", "ssh user@192.168.1.1")
    }

    #[test]
    fn group_launches_host_verbatim() {
        let g = group();
        assert_eq!(
            build_launch_string(Entity::Group(&g), None, CommandStyle::Elevated).unwrap(),
            "ssh user@192.168.1.1"
        );
    }

    #[test]
    fn command_is_wrapped_in_elevated_shell() {
        let g = group();
        let c = SubCommand::new("View Config", "sudo cat /var/default/app.properties");
        assert_eq!(
            build_launch_string(Entity::Command(&c), Some(&g), CommandStyle::Elevated).unwrap(),
            r#"ssh user@192.168.1.1 -t "sudo -i bash -c 'sudo cat /var/default/app.properties; exec bash'""#
        );
    }

    #[test]
    fn command_without_owner_is_rejected() {
        let c = SubCommand::new("uptime", "uptime");
        assert!(matches!(
            build_launch_string(Entity::Command(&c), None, CommandStyle::Elevated),
            Err(LauncherError::MissingOwner)
        ));
    }

    #[test]
    #[cfg(not(windows))]
    fn nested_quotes_are_escaped_per_layer() {
        let g = group();
        let c = SubCommand::new("greet", r#"echo 'hi' "$USER""#);
        assert_eq!(
            build_launch_string(Entity::Command(&c), Some(&g), CommandStyle::Elevated).unwrap(),
            r#"ssh user@192.168.1.1 -t "sudo -i bash -c 'echo '\\''hi'\\'' \"\$USER\"; exec bash'""#
        );
    }

    #[test]
    fn direct_style_splits_single_quotes() {
        let g = group();
        let c = SubCommand::new("greet", "echo 'hi'");
        assert_eq!(
            build_launch_string(Entity::Command(&c), Some(&g), CommandStyle::Direct).unwrap(),
            r#"ssh user@192.168.1.1 -t 'echo '"'"'hi'"'"''"#
        );
    }

    #[test]
    fn posix_plan_keeps_shell_open() {
        let plan = posix_plan("ssh host", "xterm", &["-e".to_string()], "zsh");
        assert_eq!(plan.program, "xterm");
        assert_eq!(plan.args, vec!["-e", "bash", "-c", "ssh host; exec 'zsh'"]);
    }

    #[test]
    fn launch_line_runs_under_bash_for_any_login_shell() {
        let g = group();
        let c = SubCommand::new("greet", r#"echo 'hi' "$USER""#);
        let line = build_launch_string(Entity::Command(&c), Some(&g), CommandStyle::Elevated).unwrap();
        let plan = posix_plan(&line, "xterm", &["-e".to_string()], "/usr/bin/fish");

        assert_eq!(plan.args[1], "bash");
        assert_eq!(plan.args[3], format!("{}; exec '/usr/bin/fish'", line));
    }

    #[test]
    fn shell_path_is_quoted_for_exec() {
        let plan = posix_plan("ssh host", "xterm", &[], "/opt/my shell/it's");
        assert_eq!(plan.args[2], r"ssh host; exec '/opt/my shell/it'\''s'");
    }

    #[test]
    fn windows_escaping_follows_argv_rules() {
        assert_eq!(escape_double_windows("plain $HOME `x`"), "plain $HOME `x`");
        assert_eq!(escape_double_windows(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_double_windows(r"C:\dir\file"), r"C:\dir\file");
        assert_eq!(escape_double_windows(r#"a\"b"#), r#"a\\\"b"#);
        assert_eq!(escape_double_windows(r"trailing\"), r"trailing\\");
    }

    #[test]
    fn windows_plan_keeps_console_open() {
        let plan = windows_plan("ssh host");
        assert_eq!(plan.program, "cmd");
        assert_eq!(plan.args, vec![r#"/C start "" cmd /K ssh host"#]);
    }

    #[test]
    fn configured_terminal_is_used() {
        let settings = LaunchSettings {
            terminal: Some("kitty".to_string()),
            terminal_args: vec!["--hold".to_string(), "-e".to_string()],
            shell: Some("bash".to_string()),
            style: CommandStyle::Elevated,
        };
        let plan = plan("ssh host", &settings).unwrap();
        if cfg!(windows) {
            assert_eq!(plan.program, "cmd");
        } else {
            assert_eq!(plan.program, "kitty");
            assert_eq!(plan.args[..2], ["--hold".to_string(), "-e".to_string()]);
        }
    }

    #[test]
    fn missing_terminal_binary_is_a_launch_error() {
        if cfg!(windows) {
            return;
        }
        let settings = LaunchSettings {
            terminal: Some("/nonexistent/sshcl-terminal".to_string()),
            ..LaunchSettings::default()
        };
        assert!(matches!(
            launch("ssh host", &settings),
            Err(LauncherError::Launch(_))
        ));
    }
}

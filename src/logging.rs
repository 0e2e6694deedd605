use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_PREFIX: &str = "sshcl_";

/// Logs go to a timestamped file; the terminal belongs to the TUI.
pub fn init(log_dir: &Path, retention: usize) -> Result<PathBuf> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    let log_file = log_dir.join(format!(
        "{}{}.log",
        LOG_PREFIX,
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let file = File::create(&log_file).context("Failed to create log file")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sshcl=debug"));

    fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    prune(log_dir, retention);
    Ok(log_file)
}

/// Removes all but the newest `keep` log files.
pub fn prune(log_dir: &Path, keep: usize) {
    let Ok(read_dir) = fs::read_dir(log_dir) else {
        return;
    };
    let mut logs: Vec<PathBuf> = read_dir
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(LOG_PREFIX) && n.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    // Timestamped names sort chronologically
    logs.sort();
    let excess = logs.len().saturating_sub(keep.max(1));
    for old in logs.into_iter().take(excess) {
        if let Err(e) = fs::remove_file(&old) {
            tracing::warn!("Failed to remove old log {:?}: {}", old, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn prune_keeps_newest_logs_only() {
        let dir = TempDir::new().unwrap();
        for stamp in ["20240101_000000", "20240102_000000", "20240103_000000"] {
            fs::write(dir.path().join(format!("sshcl_{}.log", stamp)), "").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        prune(dir.path(), 2);

        assert!(!dir.path().join("sshcl_20240101_000000.log").exists());
        assert!(dir.path().join("sshcl_20240102_000000.log").exists());
        assert!(dir.path().join("sshcl_20240103_000000.log").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}

//! Logging init: append to a file under the XDG state dir, falling back to
//! stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,docfetch=debug,docfetch_core=debug";

/// Where log output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/docfetch/docfetch.log`
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("docfetch")?;
    Ok(xdg_dirs.get_state_home().join("docfetch").join("docfetch.log"))
}

fn open_log_file() -> Result<(PathBuf, File)> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    Ok((path, file))
}

/// Installs the global subscriber. Never fails: if the log file is
/// unusable, logs go to stderr and the reason is logged there.
pub fn init() -> LogTarget {
    match open_log_file() {
        Ok((path, file)) => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .is_ok();
            if installed {
                tracing::info!("docfetch logging initialized at {}", path.display());
            }
            LogTarget::File(path)
        }
        Err(e) => {
            init_stderr();
            tracing::warn!("log file unavailable ({:#}); logging to stderr", e);
            LogTarget::Stderr
        }
    }
}

/// Logs to stderr only, e.g. when running the server in the foreground.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

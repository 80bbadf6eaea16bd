//! Logging initialisation via tracing-subscriber.
//!
//! The TUI owns the terminal, so interactive runs log to a file; one-shot
//! runs log to stderr.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "info";

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Pick the level: command line, then config file, then [`DEFAULT_LEVEL`].
/// `RUST_LOG` still wins over all of these inside [`init`].
pub fn resolve_level<'a>(cli: Option<&'a str>, config: Option<&'a str>) -> &'a str {
    cli.or(config).unwrap_or(DEFAULT_LEVEL)
}

pub fn init(level: &str, target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("invalid log level '{level}': {e}"))?;

    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("could not create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("could not open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    installed.map_err(|e| anyhow!("failed to set subscriber: {e}"))
}

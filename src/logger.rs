//! Debug logging support for logswap
//!
//! When debug mode is enabled (`--debug` or `logging.debug` in the config),
//! per-file events are logged to ~/.logswap/logswap.log. Console output is
//! unaffected either way.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

const LOG_FILE_NAME: &str = "logswap.log";

/// Initialize the debug logging system
///
/// Returns the path to the log file, or None if logging is not enabled or
/// the log file could not be opened.
pub fn init_debug_logging(debug_enabled: bool) -> Result<Option<PathBuf>> {
    if !debug_enabled {
        return Ok(None);
    }

    match default_log_path() {
        Ok(log_path) => init_file_logging(&log_path),
        Err(e) => {
            eprintln!("Warning: Could not create log file: {:#}", e);
            Ok(None)
        }
    }
}

/// Install a subscriber writing to `log_path`, appending to an existing file
pub fn init_file_logging(log_path: &Path) -> Result<Option<PathBuf>> {
    match open_log_file(log_path) {
        Ok(log_file) => {
            let subscriber = registry()
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(log_file))
                        .with_ansi(false)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .with(EnvFilter::new("logswap=debug"));

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

            Ok(Some(log_path.to_path_buf()))
        }
        Err(e) => {
            // A broken log file must not stop the rewrite itself
            eprintln!("Warning: Could not create log file: {:#}", e);
            Ok(None)
        }
    }
}

fn open_log_file(log_path: &Path) -> Result<fs::File> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))
}

/// ~/.logswap/logswap.log
pub fn default_log_path() -> Result<PathBuf> {
    Ok(crate::config::config_dir()?.join(LOG_FILE_NAME))
}

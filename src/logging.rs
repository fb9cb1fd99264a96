//! Tracing setup.
//!
//! The filter comes from `VDASH_LOG` (EnvFilter syntax) and defaults to
//! `vantedjo_dash=info`. The TUI owns the terminal, so it logs to a file;
//! every other command logs to stderr.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const LOG_ENV: &str = "VDASH_LOG";
const DEFAULT_FILTER: &str = "vantedjo_dash=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr.
pub fn init_stderr() {
    // A second init (tests, repeated runs in one process) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to `path` (truncated), without ANSI colors.
pub fn init_file(path: &Path) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create log file '{}': {e}", path.display())))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

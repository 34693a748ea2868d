//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};

pub const LOG_FILE: &str = "ticklist.log";

/// Default filter for the -v/-q counts; RUST_LOG wins when set
pub fn default_level(verbose: u8, quiet: u8) -> &'static str {
    if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    }
}

fn env_filter(verbose: u8, quiet: u8) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(verbose, quiet)))
        .map_err(|e| CliError::config_with_source("Invalid RUST_LOG / log filter", e))
}

/// Log to stderr
pub fn init_tracing(verbose: u8, quiet: u8) -> Result<()> {
    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, quiet)?)
        .with_target(true)
        .with_level(true)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Log to a file in the data directory so output never lands on the TUI screen
pub fn init_file_tracing(verbose: u8, quiet: u8, data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| CliError::io(format!("Failed to create {}", data_dir.display()), e))?;

    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| CliError::io(format!("Failed to open {}", path.display()), e))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, quiet)?)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

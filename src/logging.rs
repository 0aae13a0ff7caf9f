use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE: &str = "hnfeed.log";

pub fn log_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("logs")
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "hnfeed=debug" } else { "hnfeed=info" }
}

/// Installs a file subscriber under `<config_dir>/logs`. The terminal
/// belongs to the UI, so nothing is written to stdout or stderr.
///
/// The returned guard flushes buffered lines when dropped; keep it alive
/// for the whole run. Without a config directory logging stays off.
pub fn init(config_dir: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let Some(config_dir) = config_dir else {
        return Ok(None);
    };

    let dir = log_dir(config_dir);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Failed to install log subscriber")?;

    if verbose {
        println!("Logging to {}", dir.join(LOG_FILE).display());
    }
    Ok(Some(guard))
}

//! Diagnostic logging setup.
//!
//! The interactive UI owns the terminal, so its logs only go to a file named
//! on the command line. One-shot commands log warnings to stderr.

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FILE_DEFAULT_DIRECTIVE: &str = "parley=info";
const STDERR_DEFAULT_DIRECTIVE: &str = "parley=warn";

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Send logs to `path`, appending to any existing content.
pub fn init_file_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = open_log_file(path)
        .map_err(|err| format!("Cannot open log file {}: {err}", path.display()))?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Arc::new(file));

    tracing_subscriber::registry()
        .with(env_filter(FILE_DEFAULT_DIRECTIVE))
        .with(file_layer)
        .try_init()?;
    Ok(())
}

pub fn init_stderr_logging() {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::registry()
        .with(env_filter(STDERR_DEFAULT_DIRECTIVE))
        .with(stderr_layer)
        .try_init();
}

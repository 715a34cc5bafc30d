//! Logging initialization

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Log to stdout. Later calls are no-ops.
pub fn init_tracing(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .try_init();
}

/// Log to a file, appending. Used by the terminal UI, where stdout belongs
/// to the alternate screen.
pub fn init_tracing_to_file(level: &str, path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(())
}

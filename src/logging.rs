//! Diagnostic logging to an append-only file.
//!
//! The subscriber is installed as the default for the current thread only.
//! It owns the log file, so dropping the returned guard flushes and closes
//! it.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Opens `path` for appending and routes `tracing` output to it.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init(path: &Path, level: &str) -> Result<DefaultGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("error opening log file: {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .finish();

    Ok(tracing::subscriber::set_default(subscriber))
}

//! Tracing setup
//!
//! Stdout carries the environment json, so logs go to stderr or to a file.
//! Reads `RUST_LOG`, defaulting to `info`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr in compact format.
pub fn init_stderr() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// Log JSON lines to `path`. Keep the guard alive until exit so buffered lines are flushed.
pub fn init_file(path: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid log path: {}", path.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid log path: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_writer(writer).with_ansi(false))
        .init();

    Ok(guard)
}

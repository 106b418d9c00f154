//! Tracing setup for the binary.
//!
//! Events go to a daily rolling file so they never interleave with the
//! interactive prompt. `RUST_LOG` takes precedence over `--log-level`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_PREFIX: &str = "clickforge.log";

const CRATES: &[&str] = &[
    "clickforge",
    "clickforge_core",
    "clickforge_application",
    "clickforge_infrastructure",
    "clickforge_interaction",
    "clickforge_cli",
];

/// Builds the filter from `RUST_LOG`, falling back to `level` for our crates.
pub fn env_filter(level: &str) -> EnvFilter {
    let directives: Vec<String> = CRATES.iter().map(|name| format!("{name}={level}")).collect();
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("warn,{}", directives.join(","))))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init(logs_dir: &Path, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("failed to create log directory {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(false),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

//! Structured logging setup using `tracing-subscriber` and `tracing-appender`.
//!
//! Two modes:
//! - **Case** ([`init_with_case_log`]): JSON log file inside the case directory + console layer
//! - **CLI** ([`init_cli`]): console-only, used before a case directory exists

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File name of the per-case JSON log.
pub const CASE_LOG_FILE: &str = "suspend-doctor.log";

/// Holds the non-blocking writer guard for file logging.
///
/// Dropping it flushes pending log entries and closes the file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialise logging with a JSON file in `case_dir` plus stderr output.
///
/// The log is written to `{case_dir}/suspend-doctor.log` without rotation so
/// it travels with the collected evidence. `RUST_LOG` controls both layers
/// (default: `info`). If a global subscriber is already installed the call
/// leaves it in place.
///
/// # Errors
///
/// Returns an error if the case directory cannot be created.
pub fn init_with_case_log(case_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(case_dir)
        .with_context(|| format!("failed to create case directory {}", case_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(case_dir, CASE_LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Already initialised (tests, embedding): keep the existing subscriber.
    let _ = tracing_subscriber::registry()
        .with(default_filter())
        .with(json_layer)
        .with(console_layer)
        .try_init();

    Ok(LoggingGuard { _guard: guard })
}

/// Initialise console-only logging.
///
/// Emits human-readable output to stderr. Controlled by `RUST_LOG`
/// (default: `info`).
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

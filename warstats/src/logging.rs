//! File logging.
//!
//! The terminal is owned by the TUI, so log output goes to
//! `<state_dir>/warstats.log` through a non-blocking writer. `WARSTATS_LOG`
//! overrides the configured filter (same syntax as `RUST_LOG`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive that overrides the config.
pub const LOG_ENV: &str = "WARSTATS_LOG";

/// Log file name inside the state directory.
pub const LOG_FILE: &str = "warstats.log";

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole run; dropping it flushes buffered lines.
///
/// # Errors
///
/// Returns `Err` if the state directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging(state_dir: &Path, default_filter: &str) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(state_dir)?;
    let appender = tracing_appender::rolling::never(state_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(guard)
}

//! File-backed logging. Stdout carries the chosen path and the alternate
//! screen owns the terminal, so diagnostics go to a log file instead.

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "dj.log";
const FILTER_ENV: &str = "DJ_LOG";

fn log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join("dirjump"))
}

/// Install a non-blocking file subscriber. Returns the flush guard, which the
/// caller must keep alive for the process lifetime. Logging is best-effort:
/// if the log directory cannot be created, the tool runs silently.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir()?;
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("dj: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

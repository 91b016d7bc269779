//! Logging setup using tracing.
//!
//! The terminal belongs to the panel, so log lines go to a file instead of
//! stderr. Verbosity comes from `RUST_LOG` and defaults to `info`.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV: &str = "LAUNCHER_LOG";
const LOG_FILE: &str = "launcher.log";

/// Where the log file lives: `$LAUNCHER_LOG`, else the user cache dir.
pub fn log_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(LOG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::cache_dir().map(|dir| dir.join("term-panel").join(LOG_FILE))
}

/// Handle returned by [`init`]. Dropping it flushes and stops the writer
/// thread, so keep it alive for the life of the process.
pub struct LogHandle {
    pub path: PathBuf,
    _guard: WorkerGuard,
}

/// Initialize the global tracing subscriber.
///
/// Returns `None` when no log file could be created, in which case logging
/// stays disabled.
pub fn init() -> Option<LogHandle> {
    let path = log_path()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| LOG_FILE.to_string());

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    Some(LogHandle {
        path,
        _guard: guard,
    })
}

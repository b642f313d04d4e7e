//! Logging setup for the `tunedeck` binary.
//!
//! Everything passing the filter goes to a daily-rolling `tunedeck.log` in the
//! logs directory; the terminal only shows warnings and errors so it does not
//! interleave with command output.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_FILE_PREFIX: &str = "tunedeck.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_level`. Returns the file writer's guard, which
/// must stay alive until exit so buffered lines are flushed; `None` when the
/// logs directory is unavailable and only terminal logging is active.
pub fn init(default_level: &str, logs_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match logs_dir.and_then(file_writer) {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(terminal_layer)
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        return None;
    }
    guard
}

fn file_writer(
    logs_dir: &Path,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(logs_dir).ok()?;
    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}

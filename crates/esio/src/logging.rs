//! One-time process-wide logging setup, following the same non-blocking
//! file-appender pattern the rest of the ambient stack uses. Installing a
//! subscriber twice (e.g. because the host application already has one) is
//! not an error — the second caller's guard is simply dropped.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

/// Installs a non-blocking file-appender subscriber rooted at `log_dir`,
/// filtered by `RUST_LOG` (or `info` by default). Returns the worker guard
/// that must be kept alive for the life of the process when installation
/// succeeds, or `None` if a subscriber was already present.
pub fn init_logging(log_dir: impl AsRef<Path>, file_name: &str) -> Option<WorkerGuard> {
    let appender = tracing_appender::rolling::never(log_dir.as_ref(), file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

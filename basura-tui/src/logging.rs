use std::ffi::OsStr;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a JSON file logger rotated daily.
///
/// The terminal is owned by the UI, so nothing is written to stderr.
/// `RUST_LOG` overrides the default `info` filter. Keep the returned guard
/// alive until exit or buffered lines are lost.
pub(crate) fn init(log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let log_dir = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let file_name = log_file
        .file_name()
        .unwrap_or(OsStr::new("basura.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .try_init()?;

    Ok(guard)
}

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use csvload_engine::EngineResult;

/// Send all `tracing` output to `<log_dir>/<log_file>`, appending across runs.
///
/// The returned guard flushes the background writer on drop and must be held
/// until the program exits.
pub fn init_file_logging(log_dir: &Path, log_file: &str, filter: &str) -> EngineResult<WorkerGuard> {
    fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, log_file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(parse_filter(filter))
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer)
        .try_init()?;

    Ok(guard)
}

fn parse_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(csvload_engine::DEFAULT_LOG_FILTER))
}

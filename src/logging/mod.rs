//! Application logging functionality
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `glyphsmith=info`).
//! With `--log-file` they're also written to a daily file in
//! `~/.config/glyphsmith/logs/`.

use crate::core::config_file::ConfigFile;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "glyphsmith=info";

/// Filter from `RUST_LOG`, or the default when unset or unparsable
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file on drop; keep it alive for the
/// life of the process.
pub fn init(log_to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = if log_to_file {
        let logs_dir = ConfigFile::initialize_logs_directory()?;
        let appender = tracing_appender::rolling::daily(logs_dir, "glyphsmith.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    if guard.is_some() {
        tracing::info!(
            "Logging to {} (started {})",
            ConfigFile::current_log_file().display(),
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = EnvFilter::new(DEFAULT_FILTER);
        assert_eq!(filter.to_string(), DEFAULT_FILTER);
    }
}

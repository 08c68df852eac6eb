use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::error::ConfigError;
use crate::settings::Logging;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`. Output goes to stderr so that
/// reports printed on stdout stay machine-readable. When a log directory is
/// configured the returned guard must be held until exit to flush the file.
pub fn init_logging(logging: &Logging) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    let builder = FmtSubscriber::builder().with_env_filter(filter);

    let guard = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "index-insight.log");
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(file_writer))
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            Some(guard)
        }
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            None
        }
    };

    Ok(guard)
}

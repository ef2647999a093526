/// Tracing setup for the console binary and embedding hosts
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;

use crate::config::Config;

/// Log file prefix; the appender adds the date
const LOG_FILE_NAME: &str = "match-overlay.log";

/// Where and how verbosely to log
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub directory: PathBuf,
    pub default_filter: String,
}

impl LogSettings {
    /// Logs go next to the config file, in `logs/`
    pub fn from_config(config: &Config) -> Self {
        let directory = Config::app_dir()
            .map(|dir| dir.join("logs"))
            .unwrap_or_else(|_| PathBuf::from("logs"));

        Self {
            directory,
            default_filter: config.log_filter.clone(),
        }
    }
}

/// Initialize tracing with file rotation
///
/// Log rotation:
/// - Daily rotation (new file each day)
/// - Files named: match-overlay.log.YYYY-MM-DD
///
/// Log output:
/// - Debug builds: stderr + File
/// - Release builds: File only, the host owns the console
///
/// Keep the returned guard alive; dropping it flushes and stops the writer.
pub fn init_tracing(settings: &LogSettings) -> WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Err(e) = std::fs::create_dir_all(&settings.directory) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = tracing_appender::rolling::daily(&settings.directory, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .try_init();
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .try_init();
    }

    tracing::info!("Log directory: {}", settings.directory.display());
    guard
}

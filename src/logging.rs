use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{AppError, AppResult};

pub const LOG_FILTER_ENV: &str = "PDFV_LOG";

/// Resolves the event filter: `PDFV_LOG` wins over the configured level.
pub fn resolve_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to the configured log file.
/// Returns `false` when logging is disabled or a subscriber already exists.
pub fn init_logging(config: &LogConfig) -> AppResult<bool> {
    let Some(path) = config.file.as_ref() else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| {
            AppError::io_with_context(source, format!("failed to open log file {}", path.display()))
        })?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();
    Ok(installed)
}

//! Logging initialization.
//!
//! Configures `tracing-subscriber` with an `EnvFilter` and either pretty or
//! JSON output. When a log directory is given, a daily-rolling file is written
//! through `tracing-appender` in addition to stdout.

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{get_env_with_fallback, get_env_with_fallback_or};

/// File name prefix of the rolling log file
pub const LOG_FILE_PREFIX: &str = "healthcheck-server.log";

/// Logging options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    /// `"pretty"` or `"json"`
    pub format: String,
    /// Directory for the rolling log file
    pub file_dir: Option<PathBuf>,
}

impl LogConfig {
    /// Load logging options from environment variables.
    pub fn from_env() -> Self {
        Self {
            level: get_env_with_fallback_or(
                "HEALTHCHECK_LOG_LEVEL",
                "HEALTH_CHECK_LOG_LEVEL",
                "info",
            ),
            format: get_env_with_fallback_or(
                "HEALTHCHECK_LOG_FORMAT",
                "HEALTH_CHECK_LOG_FORMAT",
                "pretty",
            ),
            file_dir: get_env_with_fallback("HEALTHCHECK_LOG_FILE_DIR", "HEALTH_CHECK_LOG_FILE_DIR")
                .map(PathBuf::from),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called once, before any tracing macros are used. The returned guard
/// must be kept alive for the file writer to flush.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout_layer = match config.format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        "pretty" => tracing_subscriber::fmt::layer().pretty().boxed(),
        other => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                other
            ));
        }
    };

    let (file_layer, guard) = match &config.file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::anyhow!("failed to create log directory {}: {}", dir.display(), e)
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))?;

    Ok(guard)
}

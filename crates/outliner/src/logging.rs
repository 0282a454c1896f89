//! Tracing subscriber setup for binaries embedding outliner.

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when `RUST_LOG` is unset.
pub const LOG_ENV_VAR: &str = "OUTLINER_LOG";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to install global subscriber: {0}")]
    Install(String),
}

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Filter used when neither `RUST_LOG` nor `OUTLINER_LOG` is set.
    pub default_filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json: false,
        }
    }
}

/// Builds the filter from `RUST_LOG`, then `OUTLINER_LOG`, then the default.
pub fn build_filter(default_filter: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }
    EnvFilter::try_new(default_filter).map_err(|e| LoggingError::InvalidFilter(e.to_string()))
}

/// Installs the global subscriber and bridges `log` records into tracing.
///
/// Logs go to stderr so stdout stays free for command output.
pub fn init(options: &LoggingOptions) -> Result<(), LoggingError> {
    let filter = build_filter(&options.default_filter)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if options.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| LoggingError::Install(e.to_string()))?;

    // try_init already installs the bridge when tracing-subscriber's
    // tracing-log feature is on; this is a no-op then.
    let _ = tracing_log::LogTracer::init();
    Ok(())
}

//! Logging setup using tracing
//!
//! `RUST_LOG` takes precedence over the configured level, e.g.
//! `RUST_LOG=mbox_rs=debug` shows every retracted separator.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{MboxError, Result};

/// Install the global tracing subscriber.
///
/// Logs go to stderr so that command output on stdout stays clean.
///
/// # Errors
/// Returns an error if a subscriber is already installed
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| MboxError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let result = match config.format.as_str() {
        "json" => registry.with(layer.json()).try_init(),
        "compact" => registry.with(layer.compact()).try_init(),
        _ => registry.with(layer.pretty()).try_init(),
    };

    result.map_err(|e| MboxError::Config(format!("Failed to initialize tracing: {}", e)))
}

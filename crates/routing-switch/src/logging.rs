//! Logging setup for the daemon.

use crate::error::{Result, RoutingSwitchError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`. Output goes to stderr;
/// stdout is reserved for the outbound record stream.
pub fn init_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| {
            RoutingSwitchError::Configuration(format!("Invalid log level {}: {}", log_level, e))
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()
        .map_err(|e| RoutingSwitchError::Configuration(format!("Failed to set logger: {}", e)))
}

//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to stderr so that stdout stays clean for command output
//! (created issue keys, type listings). The level is configured via
//! `RUST_LOG`.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "jiraseed=info,warn";

/// Initialize the logging system.
///
/// # Log Levels
///
/// Configure via `RUST_LOG` environment variable:
/// - `RUST_LOG=debug` - Verbose output for debugging
/// - `RUST_LOG=jiraseed=debug` - Debug only for jiraseed
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be set.
pub fn init() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "jiraseed starting up");

    Ok(())
}

//! `tablekit_log` v1:
//! Shared `tracing` subscriber setup for tablekit hosts.
//!
//! Filtering follows `TABLEKIT_LOG` (same syntax as `RUST_LOG`):
//! - `TABLEKIT_LOG=debug` : all debug logs
//! - `TABLEKIT_LOG=tablekit_clipboard=trace` : one crate

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable read for the log filter.
pub const C_ENV_LOG_FILTER: &str = "TABLEKIT_LOG";
/// Directive used by hosts that have no preference.
pub const C_LOG_DIRECTIVE_DEFAULT: &str = "warn";

/// A global subscriber was already installed.
#[derive(Debug, thiserror::Error)]
#[error("logging already initialised: {0}")]
pub struct LogInitError(String);

/// Filter from `TABLEKIT_LOG`, else `default_directive`.
pub fn derive_env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(C_ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a console subscriber (stderr) filtered by [`derive_env_filter`].
///
/// Fails without side effects if a global subscriber already exists, so
/// library hosts may call it unconditionally and ignore the error.
pub fn init_logging(default_directive: &str) -> Result<(), LogInitError> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(derive_env_filter(default_directive));

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| LogInitError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        assert!(init_logging(C_LOG_DIRECTIVE_DEFAULT).is_ok());
        tracing::warn!("logging initialised");
        assert!(init_logging("debug").is_err());
    }
}

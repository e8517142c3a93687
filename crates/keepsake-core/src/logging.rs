//! Tracing subscriber bootstrap for applications embedding Keepsake.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::logging::LoggingConfig;
use crate::error::StoreError;
use crate::result::StoreResult;

/// Initialize the global tracing subscriber from configuration.
///
/// The `RUST_LOG` environment variable, when set, overrides the
/// configured level. Fails if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> StoreResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        _ => fmt().pretty().with_env_filter(filter).try_init(),
    };

    result.map_err(|e| StoreError::configuration(format!("Failed to install subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_installs_a_subscriber_exactly_once() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };
        assert!(init(&config).is_ok());
        // A second install must fail rather than silently replace.
        assert!(init(&config).is_err());
    }
}

//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate and are immutable once constructed: backends take
//! their settings at construction time, never through setters.

pub mod logging;
pub mod store;
pub mod sweep;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::store::StoreConfig;
use self::sweep::SweepConfig;

use crate::error::StoreError;

/// Root configuration for an application embedding Keepsake.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay). Every
/// section carries defaults, so an empty configuration source is valid.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeepsakeConfig {
    /// Token store backend settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Periodic dormancy sweep settings.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KeepsakeConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific
    /// overlay and environment variables prefixed with `KEEPSAKE_`.
    pub fn load(env: &str) -> Result<Self, StoreError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("KEEPSAKE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| StoreError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| StoreError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

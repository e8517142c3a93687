//! Token store backend configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default dormancy window before an unrefreshed record is eligible for
/// garbage collection: 90 days.
const DEFAULT_DORMANCY_TTL_SECONDS: u64 = 90 * 24 * 60 * 60;

/// Top-level token store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend to use: `"file"`, `"memory"`, or `"redis"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// File backend configuration.
    #[serde(default)]
    pub file: FileStoreConfig,
    /// In-memory backend configuration.
    #[serde(default)]
    pub memory: MemoryStoreConfig,
    /// Redis backend configuration.
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            file: FileStoreConfig::default(),
            memory: MemoryStoreConfig::default(),
            redis: RedisStoreConfig::default(),
        }
    }
}

/// File backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Root directory holding one file per token record.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// File name suffix appended to each selector. A leading dot is
    /// added if missing.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Dormancy TTL in seconds applied by sweeps that do not specify one.
    #[serde(default = "default_dormancy_ttl")]
    pub dormancy_ttl_seconds: u64,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            suffix: default_suffix(),
            dormancy_ttl_seconds: default_dormancy_ttl(),
        }
    }
}

impl FileStoreConfig {
    /// The configured dormancy TTL as a [`Duration`].
    pub fn dormancy_ttl(&self) -> Duration {
        Duration::from_secs(self.dormancy_ttl_seconds)
    }
}

/// In-memory backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStoreConfig {
    /// Dormancy TTL in seconds applied by sweeps that do not specify one.
    #[serde(default = "default_dormancy_ttl")]
    pub dormancy_ttl_seconds: u64,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            dormancy_ttl_seconds: default_dormancy_ttl(),
        }
    }
}

impl MemoryStoreConfig {
    /// The configured dormancy TTL as a [`Duration`].
    pub fn dormancy_ttl(&self) -> Duration {
        Duration::from_secs(self.dormancy_ttl_seconds)
    }
}

/// Redis backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix applied to every key this store writes.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Dormancy TTL in seconds applied by sweeps that do not specify one.
    #[serde(default = "default_dormancy_ttl")]
    pub dormancy_ttl_seconds: u64,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
            dormancy_ttl_seconds: default_dormancy_ttl(),
        }
    }
}

impl RedisStoreConfig {
    /// The configured dormancy TTL as a [`Duration`].
    pub fn dormancy_ttl(&self) -> Duration {
        Duration::from_secs(self.dormancy_ttl_seconds)
    }
}

fn default_backend() -> String {
    "file".to_string()
}

fn default_root_path() -> String {
    "./data/tokens".to_string()
}

fn default_suffix() -> String {
    ".token".to_string()
}

fn default_dormancy_ttl() -> u64 {
    DEFAULT_DORMANCY_TTL_SECONDS
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_key_prefix() -> String {
    "keepsake:".to_string()
}

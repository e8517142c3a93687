//! # keepsake-store
//!
//! Backend implementations of the Keepsake [`TokenStore`] contract:
//! local filesystem (the reference backend), process memory, and Redis.
//!
//! [`TokenStore`]: keepsake_core::traits::token_store::TokenStore

pub mod backends;
pub mod sweeper;

pub use backends::file::FileTokenStore;
pub use backends::memory::MemoryTokenStore;
#[cfg(feature = "redis-backend")]
pub use backends::redis::RedisTokenStore;
pub use sweeper::TokenSweeper;

use std::sync::Arc;

use keepsake_core::config::store::StoreConfig;
use keepsake_core::error::StoreError;
use keepsake_core::result::StoreResult;
use keepsake_core::traits::token_store::TokenStore;

/// Build the token store backend selected by configuration.
///
/// The authentication layer consumes the returned trait object only, so
/// swapping backends is a configuration change, not a code change.
pub async fn build_store(config: &StoreConfig) -> StoreResult<Arc<dyn TokenStore>> {
    match config.backend.as_str() {
        "file" => Ok(Arc::new(FileTokenStore::new(&config.file).await?)),
        "memory" => Ok(Arc::new(MemoryTokenStore::new(&config.memory))),
        #[cfg(feature = "redis-backend")]
        "redis" => Ok(Arc::new(RedisTokenStore::connect(&config.redis).await?)),
        #[cfg(not(feature = "redis-backend"))]
        "redis" => Err(StoreError::configuration(
            "Redis backend support is not compiled in (enable the `redis-backend` feature)",
        )),
        other => Err(StoreError::configuration(format!(
            "Unknown token store backend: {other}"
        ))),
    }
}

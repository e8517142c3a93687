//! Redis-backed token store for multi-node deployments.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info, warn};

use keepsake_core::config::store::RedisStoreConfig;
use keepsake_core::error::{ErrorKind, StoreError};
use keepsake_core::result::StoreResult;
use keepsake_core::traits::token_store::TokenStore;
use keepsake_core::types::record::TokenRecord;
use keepsake_core::types::selector::validate_selector;

/// Redis-backed token store.
///
/// Each record lives at `<prefix>token:<selector>`. Redis exposes no
/// portable per-key write timestamp, so every write also scores the
/// selector in a `<prefix>token:index` sorted set with the write's
/// epoch seconds; the sweep ranges that set, the way the file backend
/// ranges modification times.
#[derive(Debug, Clone)]
pub struct RedisTokenStore {
    /// Redis connection manager (pooled, reconnecting).
    conn: ConnectionManager,
    /// Prefix applied to every key this store writes.
    key_prefix: String,
    /// Dormancy TTL applied when a sweep does not specify one.
    default_ttl: Duration,
}

impl RedisTokenStore {
    /// Connect to Redis and create a new token store.
    pub async fn connect(config: &RedisStoreConfig) -> StoreResult<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            StoreError::with_source(ErrorKind::Backend, "Failed to create Redis client", e)
        })?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            StoreError::with_source(ErrorKind::Backend, "Failed to connect to Redis", e)
        })?;

        info!("Connected to Redis token store");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
            default_ttl: config.dormancy_ttl(),
        })
    }

    fn record_key(&self, selector: &str) -> String {
        record_key(&self.key_prefix, selector)
    }

    fn index_key(&self) -> String {
        index_key(&self.key_prefix)
    }

    fn effective_ttl(&self, ttl: Option<Duration>) -> Duration {
        match ttl {
            Some(t) if !t.is_zero() => t,
            _ => self.default_ttl,
        }
    }

    fn map_err(e: redis::RedisError) -> StoreError {
        StoreError::with_source(ErrorKind::Backend, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    fn backend_type(&self) -> &str {
        "redis"
    }

    async fn store(&self, record: TokenRecord) -> StoreResult<()> {
        validate_selector(&record.selector)?;
        let key = self.record_key(&record.selector);
        let encoded = record.to_encoded()?;

        let mut conn = self.conn.clone();
        let _: () = conn.set(&key, encoded).await.map_err(Self::map_err)?;
        let _: () = conn
            .zadd(
                self.index_key(),
                record.selector.as_str(),
                Utc::now().timestamp(),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(selector = %record.selector, "Stored token record");
        Ok(())
    }

    async fn get(&self, selector: &str) -> StoreResult<Option<TokenRecord>> {
        validate_selector(selector)?;
        let key = self.record_key(selector);

        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(&key).await.map_err(Self::map_err)?;
        let Some(value) = value else { return Ok(None) };
        if value.is_empty() {
            return Ok(None);
        }

        match TokenRecord::from_encoded(&value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(selector, error = %e, "Corrupt token record, treating as absent");
                Ok(None)
            }
        }
    }

    async fn delete(&self, selector: &str) -> StoreResult<()> {
        validate_selector(selector)?;
        let key = self.record_key(selector);

        let mut conn = self.conn.clone();
        let _: () = conn.del(&key).await.map_err(Self::map_err)?;
        let _: () = conn
            .zrem(self.index_key(), selector)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete_expired(&self, ttl: Option<Duration>) -> StoreResult<u64> {
        let ttl = self.effective_ttl(ttl);
        let cutoff = Utc::now().timestamp() - ttl.as_secs() as i64;
        let index = self.index_key();

        let mut conn = self.conn.clone();
        // Strictly older than the cutoff, matching the file backend's
        // "age > ttl" boundary.
        let dormant: Vec<String> = conn
            .zrangebyscore(&index, "-inf", format!("({cutoff}"))
            .await
            .map_err(Self::map_err)?;

        let mut removed = 0u64;
        for selector in &dormant {
            let deleted: u64 = match conn.del(self.record_key(selector)).await {
                Ok(count) => count,
                Err(e) => {
                    warn!(selector, error = %e, "Failed to remove dormant record");
                    continue;
                }
            };
            if let Err(e) = conn.zrem::<_, _, ()>(&index, selector).await {
                warn!(selector, error = %e, "Failed to unindex dormant record");
            }
            removed += deleted;
        }

        if removed > 0 {
            info!(removed, "Removed dormant token records");
        }
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}

/// Key holding the record stored under a selector.
fn record_key(prefix: &str, selector: &str) -> String {
    format!("{prefix}token:{selector}")
}

/// Sorted set scoring each selector by its last write time.
fn index_key(prefix: &str) -> String {
    format!("{prefix}token:index")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_carry_the_configured_prefix() {
        assert_eq!(record_key("keepsake:", "sel1"), "keepsake:token:sel1");
        assert_eq!(index_key("keepsake:"), "keepsake:token:index");
        assert_eq!(record_key("", "sel1"), "token:sel1");
    }
}

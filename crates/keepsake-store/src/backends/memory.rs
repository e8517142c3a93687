//! In-memory token store for tests and single-process embedding.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use keepsake_core::config::store::MemoryStoreConfig;
use keepsake_core::result::StoreResult;
use keepsake_core::traits::token_store::TokenStore;
use keepsake_core::types::record::TokenRecord;
use keepsake_core::types::selector::validate_selector;

/// One stored record plus its dormancy signal.
#[derive(Debug, Clone)]
struct Entry {
    record: TokenRecord,
    /// When the record was last written; the in-memory counterpart of
    /// the file backend's modification time.
    last_written: Instant,
}

/// In-memory token store backed by a Tokio read-write lock.
///
/// Not durable across restarts; suitable for tests and single-process
/// deployments where losing remember-me tokens on restart is
/// acceptable (users fall back to a full login).
#[derive(Debug, Clone)]
pub struct MemoryTokenStore {
    /// Records keyed by selector.
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    /// Dormancy TTL applied when a sweep does not specify one.
    default_ttl: Duration,
}

impl MemoryTokenStore {
    /// Create a new in-memory token store from configuration.
    pub fn new(config: &MemoryStoreConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: config.dormancy_ttl(),
        }
    }

    fn effective_ttl(&self, ttl: Option<Duration>) -> Duration {
        match ttl {
            Some(t) if !t.is_zero() => t,
            _ => self.default_ttl,
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn store(&self, record: TokenRecord) -> StoreResult<()> {
        validate_selector(&record.selector)?;
        let mut entries = self.entries.write().await;
        debug!(selector = %record.selector, "Stored token record");
        entries.insert(
            record.selector.clone(),
            Entry {
                record,
                last_written: Instant::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, selector: &str) -> StoreResult<Option<TokenRecord>> {
        validate_selector(selector)?;
        let entries = self.entries.read().await;
        Ok(entries.get(selector).map(|entry| entry.record.clone()))
    }

    async fn delete(&self, selector: &str) -> StoreResult<()> {
        validate_selector(selector)?;
        let mut entries = self.entries.write().await;
        if entries.remove(selector).is_none() {
            debug!(selector, "Delete for a selector with no stored record");
        }
        Ok(())
    }

    async fn delete_expired(&self, ttl: Option<Duration>) -> StoreResult<u64> {
        let ttl = self.effective_ttl(ttl);
        let now = Instant::now();

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_written) <= ttl);
        let removed = (before - entries.len()) as u64;

        if removed > 0 {
            info!(removed, "Removed dormant token records");
        }
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use keepsake_core::error::ErrorKind;
    use tokio::time::advance;

    fn record(selector: &str, key: &str, expiration: i64) -> TokenRecord {
        TokenRecord::new(
            "u1",
            "role",
            selector,
            key,
            Utc.timestamp_opt(expiration, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn store_then_get_returns_every_field() {
        let store = MemoryTokenStore::new(&MemoryStoreConfig::default());
        let original = record("sel1", "abcd1234", 1_700_000_000);
        store.store(original.clone()).await.unwrap();
        assert_eq!(store.get("sel1").await.unwrap().unwrap(), original);
    }

    #[tokio::test]
    async fn second_store_replaces_the_whole_record() {
        let store = MemoryTokenStore::new(&MemoryStoreConfig::default());
        store.store(record("sel2", "keyA", 100)).await.unwrap();
        store.store(record("sel2", "keyB", 200)).await.unwrap();

        let loaded = store.get("sel2").await.unwrap().unwrap();
        assert_eq!(loaded.key, "keyB");
        assert_eq!(loaded.expiration, Utc.timestamp_opt(200, 0).unwrap());
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_get_misses_are_empty() {
        let store = MemoryTokenStore::new(&MemoryStoreConfig::default());
        store.store(record("sel1", "k", 100)).await.unwrap();

        store.delete("sel1").await.unwrap();
        store.delete("sel1").await.unwrap();
        assert!(store.get("sel1").await.unwrap().is_none());
        assert!(store.get("never-stored").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unsafe_selectors_are_rejected() {
        let store = MemoryTokenStore::new(&MemoryStoreConfig::default());
        let err = store.get("../../etc/passwd").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSelector);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_removes_only_records_older_than_the_ttl() {
        let store = MemoryTokenStore::new(&MemoryStoreConfig::default());

        store.store(record("old", "k", 100)).await.unwrap();
        advance(Duration::from_secs(60)).await;
        let fresh = record("young", "keep-me", 100);
        store.store(fresh.clone()).await.unwrap();
        advance(Duration::from_secs(40)).await;

        // Ages are now 100s and 40s.
        let removed = store
            .delete_expired(Some(Duration::from_secs(50)))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(store.get("old").await.unwrap().is_none());
        assert_eq!(store.get("young").await.unwrap().unwrap(), fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_with_zero_ttl_uses_the_configured_default() {
        let store = MemoryTokenStore::new(&MemoryStoreConfig {
            dormancy_ttl_seconds: 50,
        });

        store.store(record("old", "k", 100)).await.unwrap();
        advance(Duration::from_secs(100)).await;
        store.store(record("young", "k", 100)).await.unwrap();

        let removed = store.delete_expired(Some(Duration::ZERO)).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.get("old").await.unwrap().is_none());
        assert!(store.get("young").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn rewriting_a_record_resets_its_dormancy_clock() {
        let store = MemoryTokenStore::new(&MemoryStoreConfig::default());

        store.store(record("sel1", "k", 100)).await.unwrap();
        advance(Duration::from_secs(80)).await;
        store.store(record("sel1", "k2", 200)).await.unwrap();
        advance(Duration::from_secs(40)).await;

        // 120s since first write, but only 40s since the refresh.
        let removed = store
            .delete_expired(Some(Duration::from_secs(50)))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(store.get("sel1").await.unwrap().is_some());
    }
}

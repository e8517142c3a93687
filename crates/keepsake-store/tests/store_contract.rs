//! End-to-end exercise of the token store through the trait object, the
//! way an authentication layer consumes it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use keepsake_core::config::KeepsakeConfig;
use keepsake_core::traits::token_store::TokenStore;
use keepsake_core::types::record::TokenRecord;
use keepsake_store::{TokenSweeper, build_store};

fn test_config(root: &std::path::Path) -> KeepsakeConfig {
    let mut config = KeepsakeConfig::default();
    config.store.backend = "file".to_string();
    config.store.file.root_path = root.to_str().unwrap().to_string();
    config.store.file.dormancy_ttl_seconds = 60;
    config
}

#[tokio::test]
async fn login_lookup_logout_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    keepsake_core::logging::init(&config.logging).ok();

    let store: Arc<dyn TokenStore> = build_store(&config.store).await.unwrap();
    assert!(store.health_check().await.unwrap());

    // Login: the auth manager generates a selector/validator pair and
    // persists the record.
    let issued = TokenRecord::new(
        42,
        "admin",
        "b1946ac92492d234",
        "hash-of-validator",
        Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    );
    store.store(issued.clone()).await.unwrap();

    // Cookie presented: look up by selector; the validator comparison
    // happens caller-side against the returned key.
    let found = store.get("b1946ac92492d234").await.unwrap().unwrap();
    assert_eq!(found, issued);

    // Logout: idempotent delete.
    store.delete("b1946ac92492d234").await.unwrap();
    store.delete("b1946ac92492d234").await.unwrap();
    assert!(store.get("b1946ac92492d234").await.unwrap().is_none());
}

#[tokio::test]
async fn maintenance_sweep_runs_against_the_built_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let store = build_store(&config.store).await.unwrap();
    store
        .store(TokenRecord::new(
            "u9",
            "user",
            "fresh-selector",
            "k",
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ))
        .await
        .unwrap();

    // A just-written record survives a sweep at the default TTL.
    let sweeper = TokenSweeper::new(store.clone(), config.sweep.clone());
    assert_eq!(sweeper.run_sweep().await.unwrap(), 0);
    assert!(store.get("fresh-selector").await.unwrap().is_some());

    // An explicit long TTL leaves it alone as well.
    assert_eq!(
        store
            .delete_expired(Some(Duration::from_secs(3_600)))
            .await
            .unwrap(),
        0
    );
}

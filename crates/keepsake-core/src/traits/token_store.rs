//! Token store trait for pluggable persistent-login backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::StoreResult;
use crate::types::record::TokenRecord;

/// Trait for persistent-login token storage backends.
///
/// A backend persists opaque [`TokenRecord`]s keyed by their selector and
/// enforces exactly one live record per selector. It performs no
/// validator comparison and no logical-expiration check; both belong to
/// the authentication layer consuming this contract.
///
/// Implementations exist for the local filesystem, process memory, and
/// Redis. The trait is defined here in `keepsake-core` and implemented
/// in `keepsake-store`.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "file", "memory").
    fn backend_type(&self) -> &str;

    /// Persist a record, replacing any existing record for its selector.
    ///
    /// The replacement is atomic from the caller's point of view: a
    /// concurrent `get` observes either the old record or the new one,
    /// never a partial overwrite. Failures surface as an error so the
    /// caller can fail the login rather than silently losing the token.
    async fn store(&self, record: TokenRecord) -> StoreResult<()>;

    /// Look up the record stored under a selector.
    ///
    /// Returns `Ok(None)` for an unknown selector; absence is expected
    /// traffic, not a fault. A stored unit that is empty or fails to
    /// decode also reads as `Ok(None)`, degrading corruption to
    /// "not authenticated" (with an operator-facing log signal).
    async fn get(&self, selector: &str) -> StoreResult<Option<TokenRecord>>;

    /// Remove the record stored under a selector.
    ///
    /// Idempotent: deleting an unknown selector succeeds, so logout
    /// cannot fail on an already-removed token.
    async fn delete(&self, selector: &str) -> StoreResult<()>;

    /// Remove records that have been dormant for longer than `ttl`.
    ///
    /// Dormancy is measured from when a record was last *written*, not
    /// from its logical expiration: the sweep is the coarse safety net
    /// that reclaims tokens issued with very long or unlimited
    /// expiration. `None` or a zero duration falls back to the backend's
    /// configured default TTL. Failures on individual records are logged
    /// and skipped; the sweep never aborts part-way. Returns the number
    /// of records removed.
    async fn delete_expired(&self, ttl: Option<Duration>) -> StoreResult<u64>;

    /// Check whether the backend medium is reachable.
    async fn health_check(&self) -> StoreResult<bool>;
}

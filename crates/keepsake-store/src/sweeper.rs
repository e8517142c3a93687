//! Periodic dormancy sweep over a token store.
//!
//! Tokens issued with very long or unlimited expiration would otherwise
//! accumulate forever; the sweeper is the maintenance collaborator that
//! bounds storage growth by garbage-collecting records nobody has
//! rewritten within the backend's dormancy window.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use keepsake_core::config::sweep::SweepConfig;
use keepsake_core::result::StoreResult;
use keepsake_core::traits::token_store::TokenStore;

/// Runs `delete_expired` against a token store on a fixed interval.
#[derive(Debug, Clone)]
pub struct TokenSweeper {
    /// The store being swept.
    store: Arc<dyn TokenStore>,
    /// Sweep loop settings.
    config: SweepConfig,
}

impl TokenSweeper {
    /// Create a new sweeper over the given store.
    pub fn new(store: Arc<dyn TokenStore>, config: SweepConfig) -> Self {
        Self { store, config }
    }

    /// Run one sweep pass using the backend's default dormancy TTL.
    ///
    /// Returns the number of records removed.
    pub async fn run_sweep(&self) -> StoreResult<u64> {
        let removed = self.store.delete_expired(None).await?;
        if removed > 0 {
            info!(
                backend = self.store.backend_type(),
                removed, "Dormancy sweep complete"
            );
        }
        Ok(removed)
    }

    /// Start the periodic sweep loop.
    ///
    /// The first pass runs immediately, then one per configured
    /// interval. A failed pass is logged and the loop keeps running.
    /// Returns the task handle and a shutdown signal; sending `true`
    /// (or dropping the sender) stops the loop.
    pub fn spawn(self) -> (JoinHandle<()>, watch::Sender<bool>) {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            if !self.config.enabled {
                info!("Token sweeper disabled by configuration");
                return;
            }

            let period = Duration::from_secs(self.config.interval_minutes.max(1) * 60);
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_sweep().await {
                            error!(error = %e, "Dormancy sweep failed");
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        info!("Token sweeper stopped");
                        break;
                    }
                }
            }
        });
        (handle, shutdown_tx)
    }
}

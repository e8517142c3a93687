//! File-backed token store: one file per record, named by its selector.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use keepsake_core::config::store::FileStoreConfig;
use keepsake_core::error::{ErrorKind, StoreError};
use keepsake_core::result::StoreResult;
use keepsake_core::traits::token_store::TokenStore;
use keepsake_core::types::record::TokenRecord;
use keepsake_core::types::selector::validate_selector;

/// File-backed token store.
///
/// Each record lives at `root/<selector><suffix>`. The file's
/// modification time doubles as the "last written" signal for the
/// dormancy sweep, independent of the logical expiration inside the
/// record. Writes go through a unique temp file and a rename, so a
/// crash mid-write never leaves a half-written record at the addressed
/// path.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    /// Root directory for all token record files.
    root: PathBuf,
    /// File name suffix, normalized to a single leading dot.
    suffix: String,
    /// Dormancy TTL applied when a sweep does not specify one.
    default_ttl: Duration,
}

impl FileTokenStore {
    /// Create a new file token store rooted at the configured path.
    pub async fn new(config: &FileStoreConfig) -> StoreResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            StoreError::with_source(
                ErrorKind::Storage,
                format!("Failed to create token store root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            suffix: normalize_suffix(&config.suffix),
            default_ttl: config.dormancy_ttl(),
        })
    }

    /// Resolve a selector to its record file path.
    ///
    /// Validation happens here so no operation can touch the filesystem
    /// with an unsafe selector.
    fn unit_path(&self, selector: &str) -> StoreResult<PathBuf> {
        validate_selector(selector)?;
        Ok(self.root.join(format!("{selector}{}", self.suffix)))
    }

    fn effective_ttl(&self, ttl: Option<Duration>) -> Duration {
        match ttl {
            Some(t) if !t.is_zero() => t,
            _ => self.default_ttl,
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    fn backend_type(&self) -> &str {
        "file"
    }

    async fn store(&self, record: TokenRecord) -> StoreResult<()> {
        let path = self.unit_path(&record.selector)?;
        let encoded = record.to_encoded()?;

        // Write-then-rename keeps the replacement atomic on the same
        // filesystem; concurrent readers see the old record or the new
        // one, never a torn write.
        let tmp = self.root.join(format!(
            "{}{}.{}.tmp",
            record.selector,
            self.suffix,
            Uuid::new_v4().simple()
        ));
        fs::write(&tmp, encoded.as_bytes()).await.map_err(|e| {
            StoreError::with_source(
                ErrorKind::Storage,
                format!("Failed to write token record: {}", record.selector),
                e,
            )
        })?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace token record: {}", record.selector),
                e,
            ));
        }

        debug!(selector = %record.selector, "Stored token record");
        Ok(())
    }

    async fn get(&self, selector: &str) -> StoreResult<Option<TokenRecord>> {
        let path = self.unit_path(selector)?;
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read token record: {selector}"),
                    e,
                ));
            }
        };

        // An empty unit reads exactly like a missing one.
        if data.is_empty() {
            return Ok(None);
        }

        let Ok(text) = String::from_utf8(data) else {
            warn!(selector, "Token record is not valid UTF-8, treating as absent");
            return Ok(None);
        };
        match TokenRecord::from_encoded(&text) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(selector, error = %e, "Corrupt token record, treating as absent");
                Ok(None)
            }
        }
    }

    async fn delete(&self, selector: &str) -> StoreResult<()> {
        let path = self.unit_path(selector)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete token record: {selector}"),
                e,
            )),
        }
    }

    async fn delete_expired(&self, ttl: Option<Duration>) -> StoreResult<u64> {
        let ttl = self.effective_ttl(ttl);
        let Some(cutoff) = SystemTime::now().checked_sub(ttl) else {
            // TTL reaches past the epoch; nothing can be that dormant.
            return Ok(0);
        };

        let mut dir = fs::read_dir(&self.root).await.map_err(|e| {
            StoreError::with_source(
                ErrorKind::Storage,
                format!("Failed to scan token store root: {}", self.root.display()),
                e,
            )
        })?;

        let mut removed = 0u64;
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            StoreError::with_source(ErrorKind::Storage, "Failed to read store entry", e)
        })? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.ends_with(&self.suffix) {
                continue;
            }

            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(unit = name, error = %e, "Failed to stat token record, skipping");
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }
            let modified = match meta.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(unit = name, error = %e, "No modification time, skipping");
                    continue;
                }
            };

            if modified < cutoff {
                match fs::remove_file(entry.path()).await {
                    Ok(()) => removed += 1,
                    // Deleted underneath us by a concurrent sweep or logout.
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        warn!(unit = name, error = %e, "Failed to remove dormant record");
                    }
                }
            }
        }

        if removed > 0 {
            info!(removed, "Removed dormant token records");
        }
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        match fs::metadata(&self.root).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(_) => Ok(false),
        }
    }
}

/// Normalize a configured suffix to carry exactly one leading dot.
fn normalize_suffix(suffix: &str) -> String {
    format!(".{}", suffix.trim_start_matches('.'))
}

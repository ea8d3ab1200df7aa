//! Persistent card-library snapshots in the host data directory
//!
//! Each snapshot is one JSON file `<prefix><timestamp>.json` holding
//! `{ cards, timestamp, version }`. The newest file (by the timestamp in its
//! name) is the live entry. Every failure here degrades to "absent" with a log
//! line; nothing propagates to the loader.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use host_storage::{HostStorage, RetentionPolicy, TimestampedName};

use crate::config::StorageConfig;
use crate::config::defaults::CACHE_FORMAT_VERSION;
use crate::errors::{AppResult, CacheError, CacheResult};
use crate::models::{CacheInfo, Card};
use crate::utils::time::{MonotonicMillis, now_millis};

#[derive(Debug, Deserialize)]
struct CachedLibrary {
    cards: Vec<Card>,
    timestamp: i64,
    version: String,
}

#[derive(Serialize)]
struct CachedLibraryRef<'a> {
    cards: &'a [Card],
    timestamp: i64,
    version: &'a str,
}

/// Reads and writes corpus snapshots through a [`HostStorage`].
///
/// Built without storage (or with persistence disabled) every operation is a
/// no-op reporting "absent".
#[derive(Debug)]
pub struct CardLibraryCache {
    storage: Option<Arc<dyn HostStorage>>,
    dir: String,
    naming: TimestampedName,
    policy: RetentionPolicy,
    clock: MonotonicMillis,
    dir_ready: OnceCell<bool>,
}

impl CardLibraryCache {
    pub fn new(storage: Option<Arc<dyn HostStorage>>, config: &StorageConfig) -> Self {
        let policy = config.retention_policy();
        let storage = if policy.enabled {
            storage
        } else {
            debug!("Card library cache disabled by configuration");
            None
        };
        Self {
            storage,
            dir: config.cache_dir_name.clone(),
            naming: TimestampedName::new(config.file_prefix.clone(), "json"),
            policy,
            clock: MonotonicMillis::new(),
            dir_ready: OnceCell::new(),
        }
    }

    /// A cache that never touches the filesystem.
    pub fn memory_only(config: &StorageConfig) -> Self {
        Self::new(None, config)
    }

    /// Storage handle once the cache directory exists; `None` means memory-only.
    async fn storage(&self) -> Option<&dyn HostStorage> {
        let storage = self.storage.as_deref()?;
        let ready = *self
            .dir_ready
            .get_or_init(|| async {
                match storage.ensure_dir(&self.dir).await {
                    Ok(()) => {
                        debug!(
                            "Cache directory initialized: {}",
                            storage.data_dir().join(&self.dir).display()
                        );
                        true
                    }
                    Err(e) => {
                        warn!("Failed to create cache directory, caching disabled: {}", e);
                        false
                    }
                }
            })
            .await;
        ready.then_some(storage)
    }

    fn entry_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.dir, file_name)
    }

    /// Cache files, newest first.
    async fn entries(&self, storage: &dyn HostStorage) -> Vec<(i64, String)> {
        match storage.list_files(&self.dir).await {
            Ok(names) => self.naming.newest_first(&names),
            Err(e) => {
                warn!("Failed to list cache directory: {}", e);
                Vec::new()
            }
        }
    }

    fn decode(file_name: &str, contents: &str) -> CacheResult<CachedLibrary> {
        let cached: CachedLibrary =
            serde_json::from_str(contents).map_err(|e| CacheError::Corrupt {
                file: file_name.to_string(),
                message: e.to_string(),
            })?;
        if cached.version != CACHE_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                file: file_name.to_string(),
                found: cached.version,
                expected: CACHE_FORMAT_VERSION.to_string(),
            });
        }
        Ok(cached)
    }

    /// Reads and decodes the newest entry without applying the freshness
    /// rule. `None` when there is no entry or it cannot be read.
    async fn read_newest(
        &self,
        storage: &dyn HostStorage,
    ) -> Option<(String, CacheResult<CachedLibrary>)> {
        let (_, file_name) = self.entries(storage).await.into_iter().next()?;
        match storage.read_to_string(&self.entry_path(&file_name)).await {
            Ok(contents) => {
                let decoded = Self::decode(&file_name, &contents);
                Some((file_name, decoded))
            }
            Err(e) => {
                warn!("Failed to read cache file {}: {}", file_name, e);
                None
            }
        }
    }

    /// Like [`Self::read_newest`], deleting an entry that does not decode.
    async fn read_latest(&self, storage: &dyn HostStorage) -> Option<(String, CachedLibrary)> {
        match self.read_newest(storage).await? {
            (file_name, Ok(cached)) => Some((file_name, cached)),
            (file_name, Err(e)) => {
                warn!("Discarding unusable cache entry: {}", e);
                self.remove(storage, &file_name).await;
                None
            }
        }
    }

    async fn remove(&self, storage: &dyn HostStorage, file_name: &str) -> bool {
        match storage.remove_file(&self.entry_path(file_name)).await {
            Ok(()) => true,
            Err(e) if e.is_not_found() => false,
            Err(e) => {
                warn!("Failed to delete cache file {}: {}", file_name, e);
                false
            }
        }
    }

    /// The cached cards, or `None` when there is no fresh, readable entry.
    /// A stale entry is deleted on detection.
    pub async fn get(&self) -> Option<Vec<Card>> {
        let Some(storage) = self.storage().await else {
            debug!("Host storage unavailable, skipping cache read");
            return None;
        };

        let Some((file_name, cached)) = self.read_latest(storage).await else {
            info!("No cached card library found");
            return None;
        };

        let age_ms = now_millis() - cached.timestamp;
        if self.policy.is_expired(cached.timestamp, now_millis()) {
            info!(
                "Card library cache expired (age: {}h), removing {}",
                age_ms / 3_600_000,
                file_name
            );
            self.remove(storage, &file_name).await;
            return None;
        }

        info!(
            "Card library cache hit (age: {}h, cards: {}, file: {})",
            age_ms / 3_600_000,
            cached.cards.len(),
            file_name
        );
        Some(cached.cards)
    }

    async fn write_entry(&self, cards: &[Card]) -> AppResult<String> {
        let storage = self.storage().await.ok_or_else(|| CacheError::Unavailable {
            reason: "host storage unavailable".to_string(),
        })?;

        let timestamp = self.clock.next();
        let file_name = self.naming.format(timestamp);
        let payload = serde_json::to_vec(&CachedLibraryRef {
            cards,
            timestamp,
            version: CACHE_FORMAT_VERSION,
        })?;
        storage.write(&self.entry_path(&file_name), &payload).await?;
        Ok(file_name)
    }

    /// Writes a new entry then prunes all but the newest entries.
    /// Failures are logged, never returned.
    pub async fn set(&self, cards: &[Card]) {
        match self.write_entry(cards).await {
            Ok(file_name) => {
                info!(
                    "Card library cached successfully ({} cards) to: {}",
                    cards.len(),
                    file_name
                );
                self.cleanup().await;
            }
            Err(e) => warn!("Failed to cache card library: {}", e),
        }
    }

    /// Deletes entries beyond the retention count.
    async fn cleanup(&self) {
        let Some(storage) = self.storage().await else {
            return;
        };
        let entries = self.entries(storage).await;
        for (_, file_name) in self.policy.surplus(entries) {
            if self.remove(storage, &file_name).await {
                debug!("Deleted old cache file: {}", file_name);
            }
        }
    }

    /// Removes only the newest entry.
    pub async fn clear(&self) {
        let Some(storage) = self.storage().await else {
            return;
        };
        match self.entries(storage).await.into_iter().next() {
            Some((_, file_name)) => {
                if self.remove(storage, &file_name).await {
                    info!("Card library cache cleared: {}", file_name);
                }
            }
            None => debug!("No cache file to clear"),
        }
    }

    /// Removes every entry.
    pub async fn clear_all(&self) {
        let Some(storage) = self.storage().await else {
            return;
        };
        for (_, file_name) in self.entries(storage).await {
            if self.remove(storage, &file_name).await {
                debug!("Deleted cache file: {}", file_name);
            }
        }
        info!("All card library cache files cleared");
    }

    /// True when `get` would return cards.
    pub async fn has(&self) -> bool {
        self.get().await.is_some()
    }

    /// Describes the newest entry without modifying the cache. An unreadable
    /// entry reports `exists: false`. `None` in memory-only mode.
    pub async fn info(&self) -> Option<CacheInfo> {
        let storage = self.storage().await?;
        let info = match self.read_newest(storage).await {
            Some((file_name, Ok(cached))) => CacheInfo {
                exists: true,
                age_ms: now_millis() - cached.timestamp,
                card_count: cached.cards.len(),
                file_name,
            },
            Some((_, Err(_))) | None => CacheInfo {
                exists: false,
                age_ms: 0,
                card_count: 0,
                file_name: String::new(),
            },
        };
        Some(info)
    }
}

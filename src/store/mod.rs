//! # Key/value cache store seam.
//!
//! The core treats persisted cache storage as a plain key/value store with an
//! optional persist flag: [`CacheStore`]. Values are JSON so callers can round
//! trip any serde type (the compose snapshot being the main one).
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`] process-local, for tests and ephemeral runs;
//! - [`FileStore`] one JSON file per persisted key, durable across process
//!   restarts; non-persisted entries stay in memory.
//!
//! ## Rules
//! - Single-writer discipline: the lifecycle driver and fast-path commands run
//!   in separate process invocations, never interleaved; writes are atomic
//!   whole-value replaces.
//! - `get` never mutates.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

/// Async key/value store with an optional persist flag.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`. When `persist` is true the value must
    /// survive process restarts.
    async fn set(&self, key: &str, value: Value, persist: bool);

    /// Removes `key`, persisted or not.
    async fn remove(&self, key: &str);
}

/// Process-local store; the persist flag is recorded but everything lives in
/// memory.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (Value, bool)>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `key` was stored with the persist flag set.
    ///
    /// Test hook: lets callers assert persistence intent without a filesystem.
    pub fn is_persisted(&self, key: &str) -> bool {
        self.lock().get(key).map(|(_, p)| *p).unwrap_or(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Value, bool)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).map(|(v, _)| v.clone())
    }

    async fn set(&self, key: &str, value: Value, persist: bool) {
        self.lock().insert(key.to_string(), (value, persist));
    }

    async fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

/// File-backed store: persisted keys become one JSON file each under `dir`;
/// non-persisted entries stay in memory.
pub struct FileStore {
    dir: PathBuf,
    ephemeral: Mutex<HashMap<String, Value>>,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first persisted write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ephemeral: Mutex::new(HashMap::new()),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are cache identifiers like "myapp.compose.cache"; slashes are
        // not expected but must not escape the store directory.
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.ephemeral
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Option<Value> {
        if let Some(v) = self.lock().get(key).cloned() {
            return Some(v);
        }
        let bytes = tokio::fs::read(self.path_for(key)).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable cache entry");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Value, persist: bool) {
        if !persist {
            self.lock().insert(key.to_string(), value);
            return;
        }
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!(key, error = %e, "could not create cache directory");
            return;
        }
        let path = self.path_for(key);
        let bytes = match serde_json::to_vec_pretty(&value) {
            Ok(b) => b,
            Err(e) => {
                warn!(key, error = %e, "could not serialize cache entry");
                return;
            }
        };
        // Write-then-rename keeps readers from observing a torn entry.
        let tmp = path.with_extension("json.tmp");
        let write = async {
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, &path).await
        };
        if let Err(e) = write.await {
            warn!(key, error = %e, "could not persist cache entry");
        }
    }

    async fn remove(&self, key: &str) {
        self.lock().remove(key);
        let _ = tokio::fs::remove_file(self.path_for(key)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("k", json!({"a": 1}), true).await;
        assert_eq!(store.get("k").await, Some(json!({"a": 1})));
        assert!(store.is_persisted("k"));

        store.remove("k").await;
        assert_eq!(store.get("k").await, None);
    }

    #[tokio::test]
    async fn test_memory_store_tracks_persist_flag() {
        let store = MemoryStore::new();
        store.set("e", json!(1), false).await;
        assert!(!store.is_persisted("e"));
    }

    #[tokio::test]
    async fn test_file_store_persists_and_removes() {
        let dir = std::env::temp_dir().join(format!(
            "dockhand-store-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let store = FileStore::new(&dir);

        store.set("app.compose.cache", json!({"name": "app"}), true).await;
        assert_eq!(
            store.get("app.compose.cache").await,
            Some(json!({"name": "app"}))
        );

        // A fresh store over the same directory still sees the entry.
        let reopened = FileStore::new(&dir);
        assert_eq!(
            reopened.get("app.compose.cache").await,
            Some(json!({"name": "app"}))
        );

        store.remove("app.compose.cache").await;
        assert_eq!(store.get("app.compose.cache").await, None);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_file_store_keeps_ephemeral_entries_in_memory() {
        let dir = std::env::temp_dir().join(format!(
            "dockhand-store-eph-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let store = FileStore::new(&dir);
        store.set("scratch", json!(42), false).await;
        assert_eq!(store.get("scratch").await, Some(json!(42)));
        // Nothing hit the disk for the ephemeral key.
        assert!(!dir.join("scratch.json").exists());
    }
}

//! # Persisted compose snapshot.
//!
//! [`ComposeSnapshot`] is a minimal, reloadable projection of an initialized
//! application: enough to run tooling commands without paying the full
//! app-init penalty. It is created (overwritten) on every successful `ready`
//! transition, deleted on uninstall, and read without mutation by the
//! fast-path `exec` task.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::services::ServiceInfo;
use crate::store::CacheStore;

/// Minimal projection of an initialized application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComposeSnapshot {
    /// Application name.
    pub name: String,
    /// Compose project identifier.
    pub project: String,
    /// Compose files describing the application.
    pub compose: Vec<PathBuf>,
    /// Application root on the host.
    pub root: PathBuf,
    /// Per-service descriptors, both schema generations.
    pub info: Vec<ServiceInfo>,
    /// Explicit (modern-generation) mount map; legacy defaults are applied at
    /// load time by the mount resolver.
    pub mounts: BTreeMap<String, String>,
    /// Services that require the exec wrapper script.
    #[serde(default)]
    pub executors: std::collections::BTreeSet<String>,
}

impl ComposeSnapshot {
    /// Returns the cache key the snapshot for `app_name` lives under.
    pub fn cache_key(app_name: &str) -> String {
        format!("{app_name}.compose.cache")
    }

    /// Persists this snapshot, replacing any previous one for the app.
    pub async fn save(&self, store: &dyn CacheStore) {
        let key = Self::cache_key(&self.name);
        match serde_json::to_value(self) {
            Ok(value) => {
                debug!(app = %self.name, key = %key, "saving compose snapshot");
                store.set(&key, value, true).await;
            }
            Err(e) => {
                // Snapshot structs always serialize; reaching this means a bug
                // upstream, and the fast path will simply re-init.
                tracing::warn!(app = %self.name, error = %e, "could not serialize snapshot");
            }
        }
    }

    /// Loads the snapshot for `app_name`, if one was persisted.
    pub async fn load(store: &dyn CacheStore, app_name: &str) -> Option<Self> {
        let value = store.get(&Self::cache_key(app_name)).await?;
        match serde_json::from_value(value) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(app = app_name, error = %e, "discarding stale snapshot");
                None
            }
        }
    }

    /// Removes the persisted snapshot for `app_name`.
    pub async fn remove(store: &dyn CacheStore, app_name: &str) {
        debug!(app = app_name, "removing compose snapshot");
        store.remove(&Self::cache_key(app_name)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn snapshot() -> ComposeSnapshot {
        ComposeSnapshot {
            name: "myapp".into(),
            project: "myapp".into(),
            compose: vec![PathBuf::from("/tmp/myapp/docker-compose.yml")],
            root: PathBuf::from("/tmp/myapp"),
            info: vec![ServiceInfo::Legacy {
                service: "db".into(),
                app_mount: None,
            }],
            mounts: BTreeMap::from([("web".to_string(), "/srv".to_string())]),
            executors: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let store = MemoryStore::new();
        let snap = snapshot();
        snap.save(&store).await;

        let loaded = ComposeSnapshot::load(&store, "myapp").await.unwrap();
        assert_eq!(loaded, snap);
        assert!(store.is_persisted(&ComposeSnapshot::cache_key("myapp")));
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(ComposeSnapshot::load(&store, "ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_deletes_entry() {
        let store = MemoryStore::new();
        snapshot().save(&store).await;
        ComposeSnapshot::remove(&store, "myapp").await;
        assert!(ComposeSnapshot::load(&store, "myapp").await.is_none());
    }
}

//! # Application model.
//!
//! [`App`] bundles the state the core needs about one application: identity,
//! declared configuration, per-service descriptors, mount data, the owned
//! event [`Bus`], and the append-only task registry that CLI surfaces read
//! after `post-init`.
//!
//! An `App` is a cheaply cloneable handle: clones share the bus and the task
//! registry, but the descriptive fields (`config`, `info`, `mounts`,
//! `executors`) are copied by value, so a clone captured by a hook sees them
//! as they were at capture time. Finish populating those fields before
//! registering hooks that read them. An `App` is built either from full
//! initialization (outside this core) or from a persisted [`ComposeSnapshot`]
//! on the fast path.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::app::services::{resolve_mounts, ServiceInfo};
use crate::app::snapshot::ComposeSnapshot;
use crate::config::AppConfig;
use crate::events::Bus;
use crate::tooling::TaskDescriptor;

/// One application instance and its lifecycle state.
#[derive(Clone)]
pub struct App {
    /// Application name.
    pub name: String,
    /// Compose project identifier derived from the name.
    pub project: String,
    /// Application root on the host.
    pub root: PathBuf,
    /// Parsed configuration.
    pub config: AppConfig,
    /// Per-service descriptors, both schema generations.
    pub info: Vec<ServiceInfo>,
    /// Explicit mount overrides (newer-generation data).
    pub mounts: BTreeMap<String, String>,
    /// Compose files describing the application.
    pub compose: Vec<PathBuf>,
    /// Services that require the exec wrapper script.
    pub executors: BTreeSet<String>,
    /// The application's event bus; every clone shares it.
    pub events: Bus,
    tasks: Arc<Mutex<Vec<TaskDescriptor>>>,
}

impl App {
    /// Creates an application with a fresh bus and empty registries.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, config: AppConfig) -> Self {
        let name = name.into();
        let project = project_id(&name);
        Self {
            name,
            project,
            root: root.into(),
            config,
            info: Vec::new(),
            mounts: BTreeMap::new(),
            compose: Vec::new(),
            executors: BTreeSet::new(),
            events: Bus::new(),
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Rebuilds a minimal application from a persisted snapshot, with a fresh
    /// bus. Used by fast-path tooling invocations that skip full init.
    pub fn from_snapshot(snapshot: ComposeSnapshot, config: AppConfig) -> Self {
        let project = if snapshot.project.is_empty() {
            project_id(&snapshot.name)
        } else {
            snapshot.project.clone()
        };
        Self {
            name: snapshot.name,
            project,
            root: snapshot.root,
            config,
            info: snapshot.info,
            mounts: snapshot.mounts,
            compose: snapshot.compose,
            executors: snapshot.executors,
            events: Bus::new(),
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns explicit mounts declared by modern-generation services, merged
    /// with the app-level overrides (overrides win).
    pub fn modern_mounts(&self) -> BTreeMap<String, String> {
        let mut explicit: BTreeMap<String, String> = self
            .info
            .iter()
            .filter_map(|svc| match svc {
                ServiceInfo::Modern { service, app_mount } => {
                    Some((service.clone(), app_mount.clone()))
                }
                ServiceInfo::Legacy { .. } => None,
            })
            .collect();
        for (service, mount) in &self.mounts {
            explicit.insert(service.clone(), mount.clone());
        }
        explicit
    }

    /// Returns the fully reconciled mount map: legacy defaults overlaid by
    /// the explicit modern map.
    pub fn resolved_mounts(&self) -> BTreeMap<String, String> {
        resolve_mounts(&self.info, &self.modern_mounts())
    }

    /// Projects this app into the minimal persisted snapshot.
    pub fn snapshot(&self) -> ComposeSnapshot {
        ComposeSnapshot {
            name: self.name.clone(),
            project: self.project.clone(),
            compose: self.compose.clone(),
            root: self.root.clone(),
            info: self.info.clone(),
            mounts: self.modern_mounts(),
            executors: self.executors.clone(),
        }
    }

    /// Appends a task to the registry. Append-only and single-threaded by
    /// convention; observable by collaborators after `post-init`.
    pub fn register_task(&self, task: TaskDescriptor) {
        self.lock_tasks().push(task);
    }

    /// Returns a copy of the registered tasks.
    pub fn tasks(&self) -> Vec<TaskDescriptor> {
        self.lock_tasks().clone()
    }

    /// Returns the registered task names, in registration order.
    pub fn task_names(&self) -> Vec<String> {
        self.lock_tasks().iter().map(|t| t.name.clone()).collect()
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<TaskDescriptor>> {
        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("project", &self.project)
            .field("services", &self.config.service_names())
            .field("tasks", &self.task_names())
            .finish()
    }
}

/// Derives the compose project identifier from an application name:
/// lowercase, alphanumerics only.
fn project_id(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

//! Application state: model, service descriptors, and the persisted snapshot.
//!
//! ## Contents
//! - [`App`] per-application state and task registry
//! - [`ServiceInfo`], [`resolve_mounts`] two-generation mount reconciliation
//! - [`ComposeSnapshot`] minimal persisted projection for fast-path tooling

#[allow(clippy::module_inception)]
mod app;
mod services;
mod snapshot;

pub use app::App;
pub use services::{resolve_mounts, ServiceInfo, DEFAULT_APP_MOUNT};
pub use snapshot::ComposeSnapshot;

//! # Shared runtime collaborators.
//!
//! [`Runtime`] bundles the external services every tooling invocation needs:
//! the container [`Engine`], the [`CacheStore`], and the debug flag that is
//! forwarded into dispatched commands' environments. One `Runtime` is shared
//! across an application session; it holds no per-app state.

use std::sync::Arc;

use crate::engine::Engine;
use crate::store::CacheStore;

/// External collaborators shared by lifecycle and tooling code.
#[derive(Clone)]
pub struct Runtime {
    /// Container engine used for dispatch and liveness probes.
    pub engine: Arc<dyn Engine>,
    /// Key/value cache backing the compose snapshot.
    pub cache: Arc<dyn CacheStore>,
    /// When set, dispatched commands receive `DOCKHAND_DEBUG=1`.
    pub debug: bool,
}

impl Runtime {
    /// Creates a runtime around the given engine and cache.
    pub fn new(engine: Arc<dyn Engine>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            engine,
            cache,
            debug: false,
        }
    }

    /// Enables or disables debug forwarding.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

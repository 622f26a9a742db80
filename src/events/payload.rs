//! # Typed event payloads.
//!
//! Each event's payload is a distinct typed structure behind the [`Payload`]
//! tagged union, rather than an untyped map. Hooks progressively enrich shared
//! context with explicit return-and-merge semantics: a hook that returns
//! `Ok(Some(payload))` replaces the payload seen by later-ordered hooks for
//! the same emission, `Ok(None)` leaves it untouched.
//!
//! ## Rules
//! - Payloads are cloned per hook invocation; keep them cheap or `Arc` the
//!   heavy parts.
//! - The bus never inspects payload contents; shape is a contract between the
//!   emitter and the hooks of one event name.

use crate::config::AppConfig;

/// Event payload carried through an emission.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    /// No payload; events such as `post-uninstall` carry nothing.
    #[default]
    Empty,
    /// Setup context threaded through the setup events and enriched by each
    /// stage (plugins, engine, orchestrator).
    Setup(SetupOptions),
    /// The active application configuration; carried by `pre-exec`/`post-exec`.
    Config(AppConfig),
}

impl Payload {
    /// Returns the setup options, if this payload carries them.
    pub fn as_setup(&self) -> Option<&SetupOptions> {
        match self {
            Payload::Setup(opts) => Some(opts),
            _ => None,
        }
    }

    /// Returns the app configuration, if this payload carries one.
    pub fn as_config(&self) -> Option<&AppConfig> {
        match self {
            Payload::Config(cfg) => Some(cfg),
            _ => None,
        }
    }
}

/// Shared setup context enriched across bootstrap stages.
///
/// Starts mostly empty; hooks for `pre-install-plugins` and `pre-setup` fill
/// in what their stage decided (which plugins to install, which build engine
/// to use, which orchestrator version to pin).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetupOptions {
    /// Plugins scheduled for installation: name to version/source.
    pub plugins: std::collections::BTreeMap<String, String>,
    /// Build-engine choice for this platform, once decided.
    pub build_engine: Option<String>,
    /// Orchestrator version to provision, once decided.
    pub orchestrator_version: Option<String>,
    /// Skip interactive confirmation during setup.
    pub non_interactive: bool,
}

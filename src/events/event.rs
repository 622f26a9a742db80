//! # Lifecycle event vocabulary.
//!
//! [`EventName`] is the closed set of named points in application bootstrap,
//! teardown, and tooling execution at which collaborators may hook behavior.
//! The names are fixed; payload shape is event-specific and opaque to the bus
//! (see [`Payload`](crate::events::Payload)).
//!
//! The wire form (config files, logs) is kebab-case, e.g. `pre-install-plugins`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named lifecycle point on the event bus.
///
/// Ordering across different events is whatever the lifecycle driver's
/// sequential emission order dictates; the enum itself carries no ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventName {
    /// Before plugin installation during setup.
    PreInstallPlugins,
    /// Before engine/CA/orchestrator setup stages.
    PreSetup,
    /// After the application object has been bootstrapped.
    PostBootstrapApp,
    /// The application is fully initialized and usable.
    Ready,
    /// Late initialization, just before `ready`.
    AlmostReady,
    /// Before the engine autostart dependency check.
    PreEngineAutostart,
    /// Engine autostart point.
    EngineAutostart,
    /// After app init; tooling tasks are registered here.
    PostInit,
    /// After the application has been uninstalled.
    PostUninstall,
    /// Immediately before a tooling command is dispatched.
    PreExec,
    /// After a tooling dispatch, on every exit path.
    PostExec,
}

impl EventName {
    /// Returns the kebab-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::PreInstallPlugins => "pre-install-plugins",
            EventName::PreSetup => "pre-setup",
            EventName::PostBootstrapApp => "post-bootstrap-app",
            EventName::Ready => "ready",
            EventName::AlmostReady => "almost-ready",
            EventName::PreEngineAutostart => "pre-engine-autostart",
            EventName::EngineAutostart => "engine-autostart",
            EventName::PostInit => "post-init",
            EventName::PostUninstall => "post-uninstall",
            EventName::PreExec => "pre-exec",
            EventName::PostExec => "post-exec",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-install-plugins" => Ok(EventName::PreInstallPlugins),
            "pre-setup" => Ok(EventName::PreSetup),
            "post-bootstrap-app" => Ok(EventName::PostBootstrapApp),
            "ready" => Ok(EventName::Ready),
            "almost-ready" => Ok(EventName::AlmostReady),
            "pre-engine-autostart" => Ok(EventName::PreEngineAutostart),
            "engine-autostart" => Ok(EventName::EngineAutostart),
            "post-init" => Ok(EventName::PostInit),
            "post-uninstall" => Ok(EventName::PostUninstall),
            "pre-exec" => Ok(EventName::PreExec),
            "post-exec" => Ok(EventName::PostExec),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// A string that names no known lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lifecycle event: {0}")]
pub struct UnknownEvent(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        let all = [
            EventName::PreInstallPlugins,
            EventName::PreSetup,
            EventName::PostBootstrapApp,
            EventName::Ready,
            EventName::AlmostReady,
            EventName::PreEngineAutostart,
            EventName::EngineAutostart,
            EventName::PostInit,
            EventName::PostUninstall,
            EventName::PreExec,
            EventName::PostExec,
        ];
        for ev in all {
            assert_eq!(ev.as_str().parse::<EventName>(), Ok(ev));
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert!("pre-flight".parse::<EventName>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&EventName::PreInstallPlugins).unwrap();
        assert_eq!(json, "\"pre-install-plugins\"");
    }
}

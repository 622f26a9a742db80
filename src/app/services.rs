//! # Service descriptors and mount resolution.
//!
//! Two generations of service-description schema coexist: legacy services
//! (generation 3) mount at a fixed canonical path unless they declare one,
//! while modern services (generation 4) always carry an explicit mount.
//! [`resolve_mounts`] reconciles both into one consistent mapping.
//!
//! ## Rules
//! - Legacy descriptors default to their declared mount or [`DEFAULT_APP_MOUNT`].
//! - Entries in the explicit (modern) map win unconditionally, including over
//!   an explicit legacy default for the same service. This precedence is
//!   load-bearing for mount correctness.
//! - Resolution is pure and idempotent; empty input yields an empty map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical in-container mount for legacy services without a declared mount.
pub const DEFAULT_APP_MOUNT: &str = "/app";

/// Per-service descriptor, tagged by schema generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "generation", rename_all = "lowercase")]
pub enum ServiceInfo {
    /// Generation-3 service; mount is optional and defaulted.
    Legacy {
        /// Service identifier.
        service: String,
        /// Declared mount, if any.
        #[serde(default)]
        app_mount: Option<String>,
    },
    /// Generation-4 service; always carries its own explicit mount.
    Modern {
        /// Service identifier.
        service: String,
        /// Explicit in-container mount.
        app_mount: String,
    },
}

impl ServiceInfo {
    /// Returns the service identifier.
    pub fn service(&self) -> &str {
        match self {
            ServiceInfo::Legacy { service, .. } | ServiceInfo::Modern { service, .. } => service,
        }
    }

    /// Returns the declared mount, if any.
    pub fn app_mount(&self) -> Option<&str> {
        match self {
            ServiceInfo::Legacy { app_mount, .. } => app_mount.as_deref(),
            ServiceInfo::Modern { app_mount, .. } => Some(app_mount),
        }
    }
}

/// Reconciles per-service mounts across both schema generations.
///
/// Every legacy descriptor contributes a default (its declared mount or
/// [`DEFAULT_APP_MOUNT`]); keys present in `explicit` always override the
/// defaults.
pub fn resolve_mounts(
    info: &[ServiceInfo],
    explicit: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut mounts: BTreeMap<String, String> = info
        .iter()
        .filter_map(|svc| match svc {
            ServiceInfo::Legacy { service, app_mount } => Some((
                service.clone(),
                app_mount
                    .clone()
                    .unwrap_or_else(|| DEFAULT_APP_MOUNT.to_string()),
            )),
            ServiceInfo::Modern { .. } => None,
        })
        .collect();
    for (service, mount) in explicit {
        mounts.insert(service.clone(), mount.clone());
    }
    mounts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(service: &str, mount: Option<&str>) -> ServiceInfo {
        ServiceInfo::Legacy {
            service: service.into(),
            app_mount: mount.map(Into::into),
        }
    }

    #[test]
    fn test_legacy_without_mount_defaults_to_canonical_path() {
        let info = vec![legacy("db", None)];
        let mounts = resolve_mounts(&info, &BTreeMap::new());
        assert_eq!(mounts["db"], "/app");
    }

    #[test]
    fn test_legacy_declared_mount_is_kept() {
        let info = vec![legacy("cli", Some("/usr/src"))];
        let mounts = resolve_mounts(&info, &BTreeMap::new());
        assert_eq!(mounts["cli"], "/usr/src");
    }

    #[test]
    fn test_explicit_map_wins_unconditionally() {
        // Even a legacy service with its own declared mount loses to an
        // explicit entry for the same key.
        let info = vec![legacy("web", Some("/legacy"))];
        let explicit = BTreeMap::from([("web".to_string(), "/srv".to_string())]);
        let mounts = resolve_mounts(&info, &explicit);
        assert_eq!(mounts["web"], "/srv");
    }

    #[test]
    fn test_generation_mix_scenario() {
        // Legacy db with no mount plus modern web at /srv.
        let info = vec![legacy("db", None)];
        let explicit = BTreeMap::from([("web".to_string(), "/srv".to_string())]);
        let mounts = resolve_mounts(&info, &explicit);
        assert_eq!(
            mounts,
            BTreeMap::from([
                ("db".to_string(), "/app".to_string()),
                ("web".to_string(), "/srv".to_string()),
            ])
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let info = vec![legacy("db", None), legacy("cli", Some("/usr/src"))];
        let explicit = BTreeMap::from([("web".to_string(), "/srv".to_string())]);
        let once = resolve_mounts(&info, &explicit);
        let twice = resolve_mounts(&info, &explicit);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        assert!(resolve_mounts(&[], &BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_serde_tags_generations() {
        let json = r#"{"generation": "modern", "service": "web", "app_mount": "/srv"}"#;
        let svc: ServiceInfo = serde_json::from_str(json).unwrap();
        assert_eq!(svc.service(), "web");
        assert_eq!(svc.app_mount(), Some("/srv"));
    }
}

//! # Execution spec for one dispatch.
//!
//! [`ExecRunner`] is the resolved, executable specification handed to the
//! engine: target container identity, final argument vector, effective user,
//! merged environment, and the working-directory/mount context. Constructed
//! fresh per invocation, never persisted.

use std::collections::BTreeMap;

use crate::app::App;

/// Resolved handle for executing one command inside a service container.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecRunner {
    /// Target container identity.
    pub id: String,
    /// Application name (for error classification messages).
    pub app: String,
    /// Target service.
    pub service: String,
    /// Final command argument vector.
    pub argv: Vec<String>,
    /// Effective user, if any (service default already applied).
    pub user: Option<String>,
    /// Merged environment: service base env with overrides applied on top.
    pub env: BTreeMap<String, String>,
    /// In-container working directory, if resolved.
    pub working_dir: Option<String>,
    /// In-container mount path for the service, if resolved.
    pub mount: Option<String>,
}

impl ExecRunner {
    /// Builds the runner for `service` in `app`.
    ///
    /// - Container id follows the compose convention `{project}_{service}_1`.
    /// - `user` falls back to the service's configured default.
    /// - `env` starts from the service's base env; `env_overrides` win on
    ///   conflict.
    pub fn build(
        app: &App,
        argv: Vec<String>,
        service: &str,
        user: Option<String>,
        env_overrides: BTreeMap<String, String>,
        working_dir: Option<String>,
        mount: Option<String>,
    ) -> Self {
        let service_cfg = app.config.services.get(service);

        let user = user.or_else(|| service_cfg.and_then(|s| s.user.clone()));

        let mut env = service_cfg.map(|s| s.env.clone()).unwrap_or_default();
        for (k, v) in env_overrides {
            env.insert(k, v);
        }

        Self {
            id: format!("{}_{}_1", app.project, service),
            app: app.name.clone(),
            service: service.to_string(),
            argv,
            user,
            env,
            working_dir,
            mount,
        }
    }
}

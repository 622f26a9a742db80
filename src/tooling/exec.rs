//! # Built-in `exec` task.
//!
//! Runs an arbitrary command on a service without paying the full app-init
//! penalty: the run closure loads the persisted [`ComposeSnapshot`], rebuilds
//! a minimal [`App`] around a fresh bus, re-registers any configured
//! event-commands, and feeds the invocation through the shared pipeline.

use crate::app::{App, ComposeSnapshot};
use crate::config::AppConfig;
use crate::error::ToolingError;
use crate::runtime::Runtime;
use crate::tooling::build::{register_event_commands, run_pipeline, ExecRequest};
use crate::tooling::task::{service_positional, user_option, Invocation, TaskDescriptor};

/// Builds the `exec` task for the app named by `config`.
pub fn exec_task(rt: &Runtime, config: AppConfig) -> TaskDescriptor {
    let usage = "$0 exec <service> [--user <user>] -- <command>".to_string();
    let choices = config.service_names();

    let rt = rt.clone();
    let run_usage = usage.clone();
    let run: crate::tooling::task::RunFn = std::sync::Arc::new(move |inv: Invocation| {
        let rt = rt.clone();
        let config = config.clone();
        let usage = run_usage.clone();
        Box::pin(async move {
            let snapshot = ComposeSnapshot::load(rt.cache.as_ref(), &config.name)
                .await
                .ok_or_else(|| ToolingError::MissingSnapshot {
                    name: config.name.clone(),
                })?;

            let app = App::from_snapshot(snapshot, config);
            register_event_commands(&app, &rt);

            run_pipeline(
                &app,
                &rt,
                ExecRequest {
                    usage,
                    service: inv.service,
                    command: inv.command,
                    user: inv.user,
                    dir: None,
                    env: inv.env,
                },
            )
            .await
        })
    });

    TaskDescriptor::new("exec", "runs commands on a service", usage, run)
        .with_positional(service_positional(choices))
        .with_option("user", user_option())
}

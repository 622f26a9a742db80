//! # From declarative tooling entries to runnable tasks.
//!
//! Converts the app's tooling section into [`TaskDescriptor`]s and registers
//! them on the task registry at `post-init`. The run pipeline shared by every
//! dispatching task lives here:
//!
//! ```text
//! run(invocation)
//!   ├─► validate service against the declared set   (usage error + choices)
//!   ├─► validate non-empty command                  (usage error)
//!   ├─► tokenize single-string commands (shell rules)
//!   ├─► prepend exec wrapper for wrapped services
//!   ├─► resolve working dir: service working_dir → mount → none
//!   ├─► emit pre-exec (active config)
//!   ├─► dispatch via the engine
//!   └─► emit post-exec on every exit path
//! ```
//!
//! ## Rules
//! - Usage errors surface before any dispatch and before `pre-exec`.
//! - `post-exec` fires whether dispatch succeeded or failed; the dispatch
//!   error takes precedence when both fail.

use std::collections::BTreeMap;
use std::io::Write;

use tracing::debug;

use crate::app::App;
use crate::config::{CommandSpec, ToolingSpec};
use crate::engine::{dispatch, ExecOutcome, ExecRunner};
use crate::error::ToolingError;
use crate::events::{EventName, HookFn, Payload};
use crate::runtime::Runtime;
use crate::tooling::task::{service_positional, user_option, Invocation, TaskDescriptor};

/// In-container wrapper script prepended for services that require one.
pub const EXEC_WRAPPER: &str = "/etc/dockhand/exec.sh";

/// Env var forwarded into dispatched commands when debug is on.
pub const DEBUG_ENV: &str = "DOCKHAND_DEBUG";

/// Everything the shared pipeline needs for one invocation, with invocation
/// values already merged over the declarative defaults.
pub(crate) struct ExecRequest {
    pub usage: String,
    pub service: Option<String>,
    pub command: Option<CommandSpec>,
    pub user: Option<String>,
    pub dir: Option<String>,
    pub env: BTreeMap<String, String>,
}

/// Validates, resolves, and dispatches one tooling invocation.
pub(crate) async fn run_pipeline(
    app: &App,
    rt: &Runtime,
    req: ExecRequest,
) -> Result<(), ToolingError> {
    let choices = app.config.service_names();

    let service = match req.service {
        Some(s) => s,
        None => {
            return Err(ToolingError::usage(
                "you must specify a service! see usage above",
                &req.usage,
            ))
        }
    };
    if !choices.contains(&service) {
        let rendered: Vec<String> = choices.iter().map(|s| format!("\"{s}\"")).collect();
        return Err(ToolingError::usage(
            format!(
                "service must be one of [choices: {}]! see usage above",
                rendered.join(", ")
            ),
            &req.usage,
        ));
    }

    let command = req.command.ok_or_else(|| {
        ToolingError::usage("you must specify a command! see usage above", &req.usage)
    })?;
    let mut argv = command.to_argv(&req.usage)?;

    if app.executors.contains(&service) {
        argv.insert(0, EXEC_WRAPPER.to_string());
    }

    let mounts = app.resolved_mounts();
    let mount = mounts.get(&service).cloned();
    let working_dir = req
        .dir
        .or_else(|| {
            app.config
                .services
                .get(&service)
                .and_then(|s| s.working_dir.clone())
        })
        .or_else(|| mount.clone());

    let mut env = req.env;
    env.entry(DEBUG_ENV.to_string())
        .or_insert_with(|| if rt.debug { "1" } else { "" }.to_string());

    app.events
        .emit(EventName::PreExec, Payload::Config(app.config.clone()))
        .await?;

    let runner = ExecRunner::build(app, argv, &service, req.user, env, working_dir, mount);
    let result = dispatch(rt.engine.as_ref(), &runner).await;

    // post-exec is guaranteed on every exit path; the dispatch error still
    // wins when both fail.
    let post = app
        .events
        .emit(EventName::PostExec, Payload::Config(app.config.clone()))
        .await;

    let outcome = result?;
    post?;

    relay_output(&outcome, &mut std::io::stdout(), &mut std::io::stderr());
    Ok(())
}

/// Relays a successful command's captured output to the caller's streams.
/// Successful commands still write progress to stderr; both are forwarded.
fn relay_output(outcome: &ExecOutcome, stdout: &mut impl Write, stderr: &mut impl Write) {
    if !outcome.stdout.is_empty() {
        let _ = stdout.write_all(&outcome.stdout);
        let _ = stdout.flush();
    }
    if !outcome.stderr.is_empty() {
        let _ = stderr.write_all(&outcome.stderr);
        let _ = stderr.flush();
    }
}

/// Builds one descriptor from a declarative tooling entry.
pub fn tooling_task(
    name: &str,
    spec: &ToolingSpec,
    app: &App,
    rt: &Runtime,
) -> TaskDescriptor {
    let describe = spec
        .description
        .clone()
        .unwrap_or_else(|| format!("runs {name} commands"));
    let usage = format!("$0 {name} [--user <user>] [-- <command>]");

    let choices = app.config.service_names();
    let app = app.clone();
    let rt = rt.clone();
    let spec = spec.clone();
    let run_usage = usage.clone();
    let run: crate::tooling::task::RunFn = std::sync::Arc::new(move |inv: Invocation| {
        let app = app.clone();
        let rt = rt.clone();
        let spec = spec.clone();
        let usage = run_usage.clone();
        Box::pin(async move {
            let mut env = spec.env.clone();
            env.extend(inv.env);
            run_pipeline(
                &app,
                &rt,
                ExecRequest {
                    usage,
                    service: inv.service.or_else(|| Some(spec.service.clone())),
                    command: inv.command.or_else(|| Some(spec.command.clone())),
                    user: inv.user.or_else(|| spec.user.clone()),
                    dir: spec.dir.clone(),
                    env,
                },
            )
            .await
        })
    });

    TaskDescriptor::new(name, describe, usage, run)
        .with_positional(service_positional(choices))
        .with_option("user", user_option())
}

/// Registers the `post-init` hook that turns the tooling section into CLI
/// tasks on the app's registry.
pub fn register_tooling(app: &App, rt: &Runtime) {
    let hook_app = app.clone();
    let hook_rt = rt.clone();
    app.events.on(
        EventName::PostInit,
        0,
        HookFn::arc("register-tooling", move |_payload: Payload| {
            let app = hook_app.clone();
            let rt = hook_rt.clone();
            async move {
                if app.config.tooling.is_empty() {
                    return Ok(None);
                }
                debug!(app = %app.name, "additional tooling detected");
                let mounts = app.resolved_mounts();
                for (name, spec) in &app.config.tooling {
                    debug!(task = %name, "adding app cli task");
                    let mut task = tooling_task(name, spec, &app, &rt);
                    task.app_mount = mounts.get(&spec.service).cloned();
                    app.register_task(task);
                }
                Ok(None)
            }
        }),
    );
}

/// Registers hooks for configured event-commands at a late priority, so user
/// commands run after core hooks for the same event.
pub fn register_event_commands(app: &App, rt: &Runtime) {
    for (event, commands) in app.config.events.clone() {
        let hook_app = app.clone();
        let hook_rt = rt.clone();
        app.events.on(
            event,
            9999,
            HookFn::arc(format!("event-commands:{event}"), move |_p: Payload| {
                let app = hook_app.clone();
                let rt = hook_rt.clone();
                let commands = commands.clone();
                async move {
                    for command in &commands {
                        let argv = command
                            .cmd
                            .to_argv("")
                            .map_err(|e| crate::error::HookError::failed(e.to_string()))?;
                        let mounts = app.resolved_mounts();
                        let mount = mounts.get(&command.service).cloned();
                        let runner = ExecRunner::build(
                            &app,
                            argv,
                            &command.service,
                            None,
                            BTreeMap::new(),
                            mount.clone(),
                            mount,
                        );
                        dispatch(rt.engine.as_ref(), &runner)
                            .await
                            .map_err(|e| crate::error::HookError::failed(e.to_string()))?;
                    }
                    Ok(None)
                }
            }),
        );
    }
}

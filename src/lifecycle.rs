//! # Lifecycle driver.
//!
//! Bootstrap emits a fixed sequence of named events on the app's bus, awaiting
//! each emission before the next; hooks registered by surrounding subsystems
//! do their setup work per event, in priority order. A hook failure aborts the
//! remaining sequence and propagates to the caller, which is expected to halt
//! startup.
//!
//! ```text
//! bootstrap:
//!   pre-install-plugins ─► pre-setup ─► pre-engine-autostart
//!     ─► engine-autostart ─► post-bootstrap-app ─► post-init
//!     ─► almost-ready ─► ready
//!
//! uninstall:
//!   post-uninstall
//! ```
//!
//! [`wire`] registers the core's own hooks: tooling registration at
//! `post-init`, snapshot persistence at `ready`, snapshot removal at
//! `post-uninstall`, and any configured event-commands.

use tracing::info;

use crate::app::{App, ComposeSnapshot};
use crate::error::HookError;
use crate::events::{EventName, HookFn, Payload, SetupOptions};
use crate::runtime::Runtime;
use crate::tooling::{register_event_commands, register_tooling};

/// The bootstrap emission order.
const BOOTSTRAP_SEQUENCE: [EventName; 8] = [
    EventName::PreInstallPlugins,
    EventName::PreSetup,
    EventName::PreEngineAutostart,
    EventName::EngineAutostart,
    EventName::PostBootstrapApp,
    EventName::PostInit,
    EventName::AlmostReady,
    EventName::Ready,
];

/// Drives the bootstrap sequence, threading setup options through the setup
/// events. Returns the final enriched options after `ready` completes.
pub async fn bootstrap(app: &App, opts: SetupOptions) -> Result<SetupOptions, HookError> {
    info!(app = %app.name, "bootstrapping");
    let mut payload = Payload::Setup(opts);
    for event in BOOTSTRAP_SEQUENCE {
        payload = app.events.emit(event, payload).await?;
    }
    Ok(payload.as_setup().cloned().unwrap_or_default())
}

/// Emits `post-uninstall` after an application has been torn down.
pub async fn uninstall(app: &App) -> Result<(), HookError> {
    info!(app = %app.name, "uninstalled");
    app.events.emit(EventName::PostUninstall, Payload::Empty).await?;
    Ok(())
}

/// Registers the snapshot persistence hooks: save a compose snapshot on every
/// successful `ready` transition (so later tooling invocations can skip full
/// re-initialization), remove it on uninstall.
pub fn register_snapshot(app: &App, rt: &Runtime) {
    let save_app = app.clone();
    let save_rt = rt.clone();
    app.events.on(
        EventName::Ready,
        0,
        HookFn::arc("save-compose-snapshot", move |_p: Payload| {
            let app = save_app.clone();
            let rt = save_rt.clone();
            async move {
                app.snapshot().save(rt.cache.as_ref()).await;
                Ok(None)
            }
        }),
    );

    let drop_app = app.clone();
    let drop_rt = rt.clone();
    app.events.on(
        EventName::PostUninstall,
        0,
        HookFn::arc("remove-compose-snapshot", move |_p: Payload| {
            let app = drop_app.clone();
            let rt = drop_rt.clone();
            async move {
                ComposeSnapshot::remove(rt.cache.as_ref(), &app.name).await;
                Ok(None)
            }
        }),
    );
}

/// Wires all core hooks for an application session.
///
/// The hooks capture clones of `app`, and clones copy the descriptive fields
/// (config, service info, mounts, wrapped-service set) by value. Call this
/// only once those fields are fully populated; later mutation of the original
/// handle is not visible to the wired hooks.
pub fn wire(app: &App, rt: &Runtime) {
    register_tooling(app, rt);
    register_snapshot(app, rt);
    register_event_commands(app, rt);
}

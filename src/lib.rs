//! # dockhand
//!
//! **Dockhand** is the lifecycle-coordination core of a local
//! development-environment orchestrator: a priority-ordered, asynchronous
//! event bus that drives a multi-stage application bootstrap, and a
//! declarative tooling pipeline that turns per-service command definitions
//! into resolved, executable specifications dispatched against a running
//! container.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ setup hooks  │   │ core hooks   │   │ user hooks   │
//!     │ (engine, ca) │   │ (tooling,    │   │ (events:     │
//!     │              │   │  snapshot)   │   │  config)     │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus (per-app, priority-ordered, strictly sequential emission)    │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!   bootstrap: pre-install-plugins → pre-setup → … → post-init → ready
//!                                │
//!              post-init         │         ready
//!          ┌─────────────────────┴──────────────────────┐
//!          ▼                                            ▼
//!   TaskDescriptor registry                      ComposeSnapshot
//!   (tooling entries → CLI tasks)                (persisted via CacheStore)
//!          │                                            │
//!          ▼                                            ▼
//!   run closure ── pre-exec ─► ExecRunner ─► dispatch   exec_task fast path
//!                  post-exec ◄── classify ◄── Engine    (skips full init)
//! ```
//!
//! ### Tooling invocation
//! ```text
//! run(invocation)
//!   ├─► validate service / command        (usage errors, no dispatch)
//!   ├─► tokenize, wrap, resolve mounts    (two-generation reconciliation)
//!   ├─► emit pre-exec
//!   ├─► dispatch inside the container
//!   │     ├─ exit 0      ─► Ok
//!   │     └─ failure     ─► is_running?
//!   │           ├─ false ─► ServiceNotRunning (start guidance)
//!   │           └─ true  ─► CommandFailed{reported}
//!   └─► emit post-exec                    (every exit path)
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / functions                  |
//! |-----------------|----------------------------------------------------------|----------------------------------------|
//! | **Event bus**   | Priority-ordered async hooks for lifecycle transitions.  | [`Bus`], [`Hook`], [`HookFn`]          |
//! | **Lifecycle**   | Ordered bootstrap/uninstall emission.                    | [`bootstrap`], [`uninstall`], [`wire`] |
//! | **Tooling**     | Declarative entries to CLI tasks; fast-path `exec`.      | [`TaskDescriptor`], [`exec_task`]      |
//! | **Mounts**      | Two-generation service schema reconciliation.            | [`ServiceInfo`], [`resolve_mounts`]    |
//! | **Dispatch**    | Run-in-container with failure classification.            | [`dispatch`], [`ExecRunner`]           |
//! | **Snapshot**    | Persisted projection for fast tooling invocations.       | [`ComposeSnapshot`], [`CacheStore`]    |
//! | **Errors**      | Typed, classified errors; no silent swallowing.          | [`HookError`], [`ToolingError`]        |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use dockhand::{
//!     bootstrap, wire, App, AppConfig, DockerEngine, FileStore, Runtime, SetupOptions,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config: AppConfig = serde_json::from_str(
//!         r#"{
//!             "name": "myapp",
//!             "services": {"appserver": {}},
//!             "tooling": {"build": {"command": "composer install", "service": "appserver"}}
//!         }"#,
//!     )?;
//!
//!     let rt = Runtime::new(
//!         Arc::new(DockerEngine::new()),
//!         Arc::new(FileStore::new("/tmp/dockhand-cache")),
//!     );
//!     let app = App::new("myapp", "/tmp/myapp", config);
//!
//!     // Core hooks: tooling at post-init, snapshot at ready/post-uninstall.
//!     wire(&app, &rt);
//!     bootstrap(&app, SetupOptions::default()).await?;
//!
//!     // Tasks are registered and the snapshot is persisted; `app.tasks()`
//!     // is the CLI surface.
//!     for task in app.tasks() {
//!         println!("{}: {}", task.name, task.describe);
//!     }
//!     Ok(())
//! }
//! ```

mod app;
mod config;
mod engine;
mod error;
mod events;
mod lifecycle;
mod runtime;
mod store;
mod tooling;

// ---- Public re-exports ----

pub use app::{resolve_mounts, App, ComposeSnapshot, ServiceInfo, DEFAULT_APP_MOUNT};
pub use config::{AppConfig, CommandSpec, EventCommand, ServiceConfig, ToolingConfig, ToolingSpec};
pub use engine::{dispatch, DockerEngine, Engine, ExecOutcome, ExecRunner, StdioKind, StdioSpec};
pub use error::{EngineError, HookError, ToolingError};
pub use events::{
    Bus, EventName, Hook, HookFn, HookFuture, HookRef, Payload, SetupOptions, UnknownEvent,
};
pub use lifecycle::{bootstrap, register_snapshot, uninstall, wire};
pub use runtime::Runtime;
pub use store::{CacheStore, FileStore, MemoryStore};
pub use tooling::{
    exec_task, register_event_commands, register_tooling, tooling_task, Invocation, OptionSpec,
    Positional, RunFn, RunFuture, TaskDescriptor, DEBUG_ENV, EXEC_WRAPPER,
};

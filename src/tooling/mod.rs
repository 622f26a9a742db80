//! Tooling pipeline: declarative entries to dispatched commands.
//!
//! ## Contents
//! - [`TaskDescriptor`], [`Invocation`], [`Positional`], [`OptionSpec`]
//!   the CLI task surface
//! - [`tooling_task`], [`register_tooling`] builder + `post-init` registration
//! - [`register_event_commands`] config-driven commands on lifecycle events
//! - [`exec_task`] fast-path built-in running against the compose snapshot

mod build;
mod exec;
mod task;

pub use build::{register_event_commands, register_tooling, tooling_task, DEBUG_ENV, EXEC_WRAPPER};
pub use exec::exec_task;
pub use task::{Invocation, OptionSpec, Positional, RunFn, RunFuture, TaskDescriptor};

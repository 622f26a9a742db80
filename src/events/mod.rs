//! Lifecycle events: vocabulary, payloads, hooks, and the ordered bus.
//!
//! This module groups the event **data model** and the **bus** used to drive
//! every lifecycle transition of an application: bootstrap stages, readiness,
//! uninstall, and the `pre-exec`/`post-exec` pair around tooling dispatch.
//!
//! ## Contents
//! - [`EventName`] fixed lifecycle vocabulary
//! - [`Payload`], [`SetupOptions`] typed per-event payloads
//! - [`Hook`], [`HookFn`], [`HookRef`] async listener abstraction
//! - [`Bus`] sequential, priority-ordered emitter
//!
//! ## Quick reference
//! - **Emitters**: the lifecycle driver (`crate::lifecycle`), the tooling
//!   pipeline (`pre-exec`/`post-exec`).
//! - **Registrants**: setup subsystems, `register_tooling`,
//!   `register_snapshot`, `register_event_commands`.

mod bus;
mod event;
mod hook;
mod payload;

pub use bus::Bus;
pub use event::{EventName, UnknownEvent};
pub use hook::{Hook, HookFn, HookFuture, HookRef};
pub use payload::{Payload, SetupOptions};

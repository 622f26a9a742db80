//! # Hook abstraction and function-backed hook implementation.
//!
//! This module defines the [`Hook`] trait (async, object-safe) and a
//! convenient function-backed implementation [`HookFn`]. The common handle
//! type is [`HookRef`], an `Arc<dyn Hook>` suitable for storing in the bus.
//!
//! A hook receives the current [`Payload`] and may return a replacement
//! payload for later-ordered hooks of the same emission.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HookError;
use crate::events::Payload;

/// Boxed future returned by a hook invocation.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<Option<Payload>, HookError>> + Send>>;

/// Shared handle to a hook (`Arc<dyn Hook>`).
pub type HookRef = Arc<dyn Hook>;

/// # Asynchronous lifecycle hook.
///
/// A `Hook` has a stable [`name`](Hook::name) (used in logs) and a
/// [`call`](Hook::call) method that produces a fresh future per invocation.
/// Returning `Ok(Some(payload))` replaces the payload passed to later hooks.
pub trait Hook: Send + Sync + 'static {
    /// Returns a stable, human-readable hook name.
    fn name(&self) -> &str;

    /// Handles one emission of the hook's event.
    fn call(&self, payload: Payload) -> HookFuture;
}

/// Function-backed hook implementation.
///
/// Wraps a closure that *creates* a new future per invocation, so hooks own
/// their state per call; share state explicitly via `Arc` inside the closure.
///
/// ## Example
/// ```rust
/// use dockhand::{HookFn, HookRef, Payload};
///
/// let hook: HookRef = HookFn::arc("note-ready", |payload: Payload| async move {
///     // observe, do not rewrite
///     let _ = payload;
///     Ok(None)
/// });
/// assert_eq!(hook.name(), "note-ready");
/// ```
pub struct HookFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HookFn<F> {
    /// Creates a new function-backed hook.
    ///
    /// Prefer [`HookFn::arc`] when you immediately need a [`HookRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the hook and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Hook for HookFn<F>
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Payload>, HookError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, payload: Payload) -> HookFuture {
        Box::pin((self.f)(payload))
    }
}

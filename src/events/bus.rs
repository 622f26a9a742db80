//! # Priority-ordered asynchronous event bus.
//!
//! [`Bus`] drives every lifecycle transition: hooks register under a named
//! event with a small integer priority, and `emit` invokes them strictly
//! sequentially, awaiting each before the next.
//!
//! ## Architecture
//! ```text
//! on/once ──► registrations (priority, seq, once, hook)
//!
//! emit(event, payload)
//!   ├─► snapshot matching registrations, ordered by (priority, seq)
//!   ├─► for each hook, in order:
//!   │     ├─ once? deregister now (at most one invocation, error or not)
//!   │     ├─ await hook.call(payload.clone())
//!   │     ├─ Ok(Some(next)) ─► payload = next   (enrich shared context)
//!   │     ├─ Ok(None)       ─► payload unchanged
//!   │     └─ Err(e)         ─► abort emission, propagate e
//!   └─► Ok(final payload)
//! ```
//!
//! ## Rules
//! - **Total explicit ordering**: (priority ascending, registration order
//!   ascending). Independent subsystems hook the same event without knowing
//!   about each other, controlling relative order through priorities.
//! - **Abort on error**: later-ordered hooks for that emission never run;
//!   lifecycle stages are order-dependent, so continuing would corrupt them.
//! - **Snapshot semantics**: only hooks registered when `emit` begins
//!   participate; a hook added during an emission is not retroactively
//!   included in the in-flight one.
//! - **Owned per application**: the bus is a cheaply cloneable handle over
//!   shared registrations, created at a clear point; never a process global.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::error::HookError;
use crate::events::hook::HookRef;
use crate::events::{EventName, Payload};

/// Global sequence counter; the tie-break for equal priorities.
static REG_SEQ: AtomicU64 = AtomicU64::new(0);

/// One registered listener.
struct Registration {
    event: EventName,
    priority: i32,
    seq: u64,
    once: bool,
    hook: HookRef,
}

/// Sequential, priority-ordered, async-aware publish/subscribe primitive.
///
/// Cloning is cheap (internally `Arc`-backed); all clones share one listener
/// set. Registration is synchronous; `emit` is async and awaits every hook.
#[derive(Clone, Default)]
pub struct Bus {
    listeners: Arc<Mutex<Vec<Registration>>>,
}

impl Bus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook for `event` at the given priority (lower runs first).
    ///
    /// No uniqueness constraint on name+priority; equal priorities run in
    /// registration order.
    pub fn on(&self, event: EventName, priority: i32, hook: HookRef) {
        self.register(event, priority, false, hook);
    }

    /// Registers a hook that is deregistered immediately after its single
    /// invocation, even if that invocation raises an error.
    pub fn once(&self, event: EventName, priority: i32, hook: HookRef) {
        self.register(event, priority, true, hook);
    }

    fn register(&self, event: EventName, priority: i32, once: bool, hook: HookRef) {
        let seq = REG_SEQ.fetch_add(1, AtomicOrdering::Relaxed);
        trace!(event = %event, priority, seq, once, hook = hook.name(), "hook registered");
        let mut listeners = self.lock();
        listeners.push(Registration {
            event,
            priority,
            seq,
            once,
            hook,
        });
    }

    /// Invokes every currently-registered hook for `event`, strictly
    /// sequentially in (priority, registration) order, threading the payload
    /// through each hook's return value.
    ///
    /// Returns the final (possibly enriched) payload after the last hook
    /// resolves, or the first hook error; on error, later-ordered hooks for
    /// this emission do not run.
    pub async fn emit(&self, event: EventName, payload: Payload) -> Result<Payload, HookError> {
        let snapshot: Vec<(u64, bool, HookRef)> = {
            let listeners = self.lock();
            let mut matching: Vec<_> = listeners
                .iter()
                .filter(|r| r.event == event)
                .map(|r| (r.priority, r.seq, r.once, r.hook.clone()))
                .collect();
            matching.sort_by_key(|(priority, seq, _, _)| (*priority, *seq));
            matching
                .into_iter()
                .map(|(_, seq, once, hook)| (seq, once, hook))
                .collect()
        };

        debug!(event = %event, hooks = snapshot.len(), "emit");

        let mut payload = payload;
        for (seq, once, hook) in snapshot {
            if once {
                // Consumed at invocation: absent from the listener set from
                // here on, whether the call below succeeds or errors.
                self.lock().retain(|r| r.seq != seq);
            }
            trace!(event = %event, hook = hook.name(), "invoking hook");
            if let Some(next) = hook.call(payload.clone()).await? {
                payload = next;
            }
        }
        Ok(payload)
    }

    /// Returns how many hooks are currently registered for `event`.
    pub fn listener_count(&self, event: EventName) -> usize {
        self.lock().iter().filter(|r| r.event == event).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Registration>> {
        // The lock is only held for synchronous bookkeeping, never across an
        // await, so poisoning can only come from a panicking registrant.
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("listeners", &self.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::hook::HookFn;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, id: &'static str) -> HookRef {
        let log = log.clone();
        HookFn::arc(id, move |_payload: Payload| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(id);
                Ok(None)
            }
        })
    }

    #[tokio::test]
    async fn test_priority_then_registration_order() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        // "engine" registered before "ca" at the same priority; "orchestrator"
        // later in priority. Expected: engine, ca, orchestrator.
        bus.on(EventName::PreSetup, 1, recorder(&log, "engine"));
        bus.on(EventName::PreSetup, 1, recorder(&log, "ca"));
        bus.on(EventName::PreSetup, 2, recorder(&log, "orchestrator"));

        bus.emit(EventName::PreSetup, Payload::Empty).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["engine", "ca", "orchestrator"]);
    }

    #[tokio::test]
    async fn test_lower_priority_runs_first_regardless_of_registration() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.on(EventName::AlmostReady, 2, recorder(&log, "compat"));
        bus.on(EventName::AlmostReady, 1, recorder(&log, "reset"));

        bus.emit(EventName::AlmostReady, Payload::Empty)
            .await
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["reset", "compat"]);
    }

    #[tokio::test]
    async fn test_once_hook_runs_at_most_once() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.once(EventName::PreSetup, 0, recorder(&log, "setup-ca"));
        assert_eq!(bus.listener_count(EventName::PreSetup), 1);

        bus.emit(EventName::PreSetup, Payload::Empty).await.unwrap();
        assert_eq!(bus.listener_count(EventName::PreSetup), 0);

        bus.emit(EventName::PreSetup, Payload::Empty).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["setup-ca"]);
    }

    #[tokio::test]
    async fn test_once_hook_removed_even_when_it_errors() {
        let bus = Bus::new();
        bus.once(
            EventName::PreSetup,
            0,
            HookFn::arc("boom", |_p: Payload| async {
                Err(HookError::failed("boom"))
            }),
        );

        let err = bus
            .emit(EventName::PreSetup, Payload::Empty)
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "hook_failed");
        assert_eq!(bus.listener_count(EventName::PreSetup), 0);
    }

    #[tokio::test]
    async fn test_error_aborts_later_hooks() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        bus.on(EventName::Ready, 1, recorder(&log, "first"));
        bus.on(
            EventName::Ready,
            2,
            HookFn::arc("boom", |_p: Payload| async {
                Err(HookError::failed("ca missing"))
            }),
        );
        bus.on(EventName::Ready, 3, recorder(&log, "never"));

        let err = bus.emit(EventName::Ready, Payload::Empty).await.unwrap_err();
        assert!(err.to_string().contains("ca missing"));
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_payload_is_threaded_and_enriched() {
        use crate::events::SetupOptions;

        let bus = Bus::new();
        bus.on(
            EventName::PreSetup,
            1,
            HookFn::arc("pick-engine", |p: Payload| async move {
                let mut opts = p.as_setup().cloned().unwrap_or_default();
                opts.build_engine = Some("docker-desktop".into());
                Ok(Some(Payload::Setup(opts)))
            }),
        );
        bus.on(
            EventName::PreSetup,
            2,
            HookFn::arc("pick-orchestrator", |p: Payload| async move {
                let mut opts = p.as_setup().cloned().unwrap_or_default();
                // Earlier enrichment must be visible here.
                assert_eq!(opts.build_engine.as_deref(), Some("docker-desktop"));
                opts.orchestrator_version = Some("2.27.0".into());
                Ok(Some(Payload::Setup(opts)))
            }),
        );

        let out = bus
            .emit(EventName::PreSetup, Payload::Setup(SetupOptions::default()))
            .await
            .unwrap();
        let opts = out.as_setup().unwrap();
        assert_eq!(opts.build_engine.as_deref(), Some("docker-desktop"));
        assert_eq!(opts.orchestrator_version.as_deref(), Some("2.27.0"));
    }

    #[tokio::test]
    async fn test_hook_added_during_emission_not_included() {
        let bus = Bus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let bus2 = bus.clone();
        let log2 = log.clone();
        bus.on(
            EventName::Ready,
            1,
            HookFn::arc("adder", move |_p: Payload| {
                let bus2 = bus2.clone();
                let log2 = log2.clone();
                async move {
                    bus2.on(EventName::Ready, 99, recorder(&log2, "late"));
                    Ok(None)
                }
            }),
        );

        bus.emit(EventName::Ready, Payload::Empty).await.unwrap();
        assert!(log.lock().unwrap().is_empty());

        // The late hook participates in the next emission.
        bus.emit(EventName::Ready, Payload::Empty).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["late"]);
    }

    #[tokio::test]
    async fn test_emit_with_no_listeners_returns_payload() {
        let bus = Bus::new();
        let out = bus
            .emit(EventName::PostUninstall, Payload::Empty)
            .await
            .unwrap();
        assert_eq!(out, Payload::Empty);
    }
}

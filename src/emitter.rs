//! EventEmitter<T>: synchronous pub/sub keyed by event name.
//!
//! Handlers are stored as `Arc<dyn Fn(&T)>` per event name, in registration
//! order. Snapshot-on-trigger semantics mean:
//!   - A handler removed *during* delivery is still called in that pass.
//!   - A handler added *during* delivery is NOT called until the next trigger.
//!
//! All methods take `&self` (interior mutability via `parking_lot::Mutex`).
//! The lock is never held while a handler runs, so handlers may call `on()`,
//! `off()`, `trigger()` or an [`Unsubscribe`] on the same emitter.
//!
//! Failure handling is chosen at construction through [`EmitterOptions`]:
//! by default a panicking handler unwinds out of `trigger()` and the rest of
//! the pass is skipped.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    error::HandlerFailure,
    options::{EmitterOptions, FailurePolicy},
    subscription::{HandlerRegistry, Unsubscribe},
};

/// Identifier assigned to each registration by [`EventEmitter::on`].
///
/// Unique for the lifetime of one emitter and never reused, even after the
/// handler is removed. The first registration gets `1`.
pub type HandlerId = u64;

/// Closure type for event handlers.
pub type HandlerFn<T> = dyn Fn(&T) + Send + Sync;

type HandlerEntry<T> = (HandlerId, Arc<HandlerFn<T>>);

// ============================================================================
// Handler table (held behind an Arc<Mutex<...>>)
// ============================================================================

pub(crate) struct HandlerTable<T> {
    /// Registrations keyed by event name, in insertion order. Entries are
    /// created lazily and never pruned.
    handlers_by_name: HashMap<String, Vec<HandlerEntry<T>>>,
    /// Last identifier handed out; shared by every event name.
    highest_id: HandlerId,
}

impl<T> HandlerTable<T> {
    fn new() -> Self {
        Self {
            handlers_by_name: HashMap::new(),
            highest_id: 0,
        }
    }

    fn next_id(&mut self) -> HandlerId {
        self.highest_id += 1;
        self.highest_id
    }
}

impl<T: 'static> HandlerRegistry for Mutex<HandlerTable<T>> {
    fn remove(&self, event_name: &str, id: HandlerId) -> bool {
        let mut table = self.lock();
        match table.handlers_by_name.get_mut(event_name) {
            Some(handlers) => {
                let before = handlers.len();
                handlers.retain(|(hid, _)| *hid != id);
                handlers.len() != before
            }
            None => false,
        }
    }

    fn contains(&self, event_name: &str, id: HandlerId) -> bool {
        self.lock()
            .handlers_by_name
            .get(event_name)
            .is_some_and(|handlers| handlers.iter().any(|(hid, _)| *hid == id))
    }
}

// ============================================================================
// EventEmitter
// ============================================================================

/// Named-event emitter.
///
/// `T` is the payload type; it defaults to `serde_json::Value` for callers
/// that want an untyped payload.
pub struct EventEmitter<T = Value> {
    table: Arc<Mutex<HandlerTable<T>>>,
    options: EmitterOptions,
}

impl<T: 'static> EventEmitter<T> {
    /// Create a new, empty emitter with default options.
    pub fn new() -> Self {
        Self::with_options(EmitterOptions::default())
    }

    pub fn with_options(options: EmitterOptions) -> Self {
        Self {
            table: Arc::new(Mutex::new(HandlerTable::new())),
            options,
        }
    }

    pub fn options(&self) -> &EmitterOptions {
        &self.options
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register `handler` for `event_name` and return its [`Unsubscribe`] handle.
    ///
    /// Any string is accepted as a name. The handler is appended after every
    /// handler already registered under that name.
    pub fn on(
        &self,
        event_name: impl Into<String>,
        handler: impl Fn(&T) + Send + Sync + 'static,
    ) -> Unsubscribe {
        let event_name = event_name.into();
        let id = {
            let mut table = self.table.lock();
            let id = table.next_id();
            table
                .handlers_by_name
                .entry(event_name.clone())
                .or_default()
                .push((id, Arc::new(handler)));
            id
        };

        let registry: Weak<dyn HandlerRegistry> =
            Arc::downgrade(&self.table) as Weak<dyn HandlerRegistry>;
        Unsubscribe::new(event_name, id, registry)
    }

    /// Remove the registration `id` under `event_name`.
    ///
    /// Returns `false` if it was not present (safe to call multiple times).
    pub fn off(&self, event_name: &str, id: HandlerId) -> bool {
        self.table.remove(event_name, id)
    }

    // -----------------------------------------------------------------------
    // Delivery
    // -----------------------------------------------------------------------

    /// Call every handler registered under `event_name` with `data`, in
    /// registration order.
    ///
    /// Unknown names are a no-op. A snapshot of the handler list is taken
    /// before iteration and the lock is released before any handler runs.
    pub fn trigger(&self, event_name: &str, data: &T) {
        let snapshot: Vec<HandlerEntry<T>> = {
            let table = self.table.lock();
            match table.handlers_by_name.get(event_name) {
                Some(handlers) => handlers
                    .iter()
                    .map(|(id, handler)| (*id, Arc::clone(handler)))
                    .collect(),
                None => return,
            }
        };

        tracing::trace!(
            event = event_name,
            handlers = snapshot.len(),
            "triggering event"
        );

        match self.options.failure_policy {
            FailurePolicy::Propagate => {
                for (_, handler) in snapshot {
                    handler(data);
                }
            }
            FailurePolicy::Isolate => {
                for (id, handler) in snapshot {
                    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        handler(data);
                    }));
                    if let Err(payload) = outcome {
                        self.report_failure(HandlerFailure::from_panic(event_name, id, payload));
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Number of handlers currently registered under `event_name`.
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.table
            .lock()
            .handlers_by_name
            .get(event_name)
            .map_or(0, Vec::len)
    }

    pub fn has_handlers(&self, event_name: &str) -> bool {
        self.handler_count(event_name) > 0
    }

    /// Every name that has ever been registered, sorted. Names whose handlers
    /// have all been removed are still listed.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .table
            .lock()
            .handlers_by_name
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Total number of registrations across all event names.
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .handlers_by_name
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn report_failure(&self, failure: HandlerFailure) {
        tracing::warn!(
            event = %failure.event_name,
            handler_id = failure.handler_id,
            error = %failure.message,
            "event handler panicked; continuing delivery"
        );
        if let Some(on_error) = &self.options.on_error {
            // Swallow panics from the error callback too; delivery continues.
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                on_error(&failure);
            }));
        }
    }
}

impl<T: 'static> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<String, usize> = self
            .table
            .lock()
            .handlers_by_name
            .iter()
            .map(|(name, handlers)| (name.clone(), handlers.len()))
            .collect();
        f.debug_struct("EventEmitter")
            .field("handlers", &counts)
            .field("options", &self.options)
            .finish()
    }
}

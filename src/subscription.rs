//! Unsubscribe: handle returned by [`EventEmitter::on`](crate::EventEmitter::on).

use std::fmt;
use std::sync::Weak;

use crate::emitter::HandlerId;

/// Removal side of an emitter's handler table, type-erased over the payload.
pub(crate) trait HandlerRegistry: Send + Sync {
    /// Remove one registration. Returns whether anything was removed.
    fn remove(&self, event_name: &str, id: HandlerId) -> bool;

    fn contains(&self, event_name: &str, id: HandlerId) -> bool;
}

/// Removes exactly one handler registration.
///
/// Calling [`unsubscribe`](Self::unsubscribe) more than once has the same
/// effect as calling it once. The handle only holds a weak reference to the
/// emitter: it never keeps a dropped emitter alive, and unsubscribing after
/// the emitter is gone does nothing.
///
/// Dropping the handle does not remove the handler.
#[derive(Clone)]
pub struct Unsubscribe {
    event_name: String,
    id: HandlerId,
    registry: Weak<dyn HandlerRegistry>,
}

impl Unsubscribe {
    pub(crate) fn new(event_name: String, id: HandlerId, registry: Weak<dyn HandlerRegistry>) -> Self {
        Self {
            event_name,
            id,
            registry,
        }
    }

    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.event_name, self.id);
        }
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Whether the registration is still present in a live emitter.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(&self.event_name, self.id))
    }

    /// Convert into a plain zero-argument closure.
    pub fn into_fn(self) -> impl Fn() + Send + Sync + 'static {
        move || self.unsubscribe()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("event_name", &self.event_name)
            .field("id", &self.id)
            .finish()
    }
}

use std::any::Any;

use thiserror::Error;

use crate::emitter::HandlerId;

// ---------------------------------------------------------------------------
// HandlerFailure
// ---------------------------------------------------------------------------

/// A handler that panicked while an event was being delivered.
///
/// Only produced under [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate);
/// with the default policy the panic unwinds straight out of `trigger`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("handler {handler_id} for event \"{event_name}\" panicked: {message}")]
pub struct HandlerFailure {
    pub event_name: String,
    pub handler_id: HandlerId,
    pub message: String,
}

impl HandlerFailure {
    pub(crate) fn from_panic(
        event_name: &str,
        handler_id: HandlerId,
        payload: Box<dyn Any + Send>,
    ) -> Self {
        Self {
            event_name: event_name.to_string(),
            handler_id,
            message: panic_message(payload.as_ref()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

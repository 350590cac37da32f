//! Construction-time configuration for [`EventEmitter`](crate::EventEmitter).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::HandlerFailure;

/// Callback type for handler failures reported under [`FailurePolicy::Isolate`].
pub type HandlerErrorCallback = dyn Fn(&HandlerFailure) + Send + Sync;

/// What `trigger` does when a handler panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The panic unwinds out of `trigger`; handlers after the failing one are
    /// skipped for that pass.
    #[default]
    Propagate,
    /// Each handler runs under `catch_unwind`. A panic is reported through
    /// `on_error` and a `tracing` warning, and delivery continues.
    Isolate,
}

/// Configuration for `EventEmitter`.
#[derive(Clone, Default)]
pub struct EmitterOptions {
    /// Handler failure policy (default: `Propagate`)
    pub failure_policy: FailurePolicy,
    /// Called for each isolated handler failure
    pub on_error: Option<Arc<HandlerErrorCallback>>,
}

impl EmitterOptions {
    /// Options with [`FailurePolicy::Isolate`] and no error callback.
    pub fn isolated() -> Self {
        Self {
            failure_policy: FailurePolicy::Isolate,
            on_error: None,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_on_error(
        mut self,
        callback: impl Fn(&HandlerFailure) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for EmitterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterOptions")
            .field("failure_policy", &self.failure_policy)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

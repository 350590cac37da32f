//! Synchronous named-event emitter.
//!
//! # Overview
//!
//! [`EventEmitter`] maps event names to ordered handler lists. [`EventEmitter::on`]
//! registers a handler and returns an [`Unsubscribe`] handle;
//! [`EventEmitter::trigger`] calls every handler for a name, inline and in
//! registration order.
//!
//! # Modules
//!
//! - [`emitter`]: [`EventEmitter<T>`] and [`HandlerId`].
//! - [`subscription`]: [`Unsubscribe`].
//! - [`options`]: [`EmitterOptions`] and [`FailurePolicy`].
//! - [`error`]: [`HandlerFailure`].

pub mod emitter;
pub mod error;
pub mod options;
pub mod subscription;

pub use emitter::{EventEmitter, HandlerFn, HandlerId};
pub use error::HandlerFailure;
pub use options::{EmitterOptions, FailurePolicy, HandlerErrorCallback};
pub use subscription::Unsubscribe;

//! Error types for the promise runtime.
//!
//! Usage errors are returned synchronously as [`PromiseError`]. Whenever one
//! has to travel through a JavaScript-visible path (a rejection, a throw from a
//! native function) it is converted into a [`JsError`] value.

use core_types::{ErrorKind, JsError, Value};

use crate::PromiseId;

/// Errors raised by the promise runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromiseError {
    /// `new Promise()` without an executor
    #[error("Executor is undefined.")]
    ExecutorUndefined,

    /// The executor is not callable
    #[error("Executor is not a function.")]
    ExecutorNotCallable,

    /// A promise method was called on something that is not a promise
    #[error("the promise parameter is not an instance of Promise.")]
    NotAPromise,

    /// The constructor refused to build a capability
    #[error("{0} is not a promise constructor")]
    NotAConstructor(String),

    /// The constructor has no usable `resolve` for combinators
    #[error("promise constructor has no callable resolve")]
    ResolverNotCallable,

    /// A promise was resolved with itself
    #[error("must not resolve to the same promise.")]
    SelfResolution,

    /// The value has no iteration hook
    #[error("{0} is not iterable")]
    NotIterable(String),

    /// The iteration hook returned a non-object
    #[error("result of the iterator method is not an object")]
    IteratorNotObject,

    /// `next()` returned a non-object
    #[error("iterator result {0} is not an object")]
    IteratorResultNotObject(String),

    /// `return()` returned a non-object
    #[error("iterator return result is not an object")]
    ReturnResultNotObject,

    /// A settlement transition ran twice; the resolving-function guard was bypassed
    #[error("promise {0} is already settled")]
    AlreadySettled(PromiseId),

    /// The event loop hit its per-drain job bound
    #[error("job limit of {limit} exceeded while draining microtasks")]
    JobLimitExceeded {
        /// The configured bound
        limit: usize,
    },
}

impl PromiseError {
    /// The JavaScript error kind this error surfaces as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromiseError::SelfResolution => ErrorKind::SelfResolution,
            PromiseError::AlreadySettled(_) | PromiseError::JobLimitExceeded { .. } => {
                ErrorKind::InternalError
            }
            _ => ErrorKind::TypeError,
        }
    }
}

impl From<PromiseError> for JsError {
    fn from(err: PromiseError) -> Self {
        JsError::new(err.kind(), err.to_string())
    }
}

impl From<PromiseError> for Value {
    fn from(err: PromiseError) -> Self {
        Value::from(JsError::from(err))
    }
}

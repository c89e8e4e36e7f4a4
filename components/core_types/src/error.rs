//! JavaScript error types and error handling.
//!
//! This module provides the error value that is thrown or used as a rejection
//! reason. Aggregate errors carry their per-input errors in input order.

use std::fmt;

use crate::Value;

/// The kind of JavaScript error.
///
/// These correspond to JavaScript's built-in error constructors, plus a
/// dedicated kind for a promise resolved with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Type error (e.g., calling a non-function)
    TypeError,
    /// Every input of a `Promise.any` rejected
    AggregateError,
    /// A promise was resolved with itself
    SelfResolution,
    /// Internal engine error
    InternalError,
}

impl ErrorKind {
    /// The constructor name reported for this kind.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::AggregateError => "AggregateError",
            ErrorKind::SelfResolution => "SelfResolutionError",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A JavaScript error with message and, for aggregate errors, the collected
/// per-input errors.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, JsError, Value};
///
/// let error = JsError::aggregate(vec![Value::Smi(1), Value::Smi(2)]);
/// assert_eq!(error.kind, ErrorKind::AggregateError);
/// assert_eq!(error.errors, vec![Value::Smi(1), Value::Smi(2)]);
/// ```
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Per-input errors of an aggregate error, in input order
    pub errors: Vec<Value>,
}

impl JsError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Creates a TypeError.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// Creates an AggregateError holding `errors` in the given order.
    pub fn aggregate(errors: Vec<Value>) -> Self {
        Self {
            kind: ErrorKind::AggregateError,
            message: "All promises were rejected".to_string(),
            errors,
        }
    }
}

impl PartialEq for JsError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message && self.errors == other.errors
    }
}

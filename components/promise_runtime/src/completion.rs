//! Completion records.
//!
//! A step of promise machinery either returns a value or throws one. Handler
//! calls are captured as a [`Completion`] before the result is routed to a
//! capability's resolve or reject function.

use core_types::Value;

/// The outcome of evaluating a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The step returned a value
    Normal(Value),
    /// The step threw a value
    Throw(Value),
}

impl Completion {
    /// True for a throw completion.
    pub fn is_throw(&self) -> bool {
        matches!(self, Completion::Throw(_))
    }

    /// The carried value, whichever way the step ended.
    pub fn value(&self) -> &Value {
        match self {
            Completion::Normal(value) | Completion::Throw(value) => value,
        }
    }

    /// Consumes the completion, returning the carried value.
    pub fn into_value(self) -> Value {
        match self {
            Completion::Normal(value) | Completion::Throw(value) => value,
        }
    }
}

impl From<Result<Value, Value>> for Completion {
    fn from(result: Result<Value, Value>) -> Self {
        match result {
            Ok(value) => Completion::Normal(value),
            Err(thrown) => Completion::Throw(thrown),
        }
    }
}

impl From<Completion> for Result<Value, Value> {
    fn from(completion: Completion) -> Self {
        match completion {
            Completion::Normal(value) => Ok(value),
            Completion::Throw(thrown) => Err(thrown),
        }
    }
}

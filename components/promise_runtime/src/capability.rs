//! Promise capabilities.

use std::fmt;

use core_types::Value;

use crate::resolving::ResolvingFunctions;
use crate::{Constructor, Promise, PromiseError};

/// A promise bundled with the resolve/reject functions that settle it.
///
/// Both functions act on the paired promise only, and at most one call of
/// either ever takes effect.
#[derive(Clone)]
pub struct Capability {
    promise: Promise,
    functions: ResolvingFunctions,
}

impl Capability {
    /// Creates a pending promise owned by `constructor`, with its resolving
    /// functions.
    pub fn pending(constructor: &Constructor) -> Self {
        let promise = Promise::pending(constructor.clone());
        let functions = ResolvingFunctions::new(&promise);
        Self { promise, functions }
    }

    /// The promise this capability settles.
    pub fn promise(&self) -> &Promise {
        &self.promise
    }

    /// The script-visible resolve function.
    pub fn resolve_function(&self) -> &Value {
        self.functions.resolve_function()
    }

    /// The script-visible reject function.
    pub fn reject_function(&self) -> &Value {
        self.functions.reject_function()
    }

    /// Resolves the promise, running the resolution procedure. A no-op once
    /// either function has been called.
    pub fn resolve(&self, resolution: Value) -> Result<(), PromiseError> {
        self.functions.resolve(resolution)
    }

    /// Rejects the promise. A no-op once either function has been called.
    pub fn reject(&self, reason: Value) -> Result<(), PromiseError> {
        self.functions.reject(reason)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("promise", &self.promise)
            .finish_non_exhaustive()
    }
}

//! Promise constructors.
//!
//! Which constructor builds derived promises (species), how combinators wrap
//! their inputs (`C.resolve`), and whether a capability can be built at all
//! are decided by a [`PromiseConstructor`] implementation. [`Constructor`] is
//! the shared handle the rest of the runtime passes around.

use std::fmt;
use std::rc::Rc;

use core_types::Value;
use tracing::debug;

use crate::combinators;
use crate::iterator::Iterable;
use crate::resolving::ResolvingFunctions;
use crate::{Capability, Host, Promise, PromiseError};

/// The `C.resolve` a combinator applies to each input.
pub type Resolver = fn(&Constructor, Value) -> Result<Value, Value>;

/// Behavior of a promise constructor.
///
/// Only [`host`](PromiseConstructor::host) is required; the defaults describe
/// the intrinsic `Promise`.
pub trait PromiseConstructor {
    /// Constructor name, for diagnostics.
    fn name(&self) -> &str {
        "Promise"
    }

    /// The host whose scheduler and tracker promises of this constructor use.
    fn host(&self) -> &Host;

    /// Builds a fresh capability. `this` is the handle wrapping `self`.
    fn new_capability(&self, this: &Constructor) -> Result<Capability, PromiseError> {
        Ok(Capability::pending(this))
    }

    /// The constructor used for promises derived from this one's instances.
    fn species(&self, this: &Constructor) -> Constructor {
        this.clone()
    }

    /// The resolve operation combinators apply to their inputs, or `None` if
    /// this constructor has no usable one.
    fn resolver(&self) -> Option<Resolver> {
        Some(intrinsic_resolve)
    }
}

fn intrinsic_resolve(constructor: &Constructor, value: Value) -> Result<Value, Value> {
    Ok(constructor.resolve(value)?.into())
}

/// The built-in promise constructor.
#[derive(Debug, Clone)]
pub struct IntrinsicPromise {
    host: Host,
}

impl IntrinsicPromise {
    /// Creates the intrinsic constructor for `host`.
    pub fn new(host: Host) -> Self {
        Self { host }
    }
}

impl PromiseConstructor for IntrinsicPromise {
    fn host(&self) -> &Host {
        &self.host
    }
}

/// A shared handle to a promise constructor, compared by identity.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use promise_runtime::{Constructor, EventLoop, Host, PromiseState};
/// use core_types::Value;
///
/// let event_loop = Rc::new(EventLoop::new());
/// let promise_ctor = Constructor::intrinsic(Host::new(event_loop.clone()));
///
/// let promise = promise_ctor
///     .construct_with(|resolve, _reject| resolve.call1(Value::Smi(42)))
///     .unwrap();
/// assert_eq!(promise.state(), PromiseState::Fulfilled);
/// assert_eq!(promise.result(), Some(Value::Smi(42)));
/// ```
#[derive(Clone)]
pub struct Constructor(Rc<dyn PromiseConstructor>);

impl Constructor {
    /// Wraps a constructor implementation.
    pub fn new<C: PromiseConstructor + 'static>(constructor: C) -> Self {
        Constructor(Rc::new(constructor))
    }

    /// The intrinsic `Promise` for `host`.
    pub fn intrinsic(host: Host) -> Self {
        Self::new(IntrinsicPromise::new(host))
    }

    /// The constructor's name.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// The host this constructor schedules on.
    pub fn host(&self) -> &Host {
        self.0.host()
    }

    /// True if both handles refer to the same constructor.
    pub fn ptr_eq(&self, other: &Constructor) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }

    /// Builds a fresh capability.
    pub fn new_capability(&self) -> Result<Capability, PromiseError> {
        self.0.new_capability(self)
    }

    /// The constructor for derived promises.
    pub fn species(&self) -> Constructor {
        self.0.species(self)
    }

    /// The combinator resolve operation, if usable.
    pub fn resolver(&self) -> Option<Resolver> {
        self.0.resolver()
    }

    /// `new Promise(executor)`.
    ///
    /// `executor` is called synchronously with `(resolve, reject)`; a throw
    /// from it rejects the promise.
    pub fn construct(&self, executor: Value) -> Result<Promise, PromiseError> {
        match executor {
            Value::Undefined => Err(PromiseError::ExecutorUndefined),
            executor if !executor.is_callable() => Err(PromiseError::ExecutorNotCallable),
            executor => self.run_executor(|resolve, reject| {
                executor.call(Value::Undefined, vec![resolve, reject])
            }),
        }
    }

    /// `new Promise(executor)` with a Rust closure as the executor.
    pub fn construct_with<F>(&self, executor: F) -> Result<Promise, PromiseError>
    where
        F: FnOnce(Value, Value) -> Result<Value, Value>,
    {
        self.run_executor(executor)
    }

    fn run_executor<F>(&self, executor: F) -> Result<Promise, PromiseError>
    where
        F: FnOnce(Value, Value) -> Result<Value, Value>,
    {
        let promise = Promise::pending(self.clone());
        let functions = ResolvingFunctions::new(&promise);
        let outcome = executor(
            functions.resolve_function().clone(),
            functions.reject_function().clone(),
        );
        if let Err(thrown) = outcome {
            debug!(promise = %promise.id(), "executor threw");
            functions.reject(thrown)?;
        }
        Ok(promise)
    }

    /// `Promise.resolve(value)`: `value` itself when it is a promise of this
    /// very constructor, otherwise a new promise resolved with it.
    pub fn resolve(&self, value: Value) -> Result<Promise, PromiseError> {
        if let Some(promise) = Promise::from_value(&value) {
            if promise.constructor().ptr_eq(self) {
                return Ok(promise);
            }
        }
        let capability = self.new_capability()?;
        capability.resolve(value)?;
        Ok(capability.promise().clone())
    }

    /// `Promise.reject(reason)`: an already-rejected promise.
    pub fn reject(&self, reason: Value) -> Result<Promise, PromiseError> {
        let capability = self.new_capability()?;
        capability.reject(reason)?;
        Ok(capability.promise().clone())
    }

    /// `Promise.race(iterable)`.
    pub fn race(&self, iterable: impl Into<Iterable>) -> Result<Promise, PromiseError> {
        combinators::race(self, iterable.into())
    }

    /// `Promise.any(iterable)`.
    pub fn any(&self, iterable: impl Into<Iterable>) -> Result<Promise, PromiseError> {
        combinators::any(self, iterable.into())
    }

    /// `Promise.all(iterable)`.
    pub fn all(&self, iterable: impl Into<Iterable>) -> Result<Promise, PromiseError> {
        combinators::all(self, iterable.into())
    }

    /// `Promise.allSettled(iterable)`.
    pub fn all_settled(&self, iterable: impl Into<Iterable>) -> Result<Promise, PromiseError> {
        combinators::all_settled(self, iterable.into())
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&self.name()).finish()
    }
}

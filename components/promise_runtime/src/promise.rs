//! Promise prototype methods: `then`, `catch`, `finally`.

use core_types::Value;

use crate::reaction::perform_then;
use crate::{Promise, PromiseError};

impl Promise {
    /// `promise.then(onFulfilled, onRejected)`.
    ///
    /// Returns a new pending promise built by this promise's species
    /// constructor. Handlers always run in a later job, even if this promise
    /// is already settled; non-callable handlers pass the outcome through.
    pub fn then(&self, on_fulfilled: Value, on_rejected: Value) -> Result<Promise, PromiseError> {
        let capability = self.constructor().species().new_capability()?;
        perform_then(self, on_fulfilled, on_rejected, Some(capability.clone()));
        Ok(capability.promise().clone())
    }

    /// `promise.catch(onRejected)`, i.e. `then(undefined, onRejected)`.
    pub fn catch(&self, on_rejected: Value) -> Result<Promise, PromiseError> {
        self.then(Value::Undefined, on_rejected)
    }

    /// `promise.finally(onFinally)`.
    ///
    /// `on_finally` runs with no arguments on either outcome. The original
    /// value is then forwarded, or the original reason rethrown, once the
    /// promise returned by `on_finally` settles. A throw or rejection from
    /// `on_finally` replaces the outcome.
    pub fn finally(&self, on_finally: Value) -> Result<Promise, PromiseError> {
        if !on_finally.is_callable() {
            return self.then(on_finally.clone(), on_finally);
        }
        let constructor = self.constructor().species();

        let (c, f) = (constructor.clone(), on_finally.clone());
        let then_finally = Value::unary(move |value| {
            let result = f.call(Value::Undefined, Vec::new())?;
            let settled = c.resolve(result)?;
            let value_thunk = Value::function(move |_this, _args| Ok(value.clone()));
            Ok(settled.then(value_thunk, Value::Undefined)?.into())
        });

        let (c, f) = (constructor, on_finally);
        let catch_finally = Value::unary(move |reason| {
            let result = f.call(Value::Undefined, Vec::new())?;
            let settled = c.resolve(result)?;
            let thrower = Value::function(move |_this, _args| Err(reason.clone()));
            Ok(settled.then(thrower, Value::Undefined)?.into())
        });

        self.then(then_finally, catch_finally)
    }

    /// Attaches handlers without deriving a promise.
    ///
    /// Outcomes of the handlers are discarded; a throw from one is reported
    /// to the host as an uncaught error. Still marks this promise handled.
    pub fn react(&self, on_fulfilled: Value, on_rejected: Value) {
        perform_then(self, on_fulfilled, on_rejected, None);
    }
}

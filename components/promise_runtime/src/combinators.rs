//! `race`, `any`, `all` and `allSettled`.
//!
//! Every combinator pulls one element at a time, wraps it with the
//! constructor's resolver and links it with `then`. The aggregating ones
//! share an [`Aggregation`] whose remaining count starts at one for the
//! iteration itself; it is bumped before each element is linked and dropped
//! once more when the iterator runs out, so the zero check fires exactly
//! once whether the input is empty or the last element settles last.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use core_types::{JsError, Value};
use tracing::debug;

use crate::completion::Completion;
use crate::constructor::Resolver;
use crate::iterator::{Iterable, IteratorRecord};
use crate::{Capability, Constructor, Promise, PromiseError};

/// Creates the result capability, obtains the iterator and runs `body` over
/// it. A throw from any of that rejects the result promise; it only escapes
/// as an error when no capability or resolver is available.
fn drive<F>(
    constructor: &Constructor,
    iterable: Iterable,
    combinator: &'static str,
    body: F,
) -> Result<Promise, PromiseError>
where
    F: FnOnce(&mut IteratorRecord, Resolver, &Capability) -> Result<(), Value>,
{
    let capability = constructor.new_capability()?;
    let resolver = constructor
        .resolver()
        .ok_or(PromiseError::ResolverNotCallable)?;
    debug!(
        combinator,
        constructor = constructor.name(),
        promise = %capability.promise().id(),
        "combinator started"
    );

    let outcome = iterable.into_record().and_then(|mut record| {
        body(&mut record, resolver, &capability).map_err(|thrown| {
            if record.is_done() {
                thrown
            } else {
                record.close(Completion::Throw(thrown)).into_value()
            }
        })
    });
    if let Err(thrown) = outcome {
        debug!(combinator, "iteration threw, rejecting result");
        capability.reject(thrown)?;
    }
    Ok(capability.promise().clone())
}

/// `next_promise.then(on_fulfilled, on_rejected)` through the `then`
/// property, so thenables returned by custom resolvers work too.
fn invoke_then(next_promise: &Value, on_fulfilled: Value, on_rejected: Value) -> Result<Value, Value> {
    next_promise
        .get("then")?
        .call(next_promise.clone(), vec![on_fulfilled, on_rejected])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settle {
    /// Resolve with the collected values
    Resolve,
    /// Reject with an aggregate of the collected reasons
    Reject,
}

struct Aggregation {
    values: RefCell<Vec<Value>>,
    remaining: Cell<usize>,
    capability: Capability,
    settle: Settle,
}

impl Aggregation {
    fn new(capability: &Capability, settle: Settle) -> Rc<Self> {
        Rc::new(Self {
            values: RefCell::new(Vec::new()),
            remaining: Cell::new(1),
            capability: capability.clone(),
            settle,
        })
    }

    /// Reserves the slot for the next element.
    fn reserve(&self) -> usize {
        let mut values = self.values.borrow_mut();
        values.push(Value::Undefined);
        values.len() - 1
    }

    fn retain(&self) {
        self.remaining.set(self.remaining.get() + 1);
    }

    fn release(&self) -> Result<(), Value> {
        let remaining = self.remaining.get() - 1;
        self.remaining.set(remaining);
        if remaining > 0 {
            return Ok(());
        }
        let values = self.values.borrow().clone();
        let settled = match self.settle {
            Settle::Resolve => self.capability.resolve(Value::array(values)),
            Settle::Reject => self.capability.reject(JsError::aggregate(values).into()),
        };
        Ok(settled?)
    }

    /// A per-element handler storing `wrap(x)` at `index`. Handlers sharing
    /// `called` take effect at most once between them.
    fn element_function(self: &Rc<Self>, index: usize, called: Rc<Cell<bool>>, wrap: fn(Value) -> Value) -> Value {
        let aggregation = self.clone();
        Value::unary(move |x| {
            if called.replace(true) {
                return Ok(Value::Undefined);
            }
            aggregation.values.borrow_mut()[index] = wrap(x);
            aggregation.release()?;
            Ok(Value::Undefined)
        })
    }
}

fn identity(value: Value) -> Value {
    value
}

fn fulfilled_entry(value: Value) -> Value {
    Value::record([("status", Value::from("fulfilled")), ("value", value)])
}

fn rejected_entry(reason: Value) -> Value {
    Value::record([("status", Value::from("rejected")), ("value", reason)])
}

/// Settles like the first input to settle. Never settles for an empty input.
pub(crate) fn race(constructor: &Constructor, iterable: Iterable) -> Result<Promise, PromiseError> {
    drive(constructor, iterable, "race", |record, resolver, capability| {
        while let Some(next) = record.step()? {
            let next_promise = resolver(constructor, next)?;
            invoke_then(
                &next_promise,
                capability.resolve_function().clone(),
                capability.reject_function().clone(),
            )?;
        }
        Ok(())
    })
}

/// Fulfills with the first fulfillment, or rejects with an `AggregateError`
/// listing every reason in input order.
pub(crate) fn any(constructor: &Constructor, iterable: Iterable) -> Result<Promise, PromiseError> {
    drive(constructor, iterable, "any", |record, resolver, capability| {
        let errors = Aggregation::new(capability, Settle::Reject);
        while let Some(next) = record.step()? {
            let index = errors.reserve();
            let next_promise = resolver(constructor, next)?;
            let on_rejected = errors.element_function(index, Rc::new(Cell::new(false)), identity);
            errors.retain();
            invoke_then(&next_promise, capability.resolve_function().clone(), on_rejected)?;
        }
        errors.release()
    })
}

/// Fulfills with every value in input order, or rejects with the first
/// rejection.
pub(crate) fn all(constructor: &Constructor, iterable: Iterable) -> Result<Promise, PromiseError> {
    drive(constructor, iterable, "all", |record, resolver, capability| {
        let values = Aggregation::new(capability, Settle::Resolve);
        while let Some(next) = record.step()? {
            let index = values.reserve();
            let next_promise = resolver(constructor, next)?;
            let on_fulfilled = values.element_function(index, Rc::new(Cell::new(false)), identity);
            values.retain();
            invoke_then(&next_promise, on_fulfilled, capability.reject_function().clone())?;
        }
        values.release()
    })
}

/// Fulfills once every input has settled, with one `{status, value}` entry
/// per input.
pub(crate) fn all_settled(constructor: &Constructor, iterable: Iterable) -> Result<Promise, PromiseError> {
    drive(constructor, iterable, "allSettled", |record, resolver, capability| {
        let entries = Aggregation::new(capability, Settle::Resolve);
        while let Some(next) = record.step()? {
            let index = entries.reserve();
            let next_promise = resolver(constructor, next)?;
            let called = Rc::new(Cell::new(false));
            let on_fulfilled = entries.element_function(index, called.clone(), fulfilled_entry);
            let on_rejected = entries.element_function(index, called, rejected_entry);
            entries.retain();
            invoke_then(&next_promise, on_fulfilled, on_rejected)?;
        }
        entries.release()
    })
}

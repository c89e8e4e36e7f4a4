//! Resolving functions and the resolution procedure.
//!
//! The resolve/reject pair of a promise shares one "already resolved" guard
//! that lives next to the actions it protects, so at most one call of either
//! function ever takes effect.

use std::cell::Cell;
use std::rc::Rc;

use core_types::{argument, Function, Value};
use tracing::trace;

use crate::job::{Job, JobKind};
use crate::{Promise, PromiseError};

struct ResolutionGuard {
    promise: Promise,
    already_resolved: Cell<bool>,
}

impl ResolutionGuard {
    /// Claims the right to settle. Only the first claim succeeds.
    fn claim(&self) -> bool {
        !self.already_resolved.replace(true)
    }

    fn resolve(&self, resolution: Value) -> Result<(), PromiseError> {
        if !self.claim() {
            return Ok(());
        }
        resolve_promise(&self.promise, resolution)
    }

    fn reject(&self, reason: Value) -> Result<(), PromiseError> {
        if !self.claim() {
            return Ok(());
        }
        self.promise.reject(reason)
    }
}

/// A resolve/reject pair bound to one promise.
#[derive(Clone)]
pub(crate) struct ResolvingFunctions {
    guard: Rc<ResolutionGuard>,
    resolve: Value,
    reject: Value,
}

impl ResolvingFunctions {
    pub(crate) fn new(promise: &Promise) -> Self {
        let guard = Rc::new(ResolutionGuard {
            promise: promise.clone(),
            already_resolved: Cell::new(false),
        });

        let g = guard.clone();
        let resolve = Function::new("resolve", move |_this, args| {
            g.resolve(argument(&args, 0))?;
            Ok(Value::Undefined)
        });
        let g = guard.clone();
        let reject = Function::new("reject", move |_this, args| {
            g.reject(argument(&args, 0))?;
            Ok(Value::Undefined)
        });

        Self {
            guard,
            resolve: Value::Function(Rc::new(resolve)),
            reject: Value::Function(Rc::new(reject)),
        }
    }

    pub(crate) fn resolve_function(&self) -> &Value {
        &self.resolve
    }

    pub(crate) fn reject_function(&self) -> &Value {
        &self.reject
    }

    pub(crate) fn resolve(&self, resolution: Value) -> Result<(), PromiseError> {
        self.guard.resolve(resolution)
    }

    pub(crate) fn reject(&self, reason: Value) -> Result<(), PromiseError> {
        self.guard.reject(reason)
    }
}

/// Turns a resolve argument into a settlement of `promise`.
///
/// Thenables are adopted in a later job, never synchronously, even when they
/// are already settled.
fn resolve_promise(promise: &Promise, resolution: Value) -> Result<(), PromiseError> {
    if resolution == promise.to_value() {
        return promise.reject(PromiseError::SelfResolution.into());
    }
    if !resolution.is_object() {
        return promise.fulfill(resolution);
    }
    let then = match resolution.get("then") {
        Ok(then) => then,
        Err(thrown) => return promise.reject(thrown),
    };
    if !then.is_callable() {
        return promise.fulfill(resolution);
    }
    trace!(promise = %promise.id(), "adopting thenable");
    promise
        .host()
        .enqueue_job(resolve_thenable_job(promise.clone(), resolution, then));
    Ok(())
}

/// Calls `then` on the thenable with a fresh resolving pair for `promise`.
fn resolve_thenable_job(promise: Promise, thenable: Value, then: Value) -> Job {
    Job::new(JobKind::ResolveThenable, move || {
        let functions = ResolvingFunctions::new(&promise);
        let args = vec![
            functions.resolve_function().clone(),
            functions.reject_function().clone(),
        ];
        if let Err(thrown) = then.call(thenable, args) {
            functions.reject(thrown).map_err(Value::from)?;
        }
        Ok(())
    })
}

//! The settlement record.
//!
//! A [`Promise`] is a shared handle to a record holding its state, its result
//! and, while pending, the two reaction lists. The slots are private: they
//! change only through the transitions in this module.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use core_types::{argument, Function, JsObject, Value};
use tracing::trace;

use crate::reaction::Reaction;
use crate::tracker::RejectionOperation;
use crate::{Constructor, Host, PromiseError, PromiseId};

/// The state of a Promise.
///
/// Once settled (Fulfilled or Rejected), a Promise cannot change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The initial state; the promise is neither fulfilled nor rejected.
    Pending,
    /// The promise has been fulfilled with a value.
    Fulfilled,
    /// The promise has been rejected with a reason.
    Rejected,
}

impl PromiseState {
    /// True once the promise left `Pending`.
    pub fn is_settled(self) -> bool {
        !matches!(self, PromiseState::Pending)
    }
}

struct Slots {
    state: PromiseState,
    result: Value,
    // `Some` exactly while pending.
    fulfill_reactions: Option<Vec<Reaction>>,
    reject_reactions: Option<Vec<Reaction>>,
    is_handled: bool,
}

pub(crate) struct PromiseCell {
    id: PromiseId,
    constructor: Constructor,
    slots: RefCell<Slots>,
}

/// A promise: a shared handle to a settlement record.
///
/// Cloning the handle does not copy the record.
#[derive(Clone)]
pub struct Promise(Rc<PromiseCell>);

impl Promise {
    /// Creates a pending record owned by `constructor`.
    ///
    /// The record comes without resolving functions; see
    /// [`Capability::pending`](crate::Capability::pending).
    pub fn pending(constructor: Constructor) -> Self {
        let id = constructor.host().allocate_id();
        trace!(promise = %id, "created");
        Promise(Rc::new(PromiseCell {
            id,
            constructor,
            slots: RefCell::new(Slots {
                state: PromiseState::Pending,
                result: Value::Undefined,
                fulfill_reactions: Some(Vec::new()),
                reject_reactions: Some(Vec::new()),
                is_handled: false,
            }),
        }))
    }

    /// Recovers the promise behind a value, if it is one.
    pub fn from_value(value: &Value) -> Option<Promise> {
        let obj = value.as_object()?;
        obj.clone().into_any().downcast::<PromiseCell>().ok().map(Promise)
    }

    /// This promise as a JavaScript value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// The promise's id, unique within its host.
    pub fn id(&self) -> PromiseId {
        self.0.id
    }

    /// Current state.
    pub fn state(&self) -> PromiseState {
        self.0.slots.borrow().state
    }

    /// Fulfillment value or rejection reason; `None` while pending.
    pub fn result(&self) -> Option<Value> {
        let slots = self.0.slots.borrow();
        slots.state.is_settled().then(|| slots.result.clone())
    }

    /// True once any reaction has been attached.
    pub fn is_handled(&self) -> bool {
        self.0.slots.borrow().is_handled
    }

    /// The constructor that created this promise.
    pub fn constructor(&self) -> &Constructor {
        &self.0.constructor
    }

    /// True if both handles refer to the same record.
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn host(&self) -> &Host {
        self.0.constructor.host()
    }

    /// Settles the record as fulfilled and schedules its fulfill reactions.
    ///
    /// Fails if the record is already settled; callers gate this through the
    /// resolving functions' guard.
    pub(crate) fn fulfill(&self, value: Value) -> Result<(), PromiseError> {
        let reactions = {
            let mut slots = self.0.slots.borrow_mut();
            if slots.state.is_settled() {
                return Err(PromiseError::AlreadySettled(self.id()));
            }
            let reactions = slots.fulfill_reactions.take();
            debug_assert!(reactions.is_some(), "pending record without reaction list");
            slots.reject_reactions = None;
            slots.result = value.clone();
            slots.state = PromiseState::Fulfilled;
            reactions
        };
        trace!(promise = %self.id(), reactions = reactions.as_ref().map_or(0, Vec::len), "fulfilled");
        if let Some(reactions) = reactions {
            self.trigger_reactions(reactions, value);
        }
        Ok(())
    }

    /// Settles the record as rejected, reports it to the rejection tracker if
    /// unhandled, and schedules its reject reactions.
    pub(crate) fn reject(&self, reason: Value) -> Result<(), PromiseError> {
        let (reactions, is_handled) = {
            let mut slots = self.0.slots.borrow_mut();
            if slots.state.is_settled() {
                return Err(PromiseError::AlreadySettled(self.id()));
            }
            let reactions = slots.reject_reactions.take();
            debug_assert!(reactions.is_some(), "pending record without reaction list");
            slots.fulfill_reactions = None;
            slots.result = reason.clone();
            slots.state = PromiseState::Rejected;
            (reactions, slots.is_handled)
        };
        trace!(promise = %self.id(), reactions = reactions.as_ref().map_or(0, Vec::len), "rejected");
        if !is_handled {
            self.host().track_rejection(self, RejectionOperation::Reject);
        }
        if let Some(reactions) = reactions {
            self.trigger_reactions(reactions, reason);
        }
        Ok(())
    }

    fn trigger_reactions(&self, reactions: Vec<Reaction>, argument: Value) {
        for reaction in reactions {
            self.host().enqueue_job(reaction.into_job(argument.clone()));
        }
    }

    /// Registers a reaction pair: queued while pending, scheduled right away
    /// (never run) when already settled. The record is marked handled before
    /// the tracker is notified.
    pub(crate) fn attach(&self, fulfill_reaction: Reaction, reject_reaction: Reaction) {
        let (settled, newly_handled) = {
            let mut slots = self.0.slots.borrow_mut();
            let newly_handled = slots.state == PromiseState::Rejected && !slots.is_handled;
            slots.is_handled = true;
            let settled = match slots.state {
                PromiseState::Pending => {
                    debug_assert!(
                        slots.fulfill_reactions.is_some() && slots.reject_reactions.is_some(),
                        "pending record without reaction list"
                    );
                    if let Some(reactions) = slots.fulfill_reactions.as_mut() {
                        reactions.push(fulfill_reaction);
                    }
                    if let Some(reactions) = slots.reject_reactions.as_mut() {
                        reactions.push(reject_reaction);
                    }
                    None
                }
                PromiseState::Fulfilled => Some((fulfill_reaction, slots.result.clone())),
                PromiseState::Rejected => Some((reject_reaction, slots.result.clone())),
            };
            (settled, newly_handled)
        };
        if newly_handled {
            self.host().track_rejection(self, RejectionOperation::Handle);
        }
        if let Some((reaction, argument)) = settled {
            self.host().enqueue_job(reaction.into_job(argument));
        }
    }
}

impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        Value::Object(promise.0)
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.0.slots.borrow();
        f.debug_struct("Promise")
            .field("id", &self.0.id)
            .field("state", &slots.state)
            .field("result", &slots.result)
            .field("is_handled", &slots.is_handled)
            .finish()
    }
}

fn receiver(this: &Value) -> Result<Promise, PromiseError> {
    Promise::from_value(this).ok_or(PromiseError::NotAPromise)
}

fn method<F>(name: &str, body: F) -> Value
where
    F: Fn(Promise, Vec<Value>) -> Result<Promise, PromiseError> + 'static,
{
    Value::Function(Rc::new(Function::new(name, move |this, args| {
        let promise = receiver(&this)?;
        Ok(body(promise, args)?.into())
    })))
}

/// The script-visible face of a promise: `then`, `catch` and `finally` are
/// looked up like any thenable's members and check their receiver.
impl JsObject for PromiseCell {
    fn get(&self, key: &str) -> Result<Value, Value> {
        Ok(match key {
            "then" => method("then", |promise, args| {
                promise.then(argument(&args, 0), argument(&args, 1))
            }),
            "catch" => method("catch", |promise, args| promise.catch(argument(&args, 0))),
            "finally" => method("finally", |promise, args| promise.finally(argument(&args, 0))),
            _ => Value::Undefined,
        })
    }

    fn class_name(&self) -> &'static str {
        "Promise"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

//! Unit tests for rejection tracking

use std::cell::RefCell;
use std::rc::Rc;

use core_types::Value;
use promise_runtime::{
    Constructor, EventLoop, Host, Promise, RejectionOperation, RejectionTracker,
};

use super::setup_tracked;

#[test]
fn unhandled_rejection_then_handle() {
    let (el, tracker, ctor) = setup_tracked();
    let promise = ctor.reject(Value::from("x")).unwrap();
    assert_eq!(tracker.events_for(promise.id()), vec![RejectionOperation::Reject]);
    assert_eq!(tracker.unhandled(), vec![promise.id()]);

    promise.catch(Value::unary(Ok)).unwrap();
    promise.catch(Value::unary(Ok)).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(
        tracker.events_for(promise.id()),
        vec![RejectionOperation::Reject, RejectionOperation::Handle]
    );
    assert!(tracker.unhandled().is_empty());
}

#[test]
fn handled_before_rejection_is_not_reported() {
    let (el, tracker, ctor) = setup_tracked();
    let capability = ctor.new_capability().unwrap();
    let derived = capability.promise().catch(Value::unary(Ok)).unwrap();
    capability.reject(Value::from("x")).unwrap();
    el.run_until_done().unwrap();

    assert!(tracker.events_for(capability.promise().id()).is_empty());
    assert_eq!(derived.state(), promise_runtime::PromiseState::Fulfilled);
    assert!(tracker.events().is_empty());
}

#[test]
fn derived_rejection_is_reported_on_the_derived_promise() {
    let (el, tracker, ctor) = setup_tracked();
    let derived = ctor
        .resolve(Value::Smi(1))
        .unwrap()
        .then(Value::unary(|_| Err(Value::from("boom"))), Value::Undefined)
        .unwrap();
    el.run_until_done().unwrap();
    assert_eq!(tracker.unhandled(), vec![derived.id()]);
}

#[test]
fn fulfilled_promises_are_never_reported() {
    let (el, tracker, ctor) = setup_tracked();
    ctor.resolve(Value::Smi(1))
        .unwrap()
        .then(Value::unary(Ok), Value::Undefined)
        .unwrap();
    el.run_until_done().unwrap();
    assert!(tracker.events().is_empty());
}

/// Attaches another handler from inside every `"handle"` notification.
#[derive(Default)]
struct ReattachingTracker {
    events: RefCell<Vec<RejectionOperation>>,
}

impl RejectionTracker for ReattachingTracker {
    fn track(&self, promise: &Promise, operation: RejectionOperation) {
        let seen = {
            let mut events = self.events.borrow_mut();
            events.push(operation);
            events.len()
        };
        if operation == RejectionOperation::Handle && seen < 5 {
            promise.catch(Value::unary(Ok)).unwrap();
        }
    }
}

#[test]
fn handle_fires_once_when_tracker_attaches_handlers() {
    let el = Rc::new(EventLoop::new());
    let tracker = Rc::new(ReattachingTracker::default());
    let ctor = Constructor::intrinsic(Host::new(el.clone()).with_tracker(tracker.clone()));

    let promise = ctor.reject(Value::Smi(1)).unwrap();
    promise.catch(Value::unary(Ok)).unwrap();
    el.run_until_done().unwrap();

    assert_eq!(
        *tracker.events.borrow(),
        vec![RejectionOperation::Reject, RejectionOperation::Handle]
    );
}

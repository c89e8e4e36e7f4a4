//! Unit tests for race, any, all and allSettled

use std::cell::Cell;
use std::rc::Rc;

use core_types::{ErrorKind, PlainObject, Value, ITERATOR_KEY};
use promise_runtime::{
    Capability, Constructor, Host, JsIterator, PromiseConstructor, PromiseError, PromiseState,
};

use super::{setup, values};

fn status_entry(status: &str, value: Value) -> (Value, Value) {
    (Value::from(status), value)
}

fn entries(result: Value) -> Vec<(Value, Value)> {
    result
        .as_array()
        .unwrap()
        .into_iter()
        .map(|entry| (entry.get("status").unwrap(), entry.get("value").unwrap()))
        .collect()
}

#[test]
fn any_fulfills_with_first_fulfilled() {
    let (el, ctor) = setup();
    let a = ctor.resolve(Value::Smi(42)).unwrap();
    let b = ctor.resolve(Value::Smi(43)).unwrap();
    let result = ctor.any(values(&[&a, &b])).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.result(), Some(Value::Smi(42)));
}

#[test]
fn any_skips_rejections() {
    let (el, ctor) = setup();
    let a = ctor.reject(Value::Smi(1)).unwrap();
    let b = ctor.resolve(Value::Smi(2)).unwrap();
    let result = ctor.any(values(&[&a, &b])).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Fulfilled);
    assert_eq!(result.result(), Some(Value::Smi(2)));
}

#[test]
fn any_aggregates_reasons_in_input_order() {
    let (el, ctor) = setup();
    let later = ctor.new_capability().unwrap();
    let b = ctor.reject(Value::Smi(2)).unwrap();
    let c = ctor.reject(Value::Smi(3)).unwrap();
    let result = ctor.any(values(&[later.promise(), &b, &c])).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Pending);

    later.reject(Value::Smi(1)).unwrap();
    el.run_until_done().unwrap();
    let reason = result.result().unwrap();
    let error = reason.as_error().unwrap();
    assert_eq!(error.kind, ErrorKind::AggregateError);
    assert_eq!(error.errors, vec![Value::Smi(1), Value::Smi(2), Value::Smi(3)]);
}

#[test]
fn any_of_empty_input_rejects_immediately() {
    let (_el, ctor) = setup();
    let result = ctor.any(Vec::<Value>::new()).unwrap();
    assert_eq!(result.state(), PromiseState::Rejected);
    let reason = result.result().unwrap();
    assert_eq!(reason.as_error().unwrap().kind, ErrorKind::AggregateError);
}

#[test]
fn all_collects_values_in_input_order() {
    let (el, ctor) = setup();
    let slow = ctor.new_capability().unwrap();
    let fast = ctor.resolve(Value::Smi(2)).unwrap();
    let result = ctor
        .all(vec![slow.promise().to_value(), fast.to_value(), Value::Smi(3)])
        .unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Pending);

    slow.resolve(Value::Smi(1)).unwrap();
    el.run_until_done().unwrap();
    let collected = result.result().unwrap().as_array().unwrap();
    assert_eq!(collected, vec![Value::Smi(1), Value::Smi(2), Value::Smi(3)]);
}

#[test]
fn all_rejects_with_first_rejection() {
    let (el, ctor) = setup();
    let a = ctor.resolve(Value::Smi(1)).unwrap();
    let b = ctor.reject(Value::Smi(2)).unwrap();
    let c = ctor.resolve(Value::Smi(3)).unwrap();
    let result = ctor.all(values(&[&a, &b, &c])).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Rejected);
    assert_eq!(result.result(), Some(Value::Smi(2)));
}

#[test]
fn all_of_empty_input_fulfills_with_empty_array() {
    let (_el, ctor) = setup();
    let result = ctor.all(Vec::<Value>::new()).unwrap();
    assert_eq!(result.state(), PromiseState::Fulfilled);
    assert_eq!(result.result().unwrap().as_array(), Some(vec![]));
}

#[test]
fn all_settled_reports_every_rejection() {
    let (el, ctor) = setup();
    let a = ctor.reject(Value::Smi(42)).unwrap();
    let b = ctor.reject(Value::Smi(43)).unwrap();
    let c = ctor.reject(Value::Smi(44)).unwrap();
    let result = ctor.all_settled(values(&[&a, &b, &c])).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Fulfilled);
    assert_eq!(
        entries(result.result().unwrap()),
        vec![
            status_entry("rejected", Value::Smi(42)),
            status_entry("rejected", Value::Smi(43)),
            status_entry("rejected", Value::Smi(44)),
        ]
    );
}

#[test]
fn all_settled_mixes_outcomes() {
    let (el, ctor) = setup();
    let a = ctor.resolve(Value::from("ok")).unwrap();
    let b = ctor.reject(Value::from("bad")).unwrap();
    let result = ctor.all_settled(values(&[&a, &b])).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(
        entries(result.result().unwrap()),
        vec![
            status_entry("fulfilled", Value::from("ok")),
            status_entry("rejected", Value::from("bad")),
        ]
    );
}

#[test]
fn all_settled_of_empty_input_fulfills() {
    let (_el, ctor) = setup();
    let result = ctor.all_settled(Vec::<Value>::new()).unwrap();
    assert_eq!(result.result().unwrap().as_array(), Some(vec![]));
}

#[test]
fn race_settles_like_first_settled() {
    let (el, ctor) = setup();
    let never = ctor.new_capability().unwrap();
    let rejected = ctor.reject(Value::from("first")).unwrap();
    let fulfilled = ctor.resolve(Value::from("second")).unwrap();
    let result = ctor
        .race(values(&[never.promise(), &rejected, &fulfilled]))
        .unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Rejected);
    assert_eq!(result.result(), Some(Value::from("first")));
}

#[test]
fn race_of_empty_input_never_settles() {
    let (el, ctor) = setup();
    let result = ctor.race(Vec::<Value>::new()).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Pending);
}

#[test]
fn combinators_accept_array_values() {
    let (el, ctor) = setup();
    let array = Value::array(vec![Value::Smi(1), Value::Smi(2)]);
    let result = ctor.all(array).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(
        result.result().unwrap().as_array(),
        Some(vec![Value::Smi(1), Value::Smi(2)])
    );
}

#[test]
fn non_iterable_input_rejects_result() {
    let (_el, ctor) = setup();
    let result = ctor.all(Value::Smi(5)).unwrap();
    assert_eq!(result.state(), PromiseState::Rejected);
    let reason = result.result().unwrap();
    assert_eq!(reason.as_error().unwrap().kind, ErrorKind::TypeError);
}

#[test]
fn throwing_iteration_hook_rejects_result() {
    let (_el, ctor) = setup();
    let iterable = PlainObject::new();
    iterable.set(
        ITERATOR_KEY,
        Value::function(|_this, _args| Err(Value::from("no iterator"))),
    );
    let result = ctor.race(Value::object(iterable)).unwrap();
    assert_eq!(result.result(), Some(Value::from("no iterator")));
}

struct FailingIterator {
    yielded: usize,
    fail_after: usize,
    closed: Rc<Cell<usize>>,
}

impl JsIterator for FailingIterator {
    fn next(&mut self) -> Result<Value, Value> {
        if self.yielded == self.fail_after {
            return Err(Value::from("next threw"));
        }
        self.yielded += 1;
        Ok(Value::record([
            ("value", Value::Smi(self.yielded as i32)),
            ("done", Value::Boolean(false)),
        ]))
    }

    fn close(&mut self) -> Option<Result<Value, Value>> {
        self.closed.set(self.closed.get() + 1);
        Some(Ok(Value::record([("done", Value::Boolean(true))])))
    }
}

#[test]
fn throwing_next_rejects_without_closing() {
    let (el, ctor) = setup();
    let closed = Rc::new(Cell::new(0));
    let iterator: Box<dyn JsIterator> = Box::new(FailingIterator {
        yielded: 0,
        fail_after: 2,
        closed: closed.clone(),
    });
    let result = ctor.all(iterator).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Rejected);
    assert_eq!(result.result(), Some(Value::from("next threw")));
    assert_eq!(closed.get(), 0);
}

fn rejecting_resolve(_constructor: &Constructor, _value: Value) -> Result<Value, Value> {
    Err(Value::from("resolve threw"))
}

fn doubling_resolve(constructor: &Constructor, value: Value) -> Result<Value, Value> {
    let value = match value {
        Value::Smi(n) => Value::Smi(n * 2),
        other => other,
    };
    Ok(constructor.resolve(value)?.into())
}

struct CustomResolve {
    host: Host,
    resolver: fn(&Constructor, Value) -> Result<Value, Value>,
}

impl PromiseConstructor for CustomResolve {
    fn name(&self) -> &str {
        "CustomResolve"
    }

    fn host(&self) -> &Host {
        &self.host
    }

    fn resolver(&self) -> Option<promise_runtime::Resolver> {
        Some(self.resolver)
    }
}

#[test]
fn throwing_resolver_closes_iterator() {
    let (el, ctor) = setup();
    let custom = Constructor::new(CustomResolve {
        host: ctor.host().clone(),
        resolver: rejecting_resolve,
    });
    let closed = Rc::new(Cell::new(0));
    let iterator: Box<dyn JsIterator> = Box::new(FailingIterator {
        yielded: 0,
        fail_after: 10,
        closed: closed.clone(),
    });
    let result = custom.all_settled(iterator).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.result(), Some(Value::from("resolve threw")));
    assert_eq!(closed.get(), 1);
}

#[test]
fn combinators_use_the_constructor_resolver() {
    let (el, ctor) = setup();
    let custom = Constructor::new(CustomResolve {
        host: ctor.host().clone(),
        resolver: doubling_resolve,
    });
    let result = custom.all(vec![Value::Smi(1), Value::Smi(2)]).unwrap();
    el.run_until_done().unwrap();
    assert!(result.constructor().ptr_eq(&custom));
    assert_eq!(
        result.result().unwrap().as_array(),
        Some(vec![Value::Smi(2), Value::Smi(4)])
    );
}

struct NoResolve {
    host: Host,
}

impl PromiseConstructor for NoResolve {
    fn host(&self) -> &Host {
        &self.host
    }

    fn resolver(&self) -> Option<promise_runtime::Resolver> {
        None
    }
}

#[test]
fn missing_resolver_is_a_usage_error() {
    let (_el, ctor) = setup();
    let custom = Constructor::new(NoResolve {
        host: ctor.host().clone(),
    });
    assert_eq!(
        custom.all(Vec::<Value>::new()).unwrap_err(),
        PromiseError::ResolverNotCallable
    );
}

struct Broken {
    host: Host,
}

impl PromiseConstructor for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    fn host(&self) -> &Host {
        &self.host
    }

    fn new_capability(&self, _this: &Constructor) -> Result<Capability, PromiseError> {
        Err(PromiseError::NotAConstructor(self.name().to_string()))
    }
}

#[test]
fn invalid_constructor_fails_immediately() {
    let (_el, ctor) = setup();
    let broken = Constructor::new(Broken {
        host: ctor.host().clone(),
    });
    for result in [
        broken.race(Vec::<Value>::new()),
        broken.any(Vec::<Value>::new()),
        broken.all(Vec::<Value>::new()),
        broken.all_settled(Vec::<Value>::new()),
    ] {
        assert_eq!(
            result.unwrap_err(),
            PromiseError::NotAConstructor("Broken".to_string())
        );
    }
}

#[test]
fn late_settlements_are_ignored() {
    let (el, ctor) = setup();
    let first = ctor.new_capability().unwrap();
    let second = ctor.new_capability().unwrap();
    let result = ctor.race(values(&[first.promise(), second.promise()])).unwrap();

    first.resolve(Value::from("winner")).unwrap();
    second.reject(Value::from("loser")).unwrap();
    el.run_until_done().unwrap();
    assert_eq!(result.state(), PromiseState::Fulfilled);
    assert_eq!(result.result(), Some(Value::from("winner")));
}

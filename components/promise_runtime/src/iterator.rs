//! Iterator protocol adapter.
//!
//! Combinators consume their input through an [`IteratorRecord`]: `step`
//! yields the next element or `None` once exhausted, and `close` runs the
//! iterator's `return` when consumption stops early. Native sequences and
//! script-style iterator objects both plug in through [`JsIterator`].

use std::cell::RefCell;
use std::rc::Rc;

use core_types::{Value, ITERATOR_KEY};

use crate::completion::Completion;
use crate::PromiseError;

/// A source of iterator results.
pub trait JsIterator {
    /// Calls `next()`, returning the raw iterator result object.
    fn next(&mut self) -> Result<Value, Value>;

    /// Calls `return()`. `None` when the iterator has no `return` method.
    fn close(&mut self) -> Option<Result<Value, Value>> {
        None
    }
}

fn iter_result(value: Value, done: bool) -> Value {
    Value::record([("value", value), ("done", Value::Boolean(done))])
}

/// Iterates a native list of values.
#[derive(Debug)]
pub struct ListIterator {
    items: std::vec::IntoIter<Value>,
}

impl ListIterator {
    /// Iterates `items` in order.
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl JsIterator for ListIterator {
    fn next(&mut self) -> Result<Value, Value> {
        Ok(match self.items.next() {
            Some(value) => iter_result(value, false),
            None => iter_result(Value::Undefined, true),
        })
    }
}

/// Iterates a shared array by index, like a JS array iterator: elements
/// appended while iterating are visited.
#[derive(Debug)]
pub struct ArrayIterator {
    items: Rc<RefCell<Vec<Value>>>,
    index: usize,
}

impl ArrayIterator {
    /// Iterates `items` from the start.
    pub fn new(items: Rc<RefCell<Vec<Value>>>) -> Self {
        Self { items, index: 0 }
    }
}

impl JsIterator for ArrayIterator {
    fn next(&mut self) -> Result<Value, Value> {
        let item = self.items.borrow().get(self.index).cloned();
        Ok(match item {
            Some(value) => {
                self.index += 1;
                iter_result(value, false)
            }
            None => iter_result(Value::Undefined, true),
        })
    }
}

/// Drives a script-style iterator object through its `next` and `return`
/// members. `next` is looked up once, when the adapter is built.
#[derive(Debug)]
pub struct ObjectIterator {
    iterator: Value,
    next_method: Value,
}

impl ObjectIterator {
    /// Wraps an iterator object, reading its `next` method.
    pub fn new(iterator: Value) -> Result<Self, Value> {
        if !iterator.is_object() {
            return Err(PromiseError::IteratorNotObject.into());
        }
        let next_method = iterator.get("next")?;
        Ok(Self {
            iterator,
            next_method,
        })
    }
}

impl JsIterator for ObjectIterator {
    fn next(&mut self) -> Result<Value, Value> {
        self.next_method.call(self.iterator.clone(), Vec::new())
    }

    fn close(&mut self) -> Option<Result<Value, Value>> {
        match self.iterator.get("return") {
            Err(thrown) => Some(Err(thrown)),
            Ok(Value::Undefined) | Ok(Value::Null) => None,
            Ok(method) => Some(method.call(self.iterator.clone(), Vec::new())),
        }
    }
}

/// Anything a combinator can consume.
pub enum Iterable {
    /// A native list
    Values(Vec<Value>),
    /// A script value: an array (iterated live), or an object with an
    /// `@@iterator` method
    Value(Value),
    /// A ready-made iterator
    Iterator(Box<dyn JsIterator>),
}

impl Iterable {
    /// Obtains the iterator. Throws if the value is not iterable or its
    /// iteration hook throws.
    pub fn into_record(self) -> Result<IteratorRecord, Value> {
        let iterator: Box<dyn JsIterator> = match self {
            Iterable::Values(items) => Box::new(ListIterator::new(items)),
            Iterable::Iterator(iterator) => iterator,
            Iterable::Value(Value::Array(items)) => Box::new(ArrayIterator::new(items)),
            Iterable::Value(value @ Value::Object(_)) => {
                let method = value.get(ITERATOR_KEY)?;
                if !method.is_callable() {
                    return Err(PromiseError::NotIterable("object".to_string()).into());
                }
                let iterator = method.call(value, Vec::new())?;
                Box::new(ObjectIterator::new(iterator)?)
            }
            Iterable::Value(other) => {
                return Err(PromiseError::NotIterable(other.type_of().to_string()).into())
            }
        };
        Ok(IteratorRecord::new(iterator))
    }
}

impl From<Vec<Value>> for Iterable {
    fn from(items: Vec<Value>) -> Self {
        Iterable::Values(items)
    }
}

impl From<Value> for Iterable {
    fn from(value: Value) -> Self {
        Iterable::Value(value)
    }
}

impl From<Box<dyn JsIterator>> for Iterable {
    fn from(iterator: Box<dyn JsIterator>) -> Self {
        Iterable::Iterator(iterator)
    }
}

/// An iterator together with its exhaustion flag.
pub struct IteratorRecord {
    iterator: Box<dyn JsIterator>,
    done: bool,
}

impl IteratorRecord {
    /// Wraps an iterator that has not been stepped yet.
    pub fn new(iterator: Box<dyn JsIterator>) -> Self {
        Self {
            iterator,
            done: false,
        }
    }

    /// True once the iterator is exhausted or has thrown.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advances the iterator: `Some(value)` for the next element, `None` once
    /// exhausted. Any throw marks the record done.
    pub fn step(&mut self) -> Result<Option<Value>, Value> {
        let step = self.next_value();
        if !matches!(step, Ok(Some(_))) {
            self.done = true;
        }
        step
    }

    fn next_value(&mut self) -> Result<Option<Value>, Value> {
        let result = self.iterator.next()?;
        if !result.is_object() {
            return Err(PromiseError::IteratorResultNotObject(result.to_string()).into());
        }
        if result.get("done")?.is_truthy() {
            return Ok(None);
        }
        result.get("value").map(Some)
    }

    /// Stops consumption early, calling the iterator's `return`.
    ///
    /// A throw `completion` always wins over an error raised while closing;
    /// otherwise a failing or malformed `return` turns the outcome into a
    /// throw.
    pub fn close(&mut self, completion: Completion) -> Completion {
        self.done = true;
        let Some(inner) = self.iterator.close() else {
            return completion;
        };
        if completion.is_throw() {
            return completion;
        }
        match inner {
            Err(thrown) => Completion::Throw(thrown),
            Ok(result) if !result.is_object() => {
                Completion::Throw(PromiseError::ReturnResultNotObject.into())
            }
            Ok(_) => completion,
        }
    }
}

//! Object model.
//!
//! Objects are shared, identity-compared values whose property reads may
//! throw. [`PlainObject`] covers script-style objects; native types such as
//! promises implement [`JsObject`] directly.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{Function, Value};

/// Property key of the iteration hook (`obj[Symbol.iterator]`).
pub const ITERATOR_KEY: &str = "@@iterator";

/// A JavaScript object.
pub trait JsObject: Any {
    /// Reads a property. `Err` means the read threw (e.g., a throwing getter).
    fn get(&self, key: &str) -> Result<Value, Value>;

    /// Name used in debug output.
    fn class_name(&self) -> &'static str {
        "Object"
    }

    /// Upcast for downcasting by reference.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting shared handles.
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

/// A property slot of a [`PlainObject`].
#[derive(Debug, Clone)]
pub enum Property {
    /// A plain data property
    Data(Value),
    /// An accessor property; the getter runs on every read
    Accessor(Rc<Function>),
}

/// An ordinary object with insertion-ordered properties.
///
/// # Examples
///
/// ```
/// use core_types::{PlainObject, Value};
///
/// let obj = PlainObject::new();
/// obj.set("status", Value::from("fulfilled"));
/// let value = Value::object(obj);
/// assert_eq!(value.get("status"), Ok(Value::from("fulfilled")));
/// assert_eq!(value.get("missing"), Ok(Value::Undefined));
/// ```
#[derive(Default)]
pub struct PlainObject {
    properties: RefCell<Vec<(String, Property)>>,
}

impl PlainObject {
    /// Creates an object with no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an object from data properties.
    pub fn from_entries<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let obj = Self::new();
        for (key, value) in entries {
            obj.set(key, value);
        }
        obj
    }

    /// Sets a data property, replacing any existing property with that key.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.define(key.into(), Property::Data(value));
    }

    /// Defines an accessor property whose getter is called on every read.
    pub fn define_getter<F>(&self, key: impl Into<String>, getter: F)
    where
        F: Fn() -> Result<Value, Value> + 'static,
    {
        let key = key.into();
        let getter = Function::new(format!("get {key}"), move |_this, _args| getter());
        self.define(key, Property::Accessor(Rc::new(getter)));
    }

    /// Returns the property keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.properties
            .borrow()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn define(&self, key: String, property: Property) {
        let mut properties = self.properties.borrow_mut();
        match properties.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = property,
            None => properties.push((key, property)),
        }
    }
}

impl JsObject for PlainObject {
    fn get(&self, key: &str) -> Result<Value, Value> {
        let property = self
            .properties
            .borrow()
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, property)| property.clone());
        // The borrow is released before a getter runs so it may touch this object.
        match property {
            Some(Property::Data(value)) => Ok(value),
            Some(Property::Accessor(getter)) => getter.call(Value::Undefined, Vec::new()),
            None => Ok(Value::Undefined),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

impl fmt::Debug for PlainObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, property) in self.properties.borrow().iter() {
            match property {
                Property::Data(value) => map.entry(key, value),
                Property::Accessor(_) => map.entry(key, &"<getter>"),
            };
        }
        map.finish()
    }
}

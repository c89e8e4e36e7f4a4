//! JavaScript value representation.
//!
//! This module provides the core `Value` enum. Primitives are stored inline;
//! arrays, objects, functions and errors are shared handles compared by
//! identity, like JavaScript references.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{Function, JsError, JsObject, PlainObject};

/// Represents any JavaScript value.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let undefined = Value::Undefined;
/// let number = Value::Smi(42);
/// let float = Value::Double(3.14);
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// assert!(!float.is_object());
/// assert_eq!(number.type_of(), "number");
/// ```
#[derive(Clone)]
pub enum Value {
    /// JavaScript undefined value
    Undefined,
    /// JavaScript null value
    Null,
    /// JavaScript boolean (true or false)
    Boolean(bool),
    /// Small integer
    Smi(i32),
    /// IEEE 754 double-precision floating point
    Double(f64),
    /// JavaScript string value
    String(String),
    /// Array of values
    Array(Rc<RefCell<Vec<Value>>>),
    /// Object with (possibly throwing) property reads
    Object(Rc<dyn JsObject>),
    /// Callable function
    Function(Rc<Function>),
    /// Error object
    Error(Rc<JsError>),
}

/// Returns argument `index`, or `undefined` when the caller passed fewer.
pub fn argument(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(&items.borrow()).finish(),
            Value::Object(obj) => write!(f, "Object({})", obj.class_name()),
            Value::Function(func) => f.debug_tuple("Function").field(&func.name()).finish(),
            Value::Error(error) => f.debug_tuple("Error").field(error).finish(),
        }
    }
}

fn same_allocation<T: ?Sized, U: ?Sized>(a: &Rc<T>, b: &Rc<U>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Smi(a), Value::Double(b)) | (Value::Double(b), Value::Smi(a)) => {
                f64::from(*a) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => same_allocation(a, b),
            (Value::Object(a), Value::Object(b)) => same_allocation(a, b),
            (Value::Function(a), Value::Function(b)) => same_allocation(a, b),
            (Value::Error(a), Value::Error(b)) => same_allocation(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Creates a function value from a closure.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Value, Vec<Value>) -> Result<Value, Value> + 'static,
    {
        Value::Function(Rc::new(Function::new("", f)))
    }

    /// Creates a function value that only looks at its first argument.
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, Value> + 'static,
    {
        Value::function(move |_this, args| f(argument(&args, 0)))
    }

    /// Wraps a native object.
    pub fn object<O: JsObject>(obj: O) -> Self {
        Value::Object(Rc::new(obj))
    }

    /// Creates a plain object from data properties.
    pub fn record<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::object(PlainObject::from_entries(entries))
    }

    /// Creates an array from a list of values.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Returns whether this value is truthy in JavaScript semantics.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// assert!(!Value::Undefined.is_truthy());
    /// assert!(!Value::Null.is_truthy());
    /// assert!(!Value::Smi(0).is_truthy());
    /// assert!(!Value::Double(f64::NAN).is_truthy());
    /// assert!(!Value::from("").is_truthy());
    ///
    /// assert!(Value::Boolean(true).is_truthy());
    /// assert!(Value::array(vec![]).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Smi(n) => *n != 0,
            Value::Double(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Error(_) => true,
        }
    }

    /// Returns the JavaScript typeof result for this value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object", // JavaScript quirk
            Value::Boolean(_) => "boolean",
            Value::Smi(_) | Value::Double(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Array(_) | Value::Object(_) | Value::Error(_) => "object",
        }
    }

    /// True for objects and functions; primitives are never thenables.
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Error(_)
        )
    }

    /// True if the value can be called.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Reads a property. Only objects have properties in this model; the read
    /// may throw.
    pub fn get(&self, key: &str) -> Result<Value, Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            _ => Ok(Value::Undefined),
        }
    }

    /// Calls this value with the given receiver and arguments.
    ///
    /// Throws a TypeError value when the value is not callable.
    pub fn call(&self, this: Value, args: Vec<Value>) -> Result<Value, Value> {
        match self {
            Value::Function(func) => func.call(this, args),
            other => Err(JsError::type_error(format!("{} is not a function", other.type_of())).into()),
        }
    }

    /// Calls this value with an undefined receiver and one argument.
    pub fn call1(&self, arg: Value) -> Result<Value, Value> {
        self.call(Value::Undefined, vec![arg])
    }

    /// Returns the error payload if this is an error value.
    pub fn as_error(&self) -> Option<&JsError> {
        match self {
            Value::Error(error) => Some(&**error),
            _ => None,
        }
    }

    /// Returns a snapshot of the elements if this is an array.
    pub fn as_array(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.borrow().clone()),
            _ => None,
        }
    }

    /// Returns the native object if this is an object.
    pub fn as_object(&self) -> Option<&Rc<dyn JsObject>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<JsError> for Value {
    fn from(error: JsError) -> Self {
        Value::Error(Rc::new(error))
    }
}

/// JavaScript `String()` conversion, simplified for composite values.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // Integer-valued doubles display without decimal point
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                let items = items.borrow();
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(","))
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
            Value::Error(error) => write!(f, "{}", error),
        }
    }
}

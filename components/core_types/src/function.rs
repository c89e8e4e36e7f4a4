//! Native callable functions.
//!
//! A [`Function`] is the only callable value in this model. Calling it either
//! returns a value or throws one: `Err(value)` is a JavaScript `throw`.

use std::fmt;

use crate::Value;

/// Signature of a native function body: `(this, arguments) -> completion`.
pub type NativeFn = dyn Fn(Value, Vec<Value>) -> Result<Value, Value>;

/// A callable JavaScript function backed by a Rust closure.
///
/// # Examples
///
/// ```
/// use core_types::{Function, Value};
///
/// let double = Function::new("double", |_this, args| match args.first() {
///     Some(Value::Smi(n)) => Ok(Value::Smi(n * 2)),
///     _ => Ok(Value::Undefined),
/// });
/// assert_eq!(double.call(Value::Undefined, vec![Value::Smi(21)]), Ok(Value::Smi(42)));
/// ```
pub struct Function {
    name: String,
    callback: Box<NativeFn>,
}

impl Function {
    /// Creates a new Function from a closure.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, Vec<Value>) -> Result<Value, Value> + 'static,
    {
        Self {
            name: name.into(),
            callback: Box::new(f),
        }
    }

    /// The function's name, empty for anonymous functions.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the function with the given receiver and arguments.
    pub fn call(&self, this: Value, args: Vec<Value>) -> Result<Value, Value> {
        (self.callback)(this, args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function {{ name: {:?}, .. }}", self.name)
    }
}

//! Core JavaScript value types and error handling.
//!
//! This crate provides the value model shared by the promise runtime and its
//! hosts: primitive values, shared objects with (possibly throwing) property
//! reads, native callable functions, arrays, and error values.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of JavaScript values
//! - [`Function`] - Native callable that may throw a [`Value`]
//! - [`JsObject`] / [`PlainObject`] - Objects with data and accessor properties
//! - [`JsError`] - JavaScript error values, including aggregate errors
//! - [`ErrorKind`] - Types of JavaScript errors
//!
//! # Examples
//!
//! ```
//! use core_types::{JsError, Value};
//!
//! // Create JavaScript values
//! let num = Value::Smi(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! // Calling a non-callable value throws a TypeError value
//! let thrown = num.call(Value::Undefined, vec![]).unwrap_err();
//! assert!(thrown.as_error().is_some());
//!
//! // Errors convert into throwable values
//! let error: Value = JsError::type_error("undefined is not a function").into();
//! assert_eq!(error.type_of(), "object");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod function;
mod object;
mod value;

pub use error::{ErrorKind, JsError};
pub use function::{Function, NativeFn};
pub use object::{JsObject, PlainObject, Property, ITERATOR_KEY};
pub use value::{argument, Value};

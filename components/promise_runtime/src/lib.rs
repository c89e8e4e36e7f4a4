//! Promise engine for JavaScript execution.
//!
//! This crate implements ECMAScript promises on top of [`core_types`]:
//! - Settlement records with at-most-once fulfill/reject
//! - Resolving functions and thenable adoption
//! - `then`, `catch` and `finally` reactions, run as deferred jobs
//! - The `race`, `any`, `all` and `allSettled` combinators
//!
//! # Overview
//!
//! Nothing here is global. A [`Host`] carries the [`JobQueue`] that defers
//! reaction jobs and the [`RejectionTracker`] told about unhandled
//! rejections. [`EventLoop`] is a manually pumped job queue for hosts and
//! tests. A [`Constructor`] owns a host and creates promises.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use promise_runtime::{Constructor, EventLoop, Host, PromiseState};
//! use core_types::Value;
//!
//! let event_loop = Rc::new(EventLoop::new());
//! let promise_ctor = Constructor::intrinsic(Host::new(event_loop.clone()));
//!
//! let doubled = promise_ctor
//!     .resolve(Value::Smi(21))
//!     .unwrap()
//!     .then(Value::unary(|v| match v {
//!         Value::Smi(n) => Ok(Value::Smi(n * 2)),
//!         other => Ok(other),
//!     }), Value::Undefined)
//!     .unwrap();
//!
//! // Handlers never run synchronously.
//! assert_eq!(doubled.state(), PromiseState::Pending);
//! event_loop.run_until_done().unwrap();
//! assert_eq!(doubled.result(), Some(Value::Smi(42)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod capability;
mod combinators;
pub mod completion;
pub mod config;
pub mod constructor;
pub mod error;
pub mod event_loop;
pub mod host;
pub mod iterator;
pub mod job;
mod promise;
mod reaction;
pub mod record;
mod resolving;
pub mod tracker;

// Re-export main types at crate root
pub use capability::Capability;
pub use completion::Completion;
pub use config::EventLoopConfig;
pub use constructor::{Constructor, IntrinsicPromise, PromiseConstructor, Resolver};
pub use error::PromiseError;
pub use event_loop::EventLoop;
pub use host::{Host, PromiseId};
pub use iterator::{ArrayIterator, Iterable, IteratorRecord, JsIterator, ListIterator, ObjectIterator};
pub use job::{Job, JobFifo, JobKind, JobQueue};
pub use reaction::ReactionKind;
pub use record::{Promise, PromiseState};
pub use tracker::{NoopTracker, RecordingTracker, RejectionEvent, RejectionOperation, RejectionTracker};

//! Unhandled-rejection tracking.
//!
//! The runtime reports two events: a promise was rejected while nothing was
//! listening (`"reject"`), and a handler was later attached to such a promise
//! (`"handle"`). Reports are purely observational.

use std::cell::RefCell;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Promise, PromiseId};

/// The tracker operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionOperation {
    /// Rejected with no reaction attached
    Reject,
    /// First reaction attached after an unhandled rejection
    Handle,
}

impl fmt::Display for RejectionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RejectionOperation::Reject => "reject",
            RejectionOperation::Handle => "handle",
        })
    }
}

/// Host hook receiving rejection-tracking events.
pub trait RejectionTracker {
    /// Called synchronously at the moment of the transition or attachment.
    fn track(&self, promise: &Promise, operation: RejectionOperation);
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracker;

impl RejectionTracker for NoopTracker {
    fn track(&self, _promise: &Promise, _operation: RejectionOperation) {}
}

/// One recorded tracker event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionEvent {
    /// The promise concerned
    pub promise: PromiseId,
    /// What happened to it
    pub operation: RejectionOperation,
}

/// Keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingTracker {
    events: RefCell<Vec<RejectionEvent>>,
}

impl RecordingTracker {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far, oldest first.
    pub fn events(&self) -> Vec<RejectionEvent> {
        self.events.borrow().clone()
    }

    /// Events concerning one promise.
    pub fn events_for(&self, promise: PromiseId) -> Vec<RejectionOperation> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.promise == promise)
            .map(|event| event.operation)
            .collect()
    }

    /// Promises whose latest event is a `"reject"`, i.e. currently unhandled.
    pub fn unhandled(&self) -> Vec<PromiseId> {
        let mut pending: Vec<PromiseId> = Vec::new();
        for event in self.events.borrow().iter() {
            match event.operation {
                RejectionOperation::Reject => pending.push(event.promise),
                RejectionOperation::Handle => pending.retain(|id| *id != event.promise),
            }
        }
        pending
    }
}

impl RejectionTracker for RecordingTracker {
    fn track(&self, promise: &Promise, operation: RejectionOperation) {
        self.events.borrow_mut().push(RejectionEvent {
            promise: promise.id(),
            operation,
        });
    }
}

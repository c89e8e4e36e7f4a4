//! Host collaborators.
//!
//! The runtime keeps no global state: everything it needs from its embedder
//! (a job queue, a rejection tracker, an id source) travels in a [`Host`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::job::{Job, JobQueue};
use crate::tracker::{NoopTracker, RejectionOperation, RejectionTracker};
use crate::Promise;

/// Identifies a promise within one host, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PromiseId(pub u64);

impl fmt::Display for PromiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The embedder-provided hooks a promise runtime runs against.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use promise_runtime::{EventLoop, Host, RecordingTracker};
///
/// let event_loop = Rc::new(EventLoop::new());
/// let tracker = Rc::new(RecordingTracker::new());
/// let host = Host::new(event_loop).with_tracker(tracker);
/// # let _ = host;
/// ```
#[derive(Clone)]
pub struct Host {
    jobs: Rc<dyn JobQueue>,
    tracker: Rc<dyn RejectionTracker>,
    next_id: Rc<Cell<u64>>,
}

impl Host {
    /// Creates a host around a job queue, with a no-op rejection tracker.
    pub fn new(jobs: Rc<dyn JobQueue>) -> Self {
        Self {
            jobs,
            tracker: Rc::new(NoopTracker),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    /// Replaces the rejection tracker.
    pub fn with_tracker(mut self, tracker: Rc<dyn RejectionTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Submits a job to the host scheduler.
    pub fn enqueue_job(&self, job: Job) {
        trace!(kind = %job.kind(), "job submitted");
        self.jobs.enqueue(job);
    }

    /// Notifies the rejection tracker.
    pub fn track_rejection(&self, promise: &Promise, operation: RejectionOperation) {
        debug!(promise = %promise.id(), %operation, "rejection tracker notified");
        self.tracker.track(promise, operation);
    }

    pub(crate) fn allocate_id(&self) -> PromiseId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        PromiseId(id)
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("promises_created", &self.next_id.get())
            .finish_non_exhaustive()
    }
}

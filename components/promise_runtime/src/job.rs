//! Jobs and job queues.
//!
//! A [`Job`] is an opaque deferred action. Promise jobs are handed to the host
//! through [`JobQueue::enqueue`], the runtime's only contact with the
//! scheduler. The host must run them in FIFO order, one at a time, and never
//! inside the call that enqueued them.

use std::collections::VecDeque;
use std::fmt;

use core_types::Value;

/// What produced a job. Used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Runs one reaction handler against a settled value
    Reaction,
    /// Calls a thenable's `then` with fresh resolving functions
    ResolveThenable,
    /// Work scheduled directly by the host (e.g. a timer callback)
    Host,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobKind::Reaction => "reaction",
            JobKind::ResolveThenable => "resolve-thenable",
            JobKind::Host => "host",
        })
    }
}

/// A unit of deferred work.
///
/// Running a job yields `Err(value)` only when it ends with an uncaught
/// error, which the host reports.
pub struct Job {
    kind: JobKind,
    callback: Box<dyn FnOnce() -> Result<(), Value>>,
}

impl Job {
    /// Creates a new Job from a closure.
    pub fn new<F>(kind: JobKind, f: F) -> Self
    where
        F: FnOnce() -> Result<(), Value> + 'static,
    {
        Self {
            kind,
            callback: Box::new(f),
        }
    }

    /// The kind of work this job performs.
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Executes the job.
    pub fn run(self) -> Result<(), Value> {
        (self.callback)()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job {{ kind: {} }}", self.kind)
    }
}

/// The host's deferred-job scheduler.
pub trait JobQueue {
    /// Schedules `job` to run after the current synchronous execution unwinds,
    /// after every job enqueued before it.
    fn enqueue(&self, job: Job);
}

/// A FIFO queue of jobs.
#[derive(Debug, Default)]
pub struct JobFifo {
    queue: VecDeque<Job>,
}

impl JobFifo {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a job to the end of the queue.
    pub fn enqueue(&mut self, job: Job) {
        self.queue.push_back(job);
    }

    /// Puts a job back at the head of the queue.
    pub fn enqueue_front(&mut self, job: Job) {
        self.queue.push_front(job);
    }

    /// Removes and returns the next job from the queue.
    pub fn dequeue(&mut self) -> Option<Job> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of jobs in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

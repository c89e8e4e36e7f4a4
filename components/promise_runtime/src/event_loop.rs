//! Event loop implementation.
//!
//! A deterministic, manually pumped host for the promise runtime. Promise jobs
//! land in the microtask queue; host tasks (macrotasks) let callers delay work
//! to a later turn, the way a timer would.

use std::cell::RefCell;

use core_types::Value;
use tracing::{error, trace, warn};

use crate::job::{Job, JobFifo, JobKind, JobQueue};
use crate::{EventLoopConfig, PromiseError};

/// The event loop.
///
/// Each turn:
/// 1. Takes the oldest task from the task queue and executes it
/// 2. Drains the microtask queue, including jobs enqueued while draining
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use promise_runtime::{Constructor, EventLoop, Host, PromiseState};
/// use core_types::Value;
///
/// let event_loop = Rc::new(EventLoop::new());
/// let promise_ctor = Constructor::intrinsic(Host::new(event_loop.clone()));
///
/// let source = promise_ctor.resolve(Value::Smi(1)).unwrap();
/// let derived = source.then(Value::unary(|v| Ok(v)), Value::Undefined).unwrap();
/// assert_eq!(derived.state(), PromiseState::Pending);
///
/// event_loop.run_until_done().unwrap();
/// assert_eq!(derived.result(), Some(Value::Smi(1)));
/// ```
#[derive(Debug, Default)]
pub struct EventLoop {
    config: EventLoopConfig,
    task_queue: RefCell<JobFifo>,
    microtask_queue: RefCell<JobFifo>,
    uncaught: RefCell<Vec<Value>>,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues and default settings.
    pub fn new() -> Self {
        Self::with_config(EventLoopConfig::default())
    }

    /// Creates a new EventLoop with the given settings.
    pub fn with_config(config: EventLoopConfig) -> Self {
        Self {
            config,
            task_queue: RefCell::new(JobFifo::new()),
            microtask_queue: RefCell::new(JobFifo::new()),
            uncaught: RefCell::new(Vec::new()),
        }
    }

    /// The settings this loop runs with.
    pub fn config(&self) -> &EventLoopConfig {
        &self.config
    }

    /// Adds a host task to the task queue.
    ///
    /// The task runs in a later turn, after the microtasks of the current one.
    pub fn enqueue_task<F>(&self, f: F)
    where
        F: FnOnce() -> Result<(), Value> + 'static,
    {
        self.task_queue
            .borrow_mut()
            .enqueue(Job::new(JobKind::Host, f));
    }

    /// Adds a job to the microtask queue.
    pub fn enqueue_microtask(&self, job: Job) {
        trace!(kind = %job.kind(), "microtask enqueued");
        self.microtask_queue.borrow_mut().enqueue(job);
    }

    /// Returns the number of microtasks waiting to run.
    pub fn pending_microtasks(&self) -> usize {
        self.microtask_queue.borrow().len()
    }

    /// Returns the number of host tasks waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.task_queue.borrow().len()
    }

    /// Returns true when both queues are empty.
    pub fn is_idle(&self) -> bool {
        self.pending_microtasks() == 0 && self.pending_tasks() == 0
    }

    /// Errors thrown by jobs that had nowhere to propagate them, oldest first.
    pub fn uncaught_errors(&self) -> Vec<Value> {
        self.uncaught.borrow().clone()
    }

    /// Takes the collected uncaught errors, leaving the list empty.
    pub fn take_uncaught_errors(&self) -> Vec<Value> {
        self.uncaught.take()
    }

    /// Runs microtasks until the queue is empty.
    ///
    /// Returns how many jobs ran, or `JobLimitExceeded` when the configured
    /// bound is hit with work still queued.
    pub fn run_microtasks(&self) -> Result<usize, PromiseError> {
        let mut ran = 0;
        loop {
            // The queue must not stay borrowed while a job runs: jobs enqueue more jobs.
            let next = self.microtask_queue.borrow_mut().dequeue();
            let Some(job) = next else {
                return Ok(ran);
            };
            if let Some(limit) = self.config.max_jobs_per_drain {
                if ran >= limit {
                    self.microtask_queue.borrow_mut().enqueue_front(job);
                    error!(limit, "microtask drain aborted");
                    return Err(PromiseError::JobLimitExceeded { limit });
                }
            }
            self.run_job(job);
            ran += 1;
        }
    }

    /// Processes one complete cycle: one task followed by all microtasks.
    pub fn process_one_cycle(&self) -> Result<(), PromiseError> {
        let next = self.task_queue.borrow_mut().dequeue();
        if let Some(task) = next {
            self.run_job(task);
        }
        self.run_microtasks()?;
        Ok(())
    }

    /// Runs the event loop until all tasks and microtasks are processed.
    pub fn run_until_done(&self) -> Result<(), PromiseError> {
        self.run_microtasks()?;
        while self.pending_tasks() > 0 {
            self.process_one_cycle()?;
        }
        Ok(())
    }

    fn run_job(&self, job: Job) {
        let kind = job.kind();
        trace!(%kind, "running job");
        if let Err(thrown) = job.run() {
            warn!(%kind, error = %thrown, "uncaught error in job");
            if self.config.collect_uncaught {
                self.uncaught.borrow_mut().push(thrown);
            }
        }
    }
}

impl JobQueue for EventLoop {
    fn enqueue(&self, job: Job) {
        self.enqueue_microtask(job);
    }
}

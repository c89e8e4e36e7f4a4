//! Reactions and reaction jobs.
//!
//! `then` registers one reaction per outcome. When the source settles, the
//! matching reaction becomes a job that runs its handler and forwards the
//! outcome into the derived promise's capability.

use core_types::Value;
use tracing::trace;

use crate::completion::Completion;
use crate::job::{Job, JobKind};
use crate::{Capability, Promise};

/// Which settlement a reaction waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    /// Runs on fulfillment
    Fulfill,
    /// Runs on rejection
    Reject,
}

/// A registered handler awaiting one specific outcome.
#[derive(Clone)]
pub(crate) struct Reaction {
    capability: Option<Capability>,
    kind: ReactionKind,
    handler: Option<Value>,
}

impl Reaction {
    pub(crate) fn new(capability: Option<Capability>, kind: ReactionKind, handler: Option<Value>) -> Self {
        Self {
            capability,
            kind,
            handler,
        }
    }

    /// Binds the reaction to the settled value. Consumes the reaction: each
    /// one runs at most once.
    pub(crate) fn into_job(self, argument: Value) -> Job {
        Job::new(JobKind::Reaction, move || self.run(argument))
    }

    fn run(self, argument: Value) -> Result<(), Value> {
        let completion = match &self.handler {
            None => match self.kind {
                ReactionKind::Fulfill => Completion::Normal(argument),
                ReactionKind::Reject => Completion::Throw(argument),
            },
            Some(handler) => Completion::from(handler.call1(argument)),
        };
        trace!(kind = ?self.kind, throw = completion.is_throw(), "reaction handled");

        let Some(capability) = self.capability else {
            // Fire-and-forget: a throw has nowhere to go but the host.
            return match completion {
                Completion::Throw(thrown) => Err(thrown),
                Completion::Normal(_) => Ok(()),
            };
        };
        let settled = match completion {
            Completion::Normal(value) => capability.resolve(value),
            Completion::Throw(reason) => capability.reject(reason),
        };
        settled.map_err(Value::from)
    }
}

/// Registers `on_fulfilled`/`on_rejected` on `promise`, forwarding outcomes to
/// `capability` when there is one. Non-callable handlers pass values through.
pub(crate) fn perform_then(
    promise: &Promise,
    on_fulfilled: Value,
    on_rejected: Value,
    capability: Option<Capability>,
) {
    let on_fulfilled = on_fulfilled.is_callable().then_some(on_fulfilled);
    let on_rejected = on_rejected.is_callable().then_some(on_rejected);
    let fulfill_reaction = Reaction::new(capability.clone(), ReactionKind::Fulfill, on_fulfilled);
    let reject_reaction = Reaction::new(capability, ReactionKind::Reject, on_rejected);
    promise.attach(fulfill_reaction, reject_reaction);
}

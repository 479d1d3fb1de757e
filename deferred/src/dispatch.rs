//! The dispatcher contract the core engine consumes (§6 of the design).
//!
//! The engine never spawns a thread and never decides how a callback runs;
//! it only ever hands a [`Task`] to a [`Dispatch`] implementation, addressed
//! at a [`Queue`]. `deferred` ships no implementation of this trait itself
//! — see the sibling `deferred-dispatch` crate for a ready-made thread-pool
//! one, grounded the same way `maitake`'s `Scheduler` is an optional,
//! separately-versioned consumer of `maitake-sync`'s primitives.

use core::time::Duration;
use std::sync::Arc;

/// A unit of work submitted to a [`Dispatch`]. Always a one-shot `FnOnce`:
/// the engine never resubmits a task, and never needs to cancel one once
/// submitted (the combinator that raced it, e.g. `timeout`, has already
/// settled its own cell by the time the loser's task runs).
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// The closed set of standard priority levels a [`Dispatch`] must support,
/// matching the dispatcher contract's `default_queue` parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Priority {
    UserInteractive,
    UserInitiated,
    Default,
    Utility,
    Background,
    Unspecified,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Unspecified
    }
}

/// An opaque handle to a dispatch target: one of the six standard queues,
/// or an implementation-defined custom one. Cheap to copy, cheap to store
/// on a `Cell`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Queue(QueueId);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum QueueId {
    Standard(Priority),
    Custom(u32),
}

impl Queue {
    pub const fn standard(priority: Priority) -> Self {
        Self(QueueId::Standard(priority))
    }

    pub const fn custom(id: u32) -> Self {
        Self(QueueId::Custom(id))
    }

    pub fn priority_hint(&self) -> Option<Priority> {
        match self.0 {
            QueueId::Standard(p) => Some(p),
            QueueId::Custom(_) => None,
        }
    }
}

/// The external task-dispatch substrate. Out of scope for this crate's core
/// engine in the sense that the engine never constructs one — callers
/// supply an `Arc<dyn Dispatch>` when they build a `Cell` — but its
/// interface is part of the engine's contract, since every `observe`,
/// `delay`, and `timeout` call goes through it.
pub trait Dispatch: Send + Sync + 'static {
    /// Enqueue `task` for asynchronous execution on `queue`.
    fn submit(&self, queue: Queue, task: Task);

    /// Enqueue `task` to run no earlier than `delay` from now.
    fn submit_after(&self, queue: Queue, delay: Duration, task: Task);

    /// Obtain a standard queue at the given priority level. Implementations
    /// that don't distinguish priorities may return the same queue for
    /// every hint.
    fn default_queue(&self, priority: Priority) -> Queue {
        Queue::standard(priority)
    }

    /// Best-effort query of the calling thread's effective priority, for
    /// inheritance by newly-constructed cells. Dispatchers that can't
    /// determine this (the calling thread wasn't spawned by them) should
    /// return [`Priority::Unspecified`].
    fn current_priority(&self) -> Priority {
        Priority::Unspecified
    }
}

impl Dispatch for Arc<dyn Dispatch> {
    fn submit(&self, queue: Queue, task: Task) {
        (**self).submit(queue, task)
    }

    fn submit_after(&self, queue: Queue, delay: Duration, task: Task) {
        (**self).submit_after(queue, delay, task)
    }

    fn default_queue(&self, priority: Priority) -> Queue {
        (**self).default_queue(priority)
    }

    fn current_priority(&self) -> Priority {
        (**self).current_priority()
    }
}

/// A dispatcher that runs everything inline, synchronously, on the
/// submitting thread. Useful for tests and for callers who genuinely want
/// zero concurrency; the engine's correctness doesn't depend on any
/// particular dispatcher, which this implementation exercises directly.
#[derive(Copy, Clone, Debug, Default)]
pub struct Inline;

impl Dispatch for Inline {
    fn submit(&self, _queue: Queue, task: Task) {
        task();
    }

    fn submit_after(&self, _queue: Queue, delay: Duration, task: Task) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        task();
    }
}

//! [`Cell`], the one-shot asynchronous result container.

use std::sync::Arc;

use crate::diag::{debug, trace};
use crate::dispatch::{Dispatch, Queue};
use crate::error::{AlreadyResolved, Failure};
use crate::outcome::Outcome;
use crate::slot::Slot;
use crate::state::{CellState, Phase};
use crate::waiter::{Links, PushOutcome, WaiterStack};

pub(crate) struct Waiter<V, E> {
    links: Links<Waiter<V, E>>,
    kind: WaiterKind<V, E>,
}

pub(crate) enum WaiterKind<V, E> {
    Callback(Box<dyn FnOnce(&Outcome<V, E>) + Send>),
    Thread(crate::loom::thread::Thread),
}

impl<V, E> Waiter<V, E> {
    fn callback(cb: impl FnOnce(&Outcome<V, E>) + Send + 'static) -> Box<Self> {
        Box::new(Self {
            links: Links::new(),
            kind: WaiterKind::Callback(Box::new(cb)),
        })
    }

    fn thread() -> Box<Self> {
        Box::new(Self {
            links: Links::new(),
            kind: WaiterKind::Thread(crate::loom::thread::current()),
        })
    }
}

pub(crate) struct Inner<V, E> {
    state: CellState,
    slot: Slot<Outcome<V, E>>,
    waiters: WaiterStack<Waiter<V, E>>,
    dispatcher: Arc<dyn Dispatch>,
    queue: Queue,
}

/// A one-shot asynchronous result container: unresolved, then resolved at
/// most once with either a value or an error.
///
/// Cloning a `Cell` hands back another handle to the *same* underlying
/// resolution — it is a cheap `Arc` clone, not a copy of a pending
/// computation. Observers register against whichever clone is convenient;
/// all of them see the same, eventual outcome.
pub struct Cell<V, E> {
    pub(crate) inner: Arc<Inner<V, E>>,
}

impl<V, E> Clone for Cell<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V, E> Cell<V, E>
where
    V: Send + 'static,
    E: Failure + Send + 'static,
{
    /// Build a pending cell together with the [`crate::Resolver`] that can
    /// settle it. The resolver holds only a weak reference to the cell's
    /// storage, so it never keeps the cell alive by itself — see
    /// [`crate::Resolver::needs_resolution`].
    pub(crate) fn new_pending(dispatcher: Arc<dyn Dispatch>, queue: Queue) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: CellState::new(),
                slot: Slot::empty(),
                waiters: WaiterStack::new(),
                dispatcher,
                queue,
            }),
        }
    }

    /// A cell that is already resolved to `Value(v)`.
    pub fn from_value(dispatcher: Arc<dyn Dispatch>, queue: Queue, value: V) -> Self {
        Self::from_outcome(dispatcher, queue, Outcome::Value(value))
    }

    /// A cell that is already resolved to `Error(e)`.
    pub fn from_error(dispatcher: Arc<dyn Dispatch>, queue: Queue, error: E) -> Self {
        Self::from_outcome(dispatcher, queue, Outcome::Error(error))
    }

    fn from_outcome(dispatcher: Arc<dyn Dispatch>, queue: Queue, outcome: Outcome<V, E>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: CellState::new_resolved(),
                slot: Slot::new(outcome),
                waiters: WaiterStack::new(),
                dispatcher,
                queue,
            }),
        }
    }

    /// Schedule `f` on `queue` and resolve this cell with its outcome.
    /// Transitions `Waiting -> Executing` immediately, before `f` ever
    /// runs, since a task constructor implies a producer has already begun.
    pub fn from_task(
        dispatcher: Arc<dyn Dispatch>,
        queue: Queue,
        f: impl FnOnce() -> Outcome<V, E> + Send + 'static,
    ) -> Self {
        let cell = Self::new_pending(dispatcher.clone(), queue);
        cell.inner.state.begin_execution();
        let resolver = crate::resolver::Resolver::new(&cell);
        dispatcher.submit(
            queue,
            Box::new(move || {
                let outcome = f();
                let _ = resolver.resolve(outcome);
            }),
        );
        cell
    }

    /// Invoke `init(resolver)` synchronously, handing it a fresh
    /// [`crate::Resolver`] for the returned cell. Useful for wrapping a
    /// callback-based external API: `init` registers the resolver as that
    /// API's completion handler and returns immediately, well before the
    /// cell actually resolves.
    pub fn with_resolver(
        dispatcher: Arc<dyn Dispatch>,
        queue: Queue,
        init: impl FnOnce(crate::resolver::Resolver<V, E>),
    ) -> Self {
        let cell = Self::new_pending(dispatcher, queue);
        let resolver = crate::resolver::Resolver::new(&cell);
        init(resolver);
        cell
    }

    /// Non-blocking: the resolved outcome, if any, as of this load.
    pub fn peek(&self) -> Option<&Outcome<V, E>> {
        if self.inner.state.is_resolved() {
            Some(unsafe { self.inner.slot.assume_init_ref() })
        } else {
            None
        }
    }

    /// The cell's current lifecycle phase. Monotonic: never regresses.
    pub fn state(&self) -> Phase {
        self.inner.state.phase()
    }

    /// Register `cb` to run exactly once, on this cell's dispatch target,
    /// with the cell's eventual outcome. If the cell is already resolved,
    /// `cb` runs inline on the calling thread instead of round-tripping
    /// through the dispatcher.
    pub fn observe(&self, cb: impl FnOnce(&Outcome<V, E>) + Send + 'static) {
        if let Some(outcome) = self.peek() {
            cb(outcome);
            return;
        }

        let node = Waiter::callback(cb);
        match self.inner.waiters.push(node, |w| &w.links, || self.inner.state.is_resolved()) {
            PushOutcome::Pushed => {}
            PushOutcome::Resolved(node) => self.deliver(node),
        }
    }

    /// Block the calling thread until this cell resolves, then return its
    /// outcome. Returns immediately if already resolved.
    pub fn observe_blocking(&self) -> &Outcome<V, E> {
        if let Some(outcome) = self.peek() {
            return outcome;
        }

        let node = Waiter::thread();
        match self.inner.waiters.push(node, |w| &w.links, || self.inner.state.is_resolved()) {
            PushOutcome::Pushed => {
                while !self.inner.state.is_resolved() {
                    crate::loom::thread::park();
                }
            }
            PushOutcome::Resolved(_) => {}
        }

        self.peek().expect("cell observed resolved but slot unset")
    }

    /// A derived cell whose observers run on `queue` instead of this cell's
    /// own dispatch target. Resolves with the same outcome as `self`, the
    /// moment `self` resolves.
    pub fn on(&self, queue: Queue) -> Cell<V, E>
    where
        V: Clone,
        E: Clone,
    {
        let out = Cell::new_pending(self.inner.dispatcher.clone(), queue);
        let resolver = crate::resolver::Resolver::new(&out);
        self.observe(move |outcome| {
            let _ = resolver.resolve(outcome.clone());
        });
        out
    }

    pub(crate) fn dispatcher(&self) -> Arc<dyn Dispatch> {
        self.inner.dispatcher.clone()
    }

    pub(crate) fn queue(&self) -> Queue {
        self.inner.queue
    }

    /// Used by [`crate::Resolver::resolve`] and by combinators that hold an
    /// internal resolver for a cell they constructed.
    pub(crate) fn resolve(&self, outcome: Outcome<V, E>) -> Result<(), AlreadyResolved> {
        self.inner.state.claim().map_err(|_| AlreadyResolved)?;
        unsafe {
            self.inner.slot.write(outcome);
        }
        self.inner.state.publish();
        debug!(cell = ?Arc::as_ptr(&self.inner), "Cell::resolve");
        self.release_waiters();
        Ok(())
    }

    pub(crate) fn begin_execution(&self) {
        self.inner.state.begin_execution();
    }

    fn release_waiters(&self) {
        let mut waiters = self.inner.waiters.take_all(|w| &w.links);
        // `take_all` yields LIFO (most-recently-pushed-first); reverse once
        // here so delivery order matches registration order (§4.2).
        waiters.reverse();
        for waiter in waiters {
            self.deliver(waiter);
        }
    }

    fn deliver(&self, waiter: Box<Waiter<V, E>>) {
        match waiter.kind {
            WaiterKind::Thread(thread) => {
                trace!("Cell::deliver: unparking blocked thread");
                thread.unpark();
            }
            WaiterKind::Callback(cb) => {
                trace!("Cell::deliver: dispatching callback");
                let inner = self.inner.clone();
                let queue = inner.queue;
                inner.dispatcher.clone().submit(
                    queue,
                    Box::new(move || {
                        let outcome = unsafe { inner.slot.assume_init_ref() };
                        cb(outcome);
                    }),
                );
            }
        }
    }
}

// SAFETY: `Inner` is `Send`/`Sync` whenever `V`/`E` are, by the same
// argument as `Slot`: all cross-thread access to `slot` is sequenced by
// `state`'s release/acquire protocol, and `waiters` is a lock-free
// structure designed for concurrent push/take_all from the outset.
unsafe impl<V: Send, E: Send> Send for Inner<V, E> {}
unsafe impl<V: Send, E: Send> Sync for Inner<V, E> {}

impl<V, E> Drop for Inner<V, E> {
    fn drop(&mut self) {
        // Any waiter still on the stack at this point belongs to a cell that
        // never resolved: drain and drop every node without dispatching.
        // `Waiter::Thread` nodes can't occur here unmatched by a parked
        // thread holding its own strong reference to this `Inner`, so their
        // presence here would itself indicate a bug, not a normal race.
        for _waiter in self.waiters.take_all(|w| &w.links) {}

        // `slot` only ever holds a live `Outcome<V, E>` once `state` reached
        // `Resolved`; `Slot` itself has no `Drop` impl (a `MaybeUninit` won't
        // run one), so that's our job here.
        if self.state.is_resolved() {
            unsafe {
                self.slot.assume_init_drop();
            }
        }
    }
}

//! The intrusive, lock-free waiter stack.
//!
//! Shaped directly on `cordyceps::TransferStack` (push via CAS loop over an
//! `AtomicPtr` head, drain via one atomic swap to a null sentinel) but with
//! one addition `TransferStack` doesn't need: a push that loses its race
//! against resolution must notice and hand its waiter back for inline
//! delivery, rather than silently installing it onto a stack nobody will
//! ever drain again.
//!
//! # Why this can't just be `cordyceps::TransferStack`
//!
//! `TransferStack::push` retries its CAS until it wins, full stop; it has no
//! way to ask "did somebody swap the head out from under me for the *last*
//! time, or just contend with me for another push?" We need exactly that
//! distinction, so the loop below rechecks the cell's resolution state on
//! every retry and aborts (returning the node to its caller) the moment it
//! sees `Resolved`. That's safe: if our CAS is ever going to succeed, it
//! succeeds by definition *before* `take_all`'s swap could have missed it,
//! because both operations serialize through the same atomic `head`. If
//! `take_all` already swapped, our CAS observes a changed head, fails, and
//! the retry's state recheck catches it before we try again.

use crate::diag::trace;
use crate::loom::{
    atomic::{AtomicPtr, Ordering::*},
    cell::UnsafeCell,
};
use core::ptr::{self, NonNull};

pub(crate) struct Links<T> {
    next: UnsafeCell<Option<NonNull<T>>>,
}

impl<T> Links<T> {
    #[cfg(not(loom))]
    pub(crate) const fn new() -> Self {
        Self {
            next: UnsafeCell::new(None),
        }
    }

    #[cfg(loom)]
    pub(crate) fn new() -> Self {
        Self {
            next: UnsafeCell::new(None),
        }
    }
}

/// Outcome of a [`WaiterStack::push`] attempt.
pub(crate) enum PushOutcome<T> {
    /// The node was installed; it will be delivered by some future
    /// `take_all`.
    Pushed,
    /// The cell resolved before (or during) the push; the node was never
    /// installed and is handed back so the caller can dispatch it inline.
    Resolved(Box<T>),
}

pub(crate) struct WaiterStack<T> {
    head: AtomicPtr<T>,
}

impl<T> WaiterStack<T> {
    #[cfg(not(loom))]
    pub(crate) const fn new() -> Self {
        Self {
            head: AtomicPtr::new(ptr::null_mut()),
        }
    }

    #[cfg(loom)]
    pub(crate) fn new() -> Self {
        Self {
            head: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Push `node` onto the stack, unless `is_resolved` (checked fresh on
    /// every retry) reports the cell has resolved in the meantime.
    pub(crate) fn push(
        &self,
        node: Box<T>,
        links_of: impl Fn(&T) -> &Links<T>,
        is_resolved: impl Fn() -> bool,
    ) -> PushOutcome<T> {
        if is_resolved() {
            trace!("WaiterStack::push: already resolved, handing node back");
            return PushOutcome::Resolved(node);
        }

        let node_ptr: *mut T = Box::into_raw(node);
        let mut head = self.head.load(Relaxed);
        loop {
            // SAFETY: `node_ptr` is not yet visible to any other thread
            // (it's only installed below, on a successful CAS), so we have
            // exclusive access to its links.
            unsafe {
                links_of(&*node_ptr)
                    .next
                    .with_mut(|next| *next = NonNull::new(head));
            }

            match self
                .head
                .compare_exchange_weak(head, node_ptr, AcqRel, Acquire)
            {
                Ok(_) => {
                    trace!("WaiterStack::push -> pushed");
                    return PushOutcome::Pushed;
                }
                Err(actual) => {
                    head = actual;
                    if is_resolved() {
                        trace!("WaiterStack::push: lost race to resolution, reclaiming node");
                        // SAFETY: the CAS above never succeeded, so
                        // `node_ptr` was never installed anywhere another
                        // thread could observe it; we still hold sole
                        // ownership and may reclaim the box.
                        let node = unsafe { Box::from_raw(node_ptr) };
                        return PushOutcome::Resolved(node);
                    }
                }
            }
        }
    }

    /// Atomically take the entire stack, in LIFO (most-recently-pushed
    /// first) order. Callers that need FIFO delivery must reverse the
    /// result themselves (see [`crate::cell`]'s `release_waiters`).
    pub(crate) fn take_all(&self, links_of: impl Fn(&T) -> &Links<T>) -> Vec<Box<T>> {
        let mut head = NonNull::new(self.head.swap(ptr::null_mut(), AcqRel));
        let mut out = Vec::new();
        while let Some(ptr) = head {
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            head = links_of(&node).next.with_mut(|next| unsafe { (*next).take() });
            out.push(node);
        }
        trace!(taken = out.len(), "WaiterStack::take_all");
        out
    }
}

// `WaiterStack` has no `Drop` impl of its own: walking the list to free its
// nodes requires the `links_of` projection, which only the owning `Cell`
// (generic over `V, E`, not just `T`) can supply. `Cell`'s own `Drop`
// (`cell.rs`) calls `take_all` to drain and free every remaining waiter
// before its `WaiterStack` field goes out of scope; that drain is what
// guarantees no node is ever leaked.

#[cfg(test)]
mod loom_tests {
    use super::*;
    use crate::loom::{self, sync::Arc, thread};
    use core::sync::atomic::{AtomicBool, Ordering::Relaxed};

    struct Node {
        links: Links<Node>,
        val: i32,
    }

    impl Node {
        fn new(val: i32) -> Box<Self> {
            Box::new(Self {
                links: Links::new(),
                val,
            })
        }
    }

    fn links_of(node: &Node) -> &Links<Node> {
        &node.links
    }

    #[test]
    fn concurrent_pushes_are_all_eventually_taken() {
        loom::model(|| {
            let stack = Arc::new(WaiterStack::new());
            let resolved = Arc::new(AtomicBool::new(false));

            let threads: Vec<_> = (0..2)
                .map(|i| {
                    let stack = stack.clone();
                    let resolved = resolved.clone();
                    thread::spawn(move || {
                        stack.push(Node::new(i), links_of, || resolved.load(Relaxed));
                    })
                })
                .collect();

            for t in threads {
                t.join().unwrap();
            }

            let mut taken: Vec<_> = stack.take_all(links_of).into_iter().map(|n| n.val).collect();
            taken.sort();
            assert_eq!(taken, vec![0, 1]);
        });
    }

    #[test]
    fn a_push_racing_resolution_is_handed_back_not_lost() {
        loom::model(|| {
            let stack = Arc::new(WaiterStack::new());
            let resolved = Arc::new(AtomicBool::new(false));

            let pusher = {
                let stack = stack.clone();
                let resolved = resolved.clone();
                thread::spawn(move || stack.push(Node::new(7), links_of, || resolved.load(Relaxed)))
            };

            resolved.store(true, Relaxed);
            let outcome = pusher.join().unwrap();

            match outcome {
                PushOutcome::Pushed => {
                    let taken = stack.take_all(links_of);
                    assert_eq!(taken.len(), 1);
                }
                PushOutcome::Resolved(node) => {
                    assert_eq!(node.val, 7);
                    assert!(stack.take_all(links_of).is_empty());
                }
            }
        });
    }

    #[test]
    fn take_all_during_concurrent_push_leaks_nothing() {
        loom::model(|| {
            let stack = Arc::new(WaiterStack::new());
            let resolved = Arc::new(AtomicBool::new(false));

            let pusher = {
                let stack = stack.clone();
                thread::spawn(move || stack.push(Node::new(1), links_of, || false))
            };

            let mut taken = stack.take_all(links_of);
            let outcome = pusher.join().unwrap();
            if let PushOutcome::Pushed = outcome {
                taken.extend(stack.take_all(links_of));
            }

            let _ = resolved.load(Relaxed);
            assert!(taken.len() <= 1);
        });
    }
}

//! The dedicated timer thread backing [`crate::ThreadPool::submit_after`].
//!
//! One thread, one min-heap of `(deadline, sequence, queue, task)` behind a
//! `Mutex`+`Condvar`. The thread wakes at the next deadline (or when a new,
//! earlier entry is pushed), pops every entry whose deadline has elapsed,
//! and hands each one to [`crate::ThreadPool::submit`] on its original
//! queue. `sequence` only exists to give `BinaryHeap` a total order when two
//! deadlines tie; it carries no other meaning.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use deferred::{Queue, Task};

use crate::diag::trace;

struct Delayed {
    deadline: Instant,
    sequence: u64,
    queue: Queue,
    task: Task,
}

impl PartialEq for Delayed {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.sequence == other.sequence
    }
}
impl Eq for Delayed {}

impl PartialOrd for Delayed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delayed {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: `BinaryHeap` is a max-heap, and we want the *soonest*
        // deadline to sort first.
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

struct State {
    heap: BinaryHeap<Delayed>,
    next_sequence: u64,
    shutdown: bool,
}

pub(crate) struct Timer {
    state: Arc<(Mutex<State>, Condvar)>,
}

impl Timer {
    pub(crate) fn spawn(submit: impl Fn(Queue, Task) + Send + Sync + 'static) -> Self {
        let state = Arc::new((
            Mutex::new(State {
                heap: BinaryHeap::new(),
                next_sequence: 0,
                shutdown: false,
            }),
            Condvar::new(),
        ));

        let worker_state = state.clone();
        thread::Builder::new()
            .name("deferred-dispatch-timer".into())
            .spawn(move || run(worker_state, submit))
            .expect("failed to spawn timer thread");

        Self { state }
    }

    pub(crate) fn submit_after(&self, queue: Queue, delay: Duration, task: Task) {
        let (mutex, condvar) = &*self.state;
        let mut state = mutex.lock().unwrap();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        let wake_early = state
            .heap
            .peek()
            .map(|soonest| soonest.deadline > Instant::now() + delay)
            .unwrap_or(true);
        state.heap.push(Delayed {
            deadline: Instant::now() + delay,
            sequence,
            queue,
            task,
        });
        drop(state);
        if wake_early {
            condvar.notify_one();
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let (mutex, condvar) = &*self.state;
        mutex.lock().unwrap().shutdown = true;
        condvar.notify_one();
    }
}

fn run(state: Arc<(Mutex<State>, Condvar)>, submit: impl Fn(Queue, Task)) {
    let (mutex, condvar) = &*state;
    loop {
        let mut guard = mutex.lock().unwrap();
        loop {
            if guard.shutdown {
                return;
            }
            match guard.heap.peek() {
                None => {
                    guard = condvar.wait(guard).unwrap();
                }
                Some(soonest) => {
                    let now = Instant::now();
                    if soonest.deadline <= now {
                        break;
                    }
                    let (g, _timeout) = condvar
                        .wait_timeout(guard, soonest.deadline - now)
                        .unwrap();
                    guard = g;
                }
            }
        }

        let mut ready = Vec::new();
        while let Some(soonest) = guard.heap.peek() {
            if soonest.deadline > Instant::now() {
                break;
            }
            ready.push(guard.heap.pop().unwrap());
        }
        drop(guard);

        for entry in ready {
            trace!(queue = ?entry.queue, "Timer: deadline elapsed, submitting");
            submit(entry.queue, entry.task);
        }
    }
}

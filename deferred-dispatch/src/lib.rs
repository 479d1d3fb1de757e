//! A concrete, ready-to-use [`deferred::Dispatch`] implementation: a
//! fixed-size worker-thread pool with six standard priority levels, plus a
//! dedicated timer thread for `submit_after`.
//!
//! `deferred`'s core engine never constructs a dispatcher itself — every
//! `Cell` is built against whatever `Dispatch` the caller supplies. This
//! crate exists so a caller doesn't have to bring their own thread pool
//! before running a single example: build one [`ThreadPool`], wrap it in an
//! `Arc`, and hand it to `Cell::from_task` and friends.
//!
//! Grounded in the same `cordyceps` intrusive-list vocabulary `deferred`'s
//! own waiter queue is built on ([`queue::RunQueue`] is a thin wrapper
//! around `cordyceps::TransferStack`), so the two crates share one
//! lock-free-data-structure idiom rather than inventing a second one here.

mod diag;
mod queue;
mod timer;

use std::cell::Cell as ThreadLocalCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use deferred::{Dispatch, Priority, Queue, Task};

use diag::trace;
use queue::RunQueue;
use timer::Timer;

/// Priority order workers scan in, highest first. `Unspecified` is treated
/// as the lowest of the six, on the theory that work nobody bothered to
/// prioritize shouldn't preempt work somebody did.
const PRIORITY_ORDER: [Priority; 6] = [
    Priority::UserInteractive,
    Priority::UserInitiated,
    Priority::Default,
    Priority::Utility,
    Priority::Background,
    Priority::Unspecified,
];

thread_local! {
    static CURRENT_PRIORITY: ThreadLocalCell<Option<Priority>> = const { ThreadLocalCell::new(None) };
}

struct Shared {
    queues: RwLock<HashMap<Queue, Arc<RunQueue>>>,
    parked: (Mutex<()>, Condvar),
    shutdown: AtomicBool,
}

impl Shared {
    fn run_queue(&self, queue: Queue) -> Arc<RunQueue> {
        if let Some(rq) = self.queues.read().unwrap().get(&queue) {
            return rq.clone();
        }
        self.queues
            .write()
            .unwrap()
            .entry(queue)
            .or_insert_with(|| Arc::new(RunQueue::new()))
            .clone()
    }

    /// Drain the highest-priority non-empty queue's full backlog. Standard
    /// queues are checked in [`PRIORITY_ORDER`]; any custom queues (which
    /// carry no priority hint) are checked afterward, in arbitrary order.
    fn take_batch(&self) -> Option<(Queue, Vec<Box<queue::TaskNode>>)> {
        let queues = self.queues.read().unwrap();
        for priority in PRIORITY_ORDER {
            let standard = Queue::standard(priority);
            if let Some(rq) = queues.get(&standard) {
                let batch = rq.drain();
                if !batch.is_empty() {
                    return Some((standard, batch));
                }
            }
        }
        for (queue, rq) in queues.iter() {
            if queue.priority_hint().is_some() {
                continue;
            }
            let batch = rq.drain();
            if !batch.is_empty() {
                return Some((*queue, batch));
            }
        }
        None
    }

    fn wake_one(&self) {
        let (_lock, condvar) = &self.parked;
        condvar.notify_one();
    }

    fn wake_all(&self) {
        let (_lock, condvar) = &self.parked;
        condvar.notify_all();
    }
}

/// A fixed-size thread pool implementing [`deferred::Dispatch`].
///
/// Workers are joined, and the timer thread stopped, when a `ThreadPool` is
/// dropped. Share one pool across many `Cell`s by wrapping it in an `Arc`
/// (`Cell::from_task` and friends take exactly that: `Arc<dyn Dispatch>`).
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    timer: Timer,
}

impl ThreadPool {
    /// Spawn a pool of `worker_count` threads plus one timer thread.
    pub fn new(worker_count: usize) -> Self {
        assert!(worker_count > 0, "a thread pool needs at least one worker");

        let mut queues = HashMap::with_capacity(PRIORITY_ORDER.len());
        for priority in PRIORITY_ORDER {
            queues.insert(Queue::standard(priority), Arc::new(RunQueue::new()));
        }

        let shared = Arc::new(Shared {
            queues: RwLock::new(queues),
            parked: (Mutex::new(()), Condvar::new()),
            shutdown: AtomicBool::new(false),
        });

        let workers = (0..worker_count)
            .map(|index| {
                let shared = shared.clone();
                thread::Builder::new()
                    .name(format!("deferred-dispatch-worker-{index}"))
                    .spawn(move || worker_loop(shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        let timer_shared = shared.clone();
        let timer = Timer::spawn(move |queue, task| {
            timer_shared.run_queue(queue).push(task);
            timer_shared.wake_one();
        });

        Self {
            shared,
            workers: Mutex::new(workers),
            timer,
        }
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        if shared.shutdown.load(Ordering::Acquire) {
            return;
        }

        if let Some((queue, batch)) = shared.take_batch() {
            let priority = queue.priority_hint();
            CURRENT_PRIORITY.with(|cell| cell.set(priority));
            trace!(?priority, batch_len = batch.len(), "worker: running batch");
            for node in batch {
                node.run();
            }
            CURRENT_PRIORITY.with(|cell| cell.set(None));
            continue;
        }

        let (lock, condvar) = &shared.parked;
        let guard = lock.lock().unwrap();
        // Bounded park: re-checks `shutdown` periodically even if nobody
        // calls `notify_one` (e.g. the pool is being torn down between a
        // submit and a park).
        let _ = condvar.wait_timeout(guard, Duration::from_millis(50));
    }
}

impl Dispatch for ThreadPool {
    fn submit(&self, queue: Queue, task: Task) {
        self.shared.run_queue(queue).push(task);
        self.shared.wake_one();
    }

    fn submit_after(&self, queue: Queue, delay: Duration, task: Task) {
        self.timer.submit_after(queue, delay, task);
    }

    fn default_queue(&self, priority: Priority) -> Queue {
        Queue::standard(priority)
    }

    fn current_priority(&self) -> Priority {
        CURRENT_PRIORITY.with(|cell| cell.get()).unwrap_or(Priority::Unspecified)
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.wake_all();
        for worker in self.workers.get_mut().unwrap().drain(..) {
            let _ = worker.join();
        }
    }
}

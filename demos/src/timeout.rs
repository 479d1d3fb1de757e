//! Races a slow task against a `timeout`; the timer wins, and the slow
//! task's own (eventual) result is simply discarded.

use std::sync::Arc;
use std::time::Duration;

use deferred::{Cell, Dispatch, Outcome, Priority, ResolutionError};
use deferred_dispatch::ThreadPool;

fn main() {
    tracing_subscriber::fmt::init();

    let pool: Arc<dyn Dispatch> = Arc::new(ThreadPool::new(4));
    let queue = pool.default_queue(Priority::Default);

    let slow: Cell<i64, ResolutionError<String>> = Cell::from_task(pool.clone(), queue, || {
        std::thread::sleep(Duration::from_millis(500));
        Outcome::Value(1)
    });

    let guarded = slow.timeout(Duration::from_millis(100), "slow");

    let outcome = guarded.observe_blocking();
    println!("guarded = {outcome:?}");
    assert!(outcome.is_error(), "the 100ms timeout should beat the 500ms task");
}

//! Ten cells race via `first_value` over a small worker pool; only one
//! (picked at random by which thread gets scheduled first) ever resolves
//! with a value before the rest.

use std::sync::Arc;
use std::time::Duration;

use deferred::{first_value, Cell, Dispatch, Outcome, Priority, ResolutionError};
use deferred_dispatch::ThreadPool;

fn main() {
    tracing_subscriber::fmt::init();

    let pool: Arc<dyn Dispatch> = Arc::new(ThreadPool::new(4));
    let queue = pool.default_queue(Priority::Default);

    let cells: Vec<Cell<usize, ResolutionError<String>>> = (0..10)
        .map(|i| {
            Cell::from_task(pool.clone(), queue, move || {
                std::thread::sleep(Duration::from_millis(5 * (10 - i as u64)));
                Outcome::Value(i)
            })
        })
        .collect();

    let winner = first_value(pool.clone(), queue, cells);
    println!("winner = {:?}", winner.observe_blocking());
}

//! Chains two `map`s off a single `from_task` cell, registering both
//! observers before the upstream task resolves.

use std::sync::Arc;
use std::time::Duration;

use deferred::{Cell, Dispatch, Outcome, Priority, ResolutionError};
use deferred_dispatch::ThreadPool;

fn main() {
    tracing_subscriber::fmt::init();

    let pool: Arc<dyn deferred::Dispatch> = Arc::new(ThreadPool::new(4));
    let queue = pool.default_queue(Priority::Default);

    let c1: Cell<f64, ResolutionError<String>> = Cell::from_task(pool.clone(), queue, || {
        std::thread::sleep(Duration::from_millis(50));
        Outcome::Value(10.1)
    });

    let c2 = c1.map(|d| (2.0 * d).floor() as i64);
    let c3 = c1.map(|d| format!("{}", 3.0 * d));

    let d1 = c1.observe_blocking();
    println!("c1 = {d1:?}");
    println!("c2 = {:?}", c2.observe_blocking());
    println!("c3 = {:?}", c3.observe_blocking());
}

use std::sync::Arc;

use crate::cell::Cell;
use crate::dispatch::{Dispatch, Queue};
use crate::error::Failure;
use crate::outcome::Outcome;

/// Spawn `n` independent tasks on `dispatcher`, each running `task(i)`, and
/// return their `n` cells. Each cell resolves independently of the others;
/// nothing here waits for more than one of them — callers reach for
/// `combine` or `first_value`/`first_resolved` over the result if they need
/// to.
pub fn in_parallel<V, E>(
    dispatcher: Arc<dyn Dispatch>,
    queue: Queue,
    n: usize,
    task: impl Fn(usize) -> Outcome<V, E> + Send + Sync + 'static,
) -> Vec<Cell<V, E>>
where
    V: Send + 'static,
    E: Failure + Send + 'static,
{
    let task = Arc::new(task);
    (0..n)
        .map(|i| {
            let task = task.clone();
            Cell::from_task(dispatcher.clone(), queue, move || task(i))
        })
        .collect()
}

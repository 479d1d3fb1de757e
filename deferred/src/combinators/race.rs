use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cell::Cell;
use crate::dispatch::{Dispatch, Queue};
use crate::error::Failure;
use crate::outcome::Outcome;
use crate::resolver::Resolver;

/// Resolve with the first value produced by any of `cells`; if every input
/// errors (or `cells` is empty), resolves with `NoResult`.
pub fn first_value<V, E>(
    dispatcher: Arc<dyn Dispatch>,
    queue: Queue,
    cells: impl IntoIterator<Item = Cell<V, E>>,
) -> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    let cells: Vec<_> = cells.into_iter().collect();
    let out = Cell::new_pending(dispatcher, queue);

    if cells.is_empty() {
        let _ = Resolver::new(&out).resolve(Outcome::Error(E::from_no_result()));
        return out;
    }

    let remaining = Arc::new(AtomicUsize::new(cells.len()));
    for cell in &cells {
        let resolver = Resolver::new(&out);
        let remaining = remaining.clone();
        cell.observe(move |outcome| match outcome.as_ref() {
            Outcome::Value(v) => {
                let _ = resolver.resolve(Outcome::Value(v.clone()));
            }
            Outcome::Error(_) => {
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let _ = resolver.resolve(Outcome::Error(E::from_no_result()));
                }
            }
        });
    }

    out
}

/// Resolve with whichever of `cells` settles first, value or error; resolves
/// with `NoResult` if `cells` is empty.
pub fn first_resolved<V, E>(
    dispatcher: Arc<dyn Dispatch>,
    queue: Queue,
    cells: impl IntoIterator<Item = Cell<V, E>>,
) -> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    let cells: Vec<_> = cells.into_iter().collect();
    let out = Cell::new_pending(dispatcher, queue);

    if cells.is_empty() {
        let _ = Resolver::new(&out).resolve(Outcome::Error(E::from_no_result()));
        return out;
    }

    for cell in &cells {
        let resolver = Resolver::new(&out);
        cell.observe(move |outcome| {
            let _ = resolver.resolve(outcome.clone());
        });
    }

    out
}

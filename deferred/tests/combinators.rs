//! Coverage for each combinator in the algebra: `flat_map`, `apply`,
//! `recover`, `delay`, `timeout`, `combine`, `first_value`, `first_resolved`,
//! `in_parallel`, and `on`.

use std::sync::Arc;
use std::time::Duration;

use deferred::{
    first_resolved, first_value, in_parallel, Cell, Dispatch, Inline, Outcome, Priority,
    ResolutionError,
};

type TestCell<V> = Cell<V, ResolutionError<String>>;

fn inline() -> (Arc<dyn Dispatch>, deferred::Queue) {
    let dispatcher: Arc<dyn Dispatch> = Arc::new(Inline);
    let queue = dispatcher.default_queue(Priority::Default);
    (dispatcher, queue)
}

#[test]
fn flat_map_chains_into_inner_cell() {
    let (dispatcher, queue) = inline();
    let outer: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, 10);
    let chained = outer.flat_map(move |v| Cell::from_value(dispatcher.clone(), queue, v * 2));
    assert_eq!(chained.peek().unwrap().as_ref().value(), Some(&20));
}

#[test]
fn flat_map_propagates_upstream_errors_without_calling_f() {
    let (dispatcher, queue) = inline();
    let outer: TestCell<i32> =
        Cell::from_error(dispatcher.clone(), queue, ResolutionError::User("bad".into()));
    let chained = outer.flat_map(move |_: i32| -> TestCell<i32> {
        panic!("f must not be called on an upstream error")
    });
    assert!(chained.peek().unwrap().is_error());
}

#[test]
fn apply_combines_value_and_function_cells() {
    let (dispatcher, queue) = inline();
    let value: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, 21);
    let func: Cell<_, ResolutionError<String>> =
        Cell::from_value(dispatcher, queue, |v: i32| v * 2);
    let applied = value.apply(func);
    assert_eq!(applied.peek().unwrap().as_ref().value(), Some(&42));
}

#[test]
fn apply_source_error_wins_when_both_resolved() {
    let (dispatcher, queue) = inline();
    let value: TestCell<i32> =
        Cell::from_error(dispatcher.clone(), queue, ResolutionError::User("value-err".into()));
    let func: Cell<_, ResolutionError<String>> =
        Cell::from_value(dispatcher, queue, |v: i32| v * 2);
    let applied = value.apply(func);
    assert_eq!(
        applied.peek().unwrap().as_ref().error(),
        Some(&ResolutionError::User("value-err".into()))
    );
}

#[test]
fn recover_routes_error_to_fallback() {
    let (dispatcher, queue) = inline();
    let failed: TestCell<i32> =
        Cell::from_error(dispatcher.clone(), queue, ResolutionError::User("oops".into()));
    let recovered = failed.recover(move |_| Cell::from_value(dispatcher.clone(), queue, -1));
    assert_eq!(recovered.peek().unwrap().as_ref().value(), Some(&-1));
}

#[test]
fn recover_passes_values_through_unchanged() {
    let (dispatcher, queue) = inline();
    let ok: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, 5);
    let recovered = ok.recover(move |_| Cell::from_value(dispatcher.clone(), queue, -1));
    assert_eq!(recovered.peek().unwrap().as_ref().value(), Some(&5));
}

#[test]
fn delay_postpones_a_value_but_not_an_error() {
    let (dispatcher, queue) = inline();
    let value: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, 1);
    let delayed = value.delay(Duration::from_millis(20));
    assert_eq!(delayed.peek().unwrap().as_ref().value(), Some(&1));

    let error: TestCell<i32> =
        Cell::from_error(dispatcher, queue, ResolutionError::User("fast".into()));
    let delayed_error = error.delay(Duration::from_secs(10));
    assert!(
        delayed_error.peek().is_some(),
        "errors must bypass the delay and resolve immediately"
    );
}

/// Under the `Inline` dispatcher both `submit` and `submit_after` run
/// synchronously, so this isn't a real timeout race: `from_task` already
/// drives `slow` to `Value(1)` before `timeout` is even called, and
/// `timeout`'s `submit_after` call then blocks for the delay and resolves
/// `out` with `Canceled` before `self.observe` ever gets registered. What
/// this actually checks is the construction-order tie-break — the timer arm
/// runs before the upstream observe, so it always wins under `Inline` no
/// matter which side "really" finished first. A genuine concurrent race is
/// covered by `timeout_beats_a_genuinely_slow_task` in
/// `deferred-dispatch/tests/thread_pool.rs`, which uses a real `ThreadPool`.
#[test]
fn timeout_wins_construction_order_tie_break_under_inline() {
    let (dispatcher, queue) = inline();
    let slow: TestCell<i32> = Cell::from_task(dispatcher, queue, || {
        std::thread::sleep(Duration::from_millis(200));
        Outcome::Value(1)
    });
    let guarded = slow.timeout(Duration::from_millis(20), "slow");
    assert!(guarded.peek().unwrap().is_error());
}

#[test]
fn combine_requires_every_upstream_to_succeed() {
    let (dispatcher, queue) = inline();
    let a: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, 1);
    let b: TestCell<&'static str> = Cell::from_value(dispatcher.clone(), queue, "two");
    let c: TestCell<f64> = Cell::from_value(dispatcher, queue, 3.0);

    let combined = a.combine(b).combine(c);
    assert_eq!(
        combined.peek().unwrap().as_ref().value(),
        Some(&((1, "two"), 3.0))
    );
}

#[test]
fn combine_short_circuits_on_first_error() {
    let (dispatcher, queue) = inline();
    let a: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, 1);
    let b: TestCell<&'static str> =
        Cell::from_error(dispatcher, queue, ResolutionError::User("bad".into()));

    let combined = a.combine(b);
    assert!(combined.peek().unwrap().is_error());
}

#[test]
fn first_value_resolves_with_the_first_success() {
    let (dispatcher, queue) = inline();
    let cells: Vec<TestCell<i32>> = (0..10)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            if i == 7 {
                Cell::from_value(dispatcher, queue, i)
            } else {
                Cell::from_error(dispatcher, queue, ResolutionError::User(format!("err {i}")))
            }
        })
        .collect();

    let winner = first_value(dispatcher, queue, cells);
    assert_eq!(winner.peek().unwrap().as_ref().value(), Some(&7));
}

#[test]
fn first_value_over_empty_input_is_no_result() {
    let (dispatcher, queue) = inline();
    let winner: TestCell<i32> = first_value(dispatcher, queue, Vec::new());
    assert_eq!(winner.peek().unwrap().as_ref().error(), Some(&ResolutionError::NoResult));
}

#[test]
fn first_value_with_all_errors_is_no_result() {
    let (dispatcher, queue) = inline();
    let cells: Vec<TestCell<i32>> = (0..3)
        .map(|i| Cell::from_error(dispatcher.clone(), queue, ResolutionError::User(format!("e{i}"))))
        .collect();
    let winner = first_value(dispatcher, queue, cells);
    assert_eq!(winner.peek().unwrap().as_ref().error(), Some(&ResolutionError::NoResult));
}

#[test]
fn first_resolved_takes_whichever_settles_first_value_or_error() {
    let (dispatcher, queue) = inline();
    let cells: Vec<TestCell<i32>> = vec![Cell::from_error(
        dispatcher.clone(),
        queue,
        ResolutionError::User("first".into()),
    )];
    let winner = first_resolved(dispatcher, queue, cells);
    assert!(winner.peek().unwrap().is_error());
}

#[test]
fn in_parallel_runs_n_independent_tasks() {
    let (dispatcher, queue) = inline();
    let cells: Vec<TestCell<usize>> =
        in_parallel(dispatcher, queue, 5, |i| Outcome::Value(i * i));
    assert_eq!(cells.len(), 5);
    for (i, cell) in cells.iter().enumerate() {
        assert_eq!(cell.peek().unwrap().as_ref().value(), Some(&(i * i)));
    }
}

#[test]
fn on_moves_observers_to_a_different_queue_but_keeps_outcome() {
    let (dispatcher, queue) = inline();
    let other_queue = dispatcher.default_queue(Priority::Background);
    let cell: TestCell<i32> = Cell::from_value(dispatcher, queue, 3);
    let moved = cell.on(other_queue);
    assert_eq!(moved.peek().unwrap().as_ref().value(), Some(&3));
}

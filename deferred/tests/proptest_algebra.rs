//! Algebraic properties of the combinator layer, checked over random inputs
//! rather than fixed examples: `map` respects identity and composition,
//! errors stay transparent through every unary combinator, and `combine`
//! is associative up to re-association of the resulting tuple.

use std::sync::Arc;

use deferred::{Cell, Dispatch, Inline, Priority, ResolutionError};
use proptest::prelude::*;

type TestCell<V> = Cell<V, ResolutionError<String>>;

fn inline() -> (Arc<dyn Dispatch>, deferred::Queue) {
    let dispatcher: Arc<dyn Dispatch> = Arc::new(Inline);
    let queue = dispatcher.default_queue(Priority::Default);
    (dispatcher, queue)
}

proptest! {
    #[test]
    fn map_identity_is_a_no_op(v in any::<i32>()) {
        let (dispatcher, queue) = inline();
        let cell: TestCell<i32> = Cell::from_value(dispatcher, queue, v);
        let mapped = cell.map(|v| v);
        prop_assert_eq!(cell.peek().unwrap().as_ref().value(), mapped.peek().unwrap().as_ref().value());
    }

    #[test]
    fn map_composes(v in any::<i32>(), a in -10i32..10, b in -10i32..10) {
        let (dispatcher, queue) = inline();
        let cell: TestCell<i32> = Cell::from_value(dispatcher, queue, v);

        let composed = cell.map(move |x| x.wrapping_add(a)).map(move |x| x.wrapping_mul(b));
        let fused = cell.map(move |x| x.wrapping_add(a).wrapping_mul(b));

        prop_assert_eq!(
            composed.peek().unwrap().as_ref().value(),
            fused.peek().unwrap().as_ref().value()
        );
    }

    #[test]
    fn map_never_touches_an_upstream_error(v in any::<i32>(), msg in "[a-z]{1,12}") {
        let (dispatcher, queue) = inline();
        let cell: TestCell<i32> = Cell::from_error(dispatcher, queue, ResolutionError::User(msg.clone()));
        let mapped = cell.map(move |x| x + v);
        prop_assert_eq!(
            mapped.peek().unwrap().as_ref().error(),
            Some(&ResolutionError::User(msg))
        );
    }

    #[test]
    fn recover_is_a_no_op_on_a_value(v in any::<i32>()) {
        let (dispatcher, queue) = inline();
        let cell: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, v);
        let recovered = cell.recover(move |_| Cell::from_value(dispatcher.clone(), queue, 0));
        prop_assert_eq!(cell.peek().unwrap().as_ref().value(), recovered.peek().unwrap().as_ref().value());
    }

    #[test]
    fn combine_is_associative_up_to_reassociation(a in any::<i32>(), b in any::<i32>(), c in any::<i32>()) {
        let (dispatcher, queue) = inline();
        let ca: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, a);
        let cb: TestCell<i32> = Cell::from_value(dispatcher.clone(), queue, b);
        let cc: TestCell<i32> = Cell::from_value(dispatcher, queue, c);

        let left = ca.clone().combine(cb.clone()).combine(cc.clone());
        let right = ca.combine(cb.combine(cc));

        let left_flat = left.peek().unwrap().as_ref().value().map(|((x, y), z)| (*x, *y, *z));
        let right_flat = right.peek().unwrap().as_ref().value().map(|(x, (y, z))| (*x, *y, *z));

        prop_assert_eq!(left_flat, right_flat);
    }

    #[test]
    fn delay_preserves_a_value_with_zero_duration(v in any::<i32>()) {
        let (dispatcher, queue) = inline();
        let cell: TestCell<i32> = Cell::from_value(dispatcher, queue, v);
        let delayed = cell.delay(std::time::Duration::ZERO);
        prop_assert_eq!(cell.peek().unwrap().as_ref().value(), delayed.peek().unwrap().as_ref().value());
    }
}

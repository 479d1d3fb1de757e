use crate::cell::Cell;
use crate::error::Failure;
use crate::outcome::Outcome;
use crate::resolver::Resolver;

fn combine_ref<V, E, F, U>(v: &Outcome<V, E>, f: &Outcome<F, E>) -> Outcome<U, E>
where
    V: Clone,
    E: Clone,
    F: Fn(V) -> U,
{
    match v {
        Outcome::Error(e) => Outcome::Error(e.clone()),
        Outcome::Value(v) => match f {
            Outcome::Value(f) => Outcome::Value(f(v.clone())),
            Outcome::Error(e) => Outcome::Error(e.clone()),
        },
    }
}

impl<V, E> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    /// Wait on both `self` and `f_cell`, then apply the function `f_cell`
    /// carries to `self`'s value. If either side errors, the first error to
    /// actually settle wins — when both are already resolved by the time
    /// the second observer fires, `self`'s error takes priority, matching
    /// [`Outcome::apply`]'s tie-break.
    ///
    /// `f_cell` carries a `Fn`, not a `FnOnce`: the function is read through
    /// a shared reference into the resolved slot, the same way any other
    /// observer reads a value out of it, rather than being moved out.
    pub fn apply<F, U>(&self, f_cell: Cell<F, E>) -> Cell<U, E>
    where
        F: Fn(V) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        let out = Cell::new_pending(self.dispatcher(), self.queue());

        // Each closure below is handed the outcome of the cell it's
        // registered on directly, rather than re-peeking a retained clone of
        // that same cell — a closure registered on `self` holding a clone of
        // `self` would live inside `self`'s own waiter stack, an `Inner`
        // pointing back at itself through its own pending waiter. The other
        // upstream is still peeked through a clone, which is fine: it's a
        // cross-reference between two distinct cells, not a cycle.
        let func = f_cell.clone();
        let resolver = Resolver::new(&out);
        self.observe(move |v_outcome| {
            if let Some(f_outcome) = func.peek() {
                let _ = resolver.resolve(combine_ref(v_outcome, f_outcome));
            }
        });

        let source = self.clone();
        let resolver = Resolver::new(&out);
        f_cell.observe(move |f_outcome| {
            if let Some(v_outcome) = source.peek() {
                let _ = resolver.resolve(combine_ref(v_outcome, f_outcome));
            }
        });

        out
    }
}

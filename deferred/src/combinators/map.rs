use crate::cell::Cell;
use crate::error::Failure;
use crate::outcome::Outcome;
use crate::resolver::Resolver;

impl<V, E> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    /// Transform a successful value with `f`; errors pass through unchanged.
    /// `cell.map(|v| v)` and `cell` resolve to equal outcomes.
    pub fn map<U>(&self, f: impl FnOnce(V) -> U + Send + 'static) -> Cell<U, E>
    where
        U: Send + 'static,
    {
        let out = Cell::new_pending(self.dispatcher(), self.queue());
        let resolver = Resolver::new(&out);
        self.observe(move |outcome| {
            let mapped = match outcome.as_ref() {
                Outcome::Value(v) => Outcome::Value(f(v.clone())),
                Outcome::Error(e) => Outcome::Error(e.clone()),
            };
            let _ = resolver.resolve(mapped);
        });
        out
    }

    /// Transform an error with `f`; successful values pass through unchanged.
    pub fn map_error<F>(&self, f: impl FnOnce(E) -> F + Send + 'static) -> Cell<V, F>
    where
        F: Failure + Send + 'static,
    {
        let out = Cell::new_pending(self.dispatcher(), self.queue());
        let resolver = Resolver::new(&out);
        self.observe(move |outcome| {
            let mapped = match outcome.as_ref() {
                Outcome::Value(v) => Outcome::Value(v.clone()),
                Outcome::Error(e) => Outcome::Error(f(e.clone())),
            };
            let _ = resolver.resolve(mapped);
        });
        out
    }
}

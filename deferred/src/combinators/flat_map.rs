use crate::cell::Cell;
use crate::error::Failure;
use crate::outcome::Outcome;
use crate::resolver::Resolver;

impl<V, E> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    /// Chain a fallible continuation onto a successful value: `f` is invoked
    /// with the upstream's value and returns another cell, `inner`, whose
    /// eventual outcome resolves the returned cell. `inner` is only
    /// observed, never owned — if the returned cell is canceled first,
    /// `inner`'s own resolution is simply ignored.
    ///
    /// Upstream errors propagate directly, without ever calling `f`.
    pub fn flat_map<U>(&self, f: impl FnOnce(V) -> Cell<U, E> + Send + 'static) -> Cell<U, E>
    where
        U: Send + 'static,
    {
        let out = Cell::new_pending(self.dispatcher(), self.queue());
        let resolver = Resolver::new(&out);
        self.observe(move |outcome| match outcome.as_ref() {
            Outcome::Value(v) => {
                let inner = f(v.clone());
                inner.observe(move |inner_outcome| {
                    let _ = resolver.resolve(inner_outcome.clone());
                });
            }
            Outcome::Error(e) => {
                let _ = resolver.resolve(Outcome::Error(e.clone()));
            }
        });
        out
    }
}

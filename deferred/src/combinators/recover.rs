use crate::cell::Cell;
use crate::error::Failure;
use crate::outcome::Outcome;
use crate::resolver::Resolver;

impl<V, E> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    /// Pass a successful value through unchanged; route an upstream error to
    /// `f`, whose returned cell's eventual outcome resolves the returned
    /// cell instead.
    pub fn recover(&self, f: impl FnOnce(E) -> Cell<V, E> + Send + 'static) -> Cell<V, E> {
        let out = Cell::new_pending(self.dispatcher(), self.queue());
        let resolver = Resolver::new(&out);
        self.observe(move |outcome| match outcome.as_ref() {
            Outcome::Value(v) => {
                let _ = resolver.resolve(Outcome::Value(v.clone()));
            }
            Outcome::Error(e) => {
                let fallback = f(e.clone());
                fallback.observe(move |fallback_outcome| {
                    let _ = resolver.resolve(fallback_outcome.clone());
                });
            }
        });
        out
    }
}

use core::time::Duration;

use crate::cell::Cell;
use crate::dispatch::Dispatch;
use crate::error::Failure;
use crate::outcome::Outcome;
use crate::resolver::Resolver;

impl<V, E> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    /// Resolve with the upstream's value, but only after `delay` has
    /// elapsed. Upstream errors bypass the delay entirely and resolve the
    /// returned cell immediately.
    pub fn delay(&self, delay: Duration) -> Cell<V, E> {
        let out = Cell::new_pending(self.dispatcher(), self.queue());
        let resolver = Resolver::new(&out);
        let dispatcher = self.dispatcher();
        let queue = self.queue();
        self.observe(move |outcome| match outcome.as_ref() {
            Outcome::Value(v) => {
                let value = v.clone();
                dispatcher.submit_after(
                    queue,
                    delay,
                    Box::new(move || {
                        let _ = resolver.resolve(Outcome::Value(value));
                    }),
                );
            }
            Outcome::Error(e) => {
                let _ = resolver.resolve(Outcome::Error(e.clone()));
            }
        });
        out
    }
}

use core::time::Duration;

use crate::cell::Cell;
use crate::dispatch::Dispatch;
use crate::error::Failure;
use crate::resolver::Resolver;

impl<V, E> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    /// Arm a cancellation that fires after `delay` unless `self` has
    /// already resolved the returned cell by then. Whichever of the two —
    /// the timer or the upstream — wins the race is the outcome; the loser
    /// is silently discarded via the ordinary `AlreadyResolved` path.
    pub fn timeout(&self, delay: Duration, reason: impl Into<String> + Send + 'static) -> Cell<V, E> {
        let out = Cell::new_pending(self.dispatcher(), self.queue());

        let timer_resolver = Resolver::new(&out);
        self.dispatcher().submit_after(
            self.queue(),
            delay,
            Box::new(move || {
                let _ = timer_resolver.cancel(reason);
            }),
        );

        let resolver = Resolver::new(&out);
        self.observe(move |outcome| {
            let _ = resolver.resolve(outcome.clone());
        });

        out
    }
}

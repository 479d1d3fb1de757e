//! [`Resolver`], the writer-side capability bound to one [`crate::Cell`].

use std::sync::Weak;

use crate::cell::{Cell, Inner};
use crate::diag::trace;
use crate::error::{AlreadyResolved, Canceled, Failure};
use crate::outcome::Outcome;

/// A writer capability bound to exactly one [`crate::Cell`].
///
/// A `Resolver` holds only a *weak* reference to the cell's storage: it
/// never keeps a cell alive on its own. This is what makes
/// [`needs_resolution`](Resolver::needs_resolution) meaningful — once every
/// strong `Cell` handle has been dropped, `needs_resolution` reports
/// `false`, and a well-behaved producer can stop work that nobody is
/// waiting on anymore.
///
/// If a `Resolver` is dropped having never resolved its cell (and the cell
/// is still alive), it resolves the cell with `Canceled("resolver dropped
/// without resolving")` on the way out, so observers are never left waiting
/// forever on a producer that disappeared.
pub struct Resolver<V: Send + 'static, E: Failure + Send + 'static> {
    inner: Weak<Inner<V, E>>,
}

impl<V, E> Resolver<V, E>
where
    V: Send + 'static,
    E: Failure + Send + 'static,
{
    pub(crate) fn new(cell: &Cell<V, E>) -> Self {
        Self {
            inner: std::sync::Arc::downgrade(&cell.inner),
        }
    }

    fn with_cell<R>(&self, f: impl FnOnce(Cell<V, E>) -> R) -> Option<R> {
        self.inner.upgrade().map(|inner| f(Cell { inner }))
    }

    /// Resolve the bound cell with `outcome`. Returns `Err(AlreadyResolved)`
    /// if the cell had already settled (by any writer), or if the cell no
    /// longer exists at all.
    pub fn resolve(&self, outcome: Outcome<V, E>) -> Result<(), AlreadyResolved> {
        self.with_cell(|cell| cell.resolve(outcome))
            .unwrap_or(Err(AlreadyResolved))
    }

    pub fn resolve_value(&self, value: V) -> Result<(), AlreadyResolved> {
        self.resolve(Outcome::Value(value))
    }

    pub fn resolve_error(&self, error: E) -> Result<(), AlreadyResolved> {
        self.resolve(Outcome::Error(error))
    }

    /// Advisory `Waiting -> Executing` transition.
    pub fn begin_execution(&self) {
        let _ = self.with_cell(|cell| cell.begin_execution());
    }

    /// `true` iff the bound cell still has at least one strong ([`Cell`])
    /// reference. A producer can use this to abandon work early: if
    /// nothing is observing anymore, there's no point finishing.
    pub fn needs_resolution(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Resolve the bound cell with `Canceled(reason)`. Returns `true` iff
    /// this call was the one that won the resolution race.
    pub fn cancel(&self, reason: impl Into<String>) -> bool {
        self.resolve(Outcome::Error(E::from_canceled(Canceled::new(reason.into()))))
            .is_ok()
    }
}

impl<V, E> Drop for Resolver<V, E>
where
    V: Send + 'static,
    E: Failure + Send + 'static,
{
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            trace!("Resolver::drop: resolving with implicit cancellation");
            let cell = Cell { inner };
            let _ = cell.resolve(Outcome::Error(E::from_canceled(Canceled::new(
                "resolver dropped without resolving",
            ))));
        }
    }
}

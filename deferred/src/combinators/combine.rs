use crate::cell::Cell;
use crate::error::Failure;

impl<V, E> Cell<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Failure + Send + 'static,
{
    /// Pair `self` with `other`: both must succeed, and the first error
    /// wins. Chain calls to combine more than two cells — `a.combine(b)
    /// .combine(c)` yields `((V, U), W)` — mirroring the source's own
    /// repeated-pairwise-`flat_map` construction of variadic `combine`.
    pub fn combine<U>(&self, other: Cell<U, E>) -> Cell<(V, U), E>
    where
        U: Clone + Send + 'static,
    {
        self.flat_map(move |v| other.map(move |u| (v.clone(), u)))
    }
}

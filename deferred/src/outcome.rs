//! [`Outcome`], the `Value | Error` sum stored in a resolved [`crate::Cell`].

/// The result a [`crate::Cell`] settles to: either a value or an error.
///
/// Unlike [`Result`], `Outcome` carries no trait bound baggage of its own;
/// the bounds needed to combine outcomes (`Clone`, mostly) live on the
/// individual combinator methods that need them, not on the type itself.
#[derive(Clone, Debug)]
pub enum Outcome<V, E> {
    Value(V),
    Error(E),
}

impl<V, E> Outcome<V, E> {
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn value(self) -> Option<V> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(self) -> Option<E> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Error(e) => Some(e),
        }
    }

    pub fn as_ref(&self) -> Outcome<&V, &E> {
        match self {
            Outcome::Value(v) => Outcome::Value(v),
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    /// Transform a successful value, passing errors through unchanged.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Value(v) => Outcome::Value(f(v)),
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    /// Transform an error, passing successful values through unchanged.
    pub fn map_error<F>(self, f: impl FnOnce(E) -> F) -> Outcome<V, F> {
        match self {
            Outcome::Value(v) => Outcome::Value(v),
            Outcome::Error(e) => Outcome::Error(f(e)),
        }
    }

    /// Chain a fallible continuation onto a successful value.
    pub fn flat_map<U>(self, f: impl FnOnce(V) -> Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Outcome::Value(v) => f(v),
            Outcome::Error(e) => Outcome::Error(e),
        }
    }

    /// Apply a function carried in another `Outcome` to this one's value.
    /// If both are errors, `self`'s error wins (mirrors the tie-break rule
    /// `Cell::apply` uses when both upstreams are already resolved).
    pub fn apply<U>(self, f: Outcome<impl FnOnce(V) -> U, E>) -> Outcome<U, E> {
        match self {
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Value(v) => match f {
                Outcome::Value(f) => Outcome::Value(f(v)),
                Outcome::Error(e) => Outcome::Error(e),
            },
        }
    }
}

impl<V, E> From<Result<V, E>> for Outcome<V, E> {
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Error(e),
        }
    }
}

impl<V, E> From<Outcome<V, E>> for Result<V, E> {
    fn from(outcome: Outcome<V, E>) -> Self {
        match outcome {
            Outcome::Value(v) => Ok(v),
            Outcome::Error(e) => Err(e),
        }
    }
}

impl<V: PartialEq, E: PartialEq> PartialEq for Outcome<V, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Outcome::Value(a), Outcome::Value(b)) => a == b,
            (Outcome::Error(a), Outcome::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl<V: Eq, E: Eq> Eq for Outcome<V, E> {}

//! The error taxonomy: [`Canceled`], [`NoResult`], [`AlreadyResolved`], and
//! [`ResolutionError`], the ready-made error type that mixes a user error in
//! with the crate's own failure modes.

use core::fmt;

/// A cell was canceled: by an explicit [`crate::Resolver::cancel`] call, by
/// a [`crate::Cell::timeout`] firing, or because the owning `Resolver` was
/// dropped without ever resolving its cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canceled {
    reason: String,
}

impl Canceled {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Canceled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "canceled: {}", self.reason)
    }
}

/// `first_value`/`first_resolved` were given no inputs, or (for
/// `first_value`) every input errored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NoResult;

impl fmt::Display for NoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no result: every input was empty or errored")
    }
}

/// A write attempt (`resolve`/`cancel`) found the cell already settled.
///
/// This is reported to the *caller of the losing write*, never to
/// observers; observers only ever see the outcome that actually won. It is
/// a race/programming signal, not a fatal error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlreadyResolved;

impl fmt::Display for AlreadyResolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cell was already resolved")
    }
}

/// A trait for error types that know how to represent the machinery's own
/// failure modes (cancellation, "no result") alongside whatever a user's
/// producer or combinator closures produce.
///
/// Every `Cell<V, E>` that exercises cancellation, `timeout`, `first_value`,
/// or `first_resolved` requires `E: Failure`, since those combinators need
/// to synthesize a `Canceled`/`NoResult` value of the cell's own error type.
/// [`ResolutionError<E>`] is the ready-made implementation; reach for a
/// custom one only if an application needs its cell's error type to *be*
/// its own domain error enum rather than wrap one.
pub trait Failure: Sized {
    fn from_canceled(canceled: Canceled) -> Self;
    fn from_no_result() -> Self;
}

/// The default error type for a [`crate::Cell`]: the machinery's own
/// [`Canceled`] and [`NoResult`] variants, plus a user error `E`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionError<E> {
    Canceled(Canceled),
    NoResult,
    User(E),
}

impl<E> ResolutionError<E> {
    pub fn as_canceled(&self) -> Option<&Canceled> {
        match self {
            ResolutionError::Canceled(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_user(self) -> Option<E> {
        match self {
            ResolutionError::User(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> Failure for ResolutionError<E> {
    fn from_canceled(canceled: Canceled) -> Self {
        ResolutionError::Canceled(canceled)
    }

    fn from_no_result() -> Self {
        ResolutionError::NoResult
    }
}

impl<E> From<E> for ResolutionError<E> {
    fn from(error: E) -> Self {
        ResolutionError::User(error)
    }
}

impl<E: fmt::Display> fmt::Display for ResolutionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::Canceled(c) => c.fmt(f),
            ResolutionError::NoResult => fmt::Display::fmt(&NoResult, f),
            ResolutionError::User(e) => e.fmt(f),
        }
    }
}

#[cfg(feature = "core-error")]
impl<E: fmt::Debug + fmt::Display> core::error::Error for ResolutionError<E> {}

#[cfg(feature = "core-error")]
impl core::error::Error for Canceled {}

#[cfg(feature = "core-error")]
impl core::error::Error for NoResult {}

#[cfg(feature = "core-error")]
impl core::error::Error for AlreadyResolved {}

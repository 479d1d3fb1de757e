//! Diagnostic tracing at the seams where resolution actually happens.
//!
//! Every state transition, waiter push/take-all, and dispatcher submission
//! goes through [`trace!`] or [`debug!`] rather than calling `tracing`
//! directly, so that disabling the `tracing` feature compiles every one of
//! those call sites down to nothing. Shaped on `maitake`/`maitake-sync`'s
//! own `util::tracing` shim: a thin macro indirection, not a wrapper type.

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => {
        tracing::trace!($($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($tt:tt)*) => {
        tracing::debug!($($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

pub(crate) use debug;
pub(crate) use trace;

//! Same trace/debug macro shim as `deferred`'s own `diag` module, so that
//! disabling this crate's `tracing` feature compiles every call site here
//! down to nothing too.

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

pub(crate) use trace;

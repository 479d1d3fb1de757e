//! Shim over `core`/`std` primitives vs. [`loom`]'s simulated equivalents.
//!
//! Production code is written once against this module; `cfg(loom)` builds
//! swap in loom's instrumented atomics and `UnsafeCell` so the `loom_tests`
//! modules alongside [`crate::state`] and [`crate::waiter`] can exhaustively
//! explore interleavings of their CAS loops instead of relying on luck
//! across a handful of real OS threads.

#[cfg(loom)]
pub(crate) use loom::{model, sync, sync::atomic, thread};

#[cfg(not(loom))]
pub(crate) mod sync {
    pub(crate) mod atomic {
        pub(crate) use core::sync::atomic::{AtomicPtr, AtomicU8, Ordering};
    }
    pub(crate) use std::sync::Arc;
}

#[cfg(not(loom))]
pub(crate) use sync::atomic;

#[cfg(not(loom))]
pub(crate) mod thread {
    pub(crate) use std::thread::{current, park, yield_now, Thread};
}

/// Run `f` once under `cfg(not(loom))`; under `cfg(loom)` this is
/// `loom::model`, which instead exhaustively explores `f`'s possible thread
/// interleavings. Production code never calls this directly — only the
/// `#[cfg(test)] mod loom_tests` blocks alongside the structures they model.
#[cfg(not(loom))]
pub(crate) fn model(f: impl FnOnce()) {
    f();
}

#[cfg(loom)]
pub(crate) use loom::cell::UnsafeCell;

#[cfg(not(loom))]
pub(crate) mod cell {
    use core::cell::UnsafeCell as StdUnsafeCell;

    /// A bare `UnsafeCell` with the narrow `with`/`with_mut` access pattern
    /// loom's checked cell exposes, so call sites compile identically under
    /// both cfgs.
    #[derive(Debug)]
    pub(crate) struct UnsafeCell<T>(StdUnsafeCell<T>);

    impl<T> UnsafeCell<T> {
        pub(crate) const fn new(data: T) -> Self {
            Self(StdUnsafeCell::new(data))
        }

        #[inline(always)]
        pub(crate) fn with<R>(&self, f: impl FnOnce(*const T) -> R) -> R {
            f(self.0.get())
        }

        #[inline(always)]
        pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
            f(self.0.get())
        }
    }

    unsafe impl<T: Send> Send for UnsafeCell<T> {}
    unsafe impl<T: Send> Sync for UnsafeCell<T> {}
}

#[cfg(not(loom))]
pub(crate) use cell::UnsafeCell;

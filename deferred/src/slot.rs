//! The resolved outcome's storage: written exactly once, read by many.
//!
//! Unlike [`crate::state`] and [`crate::waiter`] — whose CAS loops are the
//! part of this engine actually worth running under `loom` — the slot's
//! correctness is a direct corollary of the state word's release/acquire
//! protocol: a write only ever happens while the writer holds the
//! `Transient` claim (`CellState::claim`), and a read only ever happens
//! after an observer's acquire-load has witnessed `Resolved`, which
//! happens-after the writer's release-store in `CellState::publish`. Given
//! that happens-before edge, a plain `UnsafeCell` needs no additional
//! instrumentation to be sound.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

pub(crate) struct Slot<T> {
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    pub(crate) const fn empty() -> Self {
        Self {
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    pub(crate) const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(MaybeUninit::new(value)),
        }
    }

    /// Write the slot. Safety: the caller must hold the unique `Transient`
    /// claim on the owning cell's state word, and must not call this more
    /// than once per cell.
    pub(crate) unsafe fn write(&self, value: T) {
        (*self.value.get()).write(value);
    }

    /// Read the slot. Safety: the caller must have already observed the
    /// owning cell's state as `Resolved` via an acquire load.
    pub(crate) unsafe fn assume_init_ref(&self) -> &T {
        (*self.value.get()).assume_init_ref()
    }

    /// Drop the stored value in place. Safety: the caller must know the slot
    /// was actually written (the owning cell's state had reached `Resolved`)
    /// and must not read or drop it again afterward. `Slot` itself has no
    /// `Drop` impl — a `MaybeUninit` never runs `T`'s destructor on its own —
    /// so the owning `Inner` must call this exactly once, from its own
    /// `Drop`, whenever the cell actually resolved.
    pub(crate) unsafe fn assume_init_drop(&self) {
        (*self.value.get()).assume_init_drop();
    }
}

// SAFETY: access is sequenced by the owning `CellState`'s release/acquire
// protocol, as documented above; that protocol is itself `Send`/`Sync` safe
// whenever `T` is.
unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

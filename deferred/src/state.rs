//! The cell's atomic lifecycle state word.
//!
//! Four bit patterns, three of them externally observable (see [`Phase`]):
//! `Waiting`, `Executing`, and `Resolved`. A fourth, `Transient`, exists only
//! between the moment a resolver wins the right to write the slot and the
//! moment it publishes that write; accessors fold `Transient` into
//! `Executing` so callers never see it.
//!
//! This is the same shape as `maitake`'s `WaitCell` state word (claim, then
//! publish, as two separate CAS operations rather than one), generalized
//! from a 3-bit waker-registration state to a 3-phase resolution state.

use crate::diag::trace;
use crate::loom::atomic::{AtomicU8, Ordering::*};

const WAITING: u8 = 0;
const EXECUTING: u8 = 1;
const TRANSIENT: u8 = 2;
const RESOLVED: u8 = 3;

/// The externally observable lifecycle phase of a [`crate::Cell`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// No producer has claimed the right to resolve this cell yet.
    Waiting,
    /// A producer is running (or has claimed the cell for writing).
    Executing,
    /// The cell has been resolved; its slot holds a valid outcome.
    Resolved,
}

pub(crate) struct CellState {
    bits: AtomicU8,
}

/// Returned when a `claim` attempt finds the cell already resolved.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct AlreadyResolved;

impl CellState {
    #[cfg(not(loom))]
    pub(crate) const fn new() -> Self {
        Self {
            bits: AtomicU8::new(WAITING),
        }
    }

    #[cfg(loom)]
    pub(crate) fn new() -> Self {
        Self {
            bits: AtomicU8::new(WAITING),
        }
    }

    #[cfg(not(loom))]
    pub(crate) const fn new_resolved() -> Self {
        Self {
            bits: AtomicU8::new(RESOLVED),
        }
    }

    #[cfg(loom)]
    pub(crate) fn new_resolved() -> Self {
        Self {
            bits: AtomicU8::new(RESOLVED),
        }
    }

    /// Advisory `Waiting -> Executing` transition. Idempotent: a no-op if
    /// the cell isn't `Waiting` anymore, in any phase.
    pub(crate) fn begin_execution(&self) {
        let won = self
            .bits
            .compare_exchange(WAITING, EXECUTING, AcqRel, Relaxed)
            .is_ok();
        trace!(won, "CellState::begin_execution");
    }

    /// Attempt to claim exclusive write access to the slot, from whatever
    /// phase the cell is currently in (`Waiting` or `Executing`).
    ///
    /// On success, the caller holds the sole right to write `slot` and must
    /// call [`publish`](Self::publish) exactly once afterward. On failure,
    /// the cell is already `Resolved` (or another thread is mid-claim; the
    /// caller should retry, since `Transient` is not a terminal state).
    pub(crate) fn claim(&self) -> Result<(), AlreadyResolved> {
        let mut current = self.bits.load(Relaxed);
        loop {
            if current == RESOLVED {
                trace!("CellState::claim -> AlreadyResolved");
                return Err(AlreadyResolved);
            }
            if current == TRANSIENT {
                // Another resolver is concurrently attempting the claim;
                // only one can win. Spin until it either publishes
                // (Resolved) or, in practice, never happens twice for the
                // same cell (resolve holds the claim until publish).
                current = self.bits.load(Relaxed);
                continue;
            }
            match self
                .bits
                .compare_exchange_weak(current, TRANSIENT, AcqRel, Relaxed)
            {
                Ok(_) => {
                    trace!("CellState::claim -> won");
                    return Ok(());
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Publish the slot: `Transient -> Resolved`. Must only be called by the
    /// thread that won [`claim`](Self::claim), after writing `slot`.
    pub(crate) fn publish(&self) {
        trace!("CellState::publish -> Resolved");
        self.bits.store(RESOLVED, Release);
    }

    pub(crate) fn phase(&self) -> Phase {
        match self.bits.load(Acquire) {
            WAITING => Phase::Waiting,
            RESOLVED => Phase::Resolved,
            _ => Phase::Executing,
        }
    }

    #[inline]
    pub(crate) fn is_resolved(&self) -> bool {
        self.bits.load(Acquire) == RESOLVED
    }
}

impl core::fmt::Debug for CellState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CellState").field("phase", &self.phase()).finish()
    }
}

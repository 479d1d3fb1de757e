//! Lock-free, single-assignment asynchronous result cells.
//!
//! A [`Cell`] starts out unresolved and settles at most once, with either a
//! value or an error ([`Outcome`]). Any number of observers can register
//! interest before or after that happens — `observe` for a callback,
//! `observe_blocking` to park the calling thread — and a [`Resolver`] is the
//! one capability allowed to settle a given cell. The combinator methods on
//! `Cell` (`map`, `flat_map`, `apply`, `recover`, `delay`, `timeout`,
//! `combine`) and the free functions ([`first_value`], [`first_resolved`],
//! [`in_parallel`]) build directed graphs of cells without ever taking a
//! lock on the resolution fast path.
//!
//! The engine itself never spawns a thread or decides how a callback runs —
//! every `Cell` is constructed against a [`Dispatch`] implementation the
//! caller supplies. The sibling `deferred-dispatch` crate ships a ready-made
//! thread-pool one.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cell;
mod combinators;
mod diag;
mod dispatch;
mod error;
mod loom;
mod outcome;
mod resolver;
mod slot;
mod state;
mod waiter;

pub use cell::Cell;
pub use combinators::{first_resolved, first_value, in_parallel};
pub use dispatch::{Dispatch, Inline, Priority, Queue, Task};
pub use error::{AlreadyResolved, Canceled, Failure, NoResult, ResolutionError};
pub use outcome::Outcome;
pub use resolver::Resolver;
pub use state::Phase;

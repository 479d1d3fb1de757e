//! Combinator constructors (§4.5): `map`, `flat_map`, `apply`, `recover`,
//! `delay`, `timeout`, `combine`, `first_value`, `first_resolved`,
//! `in_parallel`.
//!
//! Every combinator here follows the same shape: build a fresh `out` cell,
//! register one or more `observe` callbacks on the upstream(s), and resolve
//! `out` from inside those callbacks. None of them touch `state`, `slot`, or
//! `waiters` directly — they're ordinary consumers of the public `Cell`
//! contract, same as any external caller.

mod apply;
mod combine;
mod delay;
mod flat_map;
mod map;
mod parallel;
mod race;
mod recover;
mod timeout;

pub use parallel::in_parallel;
pub use race::{first_resolved, first_value};

//! A persistent hash array mapped trie (HAMT).
//!
//! A HAMT is a trie keyed by the bits of a hash: each interior node is a
//! sparse array of up to 32 children, indexed by popcount on a 32-bit
//! occupancy bitmap. Updates copy only the nodes on the path to the
//! changed entry, so two map values produced by successive updates share
//! every unchanged subtree.
//!
//! # Key properties
//!
//! - **Persistent**: every mutating operation returns a new [`Map`],
//!   leaving the input untouched.
//! - **Structural sharing**: updates allocate `O(depth)` nodes, not
//!   `O(size)`; unrelated readers of an old map version never observe a
//!   later update.
//! - **Structural digest**: each node caches a digest (an `a' = 31*a + b`
//!   accumulator over its content) so equality and hashing of a whole map
//!   can fast-fail on a single comparison before falling back to a full
//!   walk.
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`.
//!
//! # References
//!
//! - Bagwell, 2001 — "Ideal Hash Trees"
//! - Steindorfer & Vinju, 2015 — "Optimizing Hash-Array Mapped Tries for
//!   Fast and Lean Immutable JVM Collections", OOPSLA 2015

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod digest;
pub mod iter;
pub mod node;

mod map;
mod ops;

#[cfg(test)]
mod tests;

pub use map::Map;

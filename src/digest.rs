//! Structural digest — an `a' = 31*a + b` accumulator over each node's
//! content, plus the 32-bit key hash used throughout bit-index arithmetic.
//!
//! Every node caches its own digest (see [`crate::node::Node::digest`]), so
//! a copy-on-write rebuild recomputes a digest from its *immediate*
//! children's already-cached digests rather than re-walking a subtree.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const LEAF_SEED: u64 = 1;
const COLLISION_SEED: u64 = 2;
const BRANCH_SEED: u64 = 3;

/// Computes the 64-bit hash of a value using the standard hasher.
#[must_use]
pub fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Computes the 32-bit key hash the trie indexes by, truncating the
/// standard library's 64-bit `SipHash` to its low 32 bits. A 64-bit hash
/// would have to either get truncated or drive a re-parameterized level
/// count and shift; this crate truncates, keeping the five-bits-per-level,
/// seven-level arithmetic fixed.
#[must_use]
pub fn hash_key<K: Hash>(key: &K) -> u32 {
    hash_one(key) as u32
}

/// One step of the `a' = 31*a + b` mixing accumulator.
#[inline]
const fn mix(a: u64, b: u64) -> u64 {
    a.wrapping_mul(31).wrapping_add(b)
}

/// Structural digest contribution of a leaf: seed 1, then `(hash, hash(value))`.
#[must_use]
pub fn leaf_digest(hash: u32, value_hash: u64) -> u64 {
    mix(mix(LEAF_SEED, u64::from(hash)), value_hash)
}

/// Structural digest contribution of a collision node: seed 2, then
/// `(hash, hash(values))`.
///
/// Unlike a leaf or a branch, a collision list's entry order is an
/// artifact of rebuild history, not something the hash function
/// determines — two maps with an identical key set can legitimately end
/// up with their shared collision list in different orders. So the
/// per-entry value hashes are combined with XOR, a commutative
/// combinator, rather than folded through the sequential `mix`
/// accumulator used for leaf/branch digests. This keeps the digest a
/// sound pre-check for [`crate::Map`]'s `PartialEq`/`Hash`: equal
/// content always yields an equal digest, regardless of history.
#[must_use]
pub fn collision_digest(hash: u32, value_hashes: impl IntoIterator<Item = u64>) -> u64 {
    let combined = value_hashes.into_iter().fold(0u64, |acc, vh| acc ^ vh);
    mix(mix(COLLISION_SEED, u64::from(hash)), combined)
}

/// Structural digest contribution of a branch: seed 3, then
/// `(bitmap, hash(children))`, mixing one child digest per slot in
/// ascending bit order.
#[must_use]
pub fn branch_digest(bitmap: u32, child_digests: impl IntoIterator<Item = u64>) -> u64 {
    let mut acc = mix(BRANCH_SEED, u64::from(bitmap));
    for cd in child_digests {
        acc = mix(acc, cd);
    }
    acc
}

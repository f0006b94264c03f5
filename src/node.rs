//! HAMT node types and bit-index arithmetic.

use std::rc::Rc;

use crate::digest;

/// Bits consumed per trie level (5 -> 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Greatest valid shift for a 32-bit hash (levels: 0, 5, 10, ..., 30 -> 7 levels).
pub const MAX_SHIFT: u32 = 30;

/// A HAMT node: a leaf, a hash-collision list, or a bitmap-indexed branch.
///
/// All three variants cache a structural digest (see [`crate::digest`]) so
/// that equality and hashing of a whole map can short-circuit on mismatch
/// without a full traversal, and so that a copy-on-write rebuild only has
/// to recompute the digest of the nodes it actually replaces.
pub enum Node<K, V> {
    /// A single key-value pair with its cached 32-bit hash.
    Leaf {
        /// Cached 32-bit hash of `key`.
        hash: u32,
        /// The key.
        key: K,
        /// The value.
        value: V,
        /// Structural digest of this node.
        digest: u64,
    },
    /// Two or more entries that share a 32-bit hash but have distinct keys.
    ///
    /// Invariant: `entries.len() >= 2`.
    Collision {
        /// The hash shared by every entry.
        hash: u32,
        /// Pairwise key-distinct entries sharing `hash`.
        entries: Box<[(K, V)]>,
        /// Structural digest of this node.
        digest: u64,
    },
    /// A bitmap-indexed sparse array of child nodes.
    ///
    /// Invariant: `bitmap.count_ones() as usize == children.len()`.
    /// Invariant: no child is itself a `Branch` with `bitmap == 0`.
    Branch {
        /// Occupancy bitmap; bit *i* set iff virtual slot *i* has a child.
        bitmap: u32,
        /// Densely packed children, ordered by ascending virtual slot.
        children: Box<[Rc<Node<K, V>>]>,
        /// Structural digest of this node.
        digest: u64,
    },
}

impl<K, V> Node<K, V> {
    /// The canonical empty node: a branch with `bitmap == 0` and no children.
    ///
    /// This is the one and only representation of emptiness.
    pub fn empty() -> Rc<Self> {
        Rc::new(Self::Branch {
            bitmap: 0,
            children: Box::new([]),
            digest: digest::branch_digest(0, std::iter::empty()),
        })
    }

    /// `true` iff this node is the canonical empty branch.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Branch { bitmap: 0, .. })
    }

    /// Structural digest of this node, cached at construction time.
    #[must_use]
    pub const fn digest(&self) -> u64 {
        match self {
            Self::Leaf { digest, .. } | Self::Collision { digest, .. } | Self::Branch { digest, .. } => *digest,
        }
    }

    /// The cached hash of a non-branch node (leaf or collision).
    ///
    /// # Panics
    ///
    /// Panics if called on a `Branch` — only [`join`](crate::ops::insert::join)
    /// calls this, and only ever on the two non-branch nodes it is joining.
    #[must_use]
    pub fn non_branch_hash(&self) -> u32 {
        match self {
            Self::Leaf { hash, .. } | Self::Collision { hash, .. } => *hash,
            Self::Branch { .. } => unreachable!("non_branch_hash called on a Branch"),
        }
    }

    /// Number of key-value pairs reachable from this node.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Collision { entries, .. } => entries.len(),
            Self::Branch { children, .. } => children.iter().map(|c| c.count()).sum(),
        }
    }
}

impl<K: Clone, V: Clone> Clone for Node<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf { hash, key, value, digest } => Self::Leaf {
                hash: *hash,
                key: key.clone(),
                value: value.clone(),
                digest: *digest,
            },
            Self::Collision { hash, entries, digest } => Self::Collision {
                hash: *hash,
                entries: entries.clone(),
                digest: *digest,
            },
            Self::Branch { bitmap, children, digest } => Self::Branch {
                bitmap: *bitmap,
                children: children.clone(),
                digest: *digest,
            },
        }
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf { hash, key, value, .. } => f
                .debug_struct("Leaf")
                .field("hash", hash)
                .field("key", key)
                .field("value", value)
                .finish(),
            Self::Collision { hash, entries, .. } => f
                .debug_struct("Collision")
                .field("hash", hash)
                .field("entries", entries)
                .finish(),
            Self::Branch { bitmap, children, .. } => f
                .debug_struct("Branch")
                .field("bitmap", &format_args!("{bitmap:#034b}"))
                .field("children", children)
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Bit-index arithmetic
// ---------------------------------------------------------------------------

/// Extracts the 5-bit virtual slot of `hash` at level `shift`.
#[inline]
#[must_use]
pub const fn fragment(hash: u32, shift: u32) -> u32 {
    (hash >> shift) & 0x1F
}

/// The single-bit occupancy mask for a virtual slot `frag` (0..=31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// The compact physical index of `bit` within `bitmap`: the popcount of
/// every occupied slot below it.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

/// Collapses a freshly rebuilt subtree that is a branch wrapping exactly
/// one non-branch child back into that child directly.
///
/// A branch's only reason to exist is to disambiguate two or more
/// entries that share a hash fragment at its level; once a rebuild
/// (after a remove or a filter) leaves it with a single `Leaf` or
/// `Collision` child, the wrapping branch adds nothing and must be
/// replaced by that child so the tree matches the shape plain insertion
/// of the same surviving entries would produce. A single `Branch` child
/// is left alone — it still disambiguates two or more entries further
/// down and is not a candidate for inlining.
#[must_use]
pub fn inline_single_child<K, V>(node: Rc<Node<K, V>>) -> Rc<Node<K, V>> {
    match &*node {
        Node::Branch { children, .. }
            if children.len() == 1 && !matches!(&*children[0], Node::Branch { .. }) =>
        {
            Rc::clone(&children[0])
        }
        _ => node,
    }
}

/// Recursively checks the structural invariants against a node, including
/// hash-cache and digest-cache correctness.
///
/// Debug/test tooling only; production code never calls this.
#[must_use]
pub fn invariants<K: std::hash::Hash + Eq, V: std::hash::Hash>(node: &Node<K, V>) -> bool {
    invariants_at(node, true)
}

/// `is_root` distinguishes the map's own root branch — which legitimately
/// may have exactly one `Leaf`/`Collision` child (a singleton map has no
/// other way to be shaped) — from a nested branch, where the same shape
/// is the canonical-minimality violation [`inline_single_child`] exists
/// to prevent.
fn invariants_at<K: std::hash::Hash + Eq, V: std::hash::Hash>(node: &Node<K, V>, is_root: bool) -> bool {
    match node {
        Node::Leaf { hash, key, value, digest } => {
            *hash == crate::digest::hash_key(key)
                && *digest == crate::digest::leaf_digest(*hash, crate::digest::hash_one(value))
        }
        Node::Collision { hash, entries, digest } => {
            entries.len() >= 2
                && entries.iter().all(|(k, _)| crate::digest::hash_key(k) == *hash)
                && entries
                    .iter()
                    .enumerate()
                    .all(|(i, (k, _))| entries.iter().skip(i + 1).all(|(k2, _)| k != k2))
                && *digest
                    == crate::digest::collision_digest(
                        *hash,
                        entries.iter().map(|(_, v)| crate::digest::hash_one(v)),
                    )
        }
        Node::Branch { bitmap, children, digest } => {
            bitmap.count_ones() as usize == children.len()
                && children.iter().all(|c| !c.is_empty() && invariants_at(c, false))
                && *digest == crate::digest::branch_digest(*bitmap, children.iter().map(|c| c.digest()))
                // Canonical minimality: a non-root branch with exactly one
                // child must not wrap a Leaf/Collision directly — that
                // child should have been inlined by `inline_single_child`.
                // A single Branch child, or the root's own single child, is
                // fine: the former still disambiguates further down, the
                // latter is the only way to shape a singleton map.
                && (is_root || children.len() != 1 || matches!(&*children[0], Node::Branch { .. }))
        }
    }
}

//! `filterWithKey` — bottom-up predicate-driven rebuild, and the
//! difference/intersection family built on top of it.

use std::rc::Rc;

use crate::digest;
use crate::node::{self, Node};

/// Keeps only the entries for which `keep(key, value)` returns `true`,
/// rebuilding every node on the path to a changed descendant.
///
/// Returns `None` when nothing survives (the caller substitutes the
/// canonical empty node).
pub fn filter_with_key<K, V>(node: &Node<K, V>, keep: &mut dyn FnMut(&K, &V) -> bool) -> Option<Rc<Node<K, V>>>
where
    K: Clone,
    V: Clone,
{
    match node {
        Node::Leaf { hash, key, value, digest } => {
            if keep(key, value) {
                Some(Rc::new(Node::Leaf { hash: *hash, key: key.clone(), value: value.clone(), digest: *digest }))
            } else {
                None
            }
        }
        Node::Collision { hash, entries, .. } => {
            let survivors: Vec<(K, V)> =
                entries.iter().filter(|(k, v)| keep(k, v)).cloned().collect();
            match survivors.len() {
                0 => None,
                1 => {
                    let (k, v) = survivors.into_iter().next().expect("checked len == 1");
                    let value_hash = digest::hash_one(&v);
                    Some(Rc::new(Node::Leaf { hash: *hash, key: k, value: v, digest: digest::leaf_digest(*hash, value_hash) }))
                }
                _ => {
                    let value_hashes: Vec<u64> = survivors.iter().map(|(_, v)| digest::hash_one(v)).collect();
                    let new_digest = digest::collision_digest(*hash, value_hashes);
                    Some(Rc::new(Node::Collision { hash: *hash, entries: survivors.into_boxed_slice(), digest: new_digest }))
                }
            }
        }
        Node::Branch { bitmap, children, .. } => {
            let mut new_bitmap = 0u32;
            let mut new_children = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                if let Some(kept) = filter_with_key(child, keep) {
                    // A surviving child that collapsed to a single-entry
                    // branch gets inlined here, same as a post-remove rebuild.
                    let kept = node::inline_single_child(kept);
                    // Recover the slot's virtual bit from its physical position.
                    let bit = nth_set_bit(*bitmap, i);
                    new_bitmap |= bit;
                    new_children.push(kept);
                }
            }
            if new_bitmap == 0 {
                None
            } else {
                let digest = digest::branch_digest(new_bitmap, new_children.iter().map(|c| c.digest()));
                Some(Rc::new(Node::Branch { bitmap: new_bitmap, children: new_children.into_boxed_slice(), digest }))
            }
        }
    }
}

/// The bit of the `n`th (0-indexed) set bit in `bitmap`, scanning from the
/// low end — inverse of `node::index`.
fn nth_set_bit(bitmap: u32, n: usize) -> u32 {
    let mut remaining = n;
    let mut b = bitmap;
    loop {
        let lowest = b & b.wrapping_neg();
        if remaining == 0 {
            return lowest;
        }
        b &= !lowest;
        remaining -= 1;
    }
}

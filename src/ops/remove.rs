//! `delete` — COW path-copy removal with canonical-empty collapse.

use std::rc::Rc;

use crate::digest;
use crate::node::{self, Node};
use crate::ops::array;

/// Outcome of a recursive remove.
pub enum RemoveOutcome<K, V> {
    /// `key` was not present; the subtree is unchanged.
    NotFound,
    /// `key` was removed.
    Removed {
        /// New root of the modified subtree, or `None` if it is now empty.
        node: Option<Rc<Node<K, V>>>,
        /// The value that was removed.
        old: V,
    },
}

/// Removes `key` (with precomputed `hash`) from the subtree rooted at `node`.
pub fn remove<K: Eq + Clone, V: Clone + std::hash::Hash>(
    node: &Node<K, V>,
    hash: u32,
    key: &K,
    shift: u32,
) -> RemoveOutcome<K, V> {
    match node {
        Node::Leaf { hash: h, key: k, value, .. } => {
            if *h == hash && k == key {
                RemoveOutcome::Removed { node: None, old: value.clone() }
            } else {
                RemoveOutcome::NotFound
            }
        }
        Node::Collision { hash: h, entries, .. } => {
            if *h != hash {
                return RemoveOutcome::NotFound;
            }
            let Some(pos) = entries.iter().position(|(k, _)| k == key) else {
                return RemoveOutcome::NotFound;
            };
            let old = entries[pos].1.clone();

            if entries.len() == 2 {
                let (rk, rv) = &entries[1 - pos];
                let leaf = make_leaf(*h, rk.clone(), rv.clone());
                return RemoveOutcome::Removed { node: Some(leaf), old };
            }

            // Reverse-accumulator rebuild, minus the removed key.
            let mut survivors: Vec<(K, V)> =
                entries.iter().filter(|(k, _)| k != key).cloned().collect();
            survivors.reverse();
            let value_hashes: Vec<u64> = survivors.iter().map(|(_, v)| digest::hash_one(v)).collect();
            let new_digest = digest::collision_digest(*h, value_hashes);
            RemoveOutcome::Removed {
                node: Some(Rc::new(Node::Collision {
                    hash: *h,
                    entries: survivors.into_boxed_slice(),
                    digest: new_digest,
                })),
                old,
            }
        }
        Node::Branch { bitmap, children, .. } => {
            let frag = node::fragment(hash, shift);
            let bit = node::mask(frag);
            if bitmap & bit == 0 {
                return RemoveOutcome::NotFound;
            }
            let at = node::index(*bitmap, bit);
            match remove(&children[at], hash, key, shift + node::BITS_PER_LEVEL) {
                RemoveOutcome::NotFound => RemoveOutcome::NotFound,
                RemoveOutcome::Removed { node: None, old } => {
                    let new_bitmap = bitmap & !bit;
                    if new_bitmap == 0 {
                        RemoveOutcome::Removed { node: None, old }
                    } else {
                        let new_children = array::remove_at(children, at);
                        let new_digest =
                            digest::branch_digest(new_bitmap, new_children.iter().map(|c| c.digest()));
                        RemoveOutcome::Removed {
                            node: Some(Rc::new(Node::Branch {
                                bitmap: new_bitmap,
                                children: new_children,
                                digest: new_digest,
                            })),
                            old,
                        }
                    }
                }
                RemoveOutcome::Removed { node: Some(new_child), old } => {
                    let new_child = node::inline_single_child(new_child);
                    let new_children = array::replace_at(children, at, new_child);
                    let new_digest = digest::branch_digest(*bitmap, new_children.iter().map(|c| c.digest()));
                    RemoveOutcome::Removed {
                        node: Some(Rc::new(Node::Branch {
                            bitmap: *bitmap,
                            children: new_children,
                            digest: new_digest,
                        })),
                        old,
                    }
                }
            }
        }
    }
}

fn make_leaf<K, V: std::hash::Hash>(hash: u32, key: K, value: V) -> Rc<Node<K, V>> {
    let value_hash = digest::hash_one(&value);
    Rc::new(Node::Leaf { hash, key, value, digest: digest::leaf_digest(hash, value_hash) })
}

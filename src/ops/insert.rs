//! `insertWith` / `insert` and node-joining — COW path-copy insert with
//! digest maintenance.

use std::hash::Hash;
use std::rc::Rc;

use crate::digest;
use crate::node::{self, Node};
use crate::ops::array;

/// Outcome of a recursive insert.
pub struct InsertOutcome<K, V> {
    /// New (COW-copied) root of the modified subtree.
    pub node: Rc<Node<K, V>>,
    /// The value previously stored under this key, if any.
    pub old: Option<V>,
}

/// Inserts `(key, value)` into the subtree rooted at `node`, combining with
/// any existing value via `combine(new, old) -> merged`.
///
/// `insert` is `insert_with` with `combine = |new, _old| new`.
pub fn insert_with<K, V>(
    node: &Node<K, V>,
    hash: u32,
    key: K,
    value: V,
    combine: &mut dyn FnMut(V, V) -> V,
    shift: u32,
) -> InsertOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    match node {
        Node::Leaf { hash: h, key: k, value: v, .. } => {
            if *h == hash && *k == key {
                let merged = combine(value, v.clone());
                let value_hash = digest::hash_one(&merged);
                InsertOutcome {
                    node: Rc::new(Node::Leaf {
                        hash,
                        key,
                        value: merged,
                        digest: digest::leaf_digest(hash, value_hash),
                    }),
                    old: Some(v.clone()),
                }
            } else if *h == hash {
                // Same hash, different key: bundle into a collision node.
                let entries: Box<[(K, V)]> = Box::new([(k.clone(), v.clone()), (key, value)]);
                let value_hashes = entries.iter().map(|(_, v)| digest::hash_one(v));
                let digest = digest::collision_digest(hash, value_hashes.collect::<Vec<_>>());
                InsertOutcome {
                    node: Rc::new(Node::Collision { hash, entries, digest }),
                    old: None,
                }
            } else {
                // Different hash entirely: join the two leaves into a branch.
                let new_leaf = make_leaf(hash, key, value);
                InsertOutcome { node: join(shift, Rc::new(node.clone()), new_leaf), old: None }
            }
        }
        Node::Collision { hash: h, entries, .. } => {
            if *h == hash {
                insert_into_collision(*h, entries, key, value, combine)
            } else {
                let new_leaf = make_leaf(hash, key, value);
                InsertOutcome { node: join(shift, Rc::new(node.clone()), new_leaf), old: None }
            }
        }
        Node::Branch { bitmap, children, .. } => {
            insert_into_branch(*bitmap, children, hash, key, value, combine, shift)
        }
    }
}

fn make_leaf<K, V: Hash>(hash: u32, key: K, value: V) -> Rc<Node<K, V>> {
    let value_hash = digest::hash_one(&value);
    Rc::new(Node::Leaf { hash, key, value, digest: digest::leaf_digest(hash, value_hash) })
}

/// Rebuilds a collision list via a reverse accumulator: survivors
/// (every entry but the matched key, if any) are collected in reverse
/// order, then the new/merged entry is prepended.
fn insert_into_collision<K, V>(
    hash: u32,
    entries: &[(K, V)],
    key: K,
    value: V,
    combine: &mut dyn FnMut(V, V) -> V,
) -> InsertOutcome<K, V>
where
    K: Eq + Clone,
    V: Hash + Clone,
{
    let old = entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone());
    let merged = match &old {
        Some(v_old) => combine(value, v_old.clone()),
        None => value,
    };

    let mut survivors: Vec<(K, V)> =
        entries.iter().filter(|(k, _)| *k != key).cloned().collect();
    survivors.reverse();

    let mut new_entries = Vec::with_capacity(survivors.len() + 1);
    new_entries.push((key, merged));
    new_entries.extend(survivors);

    let value_hashes: Vec<u64> = new_entries.iter().map(|(_, v)| digest::hash_one(v)).collect();
    let new_digest = digest::collision_digest(hash, value_hashes);

    InsertOutcome {
        node: Rc::new(Node::Collision { hash, entries: new_entries.into_boxed_slice(), digest: new_digest }),
        old,
    }
}

#[allow(clippy::too_many_arguments)]
fn insert_into_branch<K, V>(
    bitmap: u32,
    children: &[Rc<Node<K, V>>],
    hash: u32,
    key: K,
    value: V,
    combine: &mut dyn FnMut(V, V) -> V,
    shift: u32,
) -> InsertOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    let frag = node::fragment(hash, shift);
    let bit = node::mask(frag);

    if bitmap & bit == 0 {
        let at = node::index(bitmap, bit);
        let new_leaf = make_leaf(hash, key, value);
        let new_bitmap = bitmap | bit;
        let new_children = array::insert_at(children, at, new_leaf);
        let new_digest = digest::branch_digest(new_bitmap, new_children.iter().map(|c| c.digest()));
        InsertOutcome {
            node: Rc::new(Node::Branch { bitmap: new_bitmap, children: new_children, digest: new_digest }),
            old: None,
        }
    } else {
        let at = node::index(bitmap, bit);
        let outcome = insert_with(&children[at], hash, key, value, combine, shift + node::BITS_PER_LEVEL);
        let new_children = array::replace_at(children, at, outcome.node);
        let new_digest = digest::branch_digest(bitmap, new_children.iter().map(|c| c.digest()));
        InsertOutcome {
            node: Rc::new(Node::Branch { bitmap, children: new_children, digest: new_digest }),
            old: outcome.old,
        }
    }
}

/// Joins two non-branch nodes with distinct cached hashes into a branch.
///
/// Terminates because `n1` and `n2` have distinct 32-bit hashes, so their
/// virtual slots must diverge by `shift == MAX_SHIFT` at the latest.
pub fn join<K, V>(shift: u32, n1: Rc<Node<K, V>>, n2: Rc<Node<K, V>>) -> Rc<Node<K, V>> {
    debug_assert!(shift <= node::MAX_SHIFT, "join exceeded MAX_SHIFT without hashes diverging");

    let f1 = node::fragment(n1.non_branch_hash(), shift);
    let f2 = node::fragment(n2.non_branch_hash(), shift);

    if f1 == f2 {
        let child = join(shift + node::BITS_PER_LEVEL, n1, n2);
        let bitmap = node::mask(f1);
        let digest = digest::branch_digest(bitmap, [child.digest()]);
        Rc::new(Node::Branch { bitmap, children: array::singleton(child), digest })
    } else {
        let (first, second) = if f1 < f2 { (n1, n2) } else { (n2, n1) };
        let bitmap = node::mask(f1) | node::mask(f2);
        let digest = digest::branch_digest(bitmap, [first.digest(), second.digest()]);
        Rc::new(Node::Branch { bitmap, children: array::pair(first, second), digest })
    }
}

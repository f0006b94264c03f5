//! `unionWith` / `union`.

use std::hash::Hash;
use std::rc::Rc;

use crate::digest;
use crate::node::{self, Node};
use crate::ops::insert::insert_with;

/// Combines `a` and `b`, resolving key collisions via `combine(a_value, b_value)`.
///
/// If either map is the canonical empty node, the other is returned unchanged
/// (sharing its `Rc`, no allocation).
pub fn union_with<K, V>(
    a: &Rc<Node<K, V>>,
    b: &Rc<Node<K, V>>,
    combine: &mut dyn FnMut(V, V) -> V,
) -> Rc<Node<K, V>>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    if a.is_empty() {
        return Rc::clone(b);
    }
    if b.is_empty() {
        return Rc::clone(a);
    }
    node_union(a, b, combine, 0)
}

fn node_union<K, V>(
    a: &Rc<Node<K, V>>,
    b: &Rc<Node<K, V>>,
    combine: &mut dyn FnMut(V, V) -> V,
    shift: u32,
) -> Rc<Node<K, V>>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    match (&**a, &**b) {
        (Node::Branch { bitmap: bma, children: ca, .. }, Node::Branch { bitmap: bmb, children: cb, .. }) => {
            let new_bitmap = bma | bmb;
            let mut children = Vec::with_capacity(new_bitmap.count_ones() as usize);
            for frag in 0..32 {
                let bit = node::mask(frag);
                if new_bitmap & bit == 0 {
                    continue;
                }
                let child = match (bma & bit != 0, bmb & bit != 0) {
                    (true, true) => {
                        let ia = node::index(*bma, bit);
                        let ib = node::index(*bmb, bit);
                        node_union(&ca[ia], &cb[ib], combine, shift + node::BITS_PER_LEVEL)
                    }
                    (true, false) => Rc::clone(&ca[node::index(*bma, bit)]),
                    (false, true) => Rc::clone(&cb[node::index(*bmb, bit)]),
                    (false, false) => unreachable!("bit set in union but absent from both sides"),
                };
                children.push(child);
            }
            let digest = digest::branch_digest(new_bitmap, children.iter().map(|c| c.digest()));
            Rc::new(Node::Branch { bitmap: new_bitmap, children: children.into_boxed_slice(), digest })
        }
        (Node::Leaf { hash, key, value, .. }, _) => {
            insert_with(b, *hash, key.clone(), value.clone(), combine, shift).node
        }
        (Node::Collision { hash, entries, .. }, _) => {
            let mut acc = Rc::clone(b);
            for (k, v) in entries.iter() {
                acc = insert_with(&acc, *hash, k.clone(), v.clone(), combine, shift).node;
            }
            acc
        }
        (Node::Branch { .. }, Node::Leaf { .. } | Node::Collision { .. }) => {
            // Swap arguments and flip the combiner so the branch arm above
            // always sees its peer on the right.
            let mut flipped = |new: V, old: V| combine(old, new);
            node_union(b, a, &mut flipped, shift)
        }
    }
}

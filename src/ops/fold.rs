//! `foldWithKey` / `foldrWithKey` — strict left/right folds over a node's
//! entries, branch-array order then collision-list order.

use crate::node::Node;

/// Left fold: `f(... f(f(init, k0, v0), k1, v1) ..., kn, vn)`, visiting a
/// branch's children in ascending virtual-slot order and a collision list
/// in storage order.
pub fn fold_with_key<K, V, B>(node: &Node<K, V>, init: B, f: &mut dyn FnMut(B, &K, &V) -> B) -> B {
    match node {
        Node::Leaf { key, value, .. } => f(init, key, value),
        Node::Collision { entries, .. } => entries.iter().fold(init, |acc, (k, v)| f(acc, k, v)),
        Node::Branch { children, .. } => {
            children.iter().fold(init, |acc, child| fold_with_key(child, acc, f))
        }
    }
}

/// Right fold: `f(k0, v0, f(k1, v1, ... f(kn, vn, init) ...))`.
pub fn foldr_with_key<K, V, B>(node: &Node<K, V>, init: B, f: &mut dyn FnMut(&K, &V, B) -> B) -> B {
    match node {
        Node::Leaf { key, value, .. } => f(key, value, init),
        Node::Collision { entries, .. } => {
            entries.iter().rev().fold(init, |acc, (k, v)| f(k, v, acc))
        }
        Node::Branch { children, .. } => {
            children.iter().rev().fold(init, |acc, child| foldr_with_key(child, acc, f))
        }
    }
}

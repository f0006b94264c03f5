//! Lookup — read-only descent, no allocation.

use crate::node::{self, Node};

/// Searches for `key` (with precomputed `hash`) in the subtree rooted at `node`.
pub fn get<'a, K: Eq, V>(node: &'a Node<K, V>, hash: u32, key: &K, shift: u32) -> Option<&'a V> {
    match node {
        Node::Leaf { hash: h, key: k, value, .. } => {
            if *h == hash && k == key { Some(value) } else { None }
        }
        Node::Collision { hash: h, entries, .. } => {
            if *h != hash {
                return None;
            }
            entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
        }
        Node::Branch { bitmap, children, .. } => {
            let frag = node::fragment(hash, shift);
            let bit = node::mask(frag);
            if bitmap & bit == 0 {
                return None;
            }
            let idx = node::index(*bitmap, bit);
            get(&children[idx], hash, key, shift + node::BITS_PER_LEVEL)
        }
    }
}

//! Eager depth-first iteration over a map's entries.

use crate::node::Node;

/// Borrowing iterator over `(&K, &V)` pairs, in branch-array-then-collision
/// order (the same order [`crate::ops::fold::fold_with_key`] visits).
///
/// Entries are collected up front rather than walked lazily node-by-node;
/// this keeps the iterator itself a flat `Vec` cursor instead of an
/// explicit recursion stack.
pub struct Iter<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    pos: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>) -> Self {
        let mut entries = Vec::with_capacity(root.count());
        collect(root, &mut entries);
        Self { entries, pos: 0 }
    }
}

fn collect<'a, K, V>(node: &'a Node<K, V>, out: &mut Vec<(&'a K, &'a V)>) {
    match node {
        Node::Leaf { key, value, .. } => out.push((key, value)),
        Node::Collision { entries, .. } => out.extend(entries.iter().map(|(k, v)| (k, v))),
        Node::Branch { children, .. } => {
            for child in children.iter() {
                collect(child, out);
            }
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = *self.entries.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

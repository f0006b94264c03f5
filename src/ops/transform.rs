//! `mapWithKey` (structure-preserving value substitution) and
//! `traverseWithKey` (its effectful, fallible generalization).

use std::rc::Rc;

use crate::digest;
use crate::node::Node;

/// Rebuilds every node with `f(key, value)` applied to each value.
///
/// Hashes (and therefore branch/collision shape) are untouched; only
/// digests are recomputed, since they are seeded from value content.
pub fn map_with_key<K, V, V2>(node: &Node<K, V>, f: &mut dyn FnMut(&K, V) -> V2) -> Rc<Node<K, V2>>
where
    K: Clone,
    V: Clone,
    V2: std::hash::Hash,
{
    match node {
        Node::Leaf { hash, key, value, .. } => {
            let new_value = f(key, value.clone());
            let value_hash = digest::hash_one(&new_value);
            Rc::new(Node::Leaf { hash: *hash, key: key.clone(), value: new_value, digest: digest::leaf_digest(*hash, value_hash) })
        }
        Node::Collision { hash, entries, .. } => {
            let new_entries: Box<[(K, V2)]> =
                entries.iter().map(|(k, v)| (k.clone(), f(k, v.clone()))).collect();
            let value_hashes: Vec<u64> = new_entries.iter().map(|(_, v)| digest::hash_one(v)).collect();
            let new_digest = digest::collision_digest(*hash, value_hashes);
            Rc::new(Node::Collision { hash: *hash, entries: new_entries, digest: new_digest })
        }
        Node::Branch { bitmap, children, .. } => {
            let new_children: Box<[Rc<Node<K, V2>>]> =
                children.iter().map(|c| map_with_key(c, f)).collect();
            let new_digest = digest::branch_digest(*bitmap, new_children.iter().map(|c| c.digest()));
            Rc::new(Node::Branch { bitmap: *bitmap, children: new_children, digest: new_digest })
        }
    }
}

/// Effectful lift of [`map_with_key`]: applies a fallible `f` to every
/// value, short-circuiting (bottom-up, first failure encountered in
/// traversal order) on the first `Err`.
pub fn traverse_with_key<K, V, V2, E>(
    node: &Node<K, V>,
    f: &mut dyn FnMut(&K, V) -> Result<V2, E>,
) -> Result<Rc<Node<K, V2>>, E>
where
    K: Clone,
    V: Clone,
    V2: std::hash::Hash,
{
    match node {
        Node::Leaf { hash, key, value, .. } => {
            let new_value = f(key, value.clone())?;
            let value_hash = digest::hash_one(&new_value);
            Ok(Rc::new(Node::Leaf { hash: *hash, key: key.clone(), value: new_value, digest: digest::leaf_digest(*hash, value_hash) }))
        }
        Node::Collision { hash, entries, .. } => {
            let mut new_entries = Vec::with_capacity(entries.len());
            for (k, v) in entries.iter() {
                new_entries.push((k.clone(), f(k, v.clone())?));
            }
            let value_hashes: Vec<u64> = new_entries.iter().map(|(_, v)| digest::hash_one(v)).collect();
            let new_digest = digest::collision_digest(*hash, value_hashes);
            Ok(Rc::new(Node::Collision { hash: *hash, entries: new_entries.into_boxed_slice(), digest: new_digest }))
        }
        Node::Branch { bitmap, children, .. } => {
            let mut new_children = Vec::with_capacity(children.len());
            for c in children.iter() {
                new_children.push(traverse_with_key(c, f)?);
            }
            let new_digest = digest::branch_digest(*bitmap, new_children.iter().map(|c| c.digest()));
            Ok(Rc::new(Node::Branch { bitmap: *bitmap, children: new_children.into_boxed_slice(), digest: new_digest }))
        }
    }
}

//! The public persistent map: a thin, size-tracking wrapper around a
//! [`Node`] tree plus the derived surface built on the core
//! recursion in [`crate::ops`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::digest;
use crate::iter::Iter;
use crate::node::Node;
use crate::ops;

/// A persistent, immutable hash array mapped trie from `K` to `V`.
///
/// Every operation that would mutate the map instead returns a new `Map`
/// sharing as much structure as possible with its input.
/// Cloning a `Map` is `O(1)`: it bumps an `Rc` reference count.
pub struct Map<K, V> {
    root: Rc<Node<K, V>>,
    len: usize,
}

impl<K, V> Map<K, V> {
    /// The empty map.
    #[must_use]
    pub fn empty() -> Self {
        Self { root: Node::empty(), len: 0 }
    }

    /// Number of key-value pairs (`size`).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` iff the map has no entries.
    ///
    /// Tests for the canonical-empty representation, not merely
    /// `len() == 0` — those coincide for every map reachable through this
    /// crate's public API, but this is the stronger check.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Borrowing iterator over `(&K, &V)` pairs. Order is unspecified but
    /// deterministic for a given map value.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }
}

#[cfg(test)]
impl<K: Hash + Eq, V: Hash> Map<K, V> {
    /// Checks the debug-only structural invariants against this map's
    /// whole tree.
    pub(crate) fn check_invariants(&self) -> bool {
        crate::node::invariants(&self.root)
    }
}

#[cfg(test)]
impl<K, V> Map<K, V> {
    /// The root node's cached structural digest, exposed for tests.
    pub(crate) fn root_digest(&self) -> u64 {
        self.root.digest()
    }
}

impl<K, V> Map<K, V>
where
    K: Hash + Eq,
{
    /// Looks up `key`, returning `None` if absent.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = digest::hash_key(key);
        ops::get::get(&self.root, hash, key, 0)
    }

    /// `true` iff `key` is present (`member`).
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V> Map<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    /// A map with a single entry.
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::empty().insert(key, value)
    }

    /// Inserts `(key, value)`, combining with any existing value via
    /// `combine(new, old) -> merged` (`insertWith`).
    #[must_use]
    pub fn insert_with(&self, key: K, value: V, mut combine: impl FnMut(V, V) -> V) -> Self {
        let hash = digest::hash_key(&key);
        let outcome = ops::insert::insert_with(&self.root, hash, key, value, &mut combine, 0);
        let len = if outcome.old.is_some() { self.len } else { self.len + 1 };
        Self { root: outcome.node, len }
    }

    /// Inserts `(key, value)`, overwriting any existing value (`insert`).
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        self.insert_with(key, value, |new, _old| new)
    }

    /// Removes `key`, returning the input map structurally unchanged if
    /// absent (`delete`).
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let hash = digest::hash_key(key);
        match ops::remove::remove(&self.root, hash, key, 0) {
            ops::remove::RemoveOutcome::NotFound => Self { root: Rc::clone(&self.root), len: self.len },
            ops::remove::RemoveOutcome::Removed { node, .. } => {
                Self { root: node.unwrap_or_else(Node::empty), len: self.len - 1 }
            }
        }
    }

    /// `insert(k, v, delete(k, m))`: like [`Self::insert`], but never forces
    /// `value` against a stale combiner on update.
    #[must_use]
    pub fn replace(&self, key: K, value: V) -> Self {
        self.remove(&key).insert(key, value)
    }

    /// Leaves `self` unchanged if `key` is absent; otherwise replaces its
    /// value with `f(old)` (`adjust`).
    #[must_use]
    pub fn adjust(&self, key: K, f: impl FnOnce(&V) -> V) -> Self {
        match self.get(&key) {
            None => Self { root: Rc::clone(&self.root), len: self.len },
            Some(old) => {
                let new_value = f(old);
                self.insert(key, new_value)
            }
        }
    }

    /// Unions `self` and `other`, combining colliding keys via
    /// `combine(self_value, other_value) -> merged` (`unionWith`).
    #[must_use]
    pub fn union_with(&self, other: &Self, mut combine: impl FnMut(V, V) -> V) -> Self {
        let root = ops::union::union_with(&self.root, &other.root, &mut combine);
        let len = root.count();
        Self { root, len }
    }

    /// Unions `self` and `other`; on key collision, `self`'s value wins
    /// (`union`).
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.union_with(other, |mine, _theirs| mine)
    }

    /// Left fold of [`Self::union`] over `maps`, starting from [`Self::empty`]
    /// (`unions`).
    #[must_use]
    pub fn unions<'a>(maps: impl IntoIterator<Item = &'a Self>) -> Self
    where
        K: 'a,
        V: 'a,
    {
        maps.into_iter().fold(Self::empty(), |acc, m| acc.union(m))
    }

    /// Keeps only entries for which `keep(key, value)` holds
    /// (`filterWithKey`).
    #[must_use]
    pub fn filter_with_key(&self, mut keep: impl FnMut(&K, &V) -> bool) -> Self {
        let root = ops::filter::filter_with_key(&self.root, &mut keep).unwrap_or_else(Node::empty);
        let len = root.count();
        Self { root, len }
    }

    /// Keeps only entries for which `keep(value)` holds (`filter`).
    #[must_use]
    pub fn filter(&self, mut keep: impl FnMut(&V) -> bool) -> Self {
        self.filter_with_key(|_, v| keep(v))
    }

    /// Entries of `self` whose key is absent from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.filter_with_key(|k, _| !other.contains_key(k))
    }

    /// Entries of `self` whose key is present in `other`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.filter_with_key(|k, _| other.contains_key(k))
    }

    /// For each key present in both maps, `combine(self_value, other_value)`
    /// (`intersectionWith`).
    #[must_use]
    pub fn intersection_with(&self, other: &Self, mut combine: impl FnMut(&V, &V) -> V) -> Self {
        let mut result = Self::empty();
        for (k, v) in self.iter() {
            if let Some(ov) = other.get(k) {
                result = result.insert(k.clone(), combine(v, ov));
            }
        }
        result
    }

    /// Left fold over `xs`, later entries dominating earlier ones via
    /// `combine(new, old) -> merged` (`fromListWith`).
    #[must_use]
    pub fn from_list_with(xs: impl IntoIterator<Item = (K, V)>, mut combine: impl FnMut(V, V) -> V) -> Self {
        xs.into_iter().fold(Self::empty(), |acc, (k, v)| acc.insert_with(k, v, &mut combine))
    }
}

impl<K, V> Map<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Strict left fold, visiting branch children in array order and
    /// collision entries in list order (`foldWithKey`).
    pub fn fold_with_key<B>(&self, init: B, mut f: impl FnMut(B, &K, &V) -> B) -> B {
        ops::fold::fold_with_key(&self.root, init, &mut f)
    }

    /// Strict left fold over values only (`fold`).
    pub fn fold<B>(&self, init: B, mut f: impl FnMut(B, &V) -> B) -> B {
        ops::fold::fold_with_key(&self.root, init, &mut |acc, _, v| f(acc, v))
    }

    /// Strict right fold (`foldrWithKey`).
    pub fn foldr_with_key<B>(&self, init: B, mut f: impl FnMut(&K, &V, B) -> B) -> B {
        ops::fold::foldr_with_key(&self.root, init, &mut f)
    }

    /// Strict right fold over values only (`foldr`).
    pub fn foldr<B>(&self, init: B, mut f: impl FnMut(&V, B) -> B) -> B {
        ops::fold::foldr_with_key(&self.root, init, &mut |_, v, acc| f(v, acc))
    }

    /// Snapshots every key into a list (`keys`).
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.fold_with_key(Vec::with_capacity(self.len), |mut acc, k, _| {
            acc.push(k.clone());
            acc
        })
    }

    /// Snapshots every value into a list (`values`).
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.fold(Vec::with_capacity(self.len), |mut acc, v| {
            acc.push(v.clone());
            acc
        })
    }

    /// Snapshots every `(key, value)` pair into a list (`each`).
    #[must_use]
    pub fn each(&self) -> Vec<(K, V)> {
        self.fold_with_key(Vec::with_capacity(self.len), |mut acc, k, v| {
            acc.push((k.clone(), v.clone()));
            acc
        })
    }

    /// Rebuilds every value via `f(value)`, preserving structure exactly
    /// (`mapValues`).
    #[must_use]
    pub fn map_values<V2: Hash>(&self, mut f: impl FnMut(&V) -> V2) -> Map<K, V2> {
        self.map_with_key(|_, v| f(v))
    }

    /// Rebuilds every value via `f(key, value)`, preserving structure
    /// exactly (`mapWithKey`).
    #[must_use]
    pub fn map_with_key<V2: Hash>(&self, mut f: impl FnMut(&K, &V) -> V2) -> Map<K, V2> {
        let root = ops::transform::map_with_key(&self.root, &mut |k, v| f(k, &v));
        Map { root, len: self.len }
    }

    /// Effectful lift of [`Self::map_with_key`]: short-circuits on the
    /// first `Err` encountered in traversal order (`traverseWithKey`).
    pub fn traverse_with_key<V2: Hash, E>(
        &self,
        mut f: impl FnMut(&K, &V) -> Result<V2, E>,
    ) -> Result<Map<K, V2>, E> {
        let root = ops::transform::traverse_with_key(&self.root, &mut |k, v| f(k, &v))?;
        Ok(Map { root, len: self.len })
    }
}

impl<K, V> Clone for Map<K, V> {
    fn clone(&self) -> Self {
        Self { root: Rc::clone(&self.root), len: self.len }
    }
}

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Map<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map").field("root", &self.root).field("len", &self.len).finish()
    }
}

impl<K, V> PartialEq for Map<K, V>
where
    K: Eq,
    V: PartialEq,
{
    /// Structural equality: two maps are equal iff they contain the
    /// same set of entries. Cached digests provide a fast-fail
    /// short-circuit; an equal digest is not itself taken as proof.
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        if self.root.digest() != other.root.digest() {
            return false;
        }
        nodes_equal(&self.root, &other.root)
    }
}

impl<K: Eq, V: Eq> Eq for Map<K, V> {}

fn nodes_equal<K: Eq, V: PartialEq>(a: &Node<K, V>, b: &Node<K, V>) -> bool {
    match (a, b) {
        (
            Node::Leaf { hash: ha, key: ka, value: va, .. },
            Node::Leaf { hash: hb, key: kb, value: vb, .. },
        ) => ha == hb && ka == kb && va == vb,
        (
            Node::Collision { hash: ha, entries: ea, .. },
            Node::Collision { hash: hb, entries: eb, .. },
        ) => {
            // Collision-list order is rebuild-history-dependent, not
            // hash-determined, so this must be set equality, not
            // positional equality.
            ha == hb
                && ea.len() == eb.len()
                && ea.iter().all(|(ka, va)| eb.iter().any(|(kb, vb)| ka == kb && va == vb))
        }
        (
            Node::Branch { bitmap: bma, children: ca, .. },
            Node::Branch { bitmap: bmb, children: cb, .. },
        ) => bma == bmb && ca.iter().zip(cb.iter()).all(|(x, y)| nodes_equal(x, y)),
        _ => false,
    }
}

impl<K, V> Hash for Map<K, V> {
    /// Delegates to the cached structural digest.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.digest().hash(state);
    }
}

impl<K, V> std::ops::Index<&K> for Map<K, V>
where
    K: Hash + Eq,
{
    type Output = V;

    /// `(!!)`: looks up by key, panicking if absent.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K, V> FromIterator<(K, V)> for Map<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    /// `fromList`: later entries dominate earlier ones.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), |acc, (k, v)| acc.insert(k, v))
    }
}

impl<K, V> Extend<(K, V)> for Map<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let mut acc = std::mem::replace(self, Self::empty());
        for (k, v) in iter {
            acc = acc.insert(k, v);
        }
        *self = acc;
    }
}

impl<'a, K, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

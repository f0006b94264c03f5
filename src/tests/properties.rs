//! Property-based checks for the map's quantified invariants.

use std::collections::HashMap as StdHashMap;

use proptest::prelude::*;

use crate::Map;

fn small_key() -> impl Strategy<Value = i32> {
    -20..20
}

fn entries() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((small_key(), any::<i32>()), 0..60)
}

fn build(entries: &[(i32, i32)]) -> Map<i32, i32> {
    entries.iter().fold(Map::empty(), |m, &(k, v)| m.insert(k, v))
}

/// Reference model: last-write-wins, like the map itself.
fn reference(entries: &[(i32, i32)]) -> StdHashMap<i32, i32> {
    let mut m = StdHashMap::new();
    for &(k, v) in entries {
        m.insert(k, v);
    }
    m
}

proptest! {
    /// Invariant 1 + invariant checking: every map built through the
    /// public API satisfies the debug-only structural invariants.
    #[test]
    fn built_maps_satisfy_invariants(entries in entries()) {
        let map = build(&entries);
        prop_assert!(map.check_invariants());
    }

    /// Invariant 2: size == len(keys) == len(values) == len(each).
    #[test]
    fn size_matches_projection_lengths(entries in entries()) {
        let map = build(&entries);
        prop_assert_eq!(map.len(), map.keys().len());
        prop_assert_eq!(map.len(), map.values().len());
        prop_assert_eq!(map.len(), map.each().len());
        prop_assert_eq!(map.len(), map.iter().count());
    }

    /// Invariant 3: fromList(each(m)) == m.
    #[test]
    fn roundtrip_through_each(entries in entries()) {
        let map = build(&entries);
        let roundtripped: Map<i32, i32> = map.each().into_iter().collect();
        prop_assert_eq!(roundtripped, map);
    }

    /// Invariant 4: inserting (k, v) makes k visible and leaves every
    /// other key's lookup unchanged.
    #[test]
    fn insert_is_local(entries in entries(), k in small_key(), v in any::<i32>()) {
        let before = build(&entries);
        let after = before.insert(k, v);
        prop_assert_eq!(after.get(&k), Some(&v));
        for probe in -20..20 {
            if probe != k {
                prop_assert_eq!(after.get(&probe), before.get(&probe));
            }
        }
    }

    /// Invariant 5: deleting k makes it absent and leaves every other
    /// key's lookup unchanged.
    #[test]
    fn delete_is_local(entries in entries(), k in small_key()) {
        let before = build(&entries);
        let after = before.remove(&k);
        prop_assert_eq!(after.get(&k), None);
        for probe in -20..20 {
            if probe != k {
                prop_assert_eq!(after.get(&probe), before.get(&probe));
            }
        }
    }

    /// Invariant 6: deleting an absent key is a no-op.
    #[test]
    fn delete_absent_is_identity(entries in entries(), k in 100..200) {
        let before = build(&entries);
        prop_assume!(before.get(&k).is_none());
        let after = before.remove(&k);
        prop_assert_eq!(after, before);
    }

    /// Invariant 7: inserting the same key/value twice is idempotent.
    #[test]
    fn same_value_insert_is_idempotent(entries in entries(), k in small_key(), v in any::<i32>()) {
        let base = build(&entries);
        let once = base.insert(k, v);
        let twice = once.insert(k, v);
        prop_assert_eq!(once, twice);
    }

    /// Invariant 8: union with empty is identity.
    #[test]
    fn union_empty_is_identity(entries in entries()) {
        let m = build(&entries);
        let empty: Map<i32, i32> = Map::empty();
        prop_assert_eq!(m.union(&empty), m.clone());
        prop_assert_eq!(empty.union(&m), m);
    }

    /// Invariant 9: difference(m, m) == empty; intersection(m, m) == m.
    #[test]
    fn self_difference_and_intersection(entries in entries()) {
        let m = build(&entries);
        prop_assert!(m.difference(&m).is_empty());
        prop_assert_eq!(m.intersection(&m), m);
    }

    /// Invariant 10: mapValues(id) == m.
    #[test]
    fn map_values_identity(entries in entries()) {
        let m = build(&entries);
        prop_assert_eq!(m.map_values(|v| *v), m);
    }

    /// Cross-check against a plain `HashMap` reference model.
    #[test]
    fn matches_reference_hashmap(entries in entries()) {
        let map = build(&entries);
        let reference = reference(&entries);
        prop_assert_eq!(map.len(), reference.len());
        for (k, v) in &reference {
            prop_assert_eq!(map.get(k), Some(v));
        }
    }
}

/// Two small integers whose 32-bit key hashes share a fragment at
/// shift 0 but diverge at shift 5 — inserting both forces exactly one
/// level of branch nesting via `join` before the two entries split.
/// Deleting or filtering one of them back out must collapse that
/// nesting rather than leave a vestigial single-child branch behind.
pub(super) fn hash_prefix_sharing_pair() -> (i64, i64) {
    use crate::digest::hash_key;

    for a in 0..5000i64 {
        for b in (a + 1)..5000i64 {
            let ha = hash_key(&a);
            let hb = hash_key(&b);
            if ha & 0x1F == hb & 0x1F && (ha >> 5) & 0x1F != (hb >> 5) & 0x1F {
                return (a, b);
            }
        }
    }
    panic!("no pair of small integers shares a 5-bit hash prefix and diverges at the next level");
}

/// Invariant 3 + invariant 5, specialized to a case `delete_is_local`
/// cannot catch: deleting down to a single nested entry must produce
/// the exact same tree shape plain insertion of that entry would, not
/// just the same lookups.
#[test]
fn delete_collapses_nested_branch_canonically() {
    let (k1, k2) = hash_prefix_sharing_pair();

    let nested = Map::empty().insert(k1, "one").insert(k2, "two").remove(&k1);
    let direct = Map::empty().insert(k2, "two");

    assert_eq!(nested, direct);
    assert!(nested.check_invariants());
}

/// Same as above, through `filter` rather than `remove`.
#[test]
fn filter_collapses_nested_branch_canonically() {
    let (k1, k2) = hash_prefix_sharing_pair();

    let nested = Map::empty().insert(k1, "one").insert(k2, "two").filter(|v| *v == "two");
    let direct = Map::empty().insert(k2, "two");

    assert_eq!(nested, direct);
    assert!(nested.check_invariants());
}

use crate::Map;

/// 1000 entries: insert all, verify all, remove all.
#[test]
fn thousand_entries() {
    let mut map = Map::empty();
    for i in 0_u64..1000 {
        map = map.insert(i, i * 3);
    }
    assert_eq!(map.len(), 1000);

    for i in 0_u64..1000 {
        assert_eq!(map.get(&i), Some(&(i * 3)), "missing key {i}");
    }

    for i in 0_u64..1000 {
        map = map.remove(&i);
    }
    assert!(map.is_empty());
}

/// Sequential integers often share hash prefix bits, forcing deeper nodes.
#[test]
fn deep_shared_prefixes() {
    let mut map = Map::empty();
    for i in 0_u64..500 {
        map = map.insert(i, i);
    }
    assert_eq!(map.len(), 500);
    for i in 0_u64..500 {
        assert_eq!(map.get(&i), Some(&i));
    }
}

/// Insert + overwrite + remove interleaved.
#[test]
fn interleaved_operations() {
    let mut map = Map::empty();
    for i in 0_u64..200 {
        map = map.insert(i, i);
    }
    for i in (0_u64..200).step_by(2) {
        map = map.insert(i, i + 1000);
    }
    for i in (1_u64..200).step_by(2) {
        map = map.remove(&i);
    }
    assert_eq!(map.len(), 100);
    for i in (0_u64..200).step_by(2) {
        assert_eq!(map.get(&i), Some(&(i + 1000)));
    }
}

/// Debug invariants hold for a large, variously-shaped trie.
#[test]
fn invariants_hold_under_stress() {
    let mut map = Map::empty();
    for i in 0_u64..2000 {
        map = map.insert(i, i);
        assert!(map.check_invariants());
    }
    for i in (0_u64..2000).step_by(3) {
        map = map.remove(&i);
        assert!(map.check_invariants());
    }
    for (k, v) in map.iter() {
        assert_eq!(k, v);
    }
}

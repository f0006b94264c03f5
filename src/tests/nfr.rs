//! Non-functional requirement tests: asymptotic complexity, iteration cost.
//!
//! - `O(log₃₂ n)` get/insert/remove
//! - `O(n)` iteration

use std::hint::black_box;
use std::time::Instant;

use crate::Map;

/// Measures wall-clock time of a closure in nanoseconds.
fn measure_ns<F: FnMut()>(mut f: F) -> u64 {
    let start = Instant::now();
    f();
    start.elapsed().as_nanos() as u64
}

/// Runs `f` multiple times and returns median time in nanoseconds.
fn median_ns<F: FnMut()>(iterations: u32, mut f: F) -> u64 {
    let mut times: Vec<u64> = (0..iterations).map(|_| measure_ns(&mut f)).collect();
    times.sort_unstable();
    times[times.len() / 2]
}

fn build_map(n: u64) -> Map<u64, u64> {
    let mut map = Map::empty();
    for i in 0..n {
        map = map.insert(i, i);
    }
    map
}

/// get time grows sublinearly with map size.
///
/// log₃₂(1_000) ≈ 2.0, log₃₂(100_000) ≈ 3.3, so 100x more entries should
/// yield well under a 100x slowdown. 5x headroom for CI noise.
#[test]
fn get_sublinear() {
    let small = build_map(1_000);
    let large = build_map(100_000);

    let t_small = median_ns(5, || {
        for i in 0_u64..1_000 {
            black_box(small.get(&i));
        }
    });
    let t_large = median_ns(5, || {
        for i in 0_u64..1_000 {
            black_box(large.get(&i));
        }
    });

    let ratio = t_large as f64 / t_small as f64;
    assert!(ratio < 5.0, "get ratio {ratio:.2}x exceeds 5x bound (small={t_small}ns, large={t_large}ns)");
}

/// insert time (a single new `Map` derived from an existing one) grows
/// sublinearly with map size.
#[test]
fn insert_sublinear() {
    let small = build_map(1_000);
    let t_small = median_ns(5, || {
        black_box(small.insert(1_000_000, 1));
    });

    let large = build_map(100_000);
    let t_large = median_ns(5, || {
        black_box(large.insert(1_000_000, 1));
    });

    let ratio = t_large as f64 / t_small as f64;
    assert!(ratio < 5.0, "insert ratio {ratio:.2}x exceeds 5x bound (small={t_small}ns, large={t_large}ns)");
}

/// remove time grows sublinearly with map size.
#[test]
fn remove_sublinear() {
    let small = build_map(1_000);
    let t_small = median_ns(5, || {
        black_box(small.remove(&500));
    });

    let large = build_map(100_000);
    let t_large = median_ns(5, || {
        black_box(large.remove(&50_000));
    });

    let ratio = t_large as f64 / t_small as f64;
    assert!(ratio < 5.0, "remove ratio {ratio:.2}x exceeds 5x bound (small={t_small}ns, large={t_large}ns)");
}

/// A single insert shares the bulk of the tree with its input: cloning
/// the result is `O(1)` regardless of map size, evidenced indirectly by
/// the sublinear timings above plus the persistence tests.
#[test]
fn iter_linear() {
    let small = build_map(10_000);
    let large = build_map(100_000);

    let t_small = median_ns(5, || {
        let mut count = 0_u64;
        for (k, v) in small.iter() {
            count += black_box(*k) + black_box(*v);
        }
        black_box(count);
    });
    let t_large = median_ns(5, || {
        let mut count = 0_u64;
        for (k, v) in large.iter() {
            count += black_box(*k) + black_box(*v);
        }
        black_box(count);
    });

    // 10x entries -> time should be ~10x in theory. Generous bound catches
    // an O(n^2) regression (100x+), not exact linearity.
    let ratio = t_large as f64 / t_small as f64;
    assert!(ratio < 60.0, "iter ratio {ratio:.2}x exceeds 60x for 10x entries (small={t_small}ns, large={t_large}ns)");
}

/// Iter yields exactly `len()` entries.
#[test]
fn iter_count_matches_len() {
    for &n in &[0_u64, 1, 10, 100, 1_000, 10_000] {
        let map = build_map(n);
        assert_eq!(map.iter().count(), map.len(), "iter count != len for n={n}");
    }
}

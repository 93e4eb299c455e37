use bal_tree::{Avl, Balance, RedBlack, TreeMap, Unbalanced};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn build<B: Balance>(keys: &[i64]) -> TreeMap<i64, i64, B> {
    let mut map = TreeMap::new();
    for &k in keys {
        map.insert(k, k);
    }
    map
}

fn build_btree(keys: &[i64]) -> BTreeMap<i64, i64> {
    keys.iter().map(|&k| (k, k)).collect()
}

// ─── Per-operation drivers ──────────────────────────────────────────────────

/// Sorted input turns an unbalanced tree into a list, so the plain tree only
/// joins the random-key groups.
fn bench_insert(c: &mut Criterion, group_name: &str, keys: &[i64], with_unbalanced: bool) {
    let mut group = c.benchmark_group(group_name);

    group.bench_function(BenchmarkId::new("AvlMap", N), |b| b.iter(|| build::<Avl>(black_box(keys))));
    group.bench_function(BenchmarkId::new("RedBlackMap", N), |b| {
        b.iter(|| build::<RedBlack>(black_box(keys)));
    });
    if with_unbalanced {
        group.bench_function(BenchmarkId::new("UnbalancedMap", N), |b| {
            b.iter(|| build::<Unbalanced>(black_box(keys)));
        });
    }
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| b.iter(|| build_btree(black_box(keys))));

    group.finish();
}

fn lookup_all<B: Balance>(map: &TreeMap<i64, i64, B>, keys: &[i64]) -> i64 {
    keys.iter().filter_map(|k| map.get(k)).sum()
}

fn bench_get(c: &mut Criterion, group_name: &str, keys: &[i64], with_unbalanced: bool) {
    let mut group = c.benchmark_group(group_name);

    let avl = build::<Avl>(keys);
    group.bench_function(BenchmarkId::new("AvlMap", N), |b| b.iter(|| lookup_all(&avl, black_box(keys))));

    let red_black = build::<RedBlack>(keys);
    group.bench_function(BenchmarkId::new("RedBlackMap", N), |b| {
        b.iter(|| lookup_all(&red_black, black_box(keys)));
    });

    if with_unbalanced {
        let unbalanced = build::<Unbalanced>(keys);
        group.bench_function(BenchmarkId::new("UnbalancedMap", N), |b| {
            b.iter(|| lookup_all(&unbalanced, black_box(keys)));
        });
    }

    let btree = build_btree(keys);
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| keys.iter().filter_map(|k| btree.get(k)).sum::<i64>());
    });

    group.finish();
}

fn erase_all<B: Balance>(mut map: TreeMap<i64, i64, B>, keys: &[i64]) -> TreeMap<i64, i64, B> {
    for k in keys {
        map.erase(k);
    }
    map
}

fn bench_erase(c: &mut Criterion, group_name: &str, keys: &[i64], with_unbalanced: bool) {
    let mut group = c.benchmark_group(group_name);

    let avl = build::<Avl>(keys);
    group.bench_function(BenchmarkId::new("AvlMap", N), |b| {
        b.iter_batched(|| avl.clone(), |map| erase_all(map, keys), criterion::BatchSize::LargeInput);
    });

    let red_black = build::<RedBlack>(keys);
    group.bench_function(BenchmarkId::new("RedBlackMap", N), |b| {
        b.iter_batched(|| red_black.clone(), |map| erase_all(map, keys), criterion::BatchSize::LargeInput);
    });

    if with_unbalanced {
        let unbalanced = build::<Unbalanced>(keys);
        group.bench_function(BenchmarkId::new("UnbalancedMap", N), |b| {
            b.iter_batched(|| unbalanced.clone(), |map| erase_all(map, keys), criterion::BatchSize::LargeInput);
        });
    }

    let btree = build_btree(keys);
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || btree.clone(),
            |mut map| {
                for k in keys {
                    map.remove(k);
                }
                map
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "map_insert_ordered", &ordered_keys(N), false);
}

fn bench_map_insert_reverse(c: &mut Criterion) {
    bench_insert(c, "map_insert_reverse", &reverse_ordered_keys(N), false);
}

fn bench_map_insert_random(c: &mut Criterion) {
    bench_insert(c, "map_insert_random", &random_keys(N), true);
}

fn bench_map_get_ordered(c: &mut Criterion) {
    bench_get(c, "map_get_ordered", &ordered_keys(N), false);
}

fn bench_map_get_random(c: &mut Criterion) {
    bench_get(c, "map_get_random", &random_keys(N), true);
}

fn bench_map_erase_ordered(c: &mut Criterion) {
    bench_erase(c, "map_erase_ordered", &ordered_keys(N), false);
}

fn bench_map_erase_reverse(c: &mut Criterion) {
    bench_erase(c, "map_erase_reverse", &reverse_ordered_keys(N), false);
}

fn bench_map_erase_random(c: &mut Criterion) {
    bench_erase(c, "map_erase_random", &random_keys(N), true);
}

fn bench_map_iter(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_iter");

    let avl = build::<Avl>(&keys);
    group.bench_function(BenchmarkId::new("AvlMap", N), |b| b.iter(|| avl.values().sum::<i64>()));

    let red_black = build::<RedBlack>(&keys);
    group.bench_function(BenchmarkId::new("RedBlackMap", N), |b| {
        b.iter(|| red_black.values().sum::<i64>());
    });

    let btree = build_btree(&keys);
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| b.iter(|| btree.values().sum::<i64>()));

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(map_insert_benches, bench_map_insert_ordered, bench_map_insert_reverse, bench_map_insert_random,);

criterion_group!(map_get_benches, bench_map_get_ordered, bench_map_get_random,);

criterion_group!(map_erase_benches, bench_map_erase_ordered, bench_map_erase_reverse, bench_map_erase_random,);

criterion_group!(map_iter_benches, bench_map_iter);

criterion_main!(map_insert_benches, map_get_benches, map_erase_benches, map_iter_benches);

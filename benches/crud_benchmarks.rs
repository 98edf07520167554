use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::ops::Bound;
use treap_map::TreapMap;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
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

// ─── Insert ─────────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    group.bench_function(BenchmarkId::new("TreapMap", N), |b| {
        b.iter(|| {
            let mut map = TreapMap::new();
            for &k in keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in keys {
                map.entry(k).or_insert(k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "map_insert_ordered", &ordered_keys(N));
}

fn bench_map_insert_reverse(c: &mut Criterion) {
    let keys: Vec<i64> = ordered_keys(N).into_iter().rev().collect();
    bench_insert(c, "map_insert_reverse", &keys);
}

fn bench_map_insert_random(c: &mut Criterion) {
    bench_insert(c, "map_insert_random", &random_keys(N));
}

fn bench_map_upsert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_upsert_random");

    group.bench_function(BenchmarkId::new("TreapMap", N), |b| {
        b.iter(|| {
            let mut map: TreapMap<i64, i64> = TreapMap::new();
            for &k in &keys {
                *map.get_or_insert_default(k % 1024) += 1i64;
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map: BTreeMap<i64, i64> = BTreeMap::new();
            for &k in &keys {
                *map.entry(k % 1024).or_default() += 1i64;
            }
            map
        });
    });

    group.finish();
}

// ─── Lookup ─────────────────────────────────────────────────────────────────

fn bench_map_get_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let tp_map: TreapMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_get_random");

    group.bench_function(BenchmarkId::new("TreapMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &k in &keys {
                if let Some(&v) = tp_map.get(&k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &k in &keys {
                if let Some(&v) = bt_map.get(&k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_map_upper_bound_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let probes: Vec<i64> = keys.iter().map(|k| k ^ 1).collect();
    let tp_map: TreapMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_upper_bound_random");

    group.bench_function(BenchmarkId::new("TreapMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &probes {
                if let Some(&v) = tp_map.upper_bound(k).value() {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &probes {
                if let Some((_, &v)) = bt_map.range((Bound::Excluded(k), Bound::Unbounded)).next() {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

// ─── Traversal ──────────────────────────────────────────────────────────────

fn bench_map_traverse(c: &mut Criterion) {
    let keys = random_keys(N);
    let tp_map: TreapMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_traverse");

    group.bench_function(BenchmarkId::new("TreapMap/cursor", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            let mut cursor = tp_map.begin();
            while let Some(&v) = cursor.value() {
                sum = sum.wrapping_add(v);
                cursor.move_next();
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("TreapMap/iter", N), |b| {
        b.iter(|| tp_map.values().fold(0i64, |sum, &v| sum.wrapping_add(v)));
    });

    group.bench_function(BenchmarkId::new("BTreeMap/iter", N), |b| {
        b.iter(|| bt_map.values().fold(0i64, |sum, &v| sum.wrapping_add(v)));
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(
    map_insert_benches,
    bench_map_insert_ordered,
    bench_map_insert_reverse,
    bench_map_insert_random,
    bench_map_upsert_random,
);

criterion_group!(map_lookup_benches, bench_map_get_random, bench_map_upper_bound_random,);

criterion_group!(map_traverse_benches, bench_map_traverse,);

criterion_main!(map_insert_benches, map_lookup_benches, map_traverse_benches,);

// Benchmarks for `Dictionary64` insert and lookup over string keys.
//
// Run with: cargo bench -p alienation_ids

use std::hint::black_box;

use alienation_ids::{Dictionary64, hash_str};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("asset_{i:05}")).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary64_insert");
    for count in [1_000, 10_000] {
        let keys = keys(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &keys, |b, keys| {
            b.iter(|| {
                let mut dict: Dictionary64<String, u64, str> = Dictionary64::new(hash_str);
                for (i, k) in keys.iter().enumerate() {
                    let _ = dict.insert(k.clone(), i as u64);
                }
                black_box(dict.len())
            });
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let keys = keys(10_000);
    let mut dict: Dictionary64<String, u64, str> = Dictionary64::new(hash_str);
    for (i, k) in keys.iter().enumerate() {
        let _ = dict.insert(k.clone(), i as u64);
    }
    c.bench_function("dictionary64_lookup_10k", |b| {
        b.iter(|| {
            let mut hits = 0u64;
            for k in &keys {
                if let Some(v) = dict.get(black_box(k.as_str())) {
                    hits += v;
                }
            }
            black_box(hits)
        });
    });
}

criterion_group!(benches, bench_insert, bench_lookup);
criterion_main!(benches);

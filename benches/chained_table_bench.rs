use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hashkit::hash::FixedState;
use hashkit::ChainedHashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_insert_100k(c: &mut Criterion) {
    c.bench_function("chained::insert_100k", |b| {
        b.iter_batched(
            || ChainedHashMap::<u64, u64>::with_buckets(65_536),
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(x, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit_10k(c: &mut Criterion) {
    let mut m = ChainedHashMap::<u64, u64>::with_buckets(65_536);
    let keys: Vec<u64> = lcg(5).take(100_000).collect();
    for (i, k) in keys.iter().enumerate() {
        m.insert(*k, i as u64);
    }
    c.bench_function("chained::find_hit_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for k in keys.iter().step_by(10) {
                sum = sum.wrapping_add(*m.get(k).unwrap_or(&0));
            }
            black_box(sum)
        })
    });
}

fn bench_rehash_relink_100k(c: &mut Criterion) {
    c.bench_function("chained::rehash_relink_100k", |b| {
        b.iter_batched(
            || {
                let mut m = ChainedHashMap::<u64, u64>::with_buckets(1_024);
                for (i, x) in lcg(7).take(100_000).enumerate() {
                    m.insert(x, i as u64);
                }
                m
            },
            |mut m| {
                m.rehash(131_072);
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_single_chain_1k(c: &mut Criterion) {
    c.bench_function("chained::single_chain_insert_remove_1k", |b| {
        b.iter_batched(
            || ChainedHashMap::<u32, u32, FixedState>::with_buckets(16),
            |mut m| {
                for x in 0..1_000u32 {
                    m.insert(x, x);
                }
                for x in (0..1_000u32).rev() {
                    m.remove(&x);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter_and_iter_mut(c: &mut Criterion) {
    let mut m = ChainedHashMap::<u64, u64>::with_buckets(65_536);
    for (i, x) in lcg(11).take(100_000).enumerate() {
        m.insert(x, i as u64);
    }
    c.bench_function("chained::iter_100k", |b| {
        b.iter(|| black_box(m.values().fold(0u64, |a, v| a.wrapping_add(*v))))
    });
    c.bench_function("chained::iter_mut_100k", |b| {
        b.iter(|| {
            for mut e in m.iter_mut() {
                let next = e.value().wrapping_add(1);
                *e.value_mut() = next;
            }
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_100k,
              bench_find_hit_10k,
              bench_rehash_relink_100k,
              bench_single_chain_1k,
              bench_iter_and_iter_mut
}
criterion_main!(benches);

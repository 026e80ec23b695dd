#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::{collections::HashMap, hint::black_box};

use criterion::{Criterion, criterion_group, criterion_main};
use proptest::{
    prelude::Strategy,
    strategy::ValueTree,
    test_runner::TestRunner,
};
use quadchain::Table;

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;
const BUCKETS: usize = 4096;

fn hash_map_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items = proptest::collection::vec(("[a-zA-Z0-9]{1,16}", "[a-z]{1,8}"), ITEMS_AMOUNT)
        .new_tree(&mut runner)
        .unwrap()
        .current();

    let mut group = c.benchmark_group("Hash map comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    let mut quadchain_table = Table::with_capacity(BUCKETS).unwrap();
    let mut rust_map = HashMap::new();
    group.bench_function("quadchain set", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                quadchain_table.set(key, value).unwrap();
            }
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                rust_map.insert(key, value);
            }
        });
    });
    group.bench_function("quadchain get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(quadchain_table.get(key).unwrap());
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(rust_map.get(key));
            }
        });
    });
    group.bench_function("quadchain hash", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(quadchain_table.hash(key).unwrap());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, hash_map_benches);

criterion_main!(benches);

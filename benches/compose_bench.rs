//! Benchmark for the composition engine.
//!
//! Compares the statically dispatched `One ∘ One` fast path against the
//! generic iterate-based fallback, and measures nested traversals.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lambars_optics::prelude::*;
use std::hint::black_box;

#[derive(Clone, Debug)]
struct Account {
    owner: Owner,
    balances: Vec<i64>,
}

#[derive(Clone, Debug)]
struct Owner {
    address: Address,
}

#[derive(Clone, Debug)]
struct Address {
    city: String,
}

fn account(size: usize) -> Account {
    Account {
        owner: Owner {
            address: Address {
                city: "Sapporo".to_string(),
            },
        },
        balances: (0_i64..).take(size).collect(),
    }
}

// =============================================================================
// 1. One ∘ One: fast path vs. iterate fallback
// =============================================================================

fn benchmark_one_one(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("one_one");
    let context = Context::background();
    let source = account(0);
    let city = lens!(Account, owner)
        .compose(lens!(Owner, address))
        .compose(lens!(Address, city));

    group.bench_function("get", |bencher| {
        bencher.iter(|| black_box(city.get(&context, black_box(&source))));
    });

    group.bench_function("first", |bencher| {
        bencher.iter(|| black_box(city.first(&context, black_box(&source))));
    });

    group.bench_function("collect", |bencher| {
        bencher.iter(|| black_box(city.collect(&context, black_box(&source))));
    });

    group.bench_function("set", |bencher| {
        bencher.iter(|| black_box(city.set(&context, source.clone(), "Kyoto".to_string())));
    });

    group.finish();
}

// =============================================================================
// 2. Many ∘ One
// =============================================================================

fn benchmark_many_one(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("many_one");
    let context = Context::background();
    let negated = lens!(Account, balances)
        .compose(VecTraversal::<i64>::new())
        .compose(iso!(|value: i64| -value, |value: i64| -value));

    for size in [10, 100, 1000] {
        let source = account(size);

        group.bench_with_input(BenchmarkId::new("foci", size), &source, |bencher, source| {
            bencher.iter(|| black_box(negated.foci(&context, black_box(source))));
        });

        group.bench_with_input(BenchmarkId::new("length", size), &source, |bencher, source| {
            bencher.iter(|| black_box(negated.length(&context, black_box(source))));
        });

        group.bench_with_input(BenchmarkId::new("modify", size), &source, |bencher, source| {
            bencher.iter(|| {
                black_box(negated.modify(&context, source.clone(), &mut |_, value| {
                    Ok(value.saturating_add(1))
                }))
            });
        });
    }

    group.finish();
}

// =============================================================================
// 3. Many ∘ Many
// =============================================================================

fn benchmark_many_many(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("many_many");
    let context = Context::background();
    let cells = compose_both(VecTraversal::<Vec<u32>>::new(), VecTraversal::<u32>::new());

    for side in [8, 32, 128] {
        let grid: Vec<Vec<u32>> = (0..side).map(|row| (0..side).map(|column| row * column).collect()).collect();

        group.bench_with_input(BenchmarkId::new("collect", side), &grid, |bencher, grid| {
            bencher.iter(|| black_box(cells.collect(&context, black_box(grid))));
        });

        group.bench_with_input(BenchmarkId::new("take_16", side), &grid, |bencher, grid| {
            bencher.iter(|| black_box(cells.sequence(&context, black_box(grid)).take(16).collect_vec()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_one_one, benchmark_many_one, benchmark_many_many);
criterion_main!(benches);

//! Criterion benchmarks for append-driven construction.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fillvec_alloc::HeapProvider;
use fillvec_bench::{
    mapped_reserve_then_push, push_back_from_empty, reserve_then_push, reserve_then_push_assume,
    std_vec_push, Element, BENCH_SIZES,
};

/// Register every append scenario for element type `T` under `label`.
fn bench_appends<T: Element>(c: &mut Criterion, label: &str) {
    let mut group = c.benchmark_group(format!("push_{label}"));
    for &n in &BENCH_SIZES {
        group.throughput(Throughput::Elements(n as u64));
        if n > 100_000 {
            group.sample_size(10);
        }

        group.bench_with_input(BenchmarkId::new("push_back", n), &n, |b, &n| {
            b.iter(|| black_box(push_back_from_empty::<T>(black_box(n))));
        });
        group.bench_with_input(BenchmarkId::new("reserve_push", n), &n, |b, &n| {
            b.iter(|| black_box(reserve_then_push::<T, _>(HeapProvider::new(), black_box(n))));
        });
        group.bench_with_input(BenchmarkId::new("reserve_push_assume", n), &n, |b, &n| {
            b.iter(|| black_box(reserve_then_push_assume::<T>(black_box(n))));
        });
        group.bench_with_input(BenchmarkId::new("mapped_reserve_push", n), &n, |b, &n| {
            b.iter(|| black_box(mapped_reserve_then_push::<T>(black_box(n))));
        });
        group.bench_with_input(BenchmarkId::new("std_vec_push", n), &n, |b, &n| {
            b.iter(|| black_box(std_vec_push::<T>(black_box(n))));
        });
    }
    group.finish();
}

fn bench_push_u8(c: &mut Criterion) {
    bench_appends::<u8>(c, "u8");
}

fn bench_push_i32(c: &mut Criterion) {
    bench_appends::<i32>(c, "i32");
}

criterion_group!(benches, bench_push_u8, bench_push_i32);
criterion_main!(benches);

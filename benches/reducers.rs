//! Benchmarks for the statistics reducers and the broadcasting kernel
//!
//! Run with: cargo bench

use arrayflow::analysis::statistics::{Reducer, Sum, Welford};
use arrayflow::analysis::Statistic;
use arrayflow::execution::broadcast::broadcast_binary;
use arrayflow::execution::primitives::comparison::compare_values;
use arrayflow::execution::primitives::statistics::reduce_values;
use arrayflow::execution::primitives::CompareOp;
use arrayflow::execution::Site;
use arrayflow::{NumericArray, Value};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::{ArrayD, IxDyn};

fn ramp(len: usize) -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(&[len]), |i| (i[0] as f64 * 0.37).sin() * 100.0)
}

fn bench_reducers(c: &mut Criterion) {
    let mut group = c.benchmark_group("reducers");

    for size in [1000, 10_000, 100_000].iter() {
        let data = ramp(*size);
        group.throughput(Throughput::Elements(*size as u64));

        for statistic in [Statistic::Sum, Statistic::Max, Statistic::Mean, Statistic::Variance] {
            group.bench_with_input(BenchmarkId::new(statistic.name(), size), &data, |b, data| {
                b.iter(|| black_box(statistic.reduce(data.view())));
            });
        }
    }

    group.finish();
}

fn bench_welford_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("welford");
    let data = ramp(100_000);

    group.throughput(Throughput::Elements(100_000));
    group.bench_function("single_pass", |b| {
        b.iter(|| {
            let mut acc = Welford::new();
            data.iter().for_each(|v| acc.push(*v));
            black_box(acc)
        });
    });

    group.bench_function("merge_chunks", |b| {
        let slice = data.as_slice().expect("contiguous");
        b.iter(|| {
            let mut total = Welford::new();
            for chunk in slice.chunks(4096) {
                let mut partial = Welford::new();
                chunk.iter().for_each(|v| partial.push(*v));
                total.merge(&partial);
            }
            black_box(total)
        });
    });

    group.bench_function("sum_chunked_combine", |b| {
        b.iter(|| {
            let mut acc = Sum.identity();
            let count = Sum.combine(&mut acc, &data);
            black_box(Sum.finalize(acc, count))
        });
    });

    group.finish();
}

fn bench_axis_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("axis_reduction");
    let site = Site::new("/arrayflow/sum$0", "bench");

    for rows in [100, 1000].iter() {
        let values: Vec<f64> = (0..rows * 64).map(|i| i as f64).collect();
        let matrix = Value::Array(NumericArray::matrix(*rows, 64, values).unwrap());

        group.throughput(Throughput::Elements((*rows * 64) as u64));
        for axis in [0_i64, 1] {
            group.bench_with_input(
                BenchmarkId::new(format!("sum_axis{}", axis), rows),
                &matrix,
                |b, matrix| {
                    b.iter(|| black_box(reduce_values(Statistic::Sum, matrix, Some(axis), &site)));
                },
            );
        }
    }

    group.finish();
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");
    let site = Site::new("/arrayflow/__ge$0", "bench");

    for rows in [100, 1000].iter() {
        let matrix = ArrayD::from_shape_fn(IxDyn(&[*rows, 64]), |i| (i[0] * 64 + i[1]) as f64);
        let row = ramp(64);
        let scalar = ArrayD::from_elem(IxDyn(&[]), 50.0);

        group.throughput(Throughput::Elements((*rows * 64) as u64));
        group.bench_with_input(BenchmarkId::new("matrix_vector", rows), &matrix, |b, m| {
            b.iter(|| black_box(broadcast_binary(m.view(), row.view(), |x, y| x + y, &site)));
        });
        group.bench_with_input(BenchmarkId::new("matrix_scalar", rows), &matrix, |b, m| {
            b.iter(|| black_box(broadcast_binary(m.view(), scalar.view(), |x, y| x >= y, &site)));
        });

        let lhs = Value::Array(NumericArray::from(matrix.clone()));
        let rhs = Value::Float(50.0);
        group.bench_with_input(BenchmarkId::new("compare_values", rows), &lhs, |b, lhs| {
            b.iter(|| black_box(compare_values(CompareOp::GreaterEqual, lhs, &rhs, &site)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_reducers,
    bench_welford_merge,
    bench_axis_reduction,
    bench_broadcast
);
criterion_main!(benches);

//! Propagation benchmarks.
//!
//! Measures operator chaining, stddev evaluation over wide maps, and the
//! finite-difference wrapper against its built-in equivalent.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use uprop_core::prelude::*;

fn bench_operator_chain(c: &mut Criterion) {
    let reg = Registry::new();
    let x = reg.independent(10.0, 1.0).unwrap();
    let y = reg.independent(2.0, 0.2).unwrap();

    c.bench_function("operator_chain", |b| {
        b.iter(|| {
            let z = (black_box(&x) * black_box(&y) + black_box(&x)) / black_box(&y);
            black_box(z.stddev())
        });
    });
}

fn bench_wide_stddev(c: &mut Criterion) {
    let reg = Registry::new();
    let vals = reg
        .independent_many(&vec![1.0; 64], &vec![0.1; 64])
        .unwrap();
    let sum = vals
        .iter()
        .skip(1)
        .fold(vals[0].clone(), |acc, v| &acc + v);

    c.bench_function("stddev_64_variables", |b| {
        b.iter(|| black_box(&sum).stddev());
    });
}

fn bench_wrapped_vs_builtin(c: &mut Criterion) {
    let reg = Registry::new();
    let x = reg.independent(0.7, 0.2).unwrap();
    let wrapped = wrap(|args: &[f64]| args[0].sin());

    c.bench_function("builtin_sin", |b| {
        b.iter(|| black_box(&x).sin().stddev());
    });
    c.bench_function("wrapped_sin", |b| {
        b.iter(|| wrapped.call(&[Arg::from(black_box(&x))]).stddev());
    });
}

criterion_group!(
    benches,
    bench_operator_chain,
    bench_wide_stddev,
    bench_wrapped_vs_builtin
);
criterion_main!(benches);

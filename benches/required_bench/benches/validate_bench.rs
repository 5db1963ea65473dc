//! Validation overhead benchmarks
//!
//! Measures both run modes over records with and without range options.

#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use required::{
    parse, parse_tag, validate_collect_all, validate_fail_fast, Inspect, Record, Validator,
    ZeroBound,
};

/// Every field carries min/max options
#[derive(Record)]
struct AllMinMax {
    #[required("yes, min=4,max=20")]
    a: String,
    #[required("yes,min=2,max=4")]
    b: i64,
    #[required("yes,min=2,max=4")]
    c: i32,
    #[required("yes,min=2,max=4")]
    d: u32,
    #[required("yes,min=2,max=20")]
    e: f32,
    #[required("yes, min=2, max=6")]
    f: Vec<u8>,
}

/// Presence checks only
#[derive(Record)]
struct AllNoOptions {
    #[required]
    a: String,
    #[required]
    b: i64,
    #[required]
    c: i32,
    #[required]
    d: u32,
    #[required]
    e: f32,
    #[required]
    f: Vec<u8>,
}

/// Mixed record with a nested child
#[derive(Record)]
struct AllMix {
    #[required(min = 4, max = 20)]
    a: String,
    #[required]
    b: i64,
    c: i32,
    #[required("yes, max=10")]
    d: u32,
    #[required]
    child: Option<AllNoOptions>,
}

fn min_max() -> AllMinMax {
    AllMinMax {
        a: "hello world".into(),
        b: 3,
        c: 3,
        d: 3,
        e: 12.6,
        f: vec![1, 2, 3],
    }
}

fn no_options() -> AllNoOptions {
    AllNoOptions {
        a: "hello world".into(),
        b: 3,
        c: 3,
        d: 3,
        e: 12.6,
        f: vec![1, 2, 3],
    }
}

fn mix() -> AllMix {
    AllMix {
        a: "hello world".into(),
        b: 3,
        c: 0,
        d: 3,
        child: Some(no_options()),
    }
}

/// Benchmark the metadata parser on its own
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("options", |b| {
        b.iter(|| parse(black_box(&[" min=4", " max=20"])))
    });

    group.bench_function("presence_only_tag", |b| {
        b.iter(|| parse_tag(black_box("yes"), ZeroBound::Unset))
    });

    group.bench_function("min_max_tag", |b| {
        b.iter(|| parse_tag(black_box("yes, min=4, max=20"), ZeroBound::Unset))
    });

    group.finish();
}

/// Benchmark fail-fast over passing records
fn bench_fail_fast(c: &mut Criterion) {
    let mut group = c.benchmark_group("fail_fast");

    let all_min_max = min_max();
    group.bench_function("all_min_max", |b| {
        b.iter(|| validate_fail_fast(&[black_box(&all_min_max as &dyn Inspect)]))
    });

    let all_no_options = no_options();
    group.bench_function("all_no_options", |b| {
        b.iter(|| validate_fail_fast(&[black_box(&all_no_options as &dyn Inspect)]))
    });

    let all_mix = mix();
    group.bench_function("all_mix", |b| {
        b.iter(|| validate_fail_fast(&[black_box(&all_mix as &dyn Inspect)]))
    });

    group.finish();
}

/// Benchmark collect-all, including a failing batch
fn bench_collect_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_all");

    let batch: Vec<AllMix> = (0..32).map(|_| mix()).collect();
    let inputs: Vec<&dyn Inspect> = batch.iter().map(|r| r as &dyn Inspect).collect();
    group.bench_function("passing_batch", |b| {
        b.iter(|| validate_collect_all(black_box(&inputs)))
    });

    let failing: Vec<AllMinMax> = (0..32)
        .map(|i| AllMinMax {
            a: String::new(),
            b: i,
            ..min_max()
        })
        .collect();
    let inputs: Vec<&dyn Inspect> = failing.iter().map(|r| r as &dyn Inspect).collect();
    group.bench_function("failing_batch", |b| {
        b.iter(|| validate_collect_all(black_box(&inputs)))
    });

    let validator = Validator::default();
    let record = mix();
    group.bench_function("diagnose_single", |b| {
        b.iter(|| validator.diagnose(black_box(&record)))
    });

    group.finish();
}

/// Benchmark walking a record's field list without evaluating it
fn bench_fields(c: &mut Criterion) {
    let record = min_max();
    c.bench_function("fields_iteration", |b| {
        b.iter(|| black_box(&record).fields().len())
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_fail_fast,
    bench_collect_all,
    bench_fields,
);
criterion_main!(benches);

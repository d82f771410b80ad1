//! Criterion micro-benchmarks for network construction and accumulation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tarn_engine::ReachAccumulator;
use tarn_network::ReachNetwork;
use tarn_test_utils::{random_network, random_records};

fn bench_build_10k(c: &mut Criterion) {
    let records = random_records(42, 10_000);
    c.bench_function("network_build_10k", |b| {
        b.iter(|| {
            let net = ReachNetwork::from_downstream(records.clone()).unwrap();
            black_box(net.len());
        });
    });
}

fn bench_accumulate_10k(c: &mut Criterion) {
    let net = random_network(42, 10_000);
    let generated: Vec<f64> = (0..net.len()).map(|i| (i % 17) as f64).collect();
    let attenuation = vec![0.85; net.len()];
    let acc = ReachAccumulator::new(&net);

    c.bench_function("accumulate_10k", |b| {
        b.iter(|| {
            let out = acc.accumulate(black_box(&generated), black_box(&attenuation));
            black_box(out.routed.len());
        });
    });
}

fn bench_accumulate_100k(c: &mut Criterion) {
    let net = random_network(42, 100_000);
    let generated: Vec<f64> = (0..net.len()).map(|i| (i % 17) as f64).collect();
    let attenuation = vec![0.85; net.len()];
    let acc = ReachAccumulator::new(&net);

    c.bench_function("accumulate_100k", |b| {
        b.iter(|| {
            let out = acc.accumulate(&generated, &attenuation);
            black_box(out.routed.len());
        });
    });
}

fn bench_catchment_query(c: &mut Criterion) {
    let net = random_network(42, 10_000);
    let outlets: Vec<_> = net.outlets().take(4).collect();
    c.bench_function("catchment_of_4_outlets_10k", |b| {
        b.iter(|| {
            let reaches = net.catchment_of(&outlets).unwrap();
            black_box(reaches.len());
        });
    });
}

criterion_group!(
    benches,
    bench_build_10k,
    bench_accumulate_10k,
    bench_accumulate_100k,
    bench_catchment_query
);
criterion_main!(benches);

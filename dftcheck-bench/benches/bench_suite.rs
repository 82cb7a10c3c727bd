use criterion::{criterion_group, criterion_main, Criterion};
use dftcheck::backend::DirectBackend;
use dftcheck::config::HarnessConfig;
use dftcheck::harness::Suite;

fn bench_direct_suite(c: &mut Criterion) {
    let config = HarnessConfig {
        sizes: vec![8],
        dimensions: vec![1, 2],
        ..HarnessConfig::default()
    };
    let suite = Suite::new(config).unwrap();
    let backend = DirectBackend::new();
    let mut group = c.benchmark_group("suite");
    group.sample_size(10);
    group.bench_function("direct_8_1d_2d", |b| {
        b.iter(|| suite.run(&backend).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_direct_suite);
criterion_main!(benches);

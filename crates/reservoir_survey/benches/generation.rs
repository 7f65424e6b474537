mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use reservoir_survey::grid::{generate, GenerateConfig};

fn generation_benches(c: &mut Criterion) {
    for &probability in &common::PROBABILITIES {
        let mut group = c.benchmark_group(format!("generate/p_{probability:.2}"));

        for &size in &common::SIZES {
            group.throughput(common::elements_throughput(size * size));
            let config = GenerateConfig::new(size)
                .with_probability(probability)
                .with_seed(0x5EED_u64 ^ size as u64);

            group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
                b.iter(|| {
                    let grid = generate(&config).expect("valid config");
                    black_box(grid.len());
                });
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = generation_benches
}
criterion_main!(benches);

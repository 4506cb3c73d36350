use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mixband::mixup::{LambdaSampler, Sample, contrast_mixup, mixup};
use mixband::prelude::*;
use mixband::derangement;
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn batch(n: usize, dim: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| Sample::new(vec![i as f64; dim], (i % 7) as f64 / 7.0))
        .collect()
}

fn bench_derangement(c: &mut Criterion) {
    let mut group = c.benchmark_group("derangement");

    for n in [2, 30, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("derangement", n), n, |b, &n| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(42);
            b.iter(|| black_box(derangement(n, &mut rng).unwrap()));
        });
    }

    group.finish();
}

fn bench_synthesizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesizers");
    let lambda = LambdaSampler::default();

    for n in [30, 300].iter() {
        let samples = batch(*n, 16);

        group.bench_with_input(BenchmarkId::new("mixup", n), n, |b, _| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(42);
            b.iter(|| black_box(mixup(&samples, &lambda, &mut rng).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("contrast_mixup", n), n, |b, _| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(42);
            let (first, second) = samples.split_at(samples.len() / 2);
            b.iter(|| black_box(contrast_mixup(first, second, &lambda, &mut rng)));
        });
    }

    group.finish();
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    let context_dim = 8;
    let num_actions = 4;

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let dataset = Array2::from_shape_fn((600, context_dim + num_actions), |_| {
        rng.random_range(0.0..1.0)
    });

    for augmentation in [
        Augmentation::None,
        Augmentation::SameAction,
        Augmentation::CrossAction,
        Augmentation::Pooled,
    ] {
        let runner = Runner::new(RunConfig::default().with_augmentation(augmentation)).unwrap();
        group.bench_function(BenchmarkId::new("linucb", format!("{augmentation:?}")), |b| {
            b.iter_batched(
                || {
                    let agents =
                        vec![LinUcb::new(num_actions, context_dim, 1.0, 1.0).unwrap()];
                    (agents, rand::rngs::StdRng::seed_from_u64(42))
                },
                |(agents, mut rng)| {
                    black_box(
                        runner
                            .run(context_dim, num_actions, dataset.clone(), agents, &mut rng)
                            .unwrap(),
                    )
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_derangement, bench_synthesizers, bench_replay);
criterion_main!(benches);

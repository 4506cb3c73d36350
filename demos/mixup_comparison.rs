//! Compares augmentation policies on a synthetic linear bandit.
//!
//! Run with `RUST_LOG=mixband=debug` to see every flush.

use mixband::prelude::*;
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing_subscriber::EnvFilter;

const CONTEXT_DIM: usize = 5;
const NUM_ACTIONS: usize = 4;
const NUM_CONTEXTS: usize = 1500;

/// Rewards are `x · w_a + noise` with a fixed random weight vector per action.
fn linear_dataset(rng: &mut impl Rng) -> Array2<f64> {
    let weights: Vec<Vec<f64>> = (0..NUM_ACTIONS)
        .map(|_| (0..CONTEXT_DIM).map(|_| rng.random_range(-1.0..1.0)).collect())
        .collect();
    let noise = Normal::new(0.0, 0.1).expect("valid noise scale");

    let mut data = Array2::<f64>::zeros((NUM_CONTEXTS, CONTEXT_DIM + NUM_ACTIONS));
    for mut row in data.rows_mut() {
        let x: Vec<f64> = (0..CONTEXT_DIM).map(|_| rng.random_range(-1.0..1.0)).collect();
        for (i, xi) in x.iter().enumerate() {
            row[i] = *xi;
        }
        for (a, w) in weights.iter().enumerate() {
            let mean: f64 = x.iter().zip(w).map(|(xi, wi)| xi * wi).sum();
            row[CONTEXT_DIM + a] = mean + noise.sample(rng);
        }
    }
    data
}

fn agents() -> Vec<Box<dyn Agent>> {
    vec![
        Box::new(Uniform::new(NUM_ACTIONS).unwrap()),
        Box::new(EpsilonGreedy::new(NUM_ACTIONS, 0.1).unwrap()),
        Box::new(LinUcb::new(NUM_ACTIONS, CONTEXT_DIM, 0.5, 1.0).unwrap()),
        Box::new(LinTs::new(NUM_ACTIONS, CONTEXT_DIM, 0.5, 1.0).unwrap()),
    ]
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
    let dataset = linear_dataset(&mut rng);

    println!("=== Cumulative regret after {NUM_CONTEXTS} rounds ===\n");
    println!(
        "{:<14} {:>10} {:>15} {:>10} {:>10}",
        "augmentation", "uniform", "epsilon-greedy", "linucb", "lints"
    );

    for augmentation in [
        Augmentation::None,
        Augmentation::SameAction,
        Augmentation::CrossAction,
        Augmentation::Pooled,
    ] {
        let runner = Runner::new(
            RunConfig::default()
                .with_augmentation(augmentation)
                .with_progress_every(500),
        )?;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let outcome = runner.run(CONTEXT_DIM, NUM_ACTIONS, dataset.clone(), agents(), &mut rng)?;

        let regret: Vec<f64> = (0..outcome.agents.len())
            .map(|j| {
                (0..NUM_CONTEXTS)
                    .map(|i| {
                        let row = outcome.order[i];
                        let best = dataset[[row, CONTEXT_DIM + outcome.optimal_actions[i]]];
                        best - outcome.rewards[[i, j]]
                    })
                    .sum()
            })
            .collect();

        println!(
            "{:<14} {:>10.1} {:>15.1} {:>10.1} {:>10.1}",
            format!("{augmentation:?}"),
            regret[0],
            regret[1],
            regret[2],
            regret[3]
        );
    }

    Ok(())
}

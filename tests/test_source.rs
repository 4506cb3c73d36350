use mixband::{BanditError, ContextualBandit};
use ndarray::{Array2, array};
use rand::SeedableRng;

/// 4 contexts, 3 features, 2 actions
fn dataset() -> Array2<f64> {
    array![
        [0.0, 0.1, 0.2, 0.5, 0.7],
        [1.0, 1.1, 1.2, 0.9, 0.3],
        [2.0, 2.1, 2.2, 0.4, 0.4],
        [3.0, 3.1, 3.2, -1.0, 2.5],
    ]
}

fn argmax_lowest(values: &[f64]) -> usize {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values.iter().position(|&v| v == max).unwrap()
}

#[test]
fn test_rewards_match_cells() {
    let data = dataset();
    let mut bandit = ContextualBandit::new(3, 2);
    bandit.feed(data.clone()).unwrap();

    assert_eq!(bandit.num_contexts(), 4);
    for i in 0..4 {
        for a in 0..2 {
            assert_eq!(bandit.reward(i, a).unwrap(), data[[i, 3 + a]]);
        }
        assert_eq!(bandit.context(i).unwrap(), data.row(i).to_vec()[..3].to_vec());
    }
}

#[test]
fn test_optimal_matches_argmax() {
    let data = dataset();
    let mut bandit = ContextualBandit::new(3, 2);
    bandit.feed(data.clone()).unwrap();

    for i in 0..4 {
        let rewards: Vec<f64> = data.row(i).iter().skip(3).copied().collect();
        assert_eq!(bandit.optimal(i).unwrap(), argmax_lowest(&rewards));
    }
    // row 2 is a tie
    assert_eq!(bandit.optimal(2).unwrap(), 0);
}

#[test]
fn test_dimension_mismatch_is_rejected() {
    let mut bandit = ContextualBandit::new(3, 3);
    let err = bandit.feed(dataset()).unwrap_err();
    assert!(matches!(
        err,
        BanditError::DimensionMismatch {
            expected: 6,
            got: 5
        }
    ));
    assert!(err.to_string().contains("do not match"));
}

#[test]
fn test_reset_yields_valid_permutations() {
    let data = dataset();
    let mut bandit = ContextualBandit::new(3, 2);
    bandit.feed(data.clone()).unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);

    for _ in 0..2 {
        bandit.reset(&mut rng);
        let mut order = bandit.order().to_vec();
        assert_eq!(order.len(), 4);

        // reads follow the new order
        for i in 0..4 {
            assert_eq!(bandit.reward(i, 1).unwrap(), data[[order[i], 4]]);
        }

        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }
}

#[test]
fn test_feed_restores_identity_order() {
    let mut bandit = ContextualBandit::new(3, 2);
    bandit.feed(dataset()).unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    bandit.reset(&mut rng);

    bandit.feed(dataset()).unwrap();
    assert_eq!(bandit.order(), &[0, 1, 2, 3]);
}

use rand_distr::{Distribution, StandardNormal};

use super::{check_action, check_context, check_num_actions};
use crate::agent::Agent;
use crate::error::{BanditError, Result};
use crate::regression::RidgeRegression;

/// Linear Thompson Sampling (LinTS) agent
///
/// Keeps a ridge regression per action and, for every decision, scores each
/// action with coefficients sampled around the ridge estimate. The posterior
/// is approximated by its diagonal: `β̃_i = β_i + v·sqrt(A⁻¹_ii)·z_i`.
#[derive(Debug, Clone)]
pub struct LinTs {
    /// Posterior scale (controls exploration)
    v: f64,
    models: Vec<RidgeRegression>,
}

impl LinTs {
    /// Create a new Linear Thompson Sampling agent
    ///
    /// # Arguments
    /// * `num_actions` - Number of actions
    /// * `num_features` - Context dimension
    /// * `v` - Posterior scale (typically 1.0)
    /// * `l2_lambda` - L2 regularization parameter (typically 1.0)
    pub fn new(num_actions: usize, num_features: usize, v: f64, l2_lambda: f64) -> Result<Self> {
        check_num_actions(num_actions)?;
        if v < 0.0 || l2_lambda <= 0.0 {
            return Err(BanditError::InvalidParameter {
                message: format!("need v >= 0 and l2_lambda > 0, got {v} and {l2_lambda}"),
            });
        }
        Ok(Self {
            v,
            models: vec![RidgeRegression::new(num_features, l2_lambda); num_actions],
        })
    }

    fn sample_score(
        model: &RidgeRegression,
        v: f64,
        context: &[f64],
        rng: &mut dyn rand::RngCore,
    ) -> f64 {
        context
            .iter()
            .enumerate()
            .map(|(i, xi)| {
                let z: f64 = StandardNormal.sample(rng);
                xi * (model.coefficient(i) + v * model.variance(i).sqrt() * z)
            })
            .sum()
    }
}

impl Agent for LinTs {
    fn choose(&mut self, context: &[f64], rng: &mut dyn rand::RngCore) -> Result<usize> {
        check_context(context, self.models[0].num_features())?;

        let mut best_action = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (action, model) in self.models.iter().enumerate() {
            let score = Self::sample_score(model, self.v, context, rng);
            if score > best_score {
                best_score = score;
                best_action = action;
            }
        }
        Ok(best_action)
    }

    fn update(&mut self, context: &[f64], action: usize, reward: f64) -> Result<()> {
        check_action(action, self.models.len())?;
        check_context(context, self.models[0].num_features())?;
        self.models[action].fit(context, reward);
        Ok(())
    }

    fn name(&self) -> &str {
        "lints"
    }
}

use rand::seq::IndexedRandom;

use super::{check_action, check_context, check_num_actions};
use crate::agent::Agent;
use crate::error::{BanditError, Result};
use crate::regression::RidgeRegression;

/// Linear Upper Confidence Bound (LinUCB) agent
///
/// LinUCB uses ridge regression to model the expected reward of each action
/// given the context, and adds an upper confidence bound for exploration.
/// Actions that have never been updated are tried first.
#[derive(Debug, Clone)]
pub struct LinUcb {
    /// Exploration parameter (controls confidence bound width)
    alpha: f64,
    /// One ridge model per action
    models: Vec<RidgeRegression>,
}

impl LinUcb {
    /// Create a new LinUCB agent
    ///
    /// # Arguments
    /// * `num_actions` - Number of actions
    /// * `num_features` - Context dimension
    /// * `alpha` - Exploration parameter (typically between 0.1 and 2.0)
    /// * `l2_lambda` - L2 regularization parameter (typically 1.0)
    pub fn new(
        num_actions: usize,
        num_features: usize,
        alpha: f64,
        l2_lambda: f64,
    ) -> Result<Self> {
        check_num_actions(num_actions)?;
        if alpha < 0.0 {
            return Err(BanditError::InvalidParameter {
                message: format!("alpha must be non-negative, got {alpha}"),
            });
        }
        if l2_lambda <= 0.0 {
            return Err(BanditError::InvalidParameter {
                message: format!("l2_lambda must be positive, got {l2_lambda}"),
            });
        }
        Ok(Self {
            alpha,
            models: vec![RidgeRegression::new(num_features, l2_lambda); num_actions],
        })
    }

    /// Upper confidence bound of every action for `context`
    pub fn bounds(&self, context: &[f64]) -> Vec<f64> {
        self.models
            .iter()
            .map(|model| {
                if model.observations() == 0 {
                    f64::INFINITY
                } else {
                    model.predict(context) + self.alpha * model.width(context)
                }
            })
            .collect()
    }

    /// Expected reward of every action for `context`
    pub fn expectations(&self, context: &[f64]) -> Vec<f64> {
        self.models.iter().map(|m| m.predict(context)).collect()
    }

    fn num_features(&self) -> usize {
        self.models[0].num_features()
    }
}

impl Agent for LinUcb {
    fn choose(&mut self, context: &[f64], rng: &mut dyn rand::RngCore) -> Result<usize> {
        check_context(context, self.num_features())?;

        let bounds = self.bounds(context);
        let best = bounds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let best_actions: Vec<usize> = bounds
            .iter()
            .enumerate()
            .filter(|(_, ucb)| **ucb == best || (**ucb - best).abs() < 1e-10)
            .map(|(action, _)| action)
            .collect();

        // Break ties randomly
        Ok(best_actions.choose(rng).copied().unwrap_or(0))
    }

    fn update(&mut self, context: &[f64], action: usize, reward: f64) -> Result<()> {
        check_action(action, self.models.len())?;
        check_context(context, self.num_features())?;
        self.models[action].fit(context, reward);
        Ok(())
    }

    fn name(&self) -> &str {
        "linucb"
    }
}

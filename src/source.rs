//! Replayable contextual bandit over a fixed dataset.
//!
//! Every dataset row is a context followed by one reward per action:
//!
//! ```text
//! | x_0 .. x_{d-1} | r_0 .. r_{k-1} |
//! ```

use ndarray::{Array2, ArrayView1, s};
use rand::seq::SliceRandom;

use crate::error::{BanditError, Result};

/// A contextual bandit with `d`-dimensional contexts and `k` arms.
///
/// The bandit owns its dataset read-only; only [`feed`](Self::feed) and
/// [`reset`](Self::reset) mutate it. Round `i` refers to dataset row
/// `order[i]`.
#[derive(Debug, Clone)]
pub struct ContextualBandit {
    context_dim: usize,
    num_actions: usize,
    data: Option<Array2<f64>>,
    order: Vec<usize>,
}

impl ContextualBandit {
    /// Creates an empty bandit; call [`feed`](Self::feed) before reading from it.
    #[must_use]
    pub fn new(context_dim: usize, num_actions: usize) -> Self {
        Self {
            context_dim,
            num_actions,
            data: None,
            order: Vec::new(),
        }
    }

    /// Feeds the data (contexts + rewards) to the bandit.
    ///
    /// The presentation order is reset to the identity.
    ///
    /// # Errors
    /// Returns [`BanditError::InvalidParameter`] when the bandit has no
    /// actions, and [`BanditError::DimensionMismatch`] when the column count
    /// is not `context_dim + num_actions`.
    pub fn feed(&mut self, data: Array2<f64>) -> Result<()> {
        if self.num_actions == 0 {
            return Err(BanditError::InvalidParameter {
                message: "a bandit needs at least one action".to_string(),
            });
        }
        let expected = self.context_dim + self.num_actions;
        if data.ncols() != expected {
            return Err(BanditError::DimensionMismatch {
                expected,
                got: data.ncols(),
            });
        }

        self.order = (0..data.nrows()).collect();
        self.data = Some(data);
        Ok(())
    }

    /// Randomly shuffles the order in which contexts are delivered.
    pub fn reset(&mut self, rng: &mut dyn rand::RngCore) {
        self.order = (0..self.num_contexts()).collect();
        self.order.shuffle(rng);
    }

    /// Returns the context of round `number`.
    pub fn context(&self, number: usize) -> Result<Vec<f64>> {
        let row = self.row(number)?;
        Ok(row.slice(s![..self.context_dim]).to_vec())
    }

    /// Returns the reward of `action` at round `number`.
    pub fn reward(&self, number: usize, action: usize) -> Result<f64> {
        if action >= self.num_actions {
            return Err(BanditError::ActionOutOfRange {
                action,
                num_actions: self.num_actions,
            });
        }
        let row = self.row(number)?;
        Ok(row[self.context_dim + action])
    }

    /// Returns the optimal action (in hindsight) at round `number`.
    ///
    /// Ties go to the lowest action index.
    pub fn optimal(&self, number: usize) -> Result<usize> {
        let row = self.row(number)?;
        let rewards = row.slice(s![self.context_dim..]);

        let mut best = 0;
        for (action, &reward) in rewards.iter().enumerate().skip(1) {
            if reward > rewards[best] {
                best = action;
            }
        }
        Ok(best)
    }

    /// Dimension of the contexts
    pub fn context_dim(&self) -> usize {
        self.context_dim
    }

    /// Number of arms
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Number of contexts fed so far (zero before `feed`)
    pub fn num_contexts(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.nrows())
    }

    /// Current presentation order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    fn row(&self, number: usize) -> Result<ArrayView1<'_, f64>> {
        let data = self.data.as_ref().ok_or(BanditError::NotFed)?;
        let index = self
            .order
            .get(number)
            .ok_or(BanditError::RoundOutOfRange {
                round: number,
                num_contexts: data.nrows(),
            })?;
        Ok(data.row(*index))
    }
}

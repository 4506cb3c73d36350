use rand::Rng;

use super::{check_action, check_num_actions};
use crate::agent::Agent;
use crate::error::{BanditError, Result};

/// Epsilon-greedy agent - explores with probability epsilon, exploits otherwise
///
/// Keeps a running mean reward per action and ignores the context.
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
    stats: Vec<ArmStats>,
}

#[derive(Clone, Debug, Default)]
struct ArmStats {
    pulls: usize,
    total_reward: f64,
}

impl ArmStats {
    fn average_reward(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.total_reward / self.pulls as f64
        }
    }
}

impl EpsilonGreedy {
    /// Creates a new agent over `num_actions` actions
    ///
    /// # Errors
    /// Returns [`BanditError::InvalidParameter`] if epsilon is outside `[0, 1]`
    /// or there are no actions.
    pub fn new(num_actions: usize, epsilon: f64) -> Result<Self> {
        check_num_actions(num_actions)?;
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(BanditError::InvalidParameter {
                message: format!("epsilon must be between 0 and 1, got {epsilon}"),
            });
        }
        Ok(Self {
            epsilon,
            stats: vec![ArmStats::default(); num_actions],
        })
    }

    /// Gets the epsilon value
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Pull count and mean reward of an action
    pub fn arm_stats(&self, action: usize) -> Option<(usize, f64)> {
        self.stats.get(action).map(|s| (s.pulls, s.average_reward()))
    }

    /// Action with the highest mean reward (lowest index on ties)
    fn best_action(&self) -> usize {
        let mut best = 0;
        for (action, stats) in self.stats.iter().enumerate().skip(1) {
            if stats.average_reward() > self.stats[best].average_reward() {
                best = action;
            }
        }
        best
    }
}

impl Agent for EpsilonGreedy {
    fn choose(&mut self, _context: &[f64], rng: &mut dyn rand::RngCore) -> Result<usize> {
        let r: f64 = rng.random_range(0.0..1.0);
        if r < self.epsilon {
            Ok(rng.random_range(0..self.stats.len()))
        } else {
            Ok(self.best_action())
        }
    }

    fn update(&mut self, _context: &[f64], action: usize, reward: f64) -> Result<()> {
        check_action(action, self.stats.len())?;
        let stats = &mut self.stats[action];
        stats.pulls += 1;
        stats.total_reward += reward;
        Ok(())
    }

    fn name(&self) -> &str {
        "epsilon-greedy"
    }
}

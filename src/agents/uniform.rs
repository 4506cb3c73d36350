use rand::Rng;

use super::{check_action, check_num_actions};
use crate::agent::Agent;
use crate::error::Result;

/// Uniform selection - chooses every action with equal probability
#[derive(Clone, Debug)]
pub struct Uniform {
    num_actions: usize,
}

impl Uniform {
    /// Creates a uniform agent over `num_actions` actions
    pub fn new(num_actions: usize) -> Result<Self> {
        check_num_actions(num_actions)?;
        Ok(Self { num_actions })
    }
}

impl Agent for Uniform {
    fn choose(&mut self, _context: &[f64], rng: &mut dyn rand::RngCore) -> Result<usize> {
        Ok(rng.random_range(0..self.num_actions))
    }

    fn update(&mut self, _context: &[f64], action: usize, _reward: f64) -> Result<()> {
        // Nothing to learn
        check_action(action, self.num_actions)
    }

    fn name(&self) -> &str {
        "uniform"
    }
}

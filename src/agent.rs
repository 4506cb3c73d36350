//! Agent trait definition for contextual bandit algorithms

use crate::error::Result;

/// A decision algorithm driven by the replay harness.
///
/// The harness only ever talks to an agent through these two operations; the
/// agent owns its internal policy state exclusively. Actions are indices in
/// `0..num_actions`.
///
/// Note: the random source is passed as `dyn rand::RngCore` so that
/// `Box<dyn Agent>` can be used to mix algorithms in one run.
pub trait Agent {
    /// Choose an action for the given context
    ///
    /// # Arguments
    /// - `context`: The feature vector for the current round
    /// - `rng`: Random number generator for stochastic agents
    fn choose(&mut self, context: &[f64], rng: &mut dyn rand::RngCore) -> Result<usize>;

    /// Update the agent with a (possibly synthetic) observation
    ///
    /// # Arguments
    /// - `context`: The context the reward was observed under
    /// - `action`: The action the reward is attributed to
    /// - `reward`: The observed reward
    fn update(&mut self, context: &[f64], action: usize, reward: f64) -> Result<()>;

    /// Short human-readable name used in logs
    fn name(&self) -> &str {
        "agent"
    }
}

impl<A> Agent for Box<A>
where
    A: Agent + ?Sized,
{
    fn choose(&mut self, context: &[f64], rng: &mut dyn rand::RngCore) -> Result<usize> {
        (**self).choose(context, rng)
    }

    fn update(&mut self, context: &[f64], action: usize, reward: f64) -> Result<()> {
        (**self).update(context, action, reward)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<A> Agent for &mut A
where
    A: Agent + ?Sized,
{
    fn choose(&mut self, context: &[f64], rng: &mut dyn rand::RngCore) -> Result<usize> {
        (**self).choose(context, rng)
    }

    fn update(&mut self, context: &[f64], action: usize, reward: f64) -> Result<()> {
        (**self).update(context, action, reward)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

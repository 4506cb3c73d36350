//! Sequential replay of a contextual bandit with periodic mixup augmentation.
//!
//! Every round each agent chooses an action for the current context, is
//! updated with the real reward, and the observation is recorded in a
//! [`HistoryBuffer`]. Every `flush_period` rounds the buffer is drained; under
//! the selected [`Augmentation`] the drained observations are turned into
//! synthetic samples that are fed back through [`Agent::update`].

use std::fmt;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::agent::Agent;
use crate::derangement::derangement;
use crate::error::{BanditError, Result};
use crate::history::{AgentHistory, HistoryBuffer};
use crate::mixup::{
    DEFAULT_LAMBDA_ALPHA, DEFAULT_LAMBDA_BETA, LambdaSampler, contrast_mixup, mixup,
};
use crate::source::ContextualBandit;

/// Default number of rounds between augmentation flushes.
pub const DEFAULT_FLUSH_PERIOD: usize = 30;

/// Which synthetic samples are generated at a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Augmentation {
    /// History is discarded without synthesis.
    #[default]
    None,
    /// Mixup inside each action's group; synthetic samples keep that action.
    SameAction,
    /// Contrast mixup between randomly paired action groups; synthetic samples
    /// are attributed to the first action of each pair.
    CrossAction,
    /// Mixup over all of an agent's records regardless of action; synthetic
    /// sample `i` is attributed to the action of record `i`.
    Pooled,
}

/// Configuration for a replay run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Rounds between flushes (at least 1)
    pub flush_period: usize,
    /// Augmentation policy applied at each flush
    pub augmentation: Augmentation,
    /// Alpha parameter of the Beta distribution for mixing coefficients
    pub lambda_alpha: f64,
    /// Beta parameter of the Beta distribution for mixing coefficients
    pub lambda_beta: f64,
    /// Shuffle the presentation order before the first round
    pub shuffle: bool,
    /// Log progress every this many rounds (0 disables)
    pub progress_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            flush_period: DEFAULT_FLUSH_PERIOD,
            augmentation: Augmentation::None,
            lambda_alpha: DEFAULT_LAMBDA_ALPHA,
            lambda_beta: DEFAULT_LAMBDA_BETA,
            shuffle: false,
            progress_every: 100,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the augmentation policy
    #[must_use]
    pub fn with_augmentation(mut self, augmentation: Augmentation) -> Self {
        self.augmentation = augmentation;
        self
    }

    /// Set the flush period
    #[must_use]
    pub fn with_flush_period(mut self, flush_period: usize) -> Self {
        self.flush_period = flush_period;
        self
    }

    /// Set the Beta parameters for the mixing coefficient
    #[must_use]
    pub fn with_lambda(mut self, alpha: f64, beta: f64) -> Self {
        self.lambda_alpha = alpha;
        self.lambda_beta = beta;
        self
    }

    /// Enable or disable shuffling before the first round
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the progress logging interval
    #[must_use]
    pub fn with_progress_every(mut self, progress_every: usize) -> Self {
        self.progress_every = progress_every;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.flush_period == 0 {
            return Err(BanditError::InvalidParameter {
                message: "flush_period must be at least 1".to_string(),
            });
        }
        LambdaSampler::new(self.lambda_alpha, self.lambda_beta)?;
        Ok(())
    }
}

/// Everything a run produces.
pub struct RunOutcome<A> {
    /// Chosen actions, `num_contexts x num_agents`
    pub actions: Array2<usize>,
    /// Observed rewards, `num_contexts x num_agents`
    pub rewards: Array2<f64>,
    /// Optimal action of every round
    pub optimal_actions: Array1<usize>,
    /// Dataset row replayed at each round
    pub order: Vec<usize>,
    /// Round indices after which a flush ran
    pub flush_rounds: Vec<usize>,
    /// Synthetic updates fed to each agent over the whole run
    pub synthetic_updates: Vec<usize>,
    /// The agents, in their trained state
    pub agents: Vec<A>,
}

// Agents are only counted so `Box<dyn Agent>` outcomes stay printable.
impl<A> fmt::Debug for RunOutcome<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOutcome")
            .field("actions", &self.actions)
            .field("rewards", &self.rewards)
            .field("optimal_actions", &self.optimal_actions)
            .field("order", &self.order)
            .field("flush_rounds", &self.flush_rounds)
            .field("synthetic_updates", &self.synthetic_updates)
            .field("agents", &self.agents.len())
            .finish()
    }
}

/// Drives agents through a dataset.
#[derive(Debug, Clone)]
pub struct Runner {
    config: RunConfig,
    lambda: LambdaSampler,
}

impl Runner {
    /// Creates a runner after validating `config`.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let lambda = LambdaSampler::new(config.lambda_alpha, config.lambda_beta)?;
        Ok(Self { config, lambda })
    }

    /// Gets the configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Replays `dataset` against `agents`.
    ///
    /// # Arguments
    /// * `context_dim` - Dimension of the contexts
    /// * `num_actions` - Number of arms
    /// * `dataset` - One row per context: `context_dim` features then `num_actions` rewards
    /// * `agents` - Agents to drive; returned in their final state
    /// * `rng` - Random source for agents, shuffling, and augmentation
    ///
    /// # Errors
    /// Fails before the first round if the dataset has the wrong column count.
    /// The first agent failure aborts the run.
    pub fn run<A>(
        &self,
        context_dim: usize,
        num_actions: usize,
        dataset: Array2<f64>,
        mut agents: Vec<A>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<RunOutcome<A>>
    where
        A: Agent,
    {
        let mut bandit = ContextualBandit::new(context_dim, num_actions);
        bandit.feed(dataset)?;
        if self.config.shuffle {
            bandit.reset(rng);
        }

        let num_contexts = bandit.num_contexts();
        let num_agents = agents.len();
        info!(
            num_contexts,
            num_agents,
            augmentation = ?self.config.augmentation,
            flush_period = self.config.flush_period,
            "Starting contextual bandit replay"
        );

        let mut actions = Array2::<usize>::zeros((num_contexts, num_agents));
        let mut rewards = Array2::<f64>::zeros((num_contexts, num_agents));
        let mut optimal_actions = Array1::<usize>::zeros(num_contexts);
        let mut flush_rounds = Vec::new();
        let mut synthetic_updates = vec![0; num_agents];
        let mut history = HistoryBuffer::new(num_agents);

        for i in 0..num_contexts {
            if self.config.progress_every > 0 && i % self.config.progress_every == 0 {
                info!(round = i, num_contexts, "Replay progress");
            }

            let context = bandit.context(i)?;
            optimal_actions[i] = bandit.optimal(i)?;

            let mut chosen = Vec::with_capacity(num_agents);
            for (j, agent) in agents.iter_mut().enumerate() {
                let action = agent.choose(&context, rng).map_err(|e| e.for_agent(j))?;
                let reward = bandit.reward(i, action).map_err(|e| e.for_agent(j))?;
                chosen.push((action, reward));
            }

            for (j, (agent, &(action, reward))) in agents.iter_mut().zip(&chosen).enumerate() {
                agent
                    .update(&context, action, reward)
                    .map_err(|e| e.for_agent(j))?;
                history.push(j, context.clone(), action, reward);
                actions[[i, j]] = action;
                rewards[[i, j]] = reward;
            }

            if (i + 1) % self.config.flush_period == 0 {
                let histories = history.flush();
                let mut flushed = Vec::with_capacity(agents.len());
                for (j, (agent, window)) in agents.iter_mut().zip(histories).enumerate() {
                    let count = self.augment(j, agent, window, rng)?;
                    synthetic_updates[j] += count;
                    flushed.push(count);
                }
                debug!(round = i, synthetic_updates = ?flushed, "History flushed");
                flush_rounds.push(i);
            }
        }

        Ok(RunOutcome {
            actions,
            rewards,
            optimal_actions,
            order: bandit.order().to_vec(),
            flush_rounds,
            synthetic_updates,
            agents,
        })
    }

    /// Feeds synthetic samples built from one agent's window back to it.
    ///
    /// Returns the number of synthetic updates made.
    fn augment<A>(
        &self,
        index: usize,
        agent: &mut A,
        window: AgentHistory,
        rng: &mut dyn rand::RngCore,
    ) -> Result<usize>
    where
        A: Agent,
    {
        let mut count = 0;
        let mut feed = |action: usize, context: &[f64], reward: f64| -> Result<()> {
            agent
                .update(context, action, reward)
                .map_err(|e| e.for_agent(index))?;
            count += 1;
            Ok(())
        };

        match self.config.augmentation {
            Augmentation::None => {}
            Augmentation::SameAction => {
                for (action, group) in window.into_groups() {
                    if group.len() < 2 {
                        trace!(agent = index, action, "Skipping single-record action group");
                        continue;
                    }
                    for sample in mixup(&group, &self.lambda, rng)? {
                        feed(action, &sample.context, sample.reward)?;
                    }
                }
            }
            Augmentation::CrossAction => {
                let groups = window.into_groups();
                if groups.len() < 2 {
                    trace!(
                        agent = index,
                        distinct_actions = groups.len(),
                        "Skipping contrast mixup"
                    );
                    return Ok(0);
                }
                let partners = derangement(groups.len(), rng)?;
                for ((&action, first), &p) in groups.iter().zip(&partners) {
                    for sample in contrast_mixup(first, &groups[p], &self.lambda, rng) {
                        feed(action, &sample.context, sample.reward)?;
                    }
                }
            }
            Augmentation::Pooled => {
                if window.len() < 2 {
                    trace!(agent = index, records = window.len(), "Skipping pooled mixup");
                    return Ok(0);
                }
                let (window_actions, samples) = window.into_parts();
                let mixed = mixup(&samples, &self.lambda, rng)?;
                for (action, sample) in window_actions.into_iter().zip(mixed) {
                    feed(action, &sample.context, sample.reward)?;
                }
            }
        }

        Ok(count)
    }
}

fn run_with<A>(
    augmentation: Augmentation,
    context_dim: usize,
    num_actions: usize,
    dataset: Array2<f64>,
    agents: Vec<A>,
    rng: &mut dyn rand::RngCore,
) -> Result<RunOutcome<A>>
where
    A: Agent,
{
    Runner::new(RunConfig::default().with_augmentation(augmentation))?.run(
        context_dim,
        num_actions,
        dataset,
        agents,
        rng,
    )
}

/// Runs the bandit with no augmentation.
pub fn run_contextual_bandit<A>(
    context_dim: usize,
    num_actions: usize,
    dataset: Array2<f64>,
    agents: Vec<A>,
    rng: &mut dyn rand::RngCore,
) -> Result<RunOutcome<A>>
where
    A: Agent,
{
    run_with(Augmentation::None, context_dim, num_actions, dataset, agents, rng)
}

/// Runs the bandit with same-action mixup every [`DEFAULT_FLUSH_PERIOD`] rounds.
pub fn run_mixup_contextual_bandit<A>(
    context_dim: usize,
    num_actions: usize,
    dataset: Array2<f64>,
    agents: Vec<A>,
    rng: &mut dyn rand::RngCore,
) -> Result<RunOutcome<A>>
where
    A: Agent,
{
    run_with(Augmentation::SameAction, context_dim, num_actions, dataset, agents, rng)
}

/// Runs the bandit with cross-action contrast mixup every [`DEFAULT_FLUSH_PERIOD`] rounds.
pub fn run_contrast_mixup_contextual_bandit<A>(
    context_dim: usize,
    num_actions: usize,
    dataset: Array2<f64>,
    agents: Vec<A>,
    rng: &mut dyn rand::RngCore,
) -> Result<RunOutcome<A>>
where
    A: Agent,
{
    run_with(Augmentation::CrossAction, context_dim, num_actions, dataset, agents, rng)
}

/// Runs the bandit with action-agnostic pooled mixup every [`DEFAULT_FLUSH_PERIOD`] rounds.
pub fn run_random_mixup_contextual_bandit<A>(
    context_dim: usize,
    num_actions: usize,
    dataset: Array2<f64>,
    agents: Vec<A>,
    rng: &mut dyn rand::RngCore,
) -> Result<RunOutcome<A>>
where
    A: Agent,
{
    run_with(Augmentation::Pooled, context_dim, num_actions, dataset, agents, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Records every synthetic update it receives.
    #[derive(Default)]
    struct Recorder {
        updates: Vec<(Vec<f64>, usize, f64)>,
    }

    impl Agent for Recorder {
        fn choose(&mut self, _context: &[f64], _rng: &mut dyn rand::RngCore) -> Result<usize> {
            Ok(0)
        }

        fn update(&mut self, context: &[f64], action: usize, reward: f64) -> Result<()> {
            self.updates.push((context.to_vec(), action, reward));
            Ok(())
        }
    }

    fn window(entries: &[(usize, f64)]) -> AgentHistory {
        let mut buffer = HistoryBuffer::new(1);
        for &(action, reward) in entries {
            buffer.push(0, vec![reward], action, reward);
        }
        buffer.flush().remove(0)
    }

    fn runner(augmentation: Augmentation) -> Runner {
        Runner::new(RunConfig::default().with_augmentation(augmentation)).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.flush_period, 30);
        assert_eq!(config.augmentation, Augmentation::None);
        assert_eq!((config.lambda_alpha, config.lambda_beta), (7.0, 2.0));
        assert!(!config.shuffle);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = RunConfig::default().with_flush_period(0);
        assert!(matches!(
            Runner::new(config),
            Err(BanditError::InvalidParameter { .. })
        ));

        let config = RunConfig::default().with_lambda(-1.0, 2.0);
        assert!(matches!(
            config.validate(),
            Err(BanditError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_none_discards_window() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut agent = Recorder::default();
        let count = runner(Augmentation::None)
            .augment(0, &mut agent, window(&[(0, 0.0), (0, 1.0)]), &mut rng)
            .unwrap();
        assert_eq!(count, 0);
        assert!(agent.updates.is_empty());
    }

    #[test]
    fn test_same_action_skips_singletons() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut agent = Recorder::default();
        let entries = [(0, 0.0), (1, 5.0), (0, 1.0), (0, 2.0)];
        let count = runner(Augmentation::SameAction)
            .augment(0, &mut agent, window(&entries), &mut rng)
            .unwrap();

        // action 1 has a single record and is skipped
        assert_eq!(count, 3);
        for (context, action, reward) in &agent.updates {
            assert_eq!(*action, 0);
            assert!((0.0..=2.0).contains(reward));
            assert_eq!(context[0], *reward);
        }
    }

    #[test]
    fn test_cross_action_pairs_groups() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut agent = Recorder::default();
        // action 0 rewards in [0, 1], action 1 rewards in [10, 11]
        let entries = [(0, 0.0), (1, 10.0), (0, 1.0), (1, 11.0), (1, 10.5)];
        let count = runner(Augmentation::CrossAction)
            .augment(0, &mut agent, window(&entries), &mut rng)
            .unwrap();

        // with two groups the pairing is always (0, 1) and (1, 0), each
        // truncated to the shorter group of two
        assert_eq!(count, 4);
        let to_zero = agent.updates.iter().filter(|u| u.1 == 0).count();
        assert_eq!(to_zero, 2);
        for (_, action, reward) in &agent.updates {
            // each synthetic reward is dominated by its attributed action
            if *action == 0 {
                assert!(*reward <= 6.0);
            } else {
                assert!(*reward >= 5.0);
            }
        }
    }

    #[test]
    fn test_cross_action_deranges_three_actions() {
        // group sizes 4, 2 and 3 in first-appearance order 0, 1, 2
        let entries = [
            (0, 0.0),
            (1, 10.0),
            (2, 20.0),
            (0, 1.0),
            (1, 11.0),
            (2, 21.0),
            (0, 2.0),
            (2, 22.0),
            (0, 3.0),
        ];
        let mut seen = Vec::new();
        for seed in 0..20 {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let mut agent = Recorder::default();
            let count = runner(Augmentation::CrossAction)
                .augment(0, &mut agent, window(&entries), &mut rng)
                .unwrap();
            assert_eq!(count, 7);

            let per_action: Vec<usize> = (0..3)
                .map(|a| agent.updates.iter().filter(|u| u.1 == a).count())
                .collect();
            // 0 -> 1 -> 2 -> 0 gives [min(4, 2), min(2, 3), min(3, 4)];
            // 0 -> 2 -> 1 -> 0 gives [min(4, 3), min(2, 4), min(3, 2)]
            assert!(
                per_action == [2, 2, 3] || per_action == [3, 2, 2],
                "unexpected pairing {per_action:?}"
            );
            for (context, action, reward) in &agent.updates {
                // the attributed action's own record dominates the blend
                match action {
                    0 => assert!(*reward <= 12.5, "{reward} for action 0"),
                    2 => assert!(*reward >= 10.0, "{reward} for action 2"),
                    _ => assert!((0.0..=22.0).contains(reward)),
                }
                assert_eq!(context[0], *reward);
            }
            if !seen.contains(&per_action) {
                seen.push(per_action);
            }
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_cross_action_needs_two_actions() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut agent = Recorder::default();
        let count = runner(Augmentation::CrossAction)
            .augment(0, &mut agent, window(&[(2, 0.0), (2, 1.0)]), &mut rng)
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_pooled_keeps_record_actions() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut agent = Recorder::default();
        let entries = [(0, 0.0), (1, 1.0), (2, 2.0)];
        let count = runner(Augmentation::Pooled)
            .augment(0, &mut agent, window(&entries), &mut rng)
            .unwrap();
        assert_eq!(count, 3);
        let actions: Vec<usize> = agent.updates.iter().map(|u| u.1).collect();
        assert_eq!(actions, vec![0, 1, 2]);

        let count = runner(Augmentation::Pooled)
            .augment(0, &mut agent, window(&[(0, 0.0)]), &mut rng)
            .unwrap();
        assert_eq!(count, 0);
    }
}

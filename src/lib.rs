//! mixband: contextual bandit replay with mixup augmentation.
//!
//! A dataset of contexts with per-action reward labels is replayed round by
//! round. Every agent chooses an action, is updated with the reward of that
//! action, and the observation is kept in a history buffer. Periodically the
//! buffer is flushed through a mixup synthesizer and the synthetic samples are
//! fed back into the agents as additional updates.
//!
//! # Quick Start
//!
//! ```
//! use mixband::prelude::*;
//! use ndarray::array;
//! use rand::SeedableRng;
//!
//! // Two-dimensional contexts, two actions: [x0, x1, r0, r1]
//! let dataset = array![
//!     [1.0, 0.0, 1.0, 0.0],
//!     [0.0, 1.0, 0.0, 1.0],
//!     [1.0, 0.0, 1.0, 0.0],
//! ];
//!
//! let agents: Vec<Box<dyn Agent>> = vec![
//!     Box::new(Uniform::new(2).unwrap()),
//!     Box::new(LinUcb::new(2, 2, 1.0, 1.0).unwrap()),
//! ];
//!
//! let config = RunConfig::default()
//!     .with_augmentation(Augmentation::SameAction)
//!     .with_flush_period(2);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let outcome = Runner::new(config)
//!     .unwrap()
//!     .run(2, 2, dataset, agents, &mut rng)
//!     .unwrap();
//!
//! assert_eq!(outcome.actions.dim(), (3, 2));
//! assert_eq!(outcome.flush_rounds, vec![1]);
//! ```

mod agent;
pub mod agents;
mod derangement;
mod error;
mod history;
pub mod mixup;
mod regression;
mod runner;
mod source;

// Re-export main types
pub use agent::Agent;
pub use derangement::{derangement, is_derangement};
pub use error::{AgentFailure, BanditError, Result};
pub use history::{AgentHistory, HistoryBuffer, Record};
pub use regression::RidgeRegression;
pub use runner::{
    Augmentation, DEFAULT_FLUSH_PERIOD, RunConfig, RunOutcome, Runner, run_contextual_bandit,
    run_contrast_mixup_contextual_bandit, run_mixup_contextual_bandit,
    run_random_mixup_contextual_bandit,
};
pub use source::ContextualBandit;

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use mixband::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agents::{EpsilonGreedy, LinTs, LinUcb, Uniform};
    pub use crate::mixup::{LambdaSampler, Sample};
    pub use crate::{
        Agent, Augmentation, BanditError, ContextualBandit, Result, RunConfig, RunOutcome, Runner,
    };
}

//! Error types for the mixband library.

use thiserror::Error;

/// Result type alias for bandit operations.
pub type Result<T> = std::result::Result<T, BanditError>;

/// Boxed error produced by an agent implementation.
pub type AgentFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while replaying a contextual bandit.
#[derive(Error, Debug)]
pub enum BanditError {
    /// The dataset column count does not equal `context_dim + num_actions`.
    #[error("data dimensions do not match: expected {expected} columns, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A context of the wrong length was handed to an agent.
    #[error("invalid context dimensions: expected {expected}, got {got}")]
    InvalidContextDimensions { expected: usize, got: usize },

    /// The source was read before any data was fed to it.
    #[error("no data has been fed to the bandit")]
    NotFed,

    /// A round index past the end of the dataset.
    #[error("round {round} out of range for {num_contexts} contexts")]
    RoundOutOfRange { round: usize, num_contexts: usize },

    /// An action index past the number of arms.
    #[error("action {action} out of range for {num_actions} actions")]
    ActionOutOfRange { action: usize, num_actions: usize },

    /// A derangement of fewer than two elements was requested.
    #[error("no derangement exists for n = {n}")]
    DerangementTooSmall { n: usize },

    /// Context and reward batches handed to a synthesizer differ in length.
    #[error("batch mismatch: {contexts} contexts, {rewards} rewards")]
    BatchMismatch { contexts: usize, rewards: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// An agent failed; the runner has not attributed it yet.
    #[error("agent failed: {0}")]
    AgentFailed(#[source] AgentFailure),

    /// An agent failed while choosing or updating.
    #[error("agent {agent} failed: {source}")]
    Agent {
        agent: usize,
        #[source]
        source: AgentFailure,
    },
}

impl BanditError {
    /// Wraps an arbitrary agent failure.
    ///
    /// The runner turns it into [`BanditError::Agent`] with the index of the
    /// failing agent.
    pub fn agent<E>(error: E) -> Self
    where
        E: Into<AgentFailure>,
    {
        BanditError::AgentFailed(error.into())
    }

    /// Tags an error raised inside an agent with that agent's index.
    pub(crate) fn for_agent(self, index: usize) -> Self {
        match self {
            BanditError::AgentFailed(source) | BanditError::Agent { source, .. } => {
                BanditError::Agent {
                    agent: index,
                    source,
                }
            }
            other => BanditError::Agent {
                agent: index,
                source: Box::new(other),
            },
        }
    }
}

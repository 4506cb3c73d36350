//! Per-agent record of real observations between augmentation flushes.

use indexmap::{IndexMap, IndexSet};

use crate::mixup::Sample;

/// One real `(context, action, reward)` observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub action: usize,
    pub sample: Sample,
}

/// Observations of a single agent, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct AgentHistory {
    records: Vec<Record>,
}

impl AgentHistory {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in arrival order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct actions, in order of first appearance
    pub fn actions(&self) -> Vec<usize> {
        self.records
            .iter()
            .map(|record| record.action)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Splits the history by action.
    ///
    /// Groups are keyed in order of first appearance and keep arrival order
    /// inside each group.
    pub fn into_groups(self) -> IndexMap<usize, Vec<Sample>> {
        let mut groups: IndexMap<usize, Vec<Sample>> = IndexMap::new();
        for record in self.records {
            groups.entry(record.action).or_default().push(record.sample);
        }
        groups
    }

    /// Splits the history into parallel action and sample lists.
    pub fn into_parts(self) -> (Vec<usize>, Vec<Sample>) {
        self.records
            .into_iter()
            .map(|record| (record.action, record.sample))
            .unzip()
    }
}

/// Accumulates observations per agent until the next flush.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    agents: Vec<AgentHistory>,
}

impl HistoryBuffer {
    /// Creates an empty buffer for `num_agents` agents.
    #[must_use]
    pub fn new(num_agents: usize) -> Self {
        Self {
            agents: vec![AgentHistory::default(); num_agents],
        }
    }

    /// Appends a record to `agent`'s bucket.
    ///
    /// # Panics
    /// Panics if `agent` is not below the agent count the buffer was built with.
    pub fn push(&mut self, agent: usize, context: Vec<f64>, action: usize, reward: f64) {
        self.agents[agent].records.push(Record {
            action,
            sample: Sample::new(context, reward),
        });
    }

    /// History of one agent since the last flush
    pub fn agent(&self, agent: usize) -> Option<&AgentHistory> {
        self.agents.get(agent)
    }

    /// Total number of records held
    pub fn len(&self) -> usize {
        self.agents.iter().map(AgentHistory::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.iter().all(AgentHistory::is_empty)
    }

    /// Takes every record out of the buffer, one history per agent.
    ///
    /// The buffer is left empty but keeps its agent count.
    pub fn flush(&mut self) -> Vec<AgentHistory> {
        let num_agents = self.agents.len();
        std::mem::replace(&mut self.agents, vec![AgentHistory::default(); num_agents])
    }
}

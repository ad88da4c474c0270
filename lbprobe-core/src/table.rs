//! Per-replica request counts

use crate::observation::{Observation, ObservationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-replica request counts for a single run.
///
/// Keys appear the first time a replica is observed, so a replica that
/// received no traffic is absent rather than present with a zero count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplicaCountTable {
    counts: BTreeMap<Observation, u64>,
}

impl ReplicaCountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from literal counts, rejecting empty identities.
    pub fn from_counts<I, K>(counts: I) -> Result<Self, ObservationError>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut table = Self::new();
        for (replica, count) in counts {
            *table.counts.entry(Observation::new(replica)?).or_insert(0) += count;
        }
        Ok(table)
    }

    /// Count one completed request against the replica that served it
    pub fn record(&mut self, observation: Observation) {
        *self.counts.entry(observation).or_insert(0) += 1;
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct replicas observed
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, replica: &str) -> Option<u64> {
        self.counts.get(replica).copied()
    }

    /// Counts ordered by replica identity
    pub fn iter(&self) -> impl Iterator<Item = (&Observation, u64)> {
        self.counts.iter().map(|(replica, count)| (replica, *count))
    }
}

//! Configuration management for the clustering run

use crate::cluster::signature::{DEFAULT_WALK_COUNT, DEFAULT_WALK_LENGTH};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Parameters of a clustering run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Random walks per probed vertex
    pub walk_count: usize,

    /// Steps per random walk
    pub walk_length: usize,

    /// Generator seed; `None` until resolved by `with_resolved_seed`
    pub seed: Option<u64>,

    /// Number of communities to cut the dendrogram into
    pub communities: Option<usize>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            walk_count: DEFAULT_WALK_COUNT,
            walk_length: DEFAULT_WALK_LENGTH,
            seed: None,
            communities: None,
        }
    }
}

impl ClusterConfig {
    /// Create a new configuration with custom values
    pub fn new(
        walk_count: usize,
        walk_length: usize,
        seed: Option<u64>,
        communities: Option<usize>,
    ) -> Self {
        Self {
            walk_count,
            walk_length,
            seed,
            communities,
        }
    }

    /// Fix the seed, drawing one if none was given, so the run can be
    /// repeated from the recorded configuration
    pub fn with_resolved_seed(mut self) -> Self {
        if self.seed.is_none() {
            self.seed = Some(rand::random());
        }
        self
    }

    /// Generator for this run
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

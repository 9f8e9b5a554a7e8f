//! Merge sequences produced by agglomeration

use crate::cluster::error::{ClusterError, ClusterResult};
use crate::graph::algorithms::DisjointSets;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One agglomeration step
///
/// Ids follow the usual dendrogram convention: leaves are the vertex ids
/// `0..V`, and the `i`-th merge creates the internal id `V + i` for its
/// survivor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEvent {
    /// Merge id of the community that was absorbed
    pub absorbed: usize,

    /// Merge id of the surviving community before renumbering
    pub survivor: usize,
}

/// Ordered merge events over a fixed set of leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dendrogram {
    leaves: usize,
    merges: Vec<MergeEvent>,
}

impl Dendrogram {
    /// Create an empty dendrogram over `leaves` vertices
    pub fn new(leaves: usize) -> Self {
        Self {
            leaves,
            merges: Vec::with_capacity(leaves.saturating_sub(1)),
        }
    }

    /// Record a merge and return the id assigned to its result
    pub fn push(&mut self, absorbed: usize, survivor: usize) -> usize {
        self.merges.push(MergeEvent { absorbed, survivor });
        self.leaves + self.merges.len() - 1
    }

    pub fn leaves(&self) -> usize {
        self.leaves
    }

    pub fn merges(&self) -> &[MergeEvent] {
        &self.merges
    }

    pub fn len(&self) -> usize {
        self.merges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// Number of trees in the forest; one per connected component
    pub fn roots(&self) -> usize {
        self.leaves.saturating_sub(self.merges.len())
    }

    /// Whether every leaf ended up in a single tree
    pub fn is_complete(&self) -> bool {
        self.roots() <= 1
    }

    /// Replay the first `leaves - k` merges and label every leaf with its
    /// community
    ///
    /// Labels are dense and assigned in order of first appearance by vertex
    /// id, so vertex 0 always lands in community 0.
    pub fn cut(&self, k: usize) -> ClusterResult<Vec<usize>> {
        if k == 0 || k > self.leaves || k < self.roots() {
            return Err(ClusterError::InvalidCut {
                requested: k,
                leaves: self.leaves,
                roots: self.roots(),
            });
        }

        let steps = self.leaves - k;
        let mut sets = DisjointSets::new(self.leaves);

        // Any leaf below a merge id represents it.
        let mut representative: Vec<usize> = (0..self.leaves).collect();
        for (index, merge) in self.merges.iter().take(steps).enumerate() {
            let leaf_of = |id: usize| {
                representative.get(id).copied().ok_or(ClusterError::MalformedMerge { index, id })
            };
            let absorbed = leaf_of(merge.absorbed)?;
            let survivor = leaf_of(merge.survivor)?;
            let root = sets.union(absorbed, survivor);
            representative.push(root);
        }

        let mut labels: HashMap<usize, usize> = HashMap::new();
        let membership = (0..self.leaves)
            .map(|leaf| {
                let root = sets.find(leaf);
                let next = labels.len();
                *labels.entry(root).or_insert(next)
            })
            .collect();

        Ok(membership)
    }
}

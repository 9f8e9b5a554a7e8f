//! Random-walk visitation signatures

use crate::cluster::walker::RandomWalker;
use crate::graph::NeighborGraph;
use rand::Rng;
use std::collections::BTreeMap;

/// Sparse visit counts keyed by vertex id
pub type Signature = BTreeMap<usize, u32>;

/// Default number of walks per probed vertex
pub const DEFAULT_WALK_COUNT: usize = 80;

/// Default number of steps per walk
pub const DEFAULT_WALK_LENGTH: usize = 4;

/// Accumulates every vertex a walk is asked about
#[derive(Debug, Default)]
struct WalkCollector {
    visits: Signature,
}

impl WalkCollector {
    fn collect(&mut self, vertex: usize) -> bool {
        *self.visits.entry(vertex).or_insert(0) += 1;
        false
    }

    fn reset(&mut self) -> Signature {
        std::mem::take(&mut self.visits)
    }
}

/// Builds a vertex signature by repeatedly walking out of it
pub struct SignatureBuilder<'g, G> {
    walker: RandomWalker<'g, G>,
    collector: WalkCollector,
    walk_count: usize,
    walk_length: usize,
}

impl<'g, G: NeighborGraph> SignatureBuilder<'g, G> {
    pub fn new(graph: &'g G, walk_count: usize, walk_length: usize) -> Self {
        Self {
            walker: RandomWalker::new(graph),
            collector: WalkCollector::default(),
            walk_count,
            walk_length,
        }
    }

    /// Run `walk_count` walks of `walk_length` steps from `vertex` and return
    /// how often each vertex was visited
    ///
    /// Each walk records `walk_length` visits unless it gets stuck earlier,
    /// in which case it records the visits made up to that point.
    pub fn probe<R: Rng + ?Sized>(&mut self, vertex: usize, rng: &mut R) -> Signature {
        let collector = &mut self.collector;
        for _ in 0..self.walk_count {
            self.walker.walk(
                vertex,
                Some(self.walk_length),
                rng,
                |v| collector.collect(v),
                |_| true,
            );
        }

        self.collector.reset()
    }
}

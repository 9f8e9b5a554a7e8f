//! Bounded random walks over a `NeighborGraph`

use crate::graph::NeighborGraph;
use rand::Rng;

/// Result of a single walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Number of steps taken, counting the seed evaluation
    pub steps: usize,

    /// Vertex on which the stop condition fired, if any
    pub found: Option<usize>,
}

/// Random walker with caller-supplied stop condition and neighbor filter
///
/// The walker keeps no generator of its own; every draw comes from the
/// `Rng` passed to [`RandomWalker::walk`], so a seeded generator makes runs
/// reproducible.
pub struct RandomWalker<'g, G> {
    graph: &'g G,
}

impl<'g, G: NeighborGraph> RandomWalker<'g, G> {
    /// Create a walker over `graph`
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Walk from `seed` for at most `max_steps` steps (`None` = unbounded)
    ///
    /// `stop` is evaluated on the current vertex before every move, the seed
    /// included. `filter` restricts which neighbors are eligible as the next
    /// step. The walk ends early with no result when it gets stuck on a
    /// vertex with no eligible neighbor.
    pub fn walk<R, S, F>(
        &self,
        seed: usize,
        max_steps: Option<usize>,
        rng: &mut R,
        mut stop: S,
        mut filter: F,
    ) -> WalkOutcome
    where
        R: Rng + ?Sized,
        S: FnMut(usize) -> bool,
        F: FnMut(usize) -> bool,
    {
        let mut steps = 0;
        let mut vertex = seed;
        let mut candidates = Vec::new();

        loop {
            if max_steps.is_some_and(|max| steps >= max) {
                break;
            }

            steps += 1;

            if stop(vertex) {
                return WalkOutcome { steps, found: Some(vertex) };
            }

            candidates.clear();
            candidates.extend(self.graph.neighbors(vertex).filter(|&n| filter(n)));
            candidates.sort_unstable();

            vertex = match candidates.len() {
                // Stuck
                0 => break,
                1 => candidates[0],
                n => candidates[rng.gen_range(0..n)],
            };
        }

        WalkOutcome { steps, found: None }
    }
}

//! `NeighborGraph` implementations for third-party graph types

use petgraph::graph::{NodeIndex, UnGraph};
use crate::graph::NeighborGraph;

impl<N, E> NeighborGraph for UnGraph<N, E> {
    fn vertex_count(&self) -> usize {
        self.node_count()
    }

    fn neighbors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        UnGraph::<N, E>::neighbors(self, NodeIndex::new(vertex)).map(|n| n.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn petgraph_neighbors_use_node_indices() {
        let graph = UnGraph::<(), ()>::from_edges(&[(0, 1), (1, 2)]);

        assert_eq!(NeighborGraph::vertex_count(&graph), 3);

        let mut around_one: Vec<usize> = NeighborGraph::neighbors(&graph, 1).collect();
        around_one.sort_unstable();
        assert_eq!(around_one, vec![0, 2]);
    }
}

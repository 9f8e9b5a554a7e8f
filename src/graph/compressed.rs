//! Memory-efficient graph representation

use std::mem;
use serde::{Serialize, Deserialize};
use crate::graph::NeighborGraph;

/// Compressed sparse representation of a simple undirected graph
///
/// Every edge is stored twice (once per endpoint), adjacency lists are sorted
/// and free of duplicates and self-loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedGraph {
    /// Number of vertices in the graph
    pub node_count: usize,

    /// Offset array: index where each vertex's adjacency begins
    /// offsets[i] to offsets[i+1] defines the neighbor range for vertex i
    pub offsets: Vec<u32>,

    /// Concatenated, sorted adjacency lists
    pub edges: Vec<u32>,

    /// Optional mapping from internal vertex ids to original labels
    pub node_ids: Option<Vec<String>>,
}

impl CompressedGraph {
    /// Create a new graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count,
            offsets: Vec::with_capacity(node_count + 1),
            edges: Vec::with_capacity(edge_count),
            node_ids: None,
        }
    }

    /// Build a graph over vertices `0..node_count` from undirected edge pairs
    ///
    /// Self-loops are dropped and parallel edges collapsed. Endpoints outside
    /// the vertex range grow the vertex set to include them.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let node_count = edges.iter()
            .map(|&(a, b)| a.max(b) + 1)
            .fold(node_count, usize::max);

        let mut adjacency_lists: Vec<Vec<u32>> = vec![Vec::new(); node_count];
        for &(a, b) in edges {
            if a == b {
                continue;
            }
            adjacency_lists[a].push(b as u32);
            adjacency_lists[b].push(a as u32);
        }

        Self::from_adjacency_lists(adjacency_lists)
    }

    /// Row-major `width` x `height` grid without wraparound
    pub fn lattice(width: usize, height: usize) -> Self {
        let mut edges = Vec::new();
        for row in 0..height {
            for col in 0..width {
                let v = row * width + col;
                if col + 1 < width {
                    edges.push((v, v + 1));
                }
                if row + 1 < height {
                    edges.push((v, v + width));
                }
            }
        }
        Self::from_edges(width * height, &edges)
    }

    /// Pack per-vertex adjacency lists, sorting and deduplicating each one
    pub(crate) fn from_adjacency_lists(mut adjacency_lists: Vec<Vec<u32>>) -> Self {
        let node_count = adjacency_lists.len();
        let edge_count: usize = adjacency_lists.iter()
            .map(|list| list.len())
            .sum();

        let mut graph = Self::with_capacity(node_count, edge_count);
        graph.offsets.push(0);

        let mut offset = 0;
        for list in &mut adjacency_lists {
            list.sort_unstable();
            list.dedup();
            offset += list.len() as u32;
            graph.edges.extend_from_slice(list);
            graph.offsets.push(offset);
        }

        graph
    }

    /// Get the sorted neighbors of a vertex
    pub fn neighbors_of(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.edges[start..end]
    }

    /// Check if there's an edge between `a` and `b`
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a < self.node_count && self.neighbors_of(a).binary_search(&(b as u32)).is_ok()
    }

    /// Get the degree of a vertex
    pub fn degree(&self, node: usize) -> usize {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        end - start
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Original label of a vertex, falling back to its internal id
    pub fn label(&self, node: usize) -> String {
        self.node_ids.as_ref()
            .and_then(|ids| ids.get(node).cloned())
            .unwrap_or_else(|| node.to_string())
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();

        let ids = self.node_ids.as_ref()
            .map(|ids| ids.iter().map(|s| s.capacity()).sum::<usize>())
            .unwrap_or(0);

        base + offsets + edges + ids
    }
}

impl NeighborGraph for CompressedGraph {
    fn vertex_count(&self) -> usize {
        self.node_count
    }

    fn neighbors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors_of(vertex).iter().map(|&n| n as usize)
    }
}

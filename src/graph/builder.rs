//! Graph construction module

use crate::graph::CompressedGraph;
use std::collections::HashMap;

/// Builder for incrementally constructing an undirected CompressedGraph
/// from externally labelled vertices
pub struct GraphBuilder {
    /// Mapping from external labels to vertex indices
    id_to_index: HashMap<String, u32>,

    /// External labels, indexed by vertex
    node_ids: Vec<String>,

    /// Adjacency lists for each vertex
    adjacency_lists: Vec<Vec<u32>>,
}

impl GraphBuilder {
    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
        }
    }

    /// Number of vertices seen so far
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Get or create a vertex index for the given label
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency_lists.push(Vec::new());

        idx
    }

    /// Declare a vertex, which may remain isolated
    pub fn add_vertex(&mut self, id: &str) -> u32 {
        self.get_or_create_node(id)
    }

    /// Add an undirected edge; self-loops are ignored
    pub fn add_edge(&mut self, a_id: &str, b_id: &str) {
        let a = self.get_or_create_node(a_id);
        let b = self.get_or_create_node(b_id);

        if a == b {
            return;
        }

        self.adjacency_lists[a as usize].push(b);
        self.adjacency_lists[b as usize].push(a);
    }

    /// Build the compressed graph, collapsing parallel edges
    pub fn build(self) -> CompressedGraph {
        let mut graph = CompressedGraph::from_adjacency_lists(self.adjacency_lists);
        graph.node_ids = Some(self.node_ids);
        graph
    }
}

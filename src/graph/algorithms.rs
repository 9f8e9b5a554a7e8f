//! Graph algorithms for analysis

use crate::graph::NeighborGraph;
use std::collections::BTreeMap;

/// Union-Find data structure for connected component analysis
#[derive(Debug, Clone)]
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of element i)
    parent: Vec<usize>,

    /// Size of each set, valid at roots only
    size: Vec<usize>,
}

impl DisjointSets {
    /// Create `size` singleton sets
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            size: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: usize) -> usize {
        let px = self.parent[x];
        if px != x {
            self.parent[x] = self.find(px);
        }
        self.parent[x]
    }

    /// Union the sets containing x and y, returning the new root
    pub fn union(&mut self, x: usize, y: usize) -> usize {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return root_x;
        }

        // Union by size: attach smaller tree under root of larger tree
        if self.size[root_x] >= self.size[root_y] {
            self.parent[root_y] = root_x;
            self.size[root_x] += self.size[root_y];
            root_x
        } else {
            self.parent[root_x] = root_y;
            self.size[root_y] += self.size[root_x];
            root_y
        }
    }
}

/// Connected components of a graph, each sorted by vertex id and the list
/// ordered by smallest member
pub fn connected_components<G: NeighborGraph>(graph: &G) -> Vec<Vec<usize>> {
    let node_count = graph.vertex_count();
    let mut sets = DisjointSets::new(node_count);

    for vertex in 0..node_count {
        for neighbor in graph.neighbors(vertex) {
            sets.union(vertex, neighbor);
        }
    }

    let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    let mut order = Vec::new();
    for vertex in 0..node_count {
        let root = sets.find(vertex);
        by_root.entry(root)
            .or_insert_with(|| {
                order.push(root);
                Vec::new()
            })
            .push(vertex);
    }

    order.into_iter()
        .filter_map(|root| by_root.remove(&root))
        .collect()
}

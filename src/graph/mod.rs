//! Graph representation and algorithms module

pub mod compressed;
pub mod builder;
pub mod algorithms;
pub mod adapters;

pub use compressed::CompressedGraph;
pub use builder::GraphBuilder;

/// Read-only view of an undirected graph consumed by the clustering engine
///
/// Vertices are the dense ids `0..vertex_count()`. Implementations must be
/// simple graphs: no self-loops and no duplicate neighbors.
pub trait NeighborGraph {
    /// Number of vertices
    fn vertex_count(&self) -> usize;

    /// Neighbors of `vertex`
    fn neighbors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_;
}

//! Random-walk hierarchical community clustering

pub mod community;
pub mod computer;
pub mod dendrogram;
pub mod error;
pub mod metrics;
pub mod prober;
pub mod signature;
pub mod walker;

pub use community::{Communities, Community, CommunityId, CommunityInitializer, MergeHook};
pub use computer::{agglomerate, build_dendrogram, ClusterComputer};
pub use dendrogram::{Dendrogram, MergeEvent};
pub use error::{ClusterError, ClusterResult};
pub use prober::Probe;

use serde::{Serialize, Deserialize};

/// A community obtained by cutting the dendrogram
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Label assigned by the cut
    pub id: usize,

    /// Members of this cluster (vertex ids)
    pub members: Vec<usize>,

    /// Size of the cluster
    pub size: usize,

    /// Density: internal edges / possible undirected edges
    pub density: f32,

    /// Edges with exactly one endpoint in the cluster
    pub boundary_edges: usize,

    /// Members with the highest internal degree
    pub central_nodes: Vec<usize>,
}

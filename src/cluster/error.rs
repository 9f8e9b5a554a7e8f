//! Clustering engine errors

use thiserror::Error;

/// Result alias for the clustering engine
pub type ClusterResult<T> = std::result::Result<T, ClusterError>;

/// Contract violations raised by community bookkeeping and dendrogram cuts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// A member's neighbor vertex had no owning community while links were
    /// being installed
    #[error("community {community} is connected to vertex {vertex}, which belongs to no community")]
    UninitializedNeighbor { community: usize, vertex: usize },

    /// A vertex was configured into more than one community
    #[error("vertex {vertex} is configured in both community {first} and community {second}")]
    DuplicateMember { vertex: usize, first: usize, second: usize },

    /// A configured member is not a vertex of the graph
    #[error("community {community} has member {vertex}, which is not a vertex of the graph")]
    UnknownVertex { community: usize, vertex: usize },

    /// A merge was requested between communities that are not adjacent
    #[error("cannot merge non-adjacent communities {survivor} and {absorbed}")]
    NonAdjacentMerge { survivor: usize, absorbed: usize },

    /// A community id outside the arena
    #[error("unknown community {0}")]
    UnknownCommunity(usize),

    /// A community that was absorbed by an earlier merge
    #[error("community {0} was absorbed by an earlier merge")]
    RetiredCommunity(usize),

    /// A dendrogram cut that cannot be produced
    #[error("cannot cut {leaves} leaves with {roots} roots into {requested} communities")]
    InvalidCut { requested: usize, leaves: usize, roots: usize },

    /// A recorded merge refers to an id that did not exist at that step
    #[error("merge {index} refers to id {id}, which is not a live community at that step")]
    MalformedMerge { index: usize, id: usize },
}

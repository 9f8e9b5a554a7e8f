//! Random-walk seeded hierarchical community clustering

pub mod config;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod storage;

pub use anyhow::{Result, anyhow};
pub use cluster::{build_dendrogram, ClusterError, Dendrogram, MergeEvent};
pub use graph::{CompressedGraph, NeighborGraph};

//! Graph input decoding

pub mod adjacency;

//! Adjacency-list text decoding
//!
//! Each line holds a source vertex followed by zero or more targets,
//! separated by whitespace:
//!
//! ```text
//! # comment
//! 0 1 2 3
//! 1 2 4
//! 7
//! ```
//!
//! A source without targets declares an isolated vertex. Edges are read as
//! undirected, and labels are remapped to dense ids in order of first
//! appearance.

use anyhow::{Context, Result};
use crate::graph::{CompressedGraph, GraphBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a graph from an adjacency-list file
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<CompressedGraph> {
    let path = path.as_ref();
    log::info!("Reading adjacency list: {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("cannot open graph file {}", path.display()))?;

    let graph = parse_graph(BufReader::new(file))
        .with_context(|| format!("cannot decode graph file {}", path.display()))?;

    log::info!(
        "Loaded graph with {} vertices and {} edges ({} bytes)",
        graph.node_count,
        graph.edge_count(),
        graph.memory_usage()
    );

    Ok(graph)
}

/// Decode an adjacency list from any buffered reader
pub fn parse_graph<R: BufRead>(reader: R) -> Result<CompressedGraph> {
    let mut builder = GraphBuilder::with_capacity(1024);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read error at line {}", line_no + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        // Non-empty after trimming, so there is always a first token.
        let Some(source) = tokens.next() else { continue };
        builder.add_vertex(source);
        for target in tokens {
            builder.add_edge(source, target);
        }
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_adjacency_lines_and_isolated_vertices() {
        let input = "# ring with a spur\n0 1 2\n1 2\n\n7\n2 0\n";

        let graph = parse_graph(Cursor::new(input)).unwrap();

        assert_eq!(graph.node_count, 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.label(3), "7");
        assert_eq!(graph.degree(3), 0);
        assert!(graph.has_edge(0, 2));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_graph("/definitely/not/here.adj").unwrap_err();

        assert!(format!("{:#}", err).contains("/definitely/not/here.adj"));
    }
}

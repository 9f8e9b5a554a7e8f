//! Results persistence module

use anyhow::{Context, Result};
use crate::cluster::{Cluster, Dendrogram};
use crate::config::ClusterConfig;
use crate::graph::CompressedGraph;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use serde_json::{json, to_string_pretty};

/// Save analysis results to the specified directory
pub fn save_results(
    graph: &CompressedGraph,
    config: &ClusterConfig,
    dendrogram: &Dendrogram,
    clusters: Option<&[Cluster]>,
    output_dir: &Path,
) -> Result<()> {
    log::info!("Saving results to {}", output_dir.display());

    fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create output directory {}", output_dir.display()))?;

    save_summary(graph, config, dendrogram, clusters, output_dir)?;
    write_json(&output_dir.join("dendrogram.json"), &to_string_pretty(dendrogram)?)?;

    if let Some(clusters) = clusters {
        save_clusters(graph, clusters, output_dir)?;
    }

    log::info!("Results saved successfully");

    Ok(())
}

fn write_json(path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

/// Save summary information
fn save_summary(
    graph: &CompressedGraph,
    config: &ClusterConfig,
    dendrogram: &Dendrogram,
    clusters: Option<&[Cluster]>,
    output_dir: &Path,
) -> Result<()> {
    log::info!("Saving summary information");

    let cluster_stats = clusters.map(|clusters| {
        json!({
            "cluster_count": clusters.len(),
            "largest_cluster_size": clusters.first().map_or(0, |c| c.size),
            "smallest_cluster_size": clusters.last().map_or(0, |c| c.size),
            "avg_density": clusters.iter().map(|c| c.density as f64).sum::<f64>() /
                           if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
        })
    });

    let summary = json!({
        "graph_stats": {
            "node_count": graph.node_count,
            "edge_count": graph.edge_count(),
            "avg_degree": 2.0 * graph.edge_count() as f64 /
                          if graph.node_count == 0 { 1.0 } else { graph.node_count as f64 },
        },
        "parameters": {
            "walk_count": config.walk_count,
            "walk_length": config.walk_length,
            "seed": config.seed,
        },
        "dendrogram_stats": {
            "merges": dendrogram.len(),
            "roots": dendrogram.roots(),
            "complete": dendrogram.is_complete(),
        },
        "cluster_stats": cluster_stats,
    });

    write_json(&output_dir.join("summary.json"), &to_string_pretty(&summary)?)
}

/// Save the communities of a dendrogram cut, with members as original labels
fn save_clusters(
    graph: &CompressedGraph,
    clusters: &[Cluster],
    output_dir: &Path,
) -> Result<()> {
    log::info!("Saving {} clusters", clusters.len());

    let clusters_json = json!({
        "clusters": clusters.iter().map(|c| {
            json!({
                "id": c.id,
                "size": c.size,
                "density": c.density,
                "boundary_edges": c.boundary_edges,
                "central_nodes": c.central_nodes.iter().map(|&v| graph.label(v)).collect::<Vec<_>>(),
                "members": c.members.iter().map(|&v| graph.label(v)).collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>()
    });

    write_json(&output_dir.join("clusters.json"), &to_string_pretty(&clusters_json)?)
}

//! Cluster statistics and metrics

use crate::cluster::Cluster;
use crate::graph::CompressedGraph;
use std::collections::{BTreeMap, HashSet};

/// How many central members to report per cluster
const CENTRAL_NODES: usize = 5;

/// Build per-cluster statistics from a cut membership, largest first
pub fn summarize(graph: &CompressedGraph, membership: &[usize]) -> Vec<Cluster> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (vertex, &label) in membership.iter().enumerate() {
        groups.entry(label).or_default().push(vertex);
    }

    let mut clusters: Vec<Cluster> = groups.into_iter()
        .map(|(id, members)| {
            let member_set: HashSet<usize> = members.iter().copied().collect();
            Cluster {
                id,
                size: members.len(),
                density: calculate_density(graph, &members, &member_set),
                boundary_edges: count_boundary_edges(graph, &members, &member_set),
                central_nodes: identify_central_nodes(graph, &members, &member_set),
                members,
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));

    log::info!("Summarized {} clusters", clusters.len());
    clusters
}

/// Degree counting only neighbors inside the cluster
fn internal_degree(graph: &CompressedGraph, node: usize, member_set: &HashSet<usize>) -> usize {
    graph.neighbors_of(node)
        .iter()
        .filter(|&&n| member_set.contains(&(n as usize)))
        .count()
}

/// Calculate density (actual edges / potential undirected edges)
pub fn calculate_density(graph: &CompressedGraph, members: &[usize], member_set: &HashSet<usize>) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    let potential_edges = n * (n - 1) / 2;

    // Every internal edge is seen from both endpoints.
    let actual_edges: usize = members.iter()
        .map(|&node| internal_degree(graph, node, member_set))
        .sum::<usize>() / 2;

    actual_edges as f32 / potential_edges as f32
}

/// Count edges leaving the cluster
pub fn count_boundary_edges(graph: &CompressedGraph, members: &[usize], member_set: &HashSet<usize>) -> usize {
    members.iter()
        .map(|&node| graph.degree(node) - internal_degree(graph, node, member_set))
        .sum()
}

/// Members with the highest internal degree, ties broken by vertex id
pub fn identify_central_nodes(graph: &CompressedGraph, members: &[usize], member_set: &HashSet<usize>) -> Vec<usize> {
    let mut nodes_by_degree: Vec<(usize, usize)> = members.iter()
        .map(|&node| (node, internal_degree(graph, node, member_set)))
        .collect();

    // Sort by degree (descending)
    nodes_by_degree.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    nodes_by_degree.into_iter()
        .take(CENTRAL_NODES)
        .map(|(node, _)| node)
        .collect()
}

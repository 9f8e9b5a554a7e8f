use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::io::Write;
use walk_dendrogram::cluster::{metrics, ClusterComputer};
use walk_dendrogram::config::ClusterConfig;
use walk_dendrogram::{build_dendrogram, data, storage, NeighborGraph};

/// Two 5-cliques labelled a0..a4 and b0..b4, bridged by a0-b0, plus a
/// separate pair x-y
const ADJACENCY: &str = "\
# left clique
a0 a1 a2 a3 a4 b0
a1 a2 a3 a4
a2 a3 a4
a3 a4
# right clique
b0 b1 b2 b3 b4
b1 b2 b3 b4
b2 b3 b4
b3 b4
x y
";

#[test]
fn adjacency_file_to_saved_clusters() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("graph.adj");
    fs::File::create(&input).unwrap().write_all(ADJACENCY.as_bytes()).unwrap();

    let graph = data::adjacency::load_graph(&input).unwrap();
    assert_eq!(graph.vertex_count(), 12);
    assert_eq!(graph.edge_count(), 22);

    let config = ClusterConfig::new(80, 4, Some(42), Some(2));
    let mut rng = config.rng();
    let dendrogram = ClusterComputer::with_walks(&graph, config.walk_count, config.walk_length)
        .compute(&mut rng)
        .unwrap();

    // Two components: 12 vertices, 10 merges.
    assert_eq!(dendrogram.len(), 10);
    assert_eq!(dendrogram.roots(), 2);
    assert!(dendrogram.cut(1).is_err());

    let membership = dendrogram.cut(2).unwrap();
    let clusters = metrics::summarize(&graph, &membership);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].size, 10);
    assert_eq!(clusters[1].size, 2);
    assert_eq!(clusters[1].density, 1.0);

    let output = dir.path().join("out");
    storage::save_results(&graph, &config, &dendrogram, Some(&clusters), &output).unwrap();

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["graph_stats"]["node_count"], 12);
    assert_eq!(summary["dendrogram_stats"]["roots"], 2);
    assert_eq!(summary["parameters"]["seed"], 42);

    let saved: walk_dendrogram::Dendrogram =
        serde_json::from_str(&fs::read_to_string(output.join("dendrogram.json")).unwrap()).unwrap();
    assert_eq!(saved, dendrogram);

    let clusters_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("clusters.json")).unwrap()).unwrap();
    let mut pair: Vec<String> = clusters_json["clusters"][1]["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    pair.sort();
    assert_eq!(pair, vec!["x", "y"]);
}

#[test]
fn dendrogram_without_cut_skips_clusters_file() {
    let dir = tempfile::tempdir().unwrap();
    let graph = data::adjacency::parse_graph(ADJACENCY.as_bytes()).unwrap();
    let config = ClusterConfig::new(20, 3, Some(1), None);

    let dendrogram = build_dendrogram(&graph, config.walk_count, config.walk_length, &mut StdRng::seed_from_u64(1))
        .unwrap();
    storage::save_results(&graph, &config, &dendrogram, None, dir.path()).unwrap();

    assert!(dir.path().join("summary.json").exists());
    assert!(dir.path().join("dendrogram.json").exists());
    assert!(!dir.path().join("clusters.json").exists());
}

#[test]
fn same_seed_same_dendrogram_end_to_end() {
    let graph = data::adjacency::parse_graph(ADJACENCY.as_bytes()).unwrap();

    let first = build_dendrogram(&graph, 80, 4, &mut StdRng::seed_from_u64(7)).unwrap();
    let second = build_dendrogram(&graph, 80, 4, &mut StdRng::seed_from_u64(7)).unwrap();

    assert_eq!(first, second);
}

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use walk_dendrogram::cluster::{metrics, ClusterComputer};
use walk_dendrogram::config::ClusterConfig;
use walk_dendrogram::{data, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "walk-dendrogram",
    about = "Hierarchical community clustering seeded by random-walk signatures"
)]
struct Cli {
    /// Path to input adjacency list
    #[clap(long)]
    input: PathBuf,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: PathBuf,

    /// Random walks per vertex
    #[clap(long, default_value = "80")]
    walks: usize,

    /// Steps per random walk
    #[clap(long, default_value = "4")]
    walk_length: usize,

    /// Seed for reproducible runs
    #[clap(long)]
    seed: Option<u64>,

    /// Cut the dendrogram into this many communities
    #[clap(long)]
    communities: Option<usize>,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = ClusterConfig::new(args.walks, args.walk_length, args.seed, args.communities)
        .with_resolved_seed();

    log::info!("Starting random-walk clustering");
    if let Some(seed) = config.seed {
        log::info!("Seed: {}", seed);
    }
    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output_dir.display());

    // 1. Load graph
    let graph = data::adjacency::load_graph(&args.input)?;

    // 2. Build dendrogram
    let mut rng = config.rng();
    let dendrogram = ClusterComputer::with_walks(&graph, config.walk_count, config.walk_length)
        .compute(&mut rng)?;

    // 3. Cut into communities if requested
    let clusters = match config.communities {
        Some(k) => {
            let membership = dendrogram.cut(k)?;
            Some(metrics::summarize(&graph, &membership))
        }
        None => None,
    };

    // 4. Save results
    storage::save_results(&graph, &config, &dendrogram, clusters.as_deref(), &args.output_dir)?;

    log::info!("Clustering complete. Results saved to {}", args.output_dir.display());

    Ok(())
}

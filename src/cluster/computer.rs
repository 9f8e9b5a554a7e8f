//! Greedy agglomeration of random-walk probed communities

use crate::cluster::community::{Communities, CommunityId, CommunityInitializer};
use crate::cluster::dendrogram::Dendrogram;
use crate::cluster::error::ClusterResult;
use crate::cluster::prober::Probe;
use crate::cluster::signature::{SignatureBuilder, DEFAULT_WALK_COUNT, DEFAULT_WALK_LENGTH};
use crate::graph::algorithms::connected_components;
use crate::graph::NeighborGraph;
use rand::Rng;

/// Builds a dendrogram by repeatedly merging the closest adjacent pair
pub struct ClusterComputer<'g, G> {
    graph: &'g G,
    walk_count: usize,
    walk_length: usize,
}

impl<'g, G: NeighborGraph> ClusterComputer<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self::with_walks(graph, DEFAULT_WALK_COUNT, DEFAULT_WALK_LENGTH)
    }

    pub fn with_walks(graph: &'g G, walk_count: usize, walk_length: usize) -> Self {
        Self { graph, walk_count, walk_length }
    }

    /// Probe every vertex and build its singleton community
    ///
    /// Community ids coincide with vertex ids.
    pub fn initial_communities<R: Rng + ?Sized>(&self, rng: &mut R) -> ClusterResult<Communities<Probe>> {
        let vertex_count = self.graph.vertex_count();
        log::info!(
            "Probing {} vertices with {} walks of length {}",
            vertex_count,
            self.walk_count,
            self.walk_length
        );

        let mut builder = SignatureBuilder::new(self.graph, self.walk_count, self.walk_length);
        let mut initializer = CommunityInitializer::new();
        let mut progress = Progress::new("random probing", vertex_count);

        for vertex in 0..vertex_count {
            let signature = builder.probe(vertex, rng);
            initializer.configure([vertex], Probe::new(&signature));
            progress.tick();
        }

        log::info!("Linking {} singleton communities", vertex_count);
        initializer.build(self.graph)
    }

    /// Run probing and agglomeration to completion
    ///
    /// On a disconnected graph every component is agglomerated down to its
    /// own root and the result holds `V - C` merges for `C` components.
    pub fn compute<R: Rng + ?Sized>(&self, rng: &mut R) -> ClusterResult<Dendrogram> {
        let components = connected_components(self.graph).len();
        if components > 1 {
            log::warn!(
                "Graph has {} connected components; the dendrogram will have one root per component",
                components
            );
        }

        let mut communities = self.initial_communities(rng)?;
        agglomerate(&mut communities)
    }
}

/// Merge the globally closest adjacent pair until no community has a
/// neighbor left
///
/// Merge ids start as community ids; the survivor of each merge takes the
/// next internal id of the dendrogram.
pub fn agglomerate(communities: &mut Communities<Probe>) -> ClusterResult<Dendrogram> {
    let leaves = communities.len();
    let mut dendrogram = Dendrogram::new(leaves);
    let mut merge_ids: Vec<usize> = (0..leaves).collect();
    let mut active: Vec<CommunityId> = communities.active().collect();
    let mut progress = Progress::new("building dendrogram", leaves.saturating_sub(1));

    while active.len() > 1 {
        let Some((source, absorbed, distance)) = pick_greedy_merge(communities, &active) else {
            log::debug!("No adjacent pair left among {} communities", active.len());
            break;
        };

        communities.merge(source, absorbed)?;

        log::debug!(
            "Merged {} into {} at distance {:.4}",
            merge_ids[absorbed],
            merge_ids[source],
            distance
        );

        merge_ids[source] = dendrogram.push(merge_ids[absorbed], merge_ids[source]);
        active.retain(|&id| id != absorbed);
        progress.tick();
    }

    log::info!(
        "Built dendrogram with {} merges and {} roots",
        dendrogram.len(),
        dendrogram.roots()
    );

    Ok(dendrogram)
}

/// Community with the globally smallest distance to its closest neighbor,
/// paired with that neighbor; ties go to the first one scanned
fn pick_greedy_merge(
    communities: &mut Communities<Probe>,
    active: &[CommunityId],
) -> Option<(CommunityId, CommunityId, f64)> {
    let mut best: Option<(CommunityId, f64)> = None;

    for &id in active {
        let Some(distance) = communities.closest_community_distance(id) else {
            continue;
        };
        if best.map_or(true, |(_, min)| distance < min) {
            best = Some((id, distance));
        }
    }

    let (source, distance) = best?;
    let target = communities.closest_community(source)?;
    Some((source, target, distance))
}

/// Build the dendrogram of `graph` with explicit walk parameters and
/// generator
pub fn build_dendrogram<G, R>(
    graph: &G,
    walk_count: usize,
    walk_length: usize,
    rng: &mut R,
) -> ClusterResult<Dendrogram>
where
    G: NeighborGraph,
    R: Rng + ?Sized,
{
    ClusterComputer::with_walks(graph, walk_count, walk_length).compute(rng)
}

/// Periodic progress logging, roughly every tenth of the work
struct Progress {
    task: &'static str,
    total: usize,
    done: usize,
    step: usize,
}

impl Progress {
    fn new(task: &'static str, total: usize) -> Self {
        log::debug!("Starting {} ({} steps)", task, total);
        Self { task, total, done: 0, step: (total / 10).max(1) }
    }

    fn tick(&mut self) {
        self.done += 1;
        if self.done % self.step == 0 || self.done == self.total {
            log::debug!("{}: {}/{}", self.task, self.done, self.total);
        }
    }
}

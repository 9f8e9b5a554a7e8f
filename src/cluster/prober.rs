//! Signature-aware communities for random-walk probing
//!
//! Each community carries the visit counts of its members' probes
//! ("coordinates") and per-key provenance counts ("weights"). Distances
//! compare weight-normalized coordinates, and every community keeps its
//! neighbors ordered by that distance so the closest one is always at the
//! head of the list.

use crate::cluster::community::{Communities, CommunityId, MergeDelta, MergeHook};
use crate::cluster::error::{ClusterError, ClusterResult};
use crate::cluster::signature::Signature;
use itertools::EitherOrBoth::{Both, Left, Right};
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};

/// Weight assumed for a key missing on one side of a distance computation.
/// Non-zero, since weights divide coordinates.
const DISTANCE_MISSING_WEIGHT: f64 = 1.0;

/// Weight contributed by a key missing on one side of a merge
const MERGE_MISSING_WEIGHT: f64 = 0.0;

/// Distances to other communities, tagged with the generation of the other
/// side's coordinates they were computed against
#[derive(Debug, Clone, Default)]
pub struct DistanceCache {
    entries: HashMap<CommunityId, (u64, f64)>,
}

impl DistanceCache {
    fn get(&self, other: CommunityId, generation: u64) -> Option<f64> {
        match self.entries.get(&other) {
            Some(&(cached, distance)) if cached == generation => Some(distance),
            _ => None,
        }
    }

    fn insert(&mut self, other: CommunityId, generation: u64, distance: f64) {
        self.entries.insert(other, (generation, distance));
    }

    fn invalidate(&mut self, other: CommunityId) {
        self.entries.remove(&other);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Probing state attached to every community
#[derive(Debug, Clone, Default)]
pub struct Probe {
    coordinates: BTreeMap<usize, f64>,
    weights: BTreeMap<usize, f64>,
    sorted_neighbors: Vec<CommunityId>,
    cache: DistanceCache,
    /// Bumped whenever the coordinates change
    generation: u64,
}

impl Probe {
    /// Start from a single probe signature; every visited key gets weight 1
    pub fn new(signature: &Signature) -> Self {
        Self {
            coordinates: signature.iter().map(|(&k, &v)| (k, f64::from(v))).collect(),
            weights: signature.keys().map(|&k| (k, 1.0)).collect(),
            ..Self::default()
        }
    }

    pub fn coordinates(&self) -> &BTreeMap<usize, f64> {
        &self.coordinates
    }

    pub fn weights(&self) -> &BTreeMap<usize, f64> {
        &self.weights
    }

    /// Neighbors ordered by ascending distance
    pub fn sorted_neighbors(&self) -> &[CommunityId] {
        &self.sorted_neighbors
    }

    fn coordinate(&self, key: usize, missing_weight: f64) -> (f64, f64) {
        match self.coordinates.get(&key) {
            Some(&value) => (value, self.weights.get(&key).copied().unwrap_or(missing_weight)),
            None => (0.0, missing_weight),
        }
    }

    /// Squared euclidean distance between normalized coordinates, summed in
    /// key order so that both directions agree bit for bit
    fn raw_distance(&self, other: &Probe) -> f64 {
        self.coordinates.iter()
            .merge_join_by(other.coordinates.iter(), |(a, _), (b, _)| a.cmp(b))
            .map(|entry| {
                let key = match entry {
                    Left((&k, _)) | Right((&k, _)) | Both((&k, _), _) => k,
                };
                let (v1, w1) = self.coordinate(key, DISTANCE_MISSING_WEIGHT);
                let (v2, w2) = other.coordinate(key, DISTANCE_MISSING_WEIGHT);
                (v1 / w1 - v2 / w2).powi(2)
            })
            .sum()
    }

    /// Add another community's coordinates and weights into this one
    fn absorb(&mut self, other: &Probe) {
        for (&key, &value) in &other.coordinates {
            let (_, weight) = other.coordinate(key, MERGE_MISSING_WEIGHT);
            *self.coordinates.entry(key).or_insert(0.0) += value;
            *self.weights.entry(key).or_insert(MERGE_MISSING_WEIGHT) += weight;
        }
        self.generation += 1;
    }
}

impl MergeHook for Probe {
    fn linked(communities: &mut Communities<Self>, id: CommunityId) {
        communities.reshuffle(id);
    }

    fn merged(communities: &mut Communities<Self>, delta: &MergeDelta) {
        let absorbed = std::mem::take(&mut communities.slots[delta.absorbed].state);
        communities.slots[delta.survivor].state.absorb(&absorbed);
        communities.reshuffle(delta.survivor);

        let neighbors: Vec<CommunityId> = communities.slots[delta.survivor]
            .neighbors()
            .map(|(id, _)| id)
            .collect();

        for neighbor in neighbors {
            if delta.added_neighbors.contains(&neighbor) {
                communities.neighbor_removed(neighbor, delta.absorbed);
                if !delta.old_neighbors.contains(&neighbor) {
                    communities.neighbor_added(neighbor, delta.survivor);
                }
            }
            communities.neighbor_changed(neighbor, delta.survivor);
        }
    }
}

impl Communities<Probe> {
    /// Distance between two live communities, cached on `a`
    pub fn distance(&mut self, a: CommunityId, b: CommunityId) -> ClusterResult<f64> {
        self.get_active(a)?;
        self.get_active(b)?;
        Ok(self.distance_between(a, b))
    }

    /// Adjacent community with the smallest distance; `None` for retired or
    /// isolated communities
    pub fn closest_community(&self, id: CommunityId) -> Option<CommunityId> {
        self.slots.get(id)?.state.sorted_neighbors.first().copied()
    }

    /// Distance to [`Communities::closest_community`]
    pub fn closest_community_distance(&mut self, id: CommunityId) -> Option<f64> {
        let closest = self.closest_community(id)?;
        Some(self.distance_between(id, closest))
    }

    /// Merge `id` with its closest neighbor, which is absorbed
    pub fn merge_with_closest(&mut self, id: CommunityId) -> ClusterResult<CommunityId> {
        let closest = self.closest_community(id)
            .ok_or(ClusterError::NonAdjacentMerge { survivor: id, absorbed: id })?;
        self.merge(id, closest)
    }

    /// Neighbors of `id` ordered by ascending distance
    pub fn sorted_neighbors(&self, id: CommunityId) -> &[CommunityId] {
        self.slots.get(id)
            .map(|c| c.state.sorted_neighbors())
            .unwrap_or(&[])
    }

    fn distance_between(&mut self, a: CommunityId, b: CommunityId) -> f64 {
        let generation = self.slots[b].state.generation;
        if let Some(distance) = self.slots[a].state.cache.get(b, generation) {
            return distance;
        }

        let distance = self.slots[a].state.raw_distance(&self.slots[b].state);
        self.slots[a].state.cache.insert(b, generation, distance);
        distance
    }

    /// Rebuild the whole neighbor ordering of `id`
    fn reshuffle(&mut self, id: CommunityId) {
        self.slots[id].state.cache.clear();

        let neighbors: Vec<CommunityId> = self.slots[id].neighbors().map(|(n, _)| n).collect();
        let mut ranked: Vec<(f64, CommunityId)> = neighbors.into_iter()
            .map(|n| (self.distance_between(id, n), n))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        self.slots[id].state.sorted_neighbors = ranked.into_iter().map(|(_, n)| n).collect();
    }

    fn neighbor_added(&mut self, id: CommunityId, neighbor: CommunityId) {
        let state = &mut self.slots[id].state;
        state.cache.invalidate(neighbor);
        state.sorted_neighbors.push(neighbor);
    }

    fn neighbor_removed(&mut self, id: CommunityId, neighbor: CommunityId) {
        let state = &mut self.slots[id].state;
        state.cache.invalidate(neighbor);
        state.sorted_neighbors.retain(|&n| n != neighbor);
    }

    /// Move a single out-of-place entry back into order, one swap at a time.
    /// The rest of the list must already be sorted.
    fn neighbor_changed(&mut self, id: CommunityId, neighbor: CommunityId) {
        self.slots[id].state.cache.invalidate(neighbor);

        let Some(mut idx) = self.slots[id].state.sorted_neighbors.iter().position(|&n| n == neighbor) else {
            return;
        };

        let distance = self.distance_between(id, neighbor);
        let last = self.slots[id].state.sorted_neighbors.len() - 1;

        loop {
            let next = if idx > 0 && self.distance_at(id, idx - 1) > distance {
                idx - 1
            } else if idx < last && self.distance_at(id, idx + 1) < distance {
                idx + 1
            } else {
                break;
            };

            self.slots[id].state.sorted_neighbors.swap(idx, next);
            idx = next;
        }
    }

    fn distance_at(&mut self, id: CommunityId, position: usize) -> f64 {
        let neighbor = self.slots[id].state.sorted_neighbors[position];
        self.distance_between(id, neighbor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::community::CommunityInitializer;
    use crate::cluster::signature::SignatureBuilder;
    use crate::graph::CompressedGraph;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn ring_graph() -> CompressedGraph {
        CompressedGraph::from_edges(7, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 1)])
    }

    /// Fixed walks for the first four vertices, empty ones for the rest
    fn seeded(graph: &CompressedGraph) -> Communities<Probe> {
        let walks = [
            Signature::from([(0, 2), (1, 2), (2, 2), (3, 2)]),
            Signature::from([(0, 2), (1, 2), (2, 2), (3, 2)]),
            Signature::from([(1, 2), (2, 2), (3, 2)]),
            Signature::from([(1, 2), (2, 2), (3, 2), (4, 2)]),
        ];

        let mut initializer = CommunityInitializer::new();
        for vertex in 0..graph.node_count {
            let walk = walks.get(vertex).cloned().unwrap_or_default();
            initializer.configure([vertex], Probe::new(&walk));
        }
        initializer.build(graph).unwrap()
    }

    #[test]
    fn distance_computation() {
        let graph = ring_graph();
        let mut c = seeded(&graph);

        assert_eq!(c.distance(0, 1).unwrap(), 0.0);
        assert_eq!(c.distance(1, 0).unwrap(), 0.0);
        assert_eq!(c.distance(0, 2).unwrap(), 4.0);
        assert_eq!(c.distance(2, 3).unwrap(), 4.0);
        assert_eq!(c.distance(0, 3).unwrap(), 8.0);
        assert_eq!(c.distance(3, 0).unwrap(), 8.0);
        assert_eq!(c.distance(0, 42), Err(ClusterError::UnknownCommunity(42)));
    }

    #[test]
    fn merges_track_closest_neighbors() {
        let graph = ring_graph();
        let mut c = seeded(&graph);

        assert_eq!(c.closest_community(0), Some(1));

        c.merge(0, 1).unwrap();
        assert_eq!(c.closest_community(0), Some(2));
        assert_eq!(c.closest_community_distance(0), Some(4.0));

        c.merge(3, 2).unwrap();
        assert_eq!(c.closest_community(3), Some(0));
        assert_eq!(c.closest_community(0), Some(3));
        assert_eq!(c.closest_community_distance(3), Some(8.0));

        c.merge(0, 3).unwrap();
        assert!(matches!(c.closest_community(0), Some(4) | Some(6)));

        c.merge(5, 4).unwrap();
        c.merge(5, 6).unwrap();
        assert_eq!(c.closest_community(0), Some(5));
        assert_eq!(c.sorted_neighbors(5), &[0]);

        let last = c.merge_with_closest(5).unwrap();
        assert_eq!(c.get(last).unwrap().len(), 7);
        assert_eq!(c.closest_community(last), None);
        assert!(matches!(c.merge_with_closest(last), Err(ClusterError::NonAdjacentMerge { .. })));
    }

    #[test]
    fn merge_and_distance_use_different_missing_weights() {
        let graph = CompressedGraph::from_edges(3, &[(0, 1), (1, 2)]);
        let mut initializer = CommunityInitializer::new();
        initializer.configure([0], Probe::new(&Signature::from([(0, 2)])));
        initializer.configure([1], Probe::new(&Signature::from([(1, 4)])));
        initializer.configure([2], Probe::new(&Signature::from([(0, 2), (1, 4)])));
        let mut c = initializer.build(&graph).unwrap();

        // Missing keys divide by 1 when comparing.
        assert_eq!(c.distance(0, 1).unwrap(), 4.0 + 16.0);

        c.merge(0, 1).unwrap();

        // Missing keys add nothing to the weights when merging.
        let merged = c.get(0).unwrap().state();
        assert_eq!(merged.coordinates(), &BTreeMap::from([(0, 2.0), (1, 4.0)]));
        assert_eq!(merged.weights(), &BTreeMap::from([(0, 1.0), (1, 1.0)]));
        assert_eq!(c.distance(0, 2).unwrap(), 0.0);
        assert!(c.get(1).unwrap().state().coordinates().is_empty());
    }

    #[test]
    fn stale_cache_entries_are_not_reused() {
        let graph = ring_graph();
        let mut c = seeded(&graph);

        // 0 and 2 are not adjacent, so no merge hook touches 0's entry for 2.
        assert_eq!(c.distance(0, 2).unwrap(), 4.0);

        // 2 becomes {1:2,2:2,3:2,4:2} once normalized.
        c.merge(2, 3).unwrap();

        assert_eq!(c.distance(0, 2).unwrap(), 8.0);
        assert_eq!(c.distance(2, 0).unwrap(), 8.0);
    }

    #[test]
    fn retired_communities_have_no_distance() {
        let graph = ring_graph();
        let mut c = seeded(&graph);

        assert_eq!(c.distance(0, 2).unwrap(), 4.0);
        c.merge(3, 2).unwrap();

        assert_eq!(c.distance(0, 2), Err(ClusterError::RetiredCommunity(2)));
        assert_eq!(c.distance(2, 1), Err(ClusterError::RetiredCommunity(2)));
        assert_eq!(c.closest_community(2), None);
        assert_eq!(c.closest_community_distance(2), None);
        assert!(c.sorted_neighbors(2).is_empty());
        assert_eq!(c.distance(0, 3).unwrap(), 8.0);
    }

    /// Checks every bookkeeping invariant on all active communities
    fn assert_consistent(c: &mut Communities<Probe>) {
        let active: Vec<CommunityId> = c.active().collect();
        for &id in &active {
            let community = c.get(id).unwrap();
            let keys: BTreeSet<CommunityId> = community.neighbors().map(|(n, _)| n).collect();
            let sorted: BTreeSet<CommunityId> = c.sorted_neighbors(id).iter().copied().collect();

            assert_eq!(keys, sorted, "ordering of {} out of sync", id);
            assert_eq!(c.sorted_neighbors(id).len(), keys.len());

            let total: usize = community.neighbors().map(|(_, w)| w).sum();
            assert_eq!(community.outbound_count(), total);

            for (n, weight) in community.neighbors() {
                assert!(!c.get(n).unwrap().is_retired());
                assert_eq!(c.get(n).unwrap().connection_weight(id), weight);
            }

            let order = c.sorted_neighbors(id).to_vec();
            for pair in order.windows(2) {
                assert!(c.distance(id, pair[0]).unwrap() <= c.distance(id, pair[1]).unwrap());
            }
            for &n in &order {
                assert_eq!(c.distance(id, n).unwrap(), c.distance(n, id).unwrap());
            }
        }
    }

    #[test]
    fn random_merges_keep_bookkeeping_consistent() {
        let mut rng = StdRng::seed_from_u64(198041309);
        let graph = CompressedGraph::lattice(8, 8);

        let mut builder = SignatureBuilder::new(&graph, 80, 4);
        let mut initializer = CommunityInitializer::new();
        for vertex in 0..graph.node_count {
            let signature = builder.probe(vertex, &mut rng);
            initializer.configure([vertex], Probe::new(&signature));
        }
        let mut c = initializer.build(&graph).unwrap();
        assert_consistent(&mut c);

        loop {
            let active: Vec<CommunityId> = c.active().collect();
            if active.len() == 1 {
                break;
            }

            let c1 = *active.choose(&mut rng).unwrap();
            let around: Vec<CommunityId> = c.get(c1).unwrap().neighbors().map(|(n, _)| n).collect();
            let c2 = *around.choose(&mut rng).unwrap();

            let mut expected: BTreeMap<CommunityId, usize> = BTreeMap::new();
            for side in [c1, c2] {
                for (n, _) in c.get(side).unwrap().neighbors() {
                    if n != c1 && n != c2 {
                        let weight = c.get(n).unwrap().connection_weight(side);
                        *expected.entry(n).or_insert(0) += weight;
                    }
                }
            }

            let survivor = c.merge(c1, c2).unwrap();

            let after: BTreeMap<CommunityId, usize> = c.get(survivor).unwrap().neighbors().collect();
            assert_eq!(after, expected);
            for (&n, &weight) in &expected {
                assert_eq!(c.get(n).unwrap().connection_weight(survivor), weight);
            }
            assert_consistent(&mut c);
        }

        let last = c.active().next().unwrap();
        assert_eq!(c.get(last).unwrap().len(), 64);
        assert_eq!(c.get(last).unwrap().outbound_count(), 0);
    }
}

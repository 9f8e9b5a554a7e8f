//! Mergeable communities over a read-only graph
//!
//! Communities reference each other by id through an arena
//! ([`Communities`]). Absorbed communities stay in the arena as retired
//! entries: they keep their slot but lose their members and links, so a stale
//! id can never observe a half-merged state.

use crate::cluster::error::{ClusterError, ClusterResult};
use crate::graph::NeighborGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Index of a community in its arena
pub type CommunityId = usize;

/// Neighborhood change produced by a single merge
#[derive(Debug, Clone)]
pub struct MergeDelta {
    pub survivor: CommunityId,
    pub absorbed: CommunityId,

    /// Neighbors the survivor had before the merge, excluding the absorbed one
    pub old_neighbors: BTreeSet<CommunityId>,

    /// Neighbors inherited from the absorbed community, excluding the survivor
    pub added_neighbors: BTreeSet<CommunityId>,
}

/// Per-community strategy state with hooks into the merge lifecycle
pub trait MergeHook: Sized {
    /// Called for every community once all links are installed
    fn linked(_communities: &mut Communities<Self>, _id: CommunityId) {}

    /// Called after a merge has updated membership and neighbor weights
    fn merged(_communities: &mut Communities<Self>, _delta: &MergeDelta) {}
}

/// Plain contraction without any extra bookkeeping
impl MergeHook for () {}

/// A contraction unit over one or more vertices
#[derive(Debug, Clone)]
pub struct Community<S> {
    id: CommunityId,
    members: BTreeSet<usize>,
    neighbors: BTreeMap<CommunityId, usize>,
    outbound_count: usize,
    retired: bool,
    pub(crate) state: S,
}

impl<S> Community<S> {
    fn new(id: CommunityId, members: BTreeSet<usize>, state: S) -> Self {
        Self {
            id,
            members,
            neighbors: BTreeMap::new(),
            outbound_count: 0,
            retired: false,
            state,
        }
    }

    pub fn id(&self) -> CommunityId {
        self.id
    }

    pub fn members(&self) -> &BTreeSet<usize> {
        &self.members
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.members.contains(&vertex)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether this community was absorbed by a merge
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Number of edges leaving the community
    pub fn outbound_count(&self) -> usize {
        self.outbound_count
    }

    pub fn is_neighbor(&self, other: CommunityId) -> bool {
        self.neighbors.contains_key(&other)
    }

    /// Edge multiplicity towards `other`, 0 if not adjacent
    pub fn connection_weight(&self, other: CommunityId) -> usize {
        self.neighbors.get(&other).copied().unwrap_or(0)
    }

    /// Adjacent communities with their edge multiplicities, by id
    pub fn neighbors(&self) -> impl Iterator<Item = (CommunityId, usize)> + '_ {
        self.neighbors.iter().map(|(&id, &weight)| (id, weight))
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Point the entry for `old` at `new`, summing with any existing entry
    fn redirect(&mut self, old: CommunityId, new: CommunityId) {
        if let Some(weight) = self.neighbors.remove(&old) {
            *self.neighbors.entry(new).or_insert(0) += weight;
        }
    }
}

/// Collects community memberships, then builds and links them in two phases
pub struct CommunityInitializer<S> {
    configured: Vec<(BTreeSet<usize>, S)>,
}

impl<S: MergeHook> Default for CommunityInitializer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MergeHook> CommunityInitializer<S> {
    pub fn new() -> Self {
        Self { configured: Vec::new() }
    }

    /// Register a community over `members` and return its future id
    pub fn configure<I>(&mut self, members: I, state: S) -> CommunityId
    where
        I: IntoIterator<Item = usize>,
    {
        self.configured.push((members.into_iter().collect(), state));
        self.configured.len() - 1
    }

    /// Create every configured community, then install neighbor links
    ///
    /// Fails with [`ClusterError::UnknownVertex`] or
    /// [`ClusterError::DuplicateMember`] if the memberships do not partition
    /// a subset of the graph's vertices, and with
    /// [`ClusterError::UninitializedNeighbor`] if a member has a neighbor
    /// vertex that no configured community covers.
    pub fn build<G: NeighborGraph>(self, graph: &G) -> ClusterResult<Communities<S>> {
        let mut communities = Communities {
            slots: Vec::with_capacity(self.configured.len()),
            owners: vec![None; graph.vertex_count()],
        };

        // Phase 1: memberships and back-references.
        for (id, (members, state)) in self.configured.into_iter().enumerate() {
            for &vertex in &members {
                let owner = communities.owners.get_mut(vertex)
                    .ok_or(ClusterError::UnknownVertex { community: id, vertex })?;
                if let Some(first) = *owner {
                    return Err(ClusterError::DuplicateMember { vertex, first, second: id });
                }
                *owner = Some(id);
            }
            communities.slots.push(Community::new(id, members, state));
        }

        // Phase 2: neighbor weights, which need every owner to exist.
        for id in 0..communities.slots.len() {
            communities.link(graph, id)?;
        }

        for id in 0..communities.slots.len() {
            S::linked(&mut communities, id);
        }

        Ok(communities)
    }
}

/// Arena of communities plus the vertex-to-community back-reference
#[derive(Debug, Clone)]
pub struct Communities<S> {
    pub(crate) slots: Vec<Community<S>>,
    owners: Vec<Option<CommunityId>>,
}

impl<S: MergeHook> Communities<S> {
    fn link<G: NeighborGraph>(&mut self, graph: &G, id: CommunityId) -> ClusterResult<()> {
        let mut neighbors: BTreeMap<CommunityId, usize> = BTreeMap::new();
        let mut outbound_count = 0;

        for &member in &self.slots[id].members {
            for neighbor in graph.neighbors(member) {
                let owner = self.owners.get(neighbor).copied().flatten().ok_or(
                    ClusterError::UninitializedNeighbor { community: id, vertex: neighbor },
                )?;

                // Edges between two members stay internal.
                if owner == id {
                    continue;
                }

                *neighbors.entry(owner).or_insert(0) += 1;
                outbound_count += 1;
            }
        }

        let community = &mut self.slots[id];
        community.neighbors = neighbors;
        community.outbound_count = outbound_count;
        Ok(())
    }

    /// Absorb `absorbed` into `survivor` and return the survivor's id
    ///
    /// The absorbed community is retired: it keeps its slot but has no
    /// members or neighbors afterwards.
    pub fn merge(&mut self, survivor: CommunityId, absorbed: CommunityId) -> ClusterResult<CommunityId> {
        self.get(survivor)?;
        self.get(absorbed)?;

        if survivor == absorbed || !self.slots[survivor].is_neighbor(absorbed) {
            return Err(ClusterError::NonAdjacentMerge { survivor, absorbed });
        }

        // Membership and back-references.
        let absorbed_members = std::mem::take(&mut self.slots[absorbed].members);
        for &vertex in &absorbed_members {
            if let Some(owner) = self.owners.get_mut(vertex) {
                *owner = Some(survivor);
            }
        }
        self.slots[survivor].members.extend(absorbed_members);

        // The edges between the two are now internal.
        let internal = self.slots[survivor].neighbors.remove(&absorbed).unwrap_or(0);
        self.slots[survivor].outbound_count -= internal;

        let old_neighbors: BTreeSet<CommunityId> = self.slots[survivor].neighbors.keys().copied().collect();

        let inherited = std::mem::take(&mut self.slots[absorbed].neighbors);
        let mut added_neighbors = BTreeSet::new();
        for (neighbor, weight) in inherited {
            if neighbor == survivor {
                continue;
            }

            self.slots[neighbor].redirect(absorbed, survivor);

            let community = &mut self.slots[survivor];
            community.outbound_count += weight;
            *community.neighbors.entry(neighbor).or_insert(0) += weight;
            added_neighbors.insert(neighbor);
        }

        let retired = &mut self.slots[absorbed];
        retired.retired = true;
        retired.outbound_count = 0;

        let delta = MergeDelta { survivor, absorbed, old_neighbors, added_neighbors };
        S::merged(self, &delta);

        Ok(survivor)
    }
}

impl<S> Communities<S> {
    /// Look up a community, retired or not
    pub fn get(&self, id: CommunityId) -> ClusterResult<&Community<S>> {
        self.slots.get(id).ok_or(ClusterError::UnknownCommunity(id))
    }

    /// Look up a community that has not been absorbed
    pub fn get_active(&self, id: CommunityId) -> ClusterResult<&Community<S>> {
        let community = self.get(id)?;
        if community.retired {
            return Err(ClusterError::RetiredCommunity(id));
        }
        Ok(community)
    }

    /// Number of slots, retired ones included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Ids of communities that have not been absorbed
    pub fn active(&self) -> impl Iterator<Item = CommunityId> + '_ {
        self.slots.iter().filter(|c| !c.retired).map(|c| c.id)
    }

    /// Community currently owning `vertex`
    pub fn owner_of(&self, vertex: usize) -> Option<CommunityId> {
        self.owners.get(vertex).copied().flatten()
    }

    /// Constant-time membership test through the back-reference
    ///
    /// Out-of-range vertices are never contained.
    pub fn weak_contains(&self, community: CommunityId, vertex: usize) -> bool {
        self.owner_of(vertex) == Some(community)
    }
}

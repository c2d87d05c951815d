//! Static distance fields — one per (goal, access class).
//!
//! # Three jobs in one structure
//!
//! A [`DistanceField`] holds, for every hub, the shortest traversal time in
//! ticks to one goal, ignoring all traffic.  The planner uses it three ways:
//!
//! 1. **Heuristic**: "remaining distance" is the second component of the
//!    search key, steering the frontier toward the goal.
//! 2. **Reachability oracle**: `UNREACHABLE` answers the topology-vs-traffic
//!    question — a blocked drone whose start is statically connected is a
//!    traffic problem (retryable), a disconnected one is not.
//! 3. **Pruning**: hubs the drone may never enter (barred zones) are
//!    `UNREACHABLE` and therefore never expanded by the search.
//!
//! Fields are built by Dijkstra over the reversed link set, so one-way
//! airways are honored: distance *to* the goal follows links in their
//! traversable direction.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use sky_core::{HubId, ZoneAccess};
use sky_map::Airspace;

/// Per-hub shortest traversal time (in ticks) to a fixed goal, for a fixed
/// zone-access class.
#[derive(Clone, Debug)]
pub struct DistanceField {
    /// The goal this field measures distance to.
    pub goal: HubId,
    /// The access class the field was built for.  Hubs whose zone bars this
    /// class are unreachable in the field.
    pub access: ZoneAccess,
    dist: Vec<u32>,
}

impl DistanceField {
    /// Marker for hubs with no admissible route to the goal.
    pub const UNREACHABLE: u32 = u32::MAX;

    /// Build the field for `goal` and `access` by reverse Dijkstra.
    ///
    /// Zone capacity is ignored — it is a traffic property, not a topology
    /// one.  A barred goal yields an all-unreachable field.
    pub fn build(map: &Airspace, goal: HubId, access: ZoneAccess) -> Self {
        let n = map.hub_count();
        let mut dist = vec![Self::UNREACHABLE; n];

        // Reverse adjacency in CSR form, via counting sort on link_to.
        let link_count = map.link_count();
        let mut in_start = vec![0u32; n + 1];
        for to in &map.link_to {
            in_start[to.index() + 1] += 1;
        }
        for i in 1..=n {
            in_start[i] += in_start[i - 1];
        }
        let mut cursor = in_start.clone();
        let mut incoming = vec![(HubId::INVALID, 0u32); link_count];
        for l in 0..link_count {
            let to = map.link_to[l].index();
            incoming[cursor[to] as usize] = (map.link_from[l], map.link_ticks[l]);
            cursor[to] += 1;
        }

        let admitted = |hub: HubId| map.zone_of(hub).map_or(true, |z| z.admits(access));

        if goal.index() < n && admitted(goal) {
            dist[goal.index()] = 0;

            // Min-heap; secondary HubId key for deterministic tie-breaking.
            let mut heap: BinaryHeap<Reverse<(u32, HubId)>> = BinaryHeap::new();
            heap.push(Reverse((0, goal)));

            while let Some(Reverse((d, hub))) = heap.pop() {
                // Skip stale heap entries.
                if d > dist[hub.index()] {
                    continue;
                }
                let start = in_start[hub.index()] as usize;
                let end   = in_start[hub.index() + 1] as usize;
                for &(from, ticks) in &incoming[start..end] {
                    if !admitted(from) {
                        continue;
                    }
                    let nd = d.saturating_add(ticks);
                    if nd < dist[from.index()] {
                        dist[from.index()] = nd;
                        heap.push(Reverse((nd, from)));
                    }
                }
            }
        }

        Self { goal, access, dist }
    }

    /// Build one field per request, in request order.
    ///
    /// With the `parallel` feature the fields build on the Rayon pool; each
    /// field is independent and the output order matches the input order, so
    /// results are identical either way.
    pub fn build_many(map: &Airspace, requests: &[(HubId, ZoneAccess)]) -> Vec<DistanceField> {
        #[cfg(not(feature = "parallel"))]
        {
            requests
                .iter()
                .map(|&(goal, access)| Self::build(map, goal, access))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            requests
                .par_iter()
                .map(|&(goal, access)| Self::build(map, goal, access))
                .collect()
        }
    }

    /// Shortest static traversal time from `hub` to the goal, in ticks.
    #[inline]
    pub fn dist(&self, hub: HubId) -> u32 {
        self.dist[hub.index()]
    }

    /// Is there any admissible static route from `hub` to the goal?
    #[inline]
    pub fn reachable(&self, hub: HubId) -> bool {
        self.dist[hub.index()] != Self::UNREACHABLE
    }
}

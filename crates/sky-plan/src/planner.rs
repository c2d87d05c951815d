//! Flight-planning trait and the default time-expanded planner.
//!
//! # Pluggability
//!
//! The scheduler invokes planning through the [`FlightPlanner`] trait, so
//! applications can swap in custom strategies (windowed replanning, rule-based
//! corridors, anytime search) without touching the scheduling loop.  The
//! default [`TimeExpandedPlanner`] searches the time-expanded graph and is
//! sufficient for fleets that plan against one shared reservation table.
//!
//! # Search order
//!
//! States are `(hub, tick)` pairs.  The frontier is ordered by the key
//!
//! ```text
//! (arrival tick, remaining static distance, entry cost, hub id)
//! ```
//!
//! — earliest arrival first, then moves that reduce distance to the goal,
//! then the cheaper hub, then the lowest hub id.  Every component is a pure
//! function of the state, so re-discovering a state can never improve its
//! key and the closed set may dedup at insertion time.  The ordering is the
//! engine's determinism contract: identical inputs walk an identical
//! frontier and return an identical path.
//!
//! # Cooperation
//!
//! The planner reads the reservation table and never writes it.  Moves are
//! admitted only if the destination cell is free at the arrival tick and the
//! corridor is unreserved for the whole traversal window; waits are admitted
//! only if the current hub stays free at the next tick.  Hubs the drone may
//! never enter are `UNREACHABLE` in its distance field and are not expanded.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use sky_core::{Drone, FlightPath, HubId, PathStep, PlanConfig, Tick};
use sky_map::{Airspace, ZoneKind};
use sky_reserve::ReservationTable;

use crate::error::{PlanError, PlanResult};
use crate::field::DistanceField;

// ── FlightPlanner trait ───────────────────────────────────────────────────────

/// Pluggable single-drone planning strategy.
///
/// Implementations must be deterministic: identical `(map, table, drone,
/// field, config, horizon)` inputs must return identical results.  `field`
/// is the drone's own distance field — built for its goal and access class.
pub trait FlightPlanner {
    /// Find a conflict-free path from `drone.start` at [`Tick::ZERO`] to
    /// `drone.goal`, arriving no later than `horizon`.
    fn plan(
        &self,
        map: &Airspace,
        table: &ReservationTable,
        drone: &Drone,
        field: &DistanceField,
        config: &PlanConfig,
        horizon: Tick,
    ) -> PlanResult<FlightPath>;
}

// ── TimeExpandedPlanner ───────────────────────────────────────────────────────

/// Uniform-cost search over the time-expanded graph (see module docs for the
/// frontier order).
#[derive(Debug)]
pub struct TimeExpandedPlanner;

impl FlightPlanner for TimeExpandedPlanner {
    fn plan(
        &self,
        map: &Airspace,
        table: &ReservationTable,
        drone: &Drone,
        field: &DistanceField,
        config: &PlanConfig,
        horizon: Tick,
    ) -> PlanResult<FlightPath> {
        plan_time_expanded(map, table, drone, field, config, horizon)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Tie-break entry cost of standing at `hub`, with the optional
/// priority-zone discount applied for prioritized drones.
#[inline]
fn entry_cost(map: &Airspace, config: &PlanConfig, prioritized: bool, hub: HubId) -> u32 {
    let base = map.hub_cost[hub.index()];
    if config.priority_cost_weighting
        && prioritized
        && map.zone_of(hub).is_some_and(|z| z.kind == ZoneKind::Priority)
    {
        base / 2
    } else {
        base
    }
}

fn plan_time_expanded(
    map: &Airspace,
    table: &ReservationTable,
    drone: &Drone,
    field: &DistanceField,
    config: &PlanConfig,
    horizon: Tick,
) -> PlanResult<FlightPath> {
    debug_assert_eq!(field.goal, drone.goal, "field built for a different goal");

    if !field.reachable(drone.start) {
        return Err(PlanError::NoPathFound { start: drone.start, goal: drone.goal });
    }

    let access = drone.access();
    let prioritized = drone.priority > 0;

    // Min-heap over (arrival tick, remaining distance, entry cost, hub id).
    // The state (hub, tick) is recovered from the first and last components.
    let mut heap: BinaryHeap<Reverse<(u64, u32, u32, u32)>> = BinaryHeap::new();
    let mut visited: FxHashSet<(HubId, Tick)> = FxHashSet::default();
    let mut parent: FxHashMap<(HubId, Tick), (HubId, Tick)> = FxHashMap::default();

    if table.is_free_for(map, drone.start, Tick::ZERO, access) {
        visited.insert((drone.start, Tick::ZERO));
        heap.push(Reverse((
            0,
            field.dist(drone.start),
            entry_cost(map, config, prioritized, drone.start),
            drone.start.0,
        )));
    }

    let mut expanded: u64 = 0;
    while let Some(Reverse((t, _, _, h))) = heap.pop() {
        expanded += 1;
        let (hub, tick) = (HubId(h), Tick(t));
        if hub == drone.goal {
            debug!("drone {}: goal reached at {tick} ({expanded} expansions)", drone.name);
            return Ok(trace_path(&parent, hub, tick));
        }

        // Wait in place one tick.  The hub must stay free — another drone
        // may hold the cell at tick+1 even though it was free at tick.
        let wait = tick + 1;
        if wait <= horizon
            && table.is_free_for(map, hub, wait, access)
            && visited.insert((hub, wait))
        {
            parent.insert((hub, wait), (hub, tick));
            heap.push(Reverse((
                wait.0,
                field.dist(hub),
                entry_cost(map, config, prioritized, hub),
                hub.0,
            )));
        }

        // Move along each outgoing link.
        for (link, to, ticks) in map.neighbors(hub) {
            let arrive = tick + ticks as u64;
            if arrive > horizon || !field.reachable(to) || visited.contains(&(to, arrive)) {
                continue;
            }
            if !table.is_free_for(map, to, arrive, access)
                || !table.is_link_free(map, link, tick, arrive)
            {
                continue;
            }
            visited.insert((to, arrive));
            parent.insert((to, arrive), (hub, tick));
            heap.push(Reverse((
                arrive.0,
                field.dist(to),
                entry_cost(map, config, prioritized, to),
                to.0,
            )));
        }
    }

    debug!(
        "drone {}: frontier exhausted within {horizon} ({expanded} expansions)",
        drone.name
    );
    Err(PlanError::DeadlineExceeded { horizon })
}

fn trace_path(parent: &FxHashMap<(HubId, Tick), (HubId, Tick)>, hub: HubId, tick: Tick) -> FlightPath {
    let mut steps = vec![PathStep::new(hub, tick)];
    let mut cur = (hub, tick);
    while let Some(&prev) = parent.get(&cur) {
        steps.push(PathStep::new(prev.0, prev.1));
        cur = prev;
    }
    steps.reverse();
    FlightPath::new(steps)
}

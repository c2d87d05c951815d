//! `ReservationTable` — the shared time-space ledger of the fleet.
//!
//! # Design
//!
//! Every safety rule of the engine reduces to exclusive ownership of
//! time-space cells:
//!
//! | Cell               | Key               | Meaning                            |
//! |--------------------|-------------------|------------------------------------|
//! | Hub cell           | `(HubId, Tick)`   | one drone stands here this tick    |
//! | Corridor cell      | `(LinkId, Tick)`  | one drone is airborne here         |
//! | Zone count         | `(ZoneId, Tick)`  | drones standing in the zone        |
//! | Parked pad         | `HubId`           | a drone with no flight sits here   |
//!
//! Corridor cells are keyed by the **canonical** corridor id
//! ([`sky_map::Airspace::corridor_of`]), so both directions of a two-way
//! corridor book the same cells and head-on swaps collide.  Parked pads block
//! every tick: a drone that has not yet been given a flight sits on its start
//! pad indefinitely, and the zone containing that pad carries its weight at
//! every tick too.
//!
//! The table is exactly the union of parked pads and committed flight cells.
//! [`commit_flight`](ReservationTable::commit_flight) is two-phase — validate
//! everything, then insert — so a rejected commit leaves the table
//! bit-identical to before the call.  `Clone + PartialEq` make speculative
//! copies and leak checks direct comparisons.

use rustc_hash::FxHashMap;

use sky_core::{Drone, DroneId, FlightPath, HubId, LinkId, Tick, ZoneAccess, ZoneId};
use sky_map::Airspace;

use crate::error::{ReserveError, ReserveResult};

/// Shared reservation ledger over hubs, corridors, zones, and pads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationTable {
    /// `(hub, tick)` → standing drone.
    hub_cells: FxHashMap<(HubId, Tick), DroneId>,

    /// `(canonical corridor, tick)` → airborne drone.
    link_cells: FxHashMap<(LinkId, Tick), DroneId>,

    /// `(zone, tick)` → standing-drone count from committed flights.
    /// Entries are removed when they reach zero so equality checks work.
    zone_cells: FxHashMap<(ZoneId, Tick), u32>,

    /// Pad → parked drone (no committed flight; blocks every tick).
    parked: FxHashMap<HubId, DroneId>,

    /// Zone → parked-drone count (tick-independent, mirrors `parked`).
    zone_parked: FxHashMap<ZoneId, u32>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Can an unprivileged drone stand at `hub` during `tick`?
    #[inline]
    pub fn is_free(&self, map: &Airspace, hub: HubId, tick: Tick) -> bool {
        self.is_free_for(map, hub, tick, ZoneAccess::DEFAULT)
    }

    /// Can a drone with `access` stand at `hub` during `tick`?
    ///
    /// Free means: no drone holds the hub cell, no drone is parked on the
    /// pad, and the owning zone (if any) admits `access` with headroom below
    /// its capacity.  Clearance holders bypass the capacity count in
    /// restricted zones.
    #[inline]
    pub fn is_free_for(&self, map: &Airspace, hub: HubId, tick: Tick, access: ZoneAccess) -> bool {
        self.check_hub(map, access, hub, tick).is_ok()
    }

    /// Is the corridor of `link` unreserved for every tick of
    /// `[depart, arrive)`?
    pub fn is_link_free(&self, map: &Airspace, link: LinkId, depart: Tick, arrive: Tick) -> bool {
        self.link_conflict(map, link, depart, arrive).is_none()
    }

    /// The drone holding the hub cell `(hub, tick)`, if any.
    ///
    /// Does not report parked drones; see [`parked_at`](Self::parked_at).
    pub fn occupant(&self, hub: HubId, tick: Tick) -> Option<DroneId> {
        self.hub_cells.get(&(hub, tick)).copied()
    }

    /// The drone parked on `hub`, if any.
    pub fn parked_at(&self, hub: HubId) -> Option<DroneId> {
        self.parked.get(&hub).copied()
    }

    /// Number of drones inside `zone` during `tick` (committed standing
    /// cells plus parked pads).
    pub fn zone_occupancy(&self, zone: ZoneId, tick: Tick) -> u32 {
        self.zone_cells.get(&(zone, tick)).copied().unwrap_or(0)
            + self.zone_parked.get(&zone).copied().unwrap_or(0)
    }

    /// The latest tick carrying any hub or corridor reservation, or `None`
    /// for an empty table.  Parked pads have no tick and do not count.
    pub fn max_reserved_tick(&self) -> Option<Tick> {
        let hubs = self.hub_cells.keys().map(|&(_, t)| t);
        let links = self.link_cells.keys().map(|&(_, t)| t);
        hubs.chain(links).max()
    }

    /// Number of booked time-space cells (hub plus corridor).
    pub fn len(&self) -> usize {
        self.hub_cells.len() + self.link_cells.len()
    }

    /// True when no cells are booked *and* no drone is parked.
    pub fn is_empty(&self) -> bool {
        self.hub_cells.is_empty() && self.link_cells.is_empty() && self.parked.is_empty()
    }

    // ── Single-cell operations ────────────────────────────────────────────

    /// Reserve the hub cell `(hub, tick)` for `drone`.
    pub fn reserve_hub(
        &mut self,
        map: &Airspace,
        drone: &Drone,
        hub: HubId,
        tick: Tick,
    ) -> ReserveResult<()> {
        self.check_hub(map, drone.access(), hub, tick)?;
        self.insert_hub(map, drone.id, hub, tick);
        Ok(())
    }

    /// Release the hub cell `(hub, tick)` held by `drone`.
    pub fn release_hub(&mut self, map: &Airspace, drone: DroneId, hub: HubId, tick: Tick) -> ReserveResult<()> {
        match self.hub_cells.get(&(hub, tick)) {
            Some(&d) if d == drone => {
                self.hub_cells.remove(&(hub, tick));
                self.drop_zone_cell(map, hub, tick);
                Ok(())
            }
            _ => Err(ReserveError::HubNotHeld { drone, hub, tick }),
        }
    }

    /// Reserve the corridor of `link` for every tick of `[depart, arrive)`.
    pub fn reserve_link(
        &mut self,
        map: &Airspace,
        drone: DroneId,
        link: LinkId,
        depart: Tick,
        arrive: Tick,
    ) -> ReserveResult<()> {
        if let Some((tick, by)) = self.link_conflict(map, link, depart, arrive) {
            return Err(ReserveError::CorridorOccupied { corridor: map.corridor_of(link), tick, by });
        }
        self.insert_link_window(map, drone, link, depart, arrive);
        Ok(())
    }

    /// Release the corridor window `[depart, arrive)` held by `drone`.
    ///
    /// Validates the whole window before removing anything, so a failed
    /// release leaves the table untouched.
    pub fn release_link(
        &mut self,
        map: &Airspace,
        drone: DroneId,
        link: LinkId,
        depart: Tick,
        arrive: Tick,
    ) -> ReserveResult<()> {
        let corridor = map.corridor_of(link);
        for t in depart.0..arrive.0 {
            match self.link_cells.get(&(corridor, Tick(t))) {
                Some(&d) if d == drone => {}
                _ => return Err(ReserveError::LinkNotHeld { drone, corridor, tick: Tick(t) }),
            }
        }
        for t in depart.0..arrive.0 {
            self.link_cells.remove(&(corridor, Tick(t)));
        }
        Ok(())
    }

    // ── Parking ───────────────────────────────────────────────────────────

    /// Park `drone` on `hub`, blocking the pad (and loading its zone) at
    /// every tick.  Re-parking a drone on its own pad is a no-op.
    pub fn park(&mut self, map: &Airspace, drone: DroneId, hub: HubId) -> ReserveResult<()> {
        match self.parked.get(&hub) {
            Some(&by) if by != drone => Err(ReserveError::PadBlocked { hub, by }),
            Some(_) => Ok(()),
            None => {
                self.parked.insert(hub, drone);
                if let Some(zone) = map.zone_of(hub) {
                    *self.zone_parked.entry(zone.id).or_insert(0) += 1;
                }
                Ok(())
            }
        }
    }

    /// Remove `drone` from its parked pad `hub`.
    pub fn unpark(&mut self, map: &Airspace, drone: DroneId, hub: HubId) -> ReserveResult<()> {
        match self.parked.get(&hub) {
            Some(&d) if d == drone => {
                self.parked.remove(&hub);
                if let Some(zone) = map.zone_of(hub) {
                    if let Some(count) = self.zone_parked.get_mut(&zone.id) {
                        *count -= 1;
                        if *count == 0 {
                            self.zone_parked.remove(&zone.id);
                        }
                    }
                }
                Ok(())
            }
            _ => Err(ReserveError::PadNotHeld { drone, hub }),
        }
    }

    // ── Flight operations ─────────────────────────────────────────────────

    /// Reserve every cell of `path` for `drone`, atomically.
    ///
    /// Two-phase: first validate the path's shape against the map (links
    /// exist, durations match, waits span one tick) and every cell against
    /// the current table, then insert.  Shape errors take precedence over
    /// conflicts.  On any error the table is unchanged.
    pub fn commit_flight(
        &mut self,
        map: &Airspace,
        drone: &Drone,
        path: &FlightPath,
    ) -> ReserveResult<()> {
        let traversals = self.validate_flight(map, drone.access(), path)?;

        // Steps occupy strictly increasing ticks and traversal windows are
        // disjoint, so inserts cannot collide with each other.
        for step in path.steps() {
            self.insert_hub(map, drone.id, step.hub, step.arrive);
        }
        for &(link, depart, arrive) in &traversals {
            self.insert_link_window(map, drone.id, link, depart, arrive);
        }
        Ok(())
    }

    /// Release every cell of a previously committed `path`.
    ///
    /// Validates that `drone` holds every cell before removing any, so a
    /// failed release leaves the table untouched.
    pub fn release_flight(
        &mut self,
        map: &Airspace,
        drone: DroneId,
        path: &FlightPath,
    ) -> ReserveResult<()> {
        for step in path.steps() {
            match self.hub_cells.get(&(step.hub, step.arrive)) {
                Some(&d) if d == drone => {}
                _ => {
                    return Err(ReserveError::HubNotHeld { drone, hub: step.hub, tick: step.arrive });
                }
            }
        }
        let traversals = self.path_traversals(map, path)?;
        for &(link, depart, arrive) in &traversals {
            let corridor = map.corridor_of(link);
            for t in depart.0..arrive.0 {
                match self.link_cells.get(&(corridor, Tick(t))) {
                    Some(&d) if d == drone => {}
                    _ => return Err(ReserveError::LinkNotHeld { drone, corridor, tick: Tick(t) }),
                }
            }
        }

        for step in path.steps() {
            self.hub_cells.remove(&(step.hub, step.arrive));
            self.drop_zone_cell(map, step.hub, step.arrive);
        }
        for &(link, depart, arrive) in &traversals {
            let corridor = map.corridor_of(link);
            for t in depart.0..arrive.0 {
                self.link_cells.remove(&(corridor, Tick(t)));
            }
        }
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Why `(hub, tick)` is not free for `access`, if it is not.
    ///
    /// Check order (and error precedence): hub cell, parked pad, zone
    /// admission, zone capacity.
    fn check_hub(&self, map: &Airspace, access: ZoneAccess, hub: HubId, tick: Tick) -> ReserveResult<()> {
        if let Some(&by) = self.hub_cells.get(&(hub, tick)) {
            return Err(ReserveError::HubOccupied { hub, tick, by });
        }
        if let Some(&by) = self.parked.get(&hub) {
            return Err(ReserveError::PadBlocked { hub, by });
        }
        if let Some(zone) = map.zone_of(hub) {
            if !zone.admits(access) {
                return Err(ReserveError::ZoneBarred { zone: zone.name.clone(), hub });
            }
            if !zone.capacity_exempt(access) && self.zone_occupancy(zone.id, tick) >= zone.capacity {
                return Err(ReserveError::ZoneFull {
                    zone:     zone.name.clone(),
                    tick,
                    capacity: zone.capacity,
                });
            }
        }
        Ok(())
    }

    /// First reserved cell on the corridor of `link` within `[depart, arrive)`.
    fn link_conflict(
        &self,
        map: &Airspace,
        link: LinkId,
        depart: Tick,
        arrive: Tick,
    ) -> Option<(Tick, DroneId)> {
        let corridor = map.corridor_of(link);
        (depart.0..arrive.0)
            .find_map(|t| self.link_cells.get(&(corridor, Tick(t))).map(|&by| (Tick(t), by)))
    }

    /// Resolve `path` into `(link, depart, arrive)` traversals, validating
    /// its shape: every hub change follows an existing link of matching
    /// duration and every wait spans exactly one tick.
    fn path_traversals(
        &self,
        map: &Airspace,
        path: &FlightPath,
    ) -> ReserveResult<Vec<(LinkId, Tick, Tick)>> {
        let mut traversals = Vec::new();
        for w in path.steps().windows(2) {
            let (a, b) = (w[0], w[1]);
            let got = b.arrive - a.arrive;
            if a.hub == b.hub {
                if got != 1 {
                    return Err(ReserveError::WrongDuration { from: a.hub, to: b.hub, expected: 1, got });
                }
            } else {
                let link = map
                    .link_between(a.hub, b.hub)
                    .ok_or(ReserveError::NoSuchLink { from: a.hub, to: b.hub })?;
                let expected = map.link_ticks[link.index()];
                if got != expected as u64 {
                    return Err(ReserveError::WrongDuration { from: a.hub, to: b.hub, expected, got });
                }
                traversals.push((link, a.arrive, b.arrive));
            }
        }
        Ok(traversals)
    }

    /// Phase-1 validation for [`commit_flight`](Self::commit_flight).
    fn validate_flight(
        &self,
        map: &Airspace,
        access: ZoneAccess,
        path: &FlightPath,
    ) -> ReserveResult<Vec<(LinkId, Tick, Tick)>> {
        let traversals = self.path_traversals(map, path)?;
        for step in path.steps() {
            self.check_hub(map, access, step.hub, step.arrive)?;
        }
        for &(link, depart, arrive) in &traversals {
            if let Some((tick, by)) = self.link_conflict(map, link, depart, arrive) {
                return Err(ReserveError::CorridorOccupied { corridor: map.corridor_of(link), tick, by });
            }
        }
        Ok(traversals)
    }

    fn insert_hub(&mut self, map: &Airspace, drone: DroneId, hub: HubId, tick: Tick) {
        let prev = self.hub_cells.insert((hub, tick), drone);
        debug_assert!(prev.is_none(), "hub cell inserted twice");
        if let Some(zone) = map.zone_of(hub) {
            *self.zone_cells.entry((zone.id, tick)).or_insert(0) += 1;
        }
    }

    fn insert_link_window(&mut self, map: &Airspace, drone: DroneId, link: LinkId, depart: Tick, arrive: Tick) {
        let corridor = map.corridor_of(link);
        for t in depart.0..arrive.0 {
            let prev = self.link_cells.insert((corridor, Tick(t)), drone);
            debug_assert!(prev.is_none(), "corridor cell inserted twice");
        }
    }

    fn drop_zone_cell(&mut self, map: &Airspace, hub: HubId, tick: Tick) {
        if let Some(zone) = map.zone_of(hub) {
            if let Some(count) = self.zone_cells.get_mut(&(zone.id, tick)) {
                *count -= 1;
                if *count == 0 {
                    self.zone_cells.remove(&(zone.id, tick));
                }
            }
        }
    }
}

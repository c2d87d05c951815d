//! Read-only schedule view, run outcome types, and the global consistency
//! re-check.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use sky_core::{Drone, DroneId, FlightPath, HubId, Tick};
use sky_map::Airspace;
use sky_reserve::ReservationTable;

use crate::error::{SchedError, SchedResult};

// ── Schedule ──────────────────────────────────────────────────────────────────

/// The committed flight paths of a finished run, keyed by drone.
///
/// Purely a read-only view: renderers and reports consume it through
/// [`positions_at`](Self::positions_at), [`path_of`](Self::path_of), and
/// [`makespan`](Self::makespan).  `BTreeMap` keeps every iteration in
/// ascending drone order, so downstream output is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    paths: BTreeMap<DroneId, FlightPath>,
}

impl Schedule {
    pub fn from_paths(paths: BTreeMap<DroneId, FlightPath>) -> Self {
        Self { paths }
    }

    /// The committed path of `drone`, if it was scheduled.
    pub fn path_of(&self, drone: DroneId) -> Option<&FlightPath> {
        self.paths.get(&drone)
    }

    /// Iterate `(drone, path)` in ascending drone order.
    pub fn iter(&self) -> impl Iterator<Item = (DroneId, &FlightPath)> + '_ {
        self.paths.iter().map(|(&id, path)| (id, path))
    }

    /// Where every standing drone is at `tick`.
    ///
    /// Drones that are airborne on a link at `tick`, or already delivered
    /// (past their arrival tick), do not appear.
    pub fn positions_at(&self, tick: Tick) -> BTreeMap<DroneId, HubId> {
        self.paths
            .iter()
            .filter_map(|(&id, path)| path.position_at(tick).map(|hub| (id, hub)))
            .collect()
    }

    /// The latest arrival tick across all paths; [`Tick::ZERO`] when empty.
    pub fn makespan(&self) -> Tick {
        self.paths
            .values()
            .map(FlightPath::arrival)
            .max()
            .unwrap_or(Tick::ZERO)
    }

    /// Number of scheduled drones.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

// ── Run outcome ───────────────────────────────────────────────────────────────

/// Everything a completed run reports: the flights that were committed, the
/// drones that could not be scheduled with reasons, and the world they were
/// planned over (the scheduler consumes its map and fleet; this hands them
/// back for reporting and output).
///
/// A run that deadlocks does not produce an outcome — deadlock is a
/// [`SchedError`], terminal for the whole run.
#[derive(Debug)]
pub struct PlanOutcome {
    pub schedule: Schedule,
    pub unschedulable: Vec<Unscheduled>,
    pub map: Airspace,
    pub fleet: Vec<Drone>,
}

impl PlanOutcome {
    /// `true` when every drone in the fleet received a flight.
    pub fn fully_scheduled(&self) -> bool {
        self.unschedulable.is_empty()
    }
}

/// One drone that ended the run without a flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unscheduled {
    pub drone: DroneId,
    pub reason: UnschedulableReason,
}

/// Why a drone could not be scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnschedulableReason {
    /// No admissible static route from start to goal — topology or zone
    /// access, unfixable by waiting.
    NoRoute,

    /// Every attempt ran out of horizon against committed traffic.
    RetriesExhausted { attempts: u32 },

    /// Another drone parks on the same start pad, so the start cell can
    /// never be occupied at tick 0.
    StartBlocked,
}

impl fmt::Display for UnschedulableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoute => write!(f, "no admissible route"),
            Self::RetriesExhausted { attempts } => {
                write!(f, "blocked by traffic after {attempts} attempts")
            }
            Self::StartBlocked => write!(f, "start pad shared with another drone"),
        }
    }
}

// ── Global consistency re-check ───────────────────────────────────────────────

/// Rebuild a fresh reservation ledger from `schedule` and confirm every
/// committed path still fits: exclusive hub and corridor cells, zone
/// admission and capacity, endpoints matching each drone's request, and
/// map-valid traversals.
///
/// This is the correctness backstop against interleaving bugs in incremental
/// reservation: the incremental ledger was mutated path by path, this check
/// re-derives it from nothing.  It is a pure function — re-running it on a
/// valid schedule reports no conflicts.
pub fn verify(map: &Airspace, fleet: &[Drone], schedule: &Schedule) -> SchedResult<()> {
    let mut table = ReservationTable::new();

    // Unscheduled drones sit parked on their pads for the whole run, with
    // two exceptions that both collapse to "skip": a pad that doubles as a
    // scheduled drone's start was never this drone's to hold (its rival
    // departs from there at tick 0), and a pad already parked on blocks
    // identically whoever owns it.
    let lent_pads: HashSet<HubId> = fleet
        .iter()
        .filter(|d| schedule.path_of(d.id).is_some())
        .map(|d| d.start)
        .collect();
    for drone in fleet {
        if schedule.path_of(drone.id).is_some()
            || lent_pads.contains(&drone.start)
            || table.parked_at(drone.start).is_some()
        {
            continue;
        }
        table.park(map, drone.id, drone.start)?;
    }

    for (id, path) in schedule.iter() {
        let drone = match fleet.get(id.index()) {
            Some(d) if d.id == id => d,
            _ => return Err(SchedError::UnknownDrone(id)),
        };
        if path.start() != drone.start || path.goal() != drone.goal {
            return Err(SchedError::MisroutedPath { drone: id });
        }
        table.commit_flight(map, drone, path)?;
    }
    Ok(())
}

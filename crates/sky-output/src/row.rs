//! Plain data row types written by output backends, and the functions that
//! extract them from a finished plan.

use sky_core::{Drone, DroneId, Tick};
use sky_sched::PlanOutcome;

/// One standing drone at one tick of the timetable.
///
/// A drone appears only on ticks where it holds a hub: rows stop at its
/// arrival tick (delivered drones leave the traffic layer) and skip ticks
/// spent airborne inside a multi-tick corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRow {
    pub tick:     u64,
    pub drone_id: u32,
    pub hub:      u32,
}

/// One committed flight, summarized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSummaryRow {
    pub drone_id:  u32,
    pub name:      String,
    pub start:     u32,
    pub goal:      u32,
    /// Tick the drone reaches its goal pad.
    pub arrival:   u64,
    /// Steps that change hub.
    pub hops:      u64,
    /// Steps that hold position.
    pub waits:     u64,
    /// Sum of hub costs over every standing tick of the flight.
    pub path_cost: u64,
}

/// Whole-run totals; exactly one per plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummaryRow {
    pub scheduled:       u64,
    pub unschedulable:   u64,
    /// Latest arrival tick across the timetable.
    pub makespan:        u64,
    pub total_moves:     u64,
    pub total_path_cost: u64,
    /// `total_moves / makespan`; zero for an empty or instant plan.
    pub moves_per_tick:  f64,
}

// ── Extraction ────────────────────────────────────────────────────────────────

/// Flatten the timetable into position rows, tick-major and in drone order
/// within each tick, covering `0..=makespan`.
pub fn position_rows(outcome: &PlanOutcome) -> Vec<PositionRow> {
    let schedule = &outcome.schedule;
    if schedule.is_empty() {
        return Vec::new();
    }
    let mut rows = Vec::new();
    for tick in 0..=schedule.makespan().0 {
        for (id, hub) in schedule.positions_at(Tick(tick)) {
            rows.push(PositionRow { tick, drone_id: id.0, hub: hub.0 });
        }
    }
    rows
}

/// Summarize every committed flight, in drone-id order.
pub fn flight_rows(outcome: &PlanOutcome) -> Vec<FlightSummaryRow> {
    outcome
        .schedule
        .iter()
        .map(|(id, path)| FlightSummaryRow {
            drone_id:  id.0,
            name:      drone_name(&outcome.fleet, id),
            start:     path.start().0,
            goal:      path.goal().0,
            arrival:   path.arrival().0,
            hops:      path.hops() as u64,
            waits:     path.waits() as u64,
            path_cost: outcome.map.path_cost(path),
        })
        .collect()
}

/// Compute the whole-run summary row.
pub fn run_summary(outcome: &PlanOutcome) -> RunSummaryRow {
    let schedule = &outcome.schedule;
    let total_moves: u64 = schedule.iter().map(|(_, path)| path.hops() as u64).sum();
    let total_path_cost: u64 = schedule.iter().map(|(_, path)| outcome.map.path_cost(path)).sum();
    let makespan = schedule.makespan().0;
    RunSummaryRow {
        scheduled:       schedule.len() as u64,
        unschedulable:   outcome.unschedulable.len() as u64,
        makespan,
        total_moves,
        total_path_cost,
        moves_per_tick:  if makespan == 0 { 0.0 } else { total_moves as f64 / makespan as f64 },
    }
}

/// Roster name of `id`, falling back to the raw id when the roster does not
/// cover it (a schedule from a foreign fleet).
pub(crate) fn drone_name(fleet: &[Drone], id: DroneId) -> String {
    fleet
        .get(id.index())
        .map_or_else(|| id.to_string(), |drone| drone.name.clone())
}

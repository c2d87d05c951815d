//! The scheduling engine — priority-ordered planning with conflict recovery.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use log::{debug, info, warn};

use sky_core::{Drone, DroneId, FlightPath, PlanConfig, Tick};
use sky_map::Airspace;
use sky_plan::{DistanceField, FlightPlanner, PlanError, TimeExpandedPlanner};
use sky_reserve::ReservationTable;

use crate::error::{SchedError, SchedResult};
use crate::observer::SchedObserver;
use crate::schedule::{verify, PlanOutcome, Schedule, Unscheduled, UnschedulableReason};

// ── Drone scheduling state ────────────────────────────────────────────────────

/// Per-drone progress through the run.
///
/// `Unplanned → Planned → Committed` is the success line; `Blocked` loops
/// back into planning with a grown horizon, and `Unschedulable` is the
/// other terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DroneState {
    /// Parked on the start pad, no attempt made yet.
    Unplanned,
    /// A path was found this attempt and is about to be committed.
    Planned,
    /// Flight committed to the shared ledger.  Terminal.
    Committed,
    /// Last attempt failed on traffic; the next pass retries with
    /// `next_horizon`.
    Blocked { attempts: u32, next_horizon: Tick },
    /// No schedule possible for this drone.  Terminal.
    Unschedulable,
}

impl DroneState {
    /// Terminal drones never plan again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Unschedulable)
    }
}

// ── SchedulerBuilder ──────────────────────────────────────────────────────────

/// Fluent builder for [`Scheduler<P>`].
///
/// # Required inputs
///
/// - the [`Airspace`] and the fleet roster (drone ids contiguous from 0)
/// - `P: FlightPlanner` — the planning strategy; [`SchedulerBuilder::new`]
///   defaults to [`TimeExpandedPlanner`]
///
/// # Optional inputs (have defaults)
///
/// | Method       | Default                |
/// |--------------|------------------------|
/// | `.config(c)` | [`PlanConfig::default`] |
///
/// # Example
///
/// ```rust,ignore
/// let outcome = SchedulerBuilder::new(airspace, fleet)
///     .config(PlanConfig::default())
///     .build()?
///     .run(&mut NoopObserver)?;
/// ```
pub struct SchedulerBuilder<P: FlightPlanner> {
    map:     Airspace,
    fleet:   Vec<Drone>,
    planner: P,
    config:  Option<PlanConfig>,
}

impl SchedulerBuilder<TimeExpandedPlanner> {
    /// Builder with the default time-expanded planner.
    pub fn new(map: Airspace, fleet: Vec<Drone>) -> Self {
        Self::with_planner(map, fleet, TimeExpandedPlanner)
    }
}

impl<P: FlightPlanner> SchedulerBuilder<P> {
    pub fn with_planner(map: Airspace, fleet: Vec<Drone>, planner: P) -> Self {
        Self { map, fleet, planner, config: None }
    }

    pub fn config(mut self, config: PlanConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate the roster, precompute distance fields, park the fleet, and
    /// return a ready-to-run [`Scheduler`].
    pub fn build(self) -> SchedResult<Scheduler<P>> {
        let map = self.map;
        let fleet = self.fleet;
        let config = self.config.unwrap_or_default();

        // ── Validate the roster ───────────────────────────────────────────
        {
            let mut names: HashSet<&str> = HashSet::with_capacity(fleet.len());
            for (slot, drone) in fleet.iter().enumerate() {
                if drone.id.index() != slot {
                    return Err(SchedError::NonContiguousIds { slot, found: drone.id });
                }
                for hub in [drone.start, drone.goal] {
                    if hub.index() >= map.hub_count() {
                        return Err(SchedError::UnknownHub { drone: drone.name.clone(), hub });
                    }
                }
                if !names.insert(drone.name.as_str()) {
                    return Err(SchedError::DuplicateDroneName(drone.name.clone()));
                }
            }
        }

        // ── Planning order: priority weight descending, id ascending ──────
        let mut order: Vec<DroneId> = fleet.iter().map(|d| d.id).collect();
        order.sort_by_key(|id| (Reverse(fleet[id.index()].priority), id.0));

        // ── Distance fields, one per drone ────────────────────────────────
        let requests: Vec<_> = fleet.iter().map(|d| (d.goal, d.access())).collect();
        let fields = DistanceField::build_many(&map, &requests);

        // ── Park the fleet ────────────────────────────────────────────────
        // A shared start pad goes to the earlier-planning drone; the loser
        // can never occupy its start cell at tick 0 and is terminal now.
        let mut table = ReservationTable::new();
        let mut states = vec![DroneState::Unplanned; fleet.len()];
        let mut unschedulable = Vec::new();
        for &id in &order {
            let drone = &fleet[id.index()];
            if table.park(&map, id, drone.start).is_err() {
                warn!("drone {} start pad already taken; unschedulable", drone.name);
                states[id.index()] = DroneState::Unschedulable;
                unschedulable.push(Unscheduled {
                    drone:  id,
                    reason: UnschedulableReason::StartBlocked,
                });
            }
        }

        Ok(Scheduler { map, fleet, config, planner: self.planner, table, states, fields, order, unschedulable })
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// The multi-drone scheduling engine.
///
/// Plans one drone at a time, in a fixed priority order, against one shared
/// reservation ledger.  Commitment is final: once a flight is in the ledger,
/// every later search routes around it.  Drones that fail on traffic retry
/// in later passes with grown horizons — committed traffic eventually clears
/// any given pad, so waiting longer is a real strategy.  See
/// [`run`](Self::run) for the pass loop and its deadlock rule.
///
/// Create via [`SchedulerBuilder`].
#[derive(Debug)]
pub struct Scheduler<P: FlightPlanner> {
    /// The airspace everything flies in.
    pub map: Airspace,

    /// The fleet roster, indexed by `DroneId`.
    pub fleet: Vec<Drone>,

    /// Horizon and retry policy.
    pub config: PlanConfig,

    planner: P,
    table:   ReservationTable,
    states:  Vec<DroneState>,
    fields:  Vec<DistanceField>,

    /// Planning order: priority weight descending, drone id ascending.
    order: Vec<DroneId>,

    /// Drones already terminal before the first pass (blocked start pads).
    unschedulable: Vec<Unscheduled>,
}

impl<P: FlightPlanner> Scheduler<P> {
    /// Current scheduling state of `drone`.
    pub fn state(&self, drone: DroneId) -> &DroneState {
        &self.states[drone.index()]
    }

    /// The fixed planning order for this run.
    pub fn planning_order(&self) -> &[DroneId] {
        &self.order
    }

    /// The shared reservation ledger (parked pads before the run, committed
    /// flight cells as the run progresses).
    pub fn table(&self) -> &ReservationTable {
        &self.table
    }

    /// Drive every drone to a terminal state and return the outcome.
    ///
    /// # Pass loop
    ///
    /// 1. Collect pending drones (neither committed nor unschedulable) in
    ///    planning order.
    /// 2. One planner attempt each: the drone lifts off its pad, plans
    ///    against the current ledger, and either commits (path cells replace
    ///    parking) or re-parks.
    ///    - [`PlanError::NoPathFound`] cannot improve → unschedulable now.
    ///    - [`PlanError::DeadlineExceeded`] → blocked; the horizon grows for
    ///      the next pass, up to `max_replans` attempts.
    /// 3. A pass that commits nothing while drones remain pending is a
    ///    deadlock: the first-attempt horizon already covers waiting out all
    ///    committed traffic, so zero progress means the pending drones block
    ///    each other.  Terminal for the whole run.
    ///
    /// Ends with the global consistency re-check ([`verify`]).
    pub fn run<O: SchedObserver>(mut self, observer: &mut O) -> SchedResult<PlanOutcome> {
        let mut paths: BTreeMap<DroneId, FlightPath> = BTreeMap::new();
        let mut pass: u32 = 0;

        loop {
            let pending: Vec<DroneId> = self
                .order
                .iter()
                .copied()
                .filter(|id| !self.states[id.index()].is_terminal())
                .collect();
            if pending.is_empty() {
                break;
            }

            pass += 1;
            observer.on_pass_start(pass);
            debug!("pass {pass}: {} drones pending", pending.len());

            let mut committed_in_pass = 0usize;
            for id in pending {
                if self.attempt(id, &mut paths, observer)? {
                    committed_in_pass += 1;
                }
            }

            observer.on_pass_end(pass, committed_in_pass);

            if committed_in_pass == 0 {
                let blocked: Vec<DroneId> = self.drones_where(|s| !s.is_terminal());
                if !blocked.is_empty() {
                    let committed = self.drones_where(|s| *s == DroneState::Committed);
                    warn!(
                        "deadlock after pass {pass}: {} committed, {} blocked",
                        committed.len(),
                        blocked.len()
                    );
                    return Err(SchedError::Deadlock { committed, blocked });
                }
            }
        }

        // ── Global consistency re-check ───────────────────────────────────
        let schedule = Schedule::from_paths(paths);
        verify(&self.map, &self.fleet, &schedule)?;

        self.unschedulable.sort_by_key(|u| u.drone.0);
        info!(
            "run complete: {} committed, {} unschedulable, makespan {}",
            schedule.len(),
            self.unschedulable.len(),
            schedule.makespan()
        );
        observer.on_run_end(schedule.len(), self.unschedulable.len(), schedule.makespan());
        Ok(PlanOutcome {
            schedule,
            unschedulable: self.unschedulable,
            map: self.map,
            fleet: self.fleet,
        })
    }

    // ── One planning attempt ──────────────────────────────────────────────

    /// One planner invocation for `id`.  Returns whether a flight committed.
    fn attempt<O: SchedObserver>(
        &mut self,
        id: DroneId,
        paths: &mut BTreeMap<DroneId, FlightPath>,
        observer: &mut O,
    ) -> SchedResult<bool> {
        let (prior_attempts, horizon) = match self.states[id.index()] {
            DroneState::Unplanned => (0, self.first_horizon(id)),
            DroneState::Blocked { attempts, next_horizon } => (attempts, next_horizon),
            _ => {
                debug_assert!(false, "terminal drone in pending set");
                return Ok(false);
            }
        };
        let attempt = prior_attempts + 1;

        let drone = &self.fleet[id.index()];
        self.table.unpark(&self.map, id, drone.start)?;

        let planned = self.planner.plan(
            &self.map,
            &self.table,
            drone,
            &self.fields[id.index()],
            &self.config,
            horizon,
        );

        match planned {
            Ok(path) => {
                self.states[id.index()] = DroneState::Planned;
                self.table.commit_flight(&self.map, drone, &path)?;
                self.states[id.index()] = DroneState::Committed;
                debug!(
                    "drone {} committed on attempt {attempt}, arrives {}",
                    drone.name,
                    path.arrival()
                );
                observer.on_plan_success(id, &path, attempt);
                paths.insert(id, path);
                Ok(true)
            }
            Err(err) => {
                self.table.park(&self.map, id, drone.start)?;
                observer.on_plan_failure(id, &err, attempt, horizon);
                match err {
                    PlanError::NoPathFound { .. } => {
                        self.mark_unschedulable(id, UnschedulableReason::NoRoute, observer);
                    }
                    PlanError::DeadlineExceeded { .. } => {
                        if attempt >= self.config.max_replans {
                            self.mark_unschedulable(
                                id,
                                UnschedulableReason::RetriesExhausted { attempts: attempt },
                                observer,
                            );
                        } else {
                            let next = horizon
                                .0
                                .saturating_mul(self.config.horizon_growth)
                                .min(self.config.max_horizon);
                            debug!("drone {} blocked at horizon {horizon}; retrying at T{next}", drone.name);
                            self.states[id.index()] =
                                DroneState::Blocked { attempts: attempt, next_horizon: Tick(next) };
                        }
                    }
                }
                Ok(false)
            }
        }
    }

    fn mark_unschedulable<O: SchedObserver>(
        &mut self,
        id: DroneId,
        reason: UnschedulableReason,
        observer: &mut O,
    ) {
        warn!("drone {} unschedulable: {reason}", self.fleet[id.index()].name);
        observer.on_unschedulable(id, &reason);
        self.states[id.index()] = DroneState::Unschedulable;
        self.unschedulable.push(Unscheduled { drone: id, reason });
    }

    /// First-attempt horizon: enough to wait out every committed reservation
    /// and still fly the static route, plus slack.  Capped at `max_horizon`.
    fn first_horizon(&self, id: DroneId) -> Tick {
        let drone = &self.fleet[id.index()];
        let busy = self.table.max_reserved_tick().map_or(0, |t| t.0);
        let dist = match self.fields[id.index()].dist(drone.start) {
            DistanceField::UNREACHABLE => 0, // the planner reports NoPathFound anyway
            d => d as u64,
        };
        Tick(
            busy.saturating_add(dist)
                .saturating_add(self.config.horizon_slack)
                .min(self.config.max_horizon),
        )
    }

    /// Drone ids whose state satisfies `pred`, ascending.
    fn drones_where(&self, pred: impl Fn(&DroneState) -> bool) -> Vec<DroneId> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| pred(s))
            .map(|(i, _)| DroneId(i as u32))
            .collect()
    }
}

//! Unit tests for sky-sched.

#[cfg(test)]
mod helpers {
    use sky_core::{Drone, DroneId, FlightPath, GridPoint, HubId, Tick};
    use sky_map::{Airspace, AirspaceBuilder, ZoneKind};
    use sky_plan::PlanError;

    use crate::{SchedObserver, UnschedulableReason};

    /// Plus-shaped crossing, all corridors 1 tick:
    ///
    /// ```text
    ///           n (1,0)
    ///           │
    /// w (0,1) ─ m (1,1) ─ e (2,1)
    ///           │
    ///           s (1,2)
    /// ```
    pub fn plus() -> (Airspace, [HubId; 5]) {
        let mut bld = AirspaceBuilder::new();
        let w = bld.add_hub("w", GridPoint::new(0, 1)).unwrap();
        let n = bld.add_hub("n", GridPoint::new(1, 0)).unwrap();
        let m = bld.add_hub("m", GridPoint::new(1, 1)).unwrap();
        let e = bld.add_hub("e", GridPoint::new(2, 1)).unwrap();
        let s = bld.add_hub("s", GridPoint::new(1, 2)).unwrap();
        bld.add_corridor(w, m, 1).unwrap();
        bld.add_corridor(n, m, 1).unwrap();
        bld.add_corridor(m, e, 1).unwrap();
        bld.add_corridor(m, s, 1).unwrap();
        (bld.build().unwrap(), [w, n, m, e, s])
    }

    /// Two disjoint lanes s1-m1-g1 and s2-m2-g2 (1-tick corridors) whose
    /// middle hubs share one Normal zone of the given capacity.
    pub fn twin_lanes(capacity: u32) -> (Airspace, [HubId; 6]) {
        let mut bld = AirspaceBuilder::new();
        let s1 = bld.add_hub("s1", GridPoint::new(0, 0)).unwrap();
        let m1 = bld.add_hub("m1", GridPoint::new(1, 0)).unwrap();
        let g1 = bld.add_hub("g1", GridPoint::new(2, 0)).unwrap();
        let s2 = bld.add_hub("s2", GridPoint::new(0, 2)).unwrap();
        let m2 = bld.add_hub("m2", GridPoint::new(1, 2)).unwrap();
        let g2 = bld.add_hub("g2", GridPoint::new(2, 2)).unwrap();
        bld.add_corridor(s1, m1, 1).unwrap();
        bld.add_corridor(m1, g1, 1).unwrap();
        bld.add_corridor(s2, m2, 1).unwrap();
        bld.add_corridor(m2, g2, 1).unwrap();
        let shared = bld.add_zone("midair", ZoneKind::Normal, capacity).unwrap();
        bld.assign_zone(m1, shared).unwrap();
        bld.assign_zone(m2, shared).unwrap();
        (bld.build().unwrap(), [s1, m1, g1, s2, m2, g2])
    }

    /// Two hubs joined by a single 1-tick corridor.
    pub fn corridor_pair() -> (Airspace, [HubId; 2]) {
        let mut bld = AirspaceBuilder::new();
        let a = bld.add_hub("a", GridPoint::new(0, 0)).unwrap();
        let b = bld.add_hub("b", GridPoint::new(1, 0)).unwrap();
        bld.add_corridor(a, b, 1).unwrap();
        (bld.build().unwrap(), [a, b])
    }

    /// Chain a-b-c-d-e of 1-tick corridors.
    pub fn chain() -> (Airspace, [HubId; 5]) {
        let mut bld = AirspaceBuilder::new();
        let a = bld.add_hub("a", GridPoint::new(0, 0)).unwrap();
        let b = bld.add_hub("b", GridPoint::new(1, 0)).unwrap();
        let c = bld.add_hub("c", GridPoint::new(2, 0)).unwrap();
        let d = bld.add_hub("d", GridPoint::new(3, 0)).unwrap();
        let e = bld.add_hub("e", GridPoint::new(4, 0)).unwrap();
        bld.add_corridor(a, b, 1).unwrap();
        bld.add_corridor(b, c, 1).unwrap();
        bld.add_corridor(c, d, 1).unwrap();
        bld.add_corridor(d, e, 1).unwrap();
        (bld.build().unwrap(), [a, b, c, d, e])
    }

    /// p-r-g lane with r in a Restricted zone, plus a detached x-y lane.
    pub fn restricted_split() -> (Airspace, [HubId; 5]) {
        let mut bld = AirspaceBuilder::new();
        let p = bld.add_hub("p", GridPoint::new(0, 0)).unwrap();
        let r = bld.add_hub("r", GridPoint::new(1, 0)).unwrap();
        let g = bld.add_hub("g", GridPoint::new(2, 0)).unwrap();
        let x = bld.add_hub("x", GridPoint::new(0, 5)).unwrap();
        let y = bld.add_hub("y", GridPoint::new(1, 5)).unwrap();
        bld.add_corridor(p, r, 1).unwrap();
        bld.add_corridor(r, g, 1).unwrap();
        bld.add_corridor(x, y, 1).unwrap();
        let keepout = bld.add_zone("keepout", ZoneKind::Restricted, 0).unwrap();
        bld.assign_zone(r, keepout).unwrap();
        (bld.build().unwrap(), [p, r, g, x, y])
    }

    pub fn drone(n: u32, start: HubId, goal: HubId) -> Drone {
        Drone::new(DroneId(n), format!("D{n}"), start, goal)
    }

    pub fn hubs_of(path: &FlightPath) -> Vec<(HubId, u64)> {
        path.steps().iter().map(|s| (s.hub, s.arrive.0)).collect()
    }

    /// Observer that records every callback for later inspection.
    #[derive(Default)]
    pub struct Probe {
        pub passes: Vec<u32>,
        pub successes: Vec<(DroneId, u32)>,
        pub failures: Vec<(DroneId, u32, Tick)>,
        pub unschedulable: Vec<DroneId>,
        pub pass_commits: Vec<(u32, usize)>,
        pub run_end: Option<(usize, usize, Tick)>,
    }

    impl SchedObserver for Probe {
        fn on_pass_start(&mut self, pass: u32) {
            self.passes.push(pass);
        }

        fn on_plan_success(&mut self, drone: DroneId, _path: &FlightPath, attempt: u32) {
            self.successes.push((drone, attempt));
        }

        fn on_plan_failure(&mut self, drone: DroneId, _err: &PlanError, attempt: u32, horizon: Tick) {
            self.failures.push((drone, attempt, horizon));
        }

        fn on_unschedulable(&mut self, drone: DroneId, _reason: &UnschedulableReason) {
            self.unschedulable.push(drone);
        }

        fn on_pass_end(&mut self, pass: u32, committed: usize) {
            self.pass_commits.push((pass, committed));
        }

        fn on_run_end(&mut self, committed: usize, unschedulable: usize, makespan: Tick) {
            self.run_end = Some((committed, unschedulable, makespan));
        }
    }
}

// ── Fleet validation and planning order ───────────────────────────────────────

#[cfg(test)]
mod builder {
    use sky_core::{Drone, DroneId, HubId};

    use crate::{
        DroneState, NoopObserver, SchedError, SchedulerBuilder, Unscheduled, UnschedulableReason,
    };

    #[test]
    fn ids_must_match_slots() {
        let (map, [w, _, _, e, _]) = super::helpers::plus();
        let fleet = vec![Drone::new(DroneId(3), "D3", w, e)];
        let err = SchedulerBuilder::new(map, fleet).build().unwrap_err();
        assert!(matches!(err, SchedError::NonContiguousIds { slot: 0, found: DroneId(3) }));
    }

    #[test]
    fn names_must_be_unique() {
        let (map, [w, n, _, e, s]) = super::helpers::plus();
        let fleet = vec![
            Drone::new(DroneId(0), "twin", w, e),
            Drone::new(DroneId(1), "twin", n, s),
        ];
        let err = SchedulerBuilder::new(map, fleet).build().unwrap_err();
        assert!(matches!(err, SchedError::DuplicateDroneName(name) if name == "twin"));
    }

    #[test]
    fn hubs_must_exist() {
        let (map, [w, ..]) = super::helpers::plus();
        let fleet = vec![Drone::new(DroneId(0), "D0", w, HubId(99))];
        let err = SchedulerBuilder::new(map, fleet).build().unwrap_err();
        assert!(matches!(err, SchedError::UnknownHub { hub, .. } if hub == HubId(99)));
    }

    #[test]
    fn order_is_priority_weight_then_id() {
        let (map, [a, b, c, d, e]) = super::helpers::chain();
        let fleet = vec![
            super::helpers::drone(0, a, e),
            super::helpers::drone(1, b, e).with_priority(5),
            super::helpers::drone(2, c, e).with_priority(5),
            super::helpers::drone(3, d, e).with_priority(2),
        ];
        let scheduler = SchedulerBuilder::new(map, fleet).build().unwrap();
        let order: Vec<u32> = scheduler.planning_order().iter().map(|id| id.0).collect();
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn shared_start_pad_goes_to_the_higher_priority() {
        let (map, [w, _, _, e, s]) = super::helpers::plus();
        let fleet = vec![
            super::helpers::drone(0, w, e),
            super::helpers::drone(1, w, s).with_priority(7),
        ];

        let scheduler = SchedulerBuilder::new(map, fleet).build().unwrap();
        assert_eq!(scheduler.state(DroneId(0)), &DroneState::Unschedulable);
        assert_eq!(scheduler.state(DroneId(1)), &DroneState::Unplanned);
        assert_eq!(scheduler.table().parked_at(w), Some(DroneId(1)));

        let outcome = scheduler.run(&mut NoopObserver).unwrap();
        assert!(outcome.schedule.path_of(DroneId(1)).is_some());
        assert_eq!(
            outcome.unschedulable,
            vec![Unscheduled { drone: DroneId(0), reason: UnschedulableReason::StartBlocked }]
        );
    }
}

// ── Single-drone runs ─────────────────────────────────────────────────────────

#[cfg(test)]
mod single {
    use sky_core::{DroneId, Tick};

    use crate::SchedulerBuilder;

    #[test]
    fn lone_drone_flies_the_static_shortest_path() {
        let (map, [w, _, m, e, _]) = super::helpers::plus();
        let fleet = vec![super::helpers::drone(0, w, e)];

        let mut probe = super::helpers::Probe::default();
        let outcome = SchedulerBuilder::new(map, fleet).build().unwrap().run(&mut probe).unwrap();

        assert!(outcome.fully_scheduled());
        let path = outcome.schedule.path_of(DroneId(0)).unwrap();
        assert_eq!(super::helpers::hubs_of(path), vec![(w, 0), (m, 1), (e, 2)]);
        assert_eq!(outcome.schedule.makespan(), Tick(2));

        assert_eq!(probe.passes, vec![1]);
        assert_eq!(probe.successes, vec![(DroneId(0), 1)]);
        assert_eq!(probe.run_end, Some((1, 0, Tick(2))));
    }

    #[test]
    fn start_equals_goal_is_one_step() {
        let (map, [w, ..]) = super::helpers::plus();
        let fleet = vec![super::helpers::drone(0, w, w)];

        let outcome = SchedulerBuilder::new(map, fleet)
            .build()
            .unwrap()
            .run(&mut crate::NoopObserver)
            .unwrap();
        let path = outcome.schedule.path_of(DroneId(0)).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.arrival(), Tick::ZERO);
    }

    #[test]
    fn empty_fleet_runs_to_an_empty_schedule() {
        let (map, _) = super::helpers::plus();
        let outcome = SchedulerBuilder::new(map, Vec::new())
            .build()
            .unwrap()
            .run(&mut crate::NoopObserver)
            .unwrap();
        assert!(outcome.schedule.is_empty());
        assert!(outcome.fully_scheduled());
    }
}

// ── Cooperative crossings ─────────────────────────────────────────────────────

#[cfg(test)]
mod crossing {
    use sky_core::{DroneId, Tick};

    use crate::{NoopObserver, PlanOutcome, SchedulerBuilder};

    fn crossing_outcome() -> PlanOutcome {
        let (map, [w, n, _, e, s]) = super::helpers::plus();
        let fleet = vec![super::helpers::drone(0, w, e), super::helpers::drone(1, n, s)];
        SchedulerBuilder::new(map, fleet).build().unwrap().run(&mut NoopObserver).unwrap()
    }

    #[test]
    fn drones_serialize_at_the_shared_hub() {
        let (_, [w, n, m, e, s]) = super::helpers::plus();
        let outcome = crossing_outcome();

        // D0 plans first and flies straight through m; D1 waits one tick at
        // its pad for the crossing cell to clear.
        let first = outcome.schedule.path_of(DroneId(0)).unwrap();
        let second = outcome.schedule.path_of(DroneId(1)).unwrap();
        assert_eq!(super::helpers::hubs_of(first), vec![(w, 0), (m, 1), (e, 2)]);
        assert_eq!(super::helpers::hubs_of(second), vec![(n, 0), (n, 1), (m, 2), (s, 3)]);
        assert_eq!(outcome.schedule.makespan(), Tick(3));

        let at1 = outcome.schedule.positions_at(Tick(1));
        assert_eq!(at1.get(&DroneId(0)), Some(&m));
        assert_eq!(at1.get(&DroneId(1)), Some(&n));
        assert!(outcome.schedule.positions_at(Tick(9)).is_empty(), "everyone delivered");
    }

    #[test]
    fn priority_weight_outranks_drone_id() {
        let (map, [w, n, m, e, s]) = super::helpers::plus();
        let fleet = vec![
            super::helpers::drone(0, w, e),
            super::helpers::drone(1, n, s).with_priority(5),
        ];

        let outcome =
            SchedulerBuilder::new(map, fleet).build().unwrap().run(&mut NoopObserver).unwrap();
        let vip = outcome.schedule.path_of(DroneId(1)).unwrap();
        let delayed = outcome.schedule.path_of(DroneId(0)).unwrap();
        assert_eq!(super::helpers::hubs_of(vip), vec![(n, 0), (m, 1), (s, 2)]);
        assert_eq!(super::helpers::hubs_of(delayed), vec![(w, 0), (w, 1), (m, 2), (e, 3)]);
    }

    #[test]
    fn reruns_are_bit_identical() {
        let one = crossing_outcome();
        let two = crossing_outcome();
        assert_eq!(one.schedule, two.schedule);
        assert_eq!(one.unschedulable, two.unschedulable);
    }
}

// ── Zone capacity ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod capacity {
    use sky_core::{DroneId, Tick};

    use crate::{NoopObserver, SchedulerBuilder};

    #[test]
    fn roomy_zone_admits_both_lanes_at_once() {
        let (map, [s1, _, g1, s2, _, g2]) = super::helpers::twin_lanes(2);
        let fleet = vec![super::helpers::drone(0, s1, g1), super::helpers::drone(1, s2, g2)];

        let outcome =
            SchedulerBuilder::new(map, fleet).build().unwrap().run(&mut NoopObserver).unwrap();
        assert!(outcome.fully_scheduled());
        assert_eq!(outcome.schedule.makespan(), Tick(2));
    }

    #[test]
    fn capacity_one_serializes_the_lanes() {
        let (map, [s1, _, g1, s2, m2, g2]) = super::helpers::twin_lanes(1);
        let fleet = vec![super::helpers::drone(0, s1, g1), super::helpers::drone(1, s2, g2)];

        let outcome =
            SchedulerBuilder::new(map, fleet).build().unwrap().run(&mut NoopObserver).unwrap();
        assert!(outcome.fully_scheduled());

        // The lanes never touch, but their middles share one zone slot: D1
        // holds at its pad until D0 has cleared the zone.
        let second = outcome.schedule.path_of(DroneId(1)).unwrap();
        assert_eq!(super::helpers::hubs_of(second), vec![(s2, 0), (s2, 1), (m2, 2), (g2, 3)]);
        assert_eq!(outcome.schedule.makespan(), Tick(3));
    }
}

// ── Failure modes ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod failure {
    use sky_core::{DroneId, PlanConfig, Tick};

    use crate::{
        NoopObserver, SchedError, SchedulerBuilder, Unscheduled, UnschedulableReason,
    };

    #[test]
    fn swapped_endpoints_deadlock() {
        let (map, [a, b]) = super::helpers::corridor_pair();
        let fleet = vec![super::helpers::drone(0, a, b), super::helpers::drone(1, b, a)];

        let err = SchedulerBuilder::new(map, fleet)
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap_err();
        match err {
            SchedError::Deadlock { committed, blocked } => {
                assert!(committed.is_empty());
                assert_eq!(blocked, vec![DroneId(0), DroneId(1)]);
            }
            other => panic!("expected deadlock, got {other}"),
        }
    }

    #[test]
    fn restricted_goal_is_unschedulable_not_deadlock() {
        let (map, [p, _, g, x, y]) = super::helpers::restricted_split();
        let fleet = vec![super::helpers::drone(0, p, g), super::helpers::drone(1, x, y)];

        let outcome =
            SchedulerBuilder::new(map, fleet).build().unwrap().run(&mut NoopObserver).unwrap();

        // One hopeless drone must not drag the rest of the fleet down.
        assert!(outcome.schedule.path_of(DroneId(1)).is_some());
        assert_eq!(
            outcome.unschedulable,
            vec![Unscheduled { drone: DroneId(0), reason: UnschedulableReason::NoRoute }]
        );
    }

    #[test]
    fn clearance_unlocks_the_restricted_route() {
        let (map, [p, r, g, x, y]) = super::helpers::restricted_split();
        let fleet = vec![
            super::helpers::drone(0, p, g).with_clearance(),
            super::helpers::drone(1, x, y),
        ];

        let outcome =
            SchedulerBuilder::new(map, fleet).build().unwrap().run(&mut NoopObserver).unwrap();
        assert!(outcome.fully_scheduled());
        let path = outcome.schedule.path_of(DroneId(0)).unwrap();
        assert_eq!(super::helpers::hubs_of(path), vec![(p, 0), (r, 1), (g, 2)]);
    }

    #[test]
    fn retries_cap_out_as_unschedulable() {
        let (map, [a, b]) = super::helpers::corridor_pair();
        let fleet = vec![super::helpers::drone(0, a, b), super::helpers::drone(1, b, a)];
        let config = PlanConfig { max_replans: 1, ..PlanConfig::default() };

        // With a single attempt allowed, both drones burn out before a
        // zero-commit pass can be called a deadlock.
        let mut probe = super::helpers::Probe::default();
        let outcome = SchedulerBuilder::new(map, fleet)
            .config(config)
            .build()
            .unwrap()
            .run(&mut probe)
            .unwrap();

        assert!(outcome.schedule.is_empty());
        assert_eq!(
            outcome.unschedulable,
            vec![
                Unscheduled {
                    drone:  DroneId(0),
                    reason: UnschedulableReason::RetriesExhausted { attempts: 1 },
                },
                Unscheduled {
                    drone:  DroneId(1),
                    reason: UnschedulableReason::RetriesExhausted { attempts: 1 },
                },
            ]
        );
        assert_eq!(probe.pass_commits, vec![(1, 0)]);
        assert_eq!(probe.run_end, Some((0, 2, Tick::ZERO)));
    }

    #[test]
    fn blocked_drones_retry_with_grown_horizons() {
        // A dependency chain that resolves one drone per pass: D0 needs D1's
        // pad, D1 needs D2's pad, and only D2 is free to go at once.
        let (map, [a, _, c, d, e]) = super::helpers::chain();
        let fleet = vec![
            super::helpers::drone(0, a, c).with_priority(9),
            super::helpers::drone(1, c, d).with_priority(5),
            super::helpers::drone(2, d, e).with_priority(1),
        ];
        let config = PlanConfig { horizon_slack: 2, ..PlanConfig::default() };

        let mut probe = super::helpers::Probe::default();
        let outcome = SchedulerBuilder::new(map, fleet)
            .config(config)
            .build()
            .unwrap()
            .run(&mut probe)
            .unwrap();

        assert!(outcome.fully_scheduled());
        assert_eq!(probe.passes, vec![1, 2, 3]);
        assert_eq!(probe.pass_commits, vec![(1, 1), (2, 1), (3, 1)]);
        assert_eq!(
            probe.successes,
            vec![(DroneId(2), 1), (DroneId(1), 2), (DroneId(0), 3)]
        );
        // First horizons are dist + slack; each retry doubles its own.
        assert_eq!(
            probe.failures,
            vec![
                (DroneId(0), 1, Tick(4)),
                (DroneId(1), 1, Tick(3)),
                (DroneId(0), 2, Tick(8)),
            ]
        );
        assert_eq!(outcome.schedule.makespan(), Tick(2));
    }
}

// ── Outcome consistency ───────────────────────────────────────────────────────

#[cfg(test)]
mod consistency {
    use std::collections::BTreeMap;

    use sky_core::{Drone, DroneId, FlightPath, PathStep, PlanConfig, Tick};
    use sky_map::Airspace;
    use sky_plan::{DistanceField, FlightPlanner, PlanResult};
    use sky_reserve::ReservationTable;

    use crate::{verify, NoopObserver, SchedError, Schedule, SchedulerBuilder};

    #[test]
    fn verify_rebuilds_and_accepts_a_real_outcome() {
        let (map, [w, n, _, e, s]) = super::helpers::plus();
        let fleet = vec![super::helpers::drone(0, w, e), super::helpers::drone(1, n, s)];
        let outcome = SchedulerBuilder::new(map, fleet.clone())
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap();

        let (fresh, _) = super::helpers::plus();
        assert!(verify(&fresh, &fleet, &outcome.schedule).is_ok());
        assert!(verify(&fresh, &fleet, &outcome.schedule).is_ok(), "re-check is pure");
    }

    #[test]
    fn verify_rejects_colliding_paths() {
        let (map, [w, n, m, e, s]) = super::helpers::plus();
        let fleet = vec![super::helpers::drone(0, w, e), super::helpers::drone(1, n, s)];

        // Hand-build two flights that both stand on m at T1.
        let paths = BTreeMap::from([
            (
                DroneId(0),
                FlightPath::new(vec![
                    PathStep::new(w, Tick::ZERO),
                    PathStep::new(m, Tick(1)),
                    PathStep::new(e, Tick(2)),
                ]),
            ),
            (
                DroneId(1),
                FlightPath::new(vec![
                    PathStep::new(n, Tick::ZERO),
                    PathStep::new(m, Tick(1)),
                    PathStep::new(s, Tick(2)),
                ]),
            ),
        ]);
        let err = verify(&map, &fleet, &Schedule::from_paths(paths)).unwrap_err();
        assert!(matches!(err, SchedError::Inconsistent(_)));
    }

    /// Planner that ignores the goal and sits on the start pad.
    struct StuckPlanner;

    impl FlightPlanner for StuckPlanner {
        fn plan(
            &self,
            _map: &Airspace,
            _table: &ReservationTable,
            drone: &Drone,
            _field: &DistanceField,
            _config: &PlanConfig,
            _horizon: Tick,
        ) -> PlanResult<FlightPath> {
            Ok(FlightPath::new(vec![PathStep::new(drone.start, Tick::ZERO)]))
        }
    }

    #[test]
    fn foreign_planner_cannot_misroute() {
        let (map, [w, _, _, e, _]) = super::helpers::plus();
        let fleet = vec![super::helpers::drone(0, w, e)];

        let err = SchedulerBuilder::with_planner(map, fleet, StuckPlanner)
            .build()
            .unwrap()
            .run(&mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, SchedError::MisroutedPath { drone } if drone == DroneId(0)));
    }
}

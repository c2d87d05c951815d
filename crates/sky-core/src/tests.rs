//! Unit tests for sky-core primitives.

#[cfg(test)]
mod ids {
    use crate::{DroneId, HubId, LinkId, ZoneId};

    #[test]
    fn index_roundtrip() {
        let id = DroneId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(DroneId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(DroneId(0) < DroneId(1));
        assert!(HubId(100) > HubId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(DroneId::INVALID.0, u32::MAX);
        assert_eq!(HubId::INVALID.0, u32::MAX);
        assert_eq!(LinkId::INVALID.0, u32::MAX);
        assert_eq!(ZoneId::INVALID.0, u16::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(DroneId(7).to_string(), "DroneId(7)");
        assert_eq!(ZoneId(3).to_string(), "ZoneId(3)");
    }
}

#[cfg(test)]
mod grid {
    use crate::GridPoint;

    #[test]
    fn zero_distance() {
        let p = GridPoint::new(3, -4);
        assert_eq!(p.manhattan(p), 0);
    }

    #[test]
    fn axis_sum() {
        let a = GridPoint::new(0, 0);
        let b = GridPoint::new(3, 4);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7, "manhattan is symmetric");
    }

    #[test]
    fn extreme_corners_no_overflow() {
        let a = GridPoint::new(i32::MIN, i32::MIN);
        let b = GridPoint::new(i32::MAX, i32::MAX);
        // 2 × (2^32 - 1)
        assert_eq!(a.manhattan(b), 2 * (u32::MAX as u64));
    }

    #[test]
    fn display() {
        assert_eq!(GridPoint::new(2, -5).to_string(), "(2, -5)");
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(10)), 5);
    }

    #[test]
    fn display() {
        assert_eq!(Tick(12).to_string(), "T12");
        assert_eq!(Tick::ZERO.to_string(), "T0");
    }
}

#[cfg(test)]
mod drone {
    use crate::{Drone, DroneId, HubId, ZoneAccess};

    #[test]
    fn default_access_is_unprivileged() {
        let d = Drone::new(DroneId(0), "D1", HubId(0), HubId(5));
        assert_eq!(d.access(), ZoneAccess::DEFAULT);
    }

    #[test]
    fn priority_weight_grants_priority_access() {
        let d = Drone::new(DroneId(0), "D1", HubId(0), HubId(5)).with_priority(3);
        assert!(d.access().prioritized);
        assert!(!d.access().clearance);
    }

    #[test]
    fn clearance_is_independent_of_priority() {
        let d = Drone::new(DroneId(1), "D2", HubId(2), HubId(3)).with_clearance();
        assert!(d.access().clearance);
        assert!(!d.access().prioritized);
    }
}

#[cfg(test)]
mod path {
    use crate::{FlightPath, HubId, PathStep, Tick};

    /// A path with a wait at hub 1 and a 2-tick link hop at the end:
    /// (0,T0) → (1,T1) → wait (1,T2) → (3,T4).
    fn sample() -> FlightPath {
        FlightPath::new(vec![
            PathStep::new(HubId(0), Tick(0)),
            PathStep::new(HubId(1), Tick(1)),
            PathStep::new(HubId(1), Tick(2)),
            PathStep::new(HubId(3), Tick(4)),
        ])
    }

    #[test]
    fn endpoints() {
        let p = sample();
        assert_eq!(p.start(), HubId(0));
        assert_eq!(p.goal(), HubId(3));
        assert_eq!(p.arrival(), Tick(4));
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn hop_and_wait_counts() {
        let p = sample();
        assert_eq!(p.hops(), 2, "0→1 and 1→3");
        assert_eq!(p.waits(), 1, "one explicit wait at hub 1");
    }

    #[test]
    fn position_at_steps() {
        let p = sample();
        assert_eq!(p.position_at(Tick(0)), Some(HubId(0)));
        assert_eq!(p.position_at(Tick(2)), Some(HubId(1)));
        assert_eq!(p.position_at(Tick(4)), Some(HubId(3)));
    }

    #[test]
    fn position_mid_traversal_is_airborne() {
        // T3 falls inside the 2-tick link hop 1 → 3.
        assert_eq!(sample().position_at(Tick(3)), None);
    }

    #[test]
    fn position_after_arrival_is_delivered() {
        assert_eq!(sample().position_at(Tick(5)), None);
    }

    #[test]
    fn single_step_path() {
        // start == goal: the drone is delivered where it stands.
        let p = FlightPath::new(vec![PathStep::new(HubId(9), Tick(0))]);
        assert_eq!(p.start(), p.goal());
        assert_eq!(p.arrival(), Tick::ZERO);
        assert_eq!(p.hops(), 0);
        assert_eq!(p.position_at(Tick(0)), Some(HubId(9)));
        assert_eq!(p.position_at(Tick(1)), None);
    }
}

//! Flight paths — the unit of commitment between planner and scheduler.
//!
//! # Design
//!
//! A path is the exact list of `(hub, tick)` cells the drone occupies: one
//! step per tick the drone stands at a hub.  Waits are explicit steps (same
//! hub, next tick); a move along a link of duration `d` jumps the tick by `d`
//! with no steps in between (the drone is airborne on the link).  This makes
//! reservation bookkeeping literal — committing a path reserves precisely its
//! steps plus the link windows between consecutive differing hubs — and it is
//! what lets the reservation table stay derivable from committed paths alone.

use crate::ids::HubId;
use crate::time::Tick;

/// One occupied `(hub, tick)` cell of a flight path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    pub hub:    HubId,
    pub arrive: Tick,
}

impl PathStep {
    #[inline]
    pub fn new(hub: HubId, arrive: Tick) -> Self {
        Self { hub, arrive }
    }
}

/// An ordered, tick-monotone flight path for one drone.
///
/// Invariants (debug-asserted at construction, re-validated by the
/// scheduler's global consistency check):
/// - non-empty; the first step arrives at [`Tick::ZERO`] (the start pad),
/// - arrival ticks strictly increase,
/// - a one-tick gap with the same hub is a wait; any other gap is a move
///   whose link duration equals the gap.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightPath {
    steps: Vec<PathStep>,
}

impl FlightPath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        debug_assert!(!steps.is_empty(), "a flight path has at least its start step");
        debug_assert_eq!(steps[0].arrive, Tick::ZERO, "paths begin on the start pad at T0");
        debug_assert!(
            steps.windows(2).all(|w| w[0].arrive < w[1].arrive),
            "arrival ticks must strictly increase"
        );
        Self { steps }
    }

    #[inline]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// The start pad (first step's hub).
    #[inline]
    pub fn start(&self) -> HubId {
        self.steps[0].hub
    }

    /// The goal pad (last step's hub).
    #[inline]
    pub fn goal(&self) -> HubId {
        self.steps[self.steps.len() - 1].hub
    }

    /// The tick at which the drone reaches its goal.
    #[inline]
    pub fn arrival(&self) -> Tick {
        self.steps[self.steps.len() - 1].arrive
    }

    /// Steps that change hub.
    pub fn hops(&self) -> usize {
        self.steps.windows(2).filter(|w| w[0].hub != w[1].hub).count()
    }

    /// Steps that stay on the same hub (explicit waits).
    pub fn waits(&self) -> usize {
        self.steps.windows(2).filter(|w| w[0].hub == w[1].hub).count()
    }

    /// Where the drone stands at `tick`, if it stands anywhere.
    ///
    /// `None` means airborne on a link (mid-traversal tick) or already
    /// delivered (`tick` past [`FlightPath::arrival`]) — after its arrival
    /// tick a drone has left the traffic layer.
    pub fn position_at(&self, tick: Tick) -> Option<HubId> {
        // Steps are sorted by arrival tick, so binary search applies.
        let i = self.steps.partition_point(|s| s.arrive < tick);
        match self.steps.get(i) {
            Some(s) if s.arrive == tick => Some(s.hub),
            _ => None,
        }
    }
}

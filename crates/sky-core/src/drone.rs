//! Drone descriptors.
//!
//! A [`Drone`] is the immutable request record the scheduler plans for: who,
//! from where, to where, and with what privileges.  Scheduling state (planned,
//! committed, blocked, …) lives in `sky-sched`, not here — the descriptor
//! never changes during a run.

use crate::ids::{DroneId, HubId};

/// One drone's planning request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drone {
    pub id: DroneId,
    /// Display name from the scenario file, e.g. `D1`.  Unique per fleet.
    pub name: String,
    pub start: HubId,
    pub goal: HubId,
    /// Higher weight plans earlier.  0 = unprioritized (the default), which
    /// also bars the drone from Priority zones.
    pub priority: u32,
    /// Clearance to enter Restricted zones.  Off by default.
    pub clearance: bool,
}

impl Drone {
    /// An unprioritized, unclearanced drone.
    pub fn new(id: DroneId, name: impl Into<String>, start: HubId, goal: HubId) -> Self {
        Self {
            id,
            name: name.into(),
            start,
            goal,
            priority: 0,
            clearance: false,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_clearance(mut self) -> Self {
        self.clearance = true;
        self
    }

    /// The zone-admission capability this drone presents to the reservation
    /// table and the planner.
    #[inline]
    pub fn access(&self) -> ZoneAccess {
        ZoneAccess {
            prioritized: self.priority > 0,
            clearance:   self.clearance,
        }
    }
}

/// What zone kinds a drone may enter.  Evaluated by `is_free`-style checks;
/// derived from the drone descriptor, never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneAccess {
    /// May enter Priority zones (drone priority weight > 0).
    pub prioritized: bool,
    /// May enter Restricted zones.
    pub clearance: bool,
}

impl ZoneAccess {
    /// The unprivileged default: Normal zones only.
    pub const DEFAULT: ZoneAccess = ZoneAccess {
        prioritized: false,
        clearance:   false,
    };
}

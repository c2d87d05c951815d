//! Reservation-table error type.

use thiserror::Error;

use sky_core::{DroneId, HubId, LinkId, Tick};

/// Errors produced by `sky-reserve`.
///
/// The first five variants are *conflicts* — the requested cell is taken or
/// the owning zone refuses entry.  The rest are *consistency* errors that a
/// correct planner never triggers; they exist so the scheduler's global
/// consistency check can report exactly which cell of which path is wrong
/// instead of panicking.
#[derive(Debug, Error)]
pub enum ReserveError {
    #[error("hub {hub} already reserved at {tick} by {by}")]
    HubOccupied { hub: HubId, tick: Tick, by: DroneId },

    #[error("pad {hub} is blocked by parked drone {by}")]
    PadBlocked { hub: HubId, by: DroneId },

    #[error("corridor {corridor} already reserved at {tick} by {by}")]
    CorridorOccupied { corridor: LinkId, tick: Tick, by: DroneId },

    #[error("zone '{zone}' at capacity {capacity} at {tick}")]
    ZoneFull { zone: String, tick: Tick, capacity: u32 },

    #[error("zone '{zone}' does not admit this drone (hub {hub})")]
    ZoneBarred { zone: String, hub: HubId },

    #[error("no link from {from} to {to}")]
    NoSuchLink { from: HubId, to: HubId },

    #[error("traversal {from} to {to} takes {expected} ticks, path allots {got}")]
    WrongDuration { from: HubId, to: HubId, expected: u32, got: u64 },

    #[error("hub {hub} at {tick} is not held by {drone}")]
    HubNotHeld { drone: DroneId, hub: HubId, tick: Tick },

    #[error("corridor {corridor} at {tick} is not held by {drone}")]
    LinkNotHeld { drone: DroneId, corridor: LinkId, tick: Tick },

    #[error("pad {hub} is not parked on by {drone}")]
    PadNotHeld { drone: DroneId, hub: HubId },
}

pub type ReserveResult<T> = Result<T, ReserveError>;

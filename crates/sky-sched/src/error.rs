//! Scheduler error type.

use thiserror::Error;

use sky_core::{DroneId, HubId};
use sky_reserve::ReserveError;

/// Errors produced by `sky-sched`.
///
/// Per-drone planning failures are not errors at this level — they end up in
/// the outcome's unschedulable list.  `SchedError` covers invalid fleet
/// rosters, the terminal whole-run deadlock, and consistency violations that
/// indicate an engine bug rather than a hard scenario.
#[derive(Debug, Error)]
pub enum SchedError {
    #[error("fleet ids must be contiguous from 0: slot {slot} holds {found}")]
    NonContiguousIds { slot: usize, found: DroneId },

    #[error("duplicate drone name '{0}'")]
    DuplicateDroneName(String),

    #[error("drone '{drone}' references unknown hub {hub}")]
    UnknownHub { drone: String, hub: HubId },

    /// A full planning pass committed nothing while drones still waited on
    /// each other.  Terminal for the whole run.
    #[error("deadlock: no drone can progress ({} committed, {} blocked)", committed.len(), blocked.len())]
    Deadlock { committed: Vec<DroneId>, blocked: Vec<DroneId> },

    #[error("schedule references unknown drone {0}")]
    UnknownDrone(DroneId),

    #[error("drone {drone} path does not run start to goal")]
    MisroutedPath { drone: DroneId },

    /// The reservation ledger rejected an operation the run logic believed
    /// valid, or the global re-check found a conflict.  Always a bug report,
    /// never a scenario outcome.
    #[error("reservation ledger inconsistency: {0}")]
    Inconsistent(#[from] ReserveError),
}

pub type SchedResult<T> = Result<T, SchedError>;

//! Planner error type.
//!
//! The two variants deliberately split "can never work" from "did not work
//! yet": the scheduler gives up immediately on the former and retries the
//! latter with a larger horizon.

use thiserror::Error;

use sky_core::{HubId, Tick};

/// Errors produced by `sky-plan`.
#[derive(Debug, Error)]
pub enum PlanError {
    /// No route from start to goal exists on the static map for this drone's
    /// access class — wrong topology or barred zones.  Waiting cannot fix it.
    #[error("no route from {start} to {goal} exists for this drone")]
    NoPathFound { start: HubId, goal: HubId },

    /// A static route exists, but every conflict-free candidate within the
    /// search horizon was blocked by current reservations.  Retryable.
    #[error("no conflict-free path within horizon {horizon}")]
    DeadlineExceeded { horizon: Tick },
}

pub type PlanResult<T> = Result<T, PlanError>;

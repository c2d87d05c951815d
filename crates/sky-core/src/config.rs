//! Planner/scheduler tuning knobs.

/// Horizon and retry policy for a scheduling run.
///
/// Typically left at `Default` — the defaults are sized so that "wait out the
/// already-committed traffic" solutions fit inside the first attempt's
/// horizon, which keeps the zero-progress deadlock signal meaningful.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanConfig {
    /// Extra ticks added on top of `max reserved tick + static distance` when
    /// sizing a drone's first search horizon.
    pub horizon_slack: u64,

    /// Horizon multiplier applied between successive attempts for the same
    /// drone.  Must be ≥ 2 for retries to make progress.
    pub horizon_growth: u64,

    /// Planner attempts per drone before it is declared unschedulable.
    pub max_replans: u32,

    /// Hard cap on any search horizon, growth included.
    pub max_horizon: u64,

    /// Opt-in cost extension: discount Priority-zone entry costs for
    /// prioritized drones in the planner's tie-break key.  Re-ranks routes of
    /// equal arrival tick only; arrival times never change.
    pub priority_cost_weighting: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            horizon_slack:           32,
            horizon_growth:          2,
            max_replans:             4,
            max_horizon:             4_096,
            priority_cost_weighting: false,
        }
    }
}

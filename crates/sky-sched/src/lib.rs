//! # sky-sched — cooperative multi-drone scheduling
//!
//! Turns an airspace plus a fleet roster into one conflict-free timetable.
//! One drone plans at a time, in priority order, against a shared
//! reservation ledger; commitment is final and every later search routes
//! around it.  Drones that fail on traffic retry in later passes with
//! grown horizons, and a pass that commits nothing while drones remain
//! pending is a deadlock.
//!
//! ```text
//! fleet ──sort──▸ planning order ──▸ ┌ pass ───────────────────────┐
//!                                    │ per pending drone:          │
//!                                    │   unpark → plan → commit    │
//!                                    │          └─fail─▸ re-park,  │
//!                                    │            grow horizon     │
//!                                    └──────────────┬──────────────┘
//!               0 commits & drones pending? ◂───────┘ all terminal?
//!                        = deadlock                  = verify + report
//! ```
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | `scheduler` | [`Scheduler`], [`SchedulerBuilder`], [`DroneState`]       |
//! | `schedule`  | [`Schedule`], [`PlanOutcome`], [`verify`]                 |
//! | `observer`  | [`SchedObserver`], [`NoopObserver`]                       |
//! | `error`     | [`SchedError`], [`SchedResult`]                           |
//!
//! # Feature flags
//!
//! | Feature    | Effect                                        |
//! |------------|-----------------------------------------------|
//! | `parallel` | Rayon-parallel distance-field precomputation  |

mod error;
mod observer;
mod schedule;
mod scheduler;

#[cfg(test)]
mod tests;

pub use error::{SchedError, SchedResult};
pub use observer::{NoopObserver, SchedObserver};
pub use schedule::{verify, PlanOutcome, Schedule, Unscheduled, UnschedulableReason};
pub use scheduler::{DroneState, Scheduler, SchedulerBuilder};

//! # sky-plan — single-drone planning against shared reservations
//!
//! Given one drone, the current reservation table, and a search horizon,
//! produce a conflict-free flight path — or say precisely why none exists.
//! The two failure modes drive the scheduler's whole retry policy:
//! [`PlanError::NoPathFound`] means the map itself refuses (give up),
//! [`PlanError::DeadlineExceeded`] means traffic got in the way (retry with
//! a larger horizon).
//!
//! | Module    | Contents                                           |
//! |-----------|----------------------------------------------------|
//! | `field`   | [`DistanceField`] — static distances, reachability |
//! | `planner` | [`FlightPlanner`], [`TimeExpandedPlanner`]         |
//! | `error`   | [`PlanError`], [`PlanResult`]                      |
//!
//! # Feature flags
//!
//! | Feature    | Effect                                            |
//! |------------|---------------------------------------------------|
//! | `parallel` | Rayon-parallel [`DistanceField::build_many`]      |

mod error;
mod field;
mod planner;


pub use error::{PlanError, PlanResult};
pub use field::DistanceField;
pub use planner::{FlightPlanner, TimeExpandedPlanner};

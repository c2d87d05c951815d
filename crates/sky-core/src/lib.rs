//! `sky-core` — foundational types for the `skyway` planning engine.
//!
//! This crate is a dependency of every other `sky-*` crate.  It intentionally
//! has no `sky-*` dependencies and no required external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`ids`]    | `DroneId`, `HubId`, `LinkId`, `ZoneId`                |
//! | [`grid`]   | `GridPoint`, Manhattan distance                       |
//! | [`time`]   | `Tick`                                                |
//! | [`drone`]  | `Drone` descriptor, `ZoneAccess` capability           |
//! | [`path`]   | `FlightPath`, `PathStep`                              |
//! | [`config`] | `PlanConfig` (horizon and retry policy)               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod drone;
pub mod grid;
pub mod ids;
pub mod path;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::PlanConfig;
pub use drone::{Drone, ZoneAccess};
pub use grid::GridPoint;
pub use ids::{DroneId, HubId, LinkId, ZoneId};
pub use path::{FlightPath, PathStep};
pub use time::Tick;

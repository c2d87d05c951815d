//! `sky-map` — the airspace graph for the `skyway` planning engine.
//!
//! Hubs (locations), links (one-way airways or two-way corridors), and zones
//! (named hub regions with capacity/admission policy) in a CSR layout, built
//! once by [`AirspaceBuilder`] and immutable afterwards.  Construction
//! validates the same rules the scenario format enforces: unique names and
//! coordinates, no self-links, no duplicate links, consistent zone
//! membership.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds serde derives to zone types (and `sky-core`).  |

pub mod airspace;
pub mod error;
pub mod zone;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use airspace::{Airspace, AirspaceBuilder};
pub use error::{MapError, MapResult, TopologyError, ZoneError};
pub use zone::{Zone, ZoneKind};

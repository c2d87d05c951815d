//! # sky-reserve — shared time-space reservation ledger
//!
//! The reservation table is the single source of truth for "who is where,
//! when".  Planners read it to generate conflict-free paths; the scheduler
//! writes to it when a path is committed.  Because the table is exactly the
//! union of parked pads and committed flight cells, it can always be rebuilt
//! from the schedule — the scheduler's global consistency check does exactly
//! that and compares with `==`.
//!
//! | Module  | Contents                                    |
//! |---------|---------------------------------------------|
//! | `table` | [`ReservationTable`] and its cell semantics |
//! | `error` | [`ReserveError`], [`ReserveResult`]         |

mod error;
mod table;


pub use error::{ReserveError, ReserveResult};
pub use table::ReservationTable;

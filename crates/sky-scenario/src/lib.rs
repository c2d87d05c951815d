//! # sky-scenario — scenario files in, airspace and fleet out
//!
//! The only crate in the stack that touches text or disks.  It reads the
//! line-oriented scenario format (see [`parser`](self) module docs for the
//! grammar), drives the airspace builder, and hands back a [`Scenario`]
//! whose fleet plugs straight into the scheduler.
//!
//! | Module   | Contents                                                        |
//! |----------|-----------------------------------------------------------------|
//! | `parser` | [`Scenario`], [`load_scenario_str`] / `_reader` / `_file`       |
//! | `error`  | [`ScenarioError`] (line-numbered), [`ScenarioResult`]           |

mod error;
mod parser;


pub use error::{ScenarioError, ScenarioResult};
pub use parser::{load_scenario_file, load_scenario_reader, load_scenario_str, Scenario};

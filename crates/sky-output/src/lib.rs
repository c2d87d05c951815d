//! `sky-output` — plan output writers for the `skyway` planning engine.
//!
//! Takes the [`PlanOutcome`](sky_sched::PlanOutcome) of a scheduler run and
//! turns it into files or text.  Two backends sit behind Cargo features:
//!
//! | Feature  | Backend | Files created                                    |
//! |----------|---------|--------------------------------------------------|
//! | *(none)* | CSV     | `positions.csv`, `flights.csv`, `run_summary.csv`|
//! | `sqlite` | SQLite  | `schedule.db`                                    |
//!
//! Both implement [`OutputWriter`] and are fed whole plans by
//! [`write_outcome`].  [`render_report`] is the third consumer: a plain-text
//! digest of the same rows for terminals and logs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sky_output::{write_outcome, CsvWriter};
//!
//! let outcome = scheduler.run(&mut NoopObserver)?;
//! let mut writer = CsvWriter::new(Path::new("./out"))?;
//! write_outcome(&mut writer, &outcome)?;
//! println!("{}", sky_output::render_report(&outcome));
//! ```

pub mod csv;
pub mod error;
pub mod report;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use report::render_report;
pub use row::{flight_rows, position_rows, run_summary, FlightSummaryRow, PositionRow, RunSummaryRow};
pub use writer::{write_outcome, OutputWriter};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

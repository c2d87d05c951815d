//! The `OutputWriter` trait implemented by all backend writers.

use sky_sched::PlanOutcome;

use crate::row::{flight_rows, position_rows, run_summary};
use crate::{FlightSummaryRow, OutputResult, PositionRow, RunSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
pub trait OutputWriter {
    /// Write a batch of per-tick position rows.
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()>;

    /// Write a batch of per-flight summary rows.
    fn write_flights(&mut self, rows: &[FlightSummaryRow]) -> OutputResult<()>;

    /// Write the single whole-run summary row.
    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Push one complete plan through `writer`: positions, flight summaries,
/// the run summary, then [`OutputWriter::finish`].
pub fn write_outcome<W: OutputWriter>(writer: &mut W, outcome: &PlanOutcome) -> OutputResult<()> {
    writer.write_positions(&position_rows(outcome))?;
    writer.write_flights(&flight_rows(outcome))?;
    writer.write_run_summary(&run_summary(outcome))?;
    writer.finish()
}

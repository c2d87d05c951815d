//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `positions.csv`
//! - `flights.csv`
//! - `run_summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{FlightSummaryRow, OutputResult, PositionRow, RunSummaryRow};

/// Writes the timetable to three CSV files.
pub struct CsvWriter {
    positions: Writer<File>,
    flights:   Writer<File>,
    summary:   Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut positions = Writer::from_path(dir.join("positions.csv"))?;
        positions.write_record(["tick", "drone_id", "hub"])?;

        let mut flights = Writer::from_path(dir.join("flights.csv"))?;
        flights.write_record([
            "drone_id", "name", "start", "goal", "arrival", "hops", "waits", "path_cost",
        ])?;

        let mut summary = Writer::from_path(dir.join("run_summary.csv"))?;
        summary.write_record([
            "scheduled", "unschedulable", "makespan", "total_moves", "total_path_cost", "moves_per_tick",
        ])?;

        Ok(Self {
            positions,
            flights,
            summary,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        for row in rows {
            self.positions.write_record(&[
                row.tick.to_string(),
                row.drone_id.to_string(),
                row.hub.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_flights(&mut self, rows: &[FlightSummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.flights.write_record(&[
                row.drone_id.to_string(),
                row.name.clone(),
                row.start.to_string(),
                row.goal.to_string(),
                row.arrival.to_string(),
                row.hops.to_string(),
                row.waits.to_string(),
                row.path_cost.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.scheduled.to_string(),
            row.unschedulable.to_string(),
            row.makespan.to_string(),
            row.total_moves.to_string(),
            row.total_path_cost.to_string(),
            format!("{:.2}", row.moves_per_tick),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.positions.flush()?;
        self.flights.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}

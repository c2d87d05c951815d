//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `schedule.db` file in the configured output directory
//! with three tables: `positions`, `flights`, and `run_summary`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{FlightSummaryRow, OutputResult, PositionRow, RunSummaryRow};

/// Writes the timetable to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `schedule.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("schedule.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS positions (
                 tick     INTEGER NOT NULL,
                 drone_id INTEGER NOT NULL,
                 hub      INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS flights (
                 drone_id  INTEGER PRIMARY KEY,
                 name      TEXT    NOT NULL,
                 start     INTEGER NOT NULL,
                 goal      INTEGER NOT NULL,
                 arrival   INTEGER NOT NULL,
                 hops      INTEGER NOT NULL,
                 waits     INTEGER NOT NULL,
                 path_cost INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS run_summary (
                 scheduled       INTEGER NOT NULL,
                 unschedulable   INTEGER NOT NULL,
                 makespan        INTEGER NOT NULL,
                 total_moves     INTEGER NOT NULL,
                 total_path_cost INTEGER NOT NULL,
                 moves_per_tick  REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO positions (tick, drone_id, hub) VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.tick, row.drone_id, row.hub])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_flights(&mut self, rows: &[FlightSummaryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO flights \
                 (drone_id, name, start, goal, arrival, hops, waits, path_cost) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.drone_id,
                    row.name,
                    row.start,
                    row.goal,
                    row.arrival,
                    row.hops,
                    row.waits,
                    row.path_cost,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO run_summary \
             (scheduled, unschedulable, makespan, total_moves, total_path_cost, moves_per_tick) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.scheduled,
                row.unschedulable,
                row.makespan,
                row.total_moves,
                row.total_path_cost,
                row.moves_per_tick,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

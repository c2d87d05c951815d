//! Scenario loading error type.

use thiserror::Error;

use sky_map::MapError;

/// Errors from scenario loading.
///
/// Every in-file problem carries the 1-based line number of the directive
/// that caused it, whether the failure is lexical (`Parse`) or semantic
/// (`Map`, raised by airspace construction).  Whole-map validation runs
/// after the last line and has no line to point at.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A line the grammar cannot read.
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// A directive the airspace builder rejected.
    #[error("line {line}: {source}")]
    Map { line: usize, source: MapError },

    /// Whole-map validation failed after all directives were read.
    #[error(transparent)]
    Build(#[from] MapError),

    #[error("scenario I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

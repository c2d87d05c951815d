//! Grid coordinate type.
//!
//! Hub positions are symbolic integer grid coordinates taken from the
//! scenario file.  They exist for the Manhattan-distance tie-break in the
//! planner and for human-readable output; they carry no physical unit.

/// A 2-D integer grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance between two points.
    ///
    /// Computed in `i64` so opposite-corner `i32` extremes cannot overflow.
    #[inline]
    pub fn manhattan(self, other: GridPoint) -> u64 {
        (self.x as i64 - other.x as i64).unsigned_abs()
            + (self.y as i64 - other.y as i64).unsigned_abs()
    }
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

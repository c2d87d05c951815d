//! Planning time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter and nothing more.  The
//! engine never consults wall-clock time: the "deadline horizon" bound in the
//! planner is a search depth, not a timeout, so identical inputs always walk
//! an identical frontier.  Using an integer tick as the canonical unit keeps
//! all schedule arithmetic exact and comparisons O(1).

use std::fmt;

/// An absolute planning tick counter.
///
/// Stored as `u64` so horizon arithmetic can never overflow in practice: even
/// pathological retry growth stays far below the limit.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

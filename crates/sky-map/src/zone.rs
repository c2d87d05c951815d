//! Zones — named hub regions sharing one occupancy policy.
//!
//! Zone behavior is a tagged variant ([`ZoneKind`]) with kind-specific
//! admission rules, evaluated wherever occupancy is checked.  The reservation
//! table asks [`Zone::admits`] and [`Zone::capacity_exempt`]; the planner uses
//! the same answers to prune whole zones from its frontier.

use sky_core::{HubId, ZoneAccess, ZoneId};

/// Occupancy policy of a zone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneKind {
    /// Anyone may enter, up to capacity.
    Normal,
    /// Only prioritized drones (priority weight > 0) may enter, up to capacity.
    Priority,
    /// Only drones with clearance may enter; capacity does not apply to them.
    Restricted,
}

impl ZoneKind {
    /// Parse a scenario-file kind token.
    pub fn parse(s: &str) -> Option<ZoneKind> {
        match s {
            "normal"     => Some(ZoneKind::Normal),
            "priority"   => Some(ZoneKind::Priority),
            "restricted" => Some(ZoneKind::Restricted),
            _ => None,
        }
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ZoneKind::Normal     => "normal",
            ZoneKind::Priority   => "priority",
            ZoneKind::Restricted => "restricted",
        };
        f.write_str(s)
    }
}

/// A named region of hubs with one shared capacity/admission policy.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub id:   ZoneId,
    pub name: String,
    pub kind: ZoneKind,
    /// Maximum simultaneous occupants.  At least 1 unless Restricted;
    /// Restricted zones default to 0 (nobody without clearance).
    pub capacity: u32,
    /// Member hubs, ascending.  Never empty after map construction.
    pub members: Vec<HubId>,
}

impl Zone {
    /// May a drone with this access class enter the zone at all?
    #[inline]
    pub fn admits(&self, access: ZoneAccess) -> bool {
        match self.kind {
            ZoneKind::Normal     => true,
            ZoneKind::Priority   => access.prioritized,
            ZoneKind::Restricted => access.clearance,
        }
    }

    /// Cleared drones operate above Restricted-zone capacity (which is
    /// normally 0); every other kind counts occupants.
    #[inline]
    pub fn capacity_exempt(&self, access: ZoneAccess) -> bool {
        self.kind == ZoneKind::Restricted && access.clearance
    }
}

//! Airspace graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing links.
//! Given a `HubId h`, its outgoing links occupy the slice:
//!
//! ```text
//! link_to[ hub_out_start[h] .. hub_out_start[h+1] ]
//! ```
//!
//! All link arrays (`link_from`, `link_to`, `link_ticks`, `link_twin`) are
//! sorted by source hub and indexed by `LinkId`.  Iteration over a hub's
//! outgoing links is therefore a contiguous memory scan — ideal for the
//! planner's frontier expansion.
//!
//! # Corridors vs airways
//!
//! A bidirectional *corridor* is stored as two directed links that name each
//! other in `link_twin`; a one-way *airway* has an `INVALID` twin.  The
//! canonical reservation identity of a link is [`Airspace::corridor_of`] —
//! the smaller of the pair — so both directions of a corridor book the same
//! time-space cells and head-on swaps collide.

use std::collections::{HashMap, HashSet};

use sky_core::{FlightPath, GridPoint, HubId, LinkId, ZoneId};

use crate::error::{MapResult, TopologyError, ZoneError};
use crate::zone::{Zone, ZoneKind};

// ── Airspace ──────────────────────────────────────────────────────────────────

/// Immutable directed airspace graph in CSR format, with zone annotations.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`AirspaceBuilder`].
#[derive(Debug)]
pub struct Airspace {
    // ── Hub data (indexed by HubId) ───────────────────────────────────────
    /// Display name of each hub.  Unique; free of `-` and whitespace.
    pub hub_name: Vec<String>,

    /// Grid position of each hub.  Unique per hub.
    pub hub_pos: Vec<GridPoint>,

    /// Base traversal cost per tick of standing at the hub.  At least 1.
    pub hub_cost: Vec<u32>,

    /// Owning zone of each hub, `ZoneId::INVALID` if unzoned.
    pub hub_zone: Vec<ZoneId>,

    // ── CSR link adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing links of hub `h` are at LinkIds
    /// `hub_out_start[h] .. hub_out_start[h+1]`.
    /// Length = `hub_count + 1`.
    pub hub_out_start: Vec<u32>,

    // ── Link data (indexed by LinkId = position in sorted order) ──────────
    /// Source hub of each link.  Redundant with CSR but required for cheap
    /// reverse iteration when building distance fields.
    pub link_from: Vec<HubId>,

    /// Destination hub of each link.
    pub link_to: Vec<HubId>,

    /// Traversal duration in ticks.  At least 1.
    pub link_ticks: Vec<u32>,

    /// The opposite direction of a corridor, `LinkId::INVALID` for airways.
    pub link_twin: Vec<LinkId>,

    // ── Zones (indexed by ZoneId) ─────────────────────────────────────────
    pub zones: Vec<Zone>,

    name_index: HashMap<String, HubId>,
}

impl Airspace {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn hub_count(&self) -> usize {
        self.hub_name.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hub_name.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(link, destination, duration)` for all outgoing links
    /// of `hub`, ascending by destination id.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn neighbors(&self, hub: HubId) -> impl Iterator<Item = (LinkId, HubId, u32)> + '_ {
        let start = self.hub_out_start[hub.index()] as usize;
        let end   = self.hub_out_start[hub.index() + 1] as usize;
        (start..end).map(|i| (LinkId(i as u32), self.link_to[i], self.link_ticks[i]))
    }

    /// Out-degree of `hub` (number of outgoing links).
    #[inline]
    pub fn out_degree(&self, hub: HubId) -> usize {
        let start = self.hub_out_start[hub.index()] as usize;
        let end   = self.hub_out_start[hub.index() + 1] as usize;
        end - start
    }

    /// The unique link from `a` to `b`, if one exists.
    ///
    /// Uniqueness is guaranteed by the builder's duplicate-link rejection.
    pub fn link_between(&self, a: HubId, b: HubId) -> Option<LinkId> {
        self.neighbors(a).find(|&(_, to, _)| to == b).map(|(l, _, _)| l)
    }

    /// Canonical reservation identity of `link`: the smaller id of a
    /// corridor pair, or the link itself for a one-way airway.
    #[inline]
    pub fn corridor_of(&self, link: LinkId) -> LinkId {
        let twin = self.link_twin[link.index()];
        if twin == LinkId::INVALID { link } else { link.min(twin) }
    }

    // ── Zones ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.index()]
    }

    /// The zone owning `hub`, if any.
    #[inline]
    pub fn zone_of(&self, hub: HubId) -> Option<&Zone> {
        let z = self.hub_zone[hub.index()];
        if z == ZoneId::INVALID { None } else { Some(&self.zones[z.index()]) }
    }

    // ── Lookups and metrics ───────────────────────────────────────────────

    pub fn hub_by_name(&self, name: &str) -> Option<HubId> {
        self.name_index.get(name).copied()
    }

    /// Manhattan distance between two hubs' grid positions.
    #[inline]
    pub fn manhattan(&self, a: HubId, b: HubId) -> u64 {
        self.hub_pos[a.index()].manhattan(self.hub_pos[b.index()])
    }

    /// Total base cost of a path: the sum of `hub_cost` over every tick the
    /// drone stands at a hub (airborne ticks contribute nothing).
    pub fn path_cost(&self, path: &FlightPath) -> u64 {
        path.steps()
            .iter()
            .map(|s| self.hub_cost[s.hub.index()] as u64)
            .sum()
    }
}

// ── AirspaceBuilder ───────────────────────────────────────────────────────────

/// Construct an [`Airspace`] incrementally, then call [`build`](Self::build).
///
/// Identity defects (duplicate names, coordinate clashes, self-links,
/// duplicate links, double zone assignment) fail at the offending call;
/// whole-map defects (empty zones) fail at `build()`.  `build()` sorts links
/// by source hub, constructs the CSR arrays, and pairs corridor twins.
///
/// # Example
///
/// ```
/// use sky_core::GridPoint;
/// use sky_map::AirspaceBuilder;
///
/// let mut b = AirspaceBuilder::new();
/// let a = b.add_hub("alpha", GridPoint::new(0, 0))?;
/// let c = b.add_hub("beta",  GridPoint::new(4, 0))?;
/// b.add_corridor(a, c, 1)?;
/// let air = b.build()?;
/// assert_eq!(air.hub_count(), 2);
/// assert_eq!(air.link_count(), 2); // a corridor is two directed links
/// # Ok::<(), sky_map::MapError>(())
/// ```
pub struct AirspaceBuilder {
    names:     Vec<String>,
    positions: Vec<GridPoint>,
    costs:     Vec<u32>,
    hub_zone:  Vec<ZoneId>,
    raw_links: Vec<RawLink>,
    zones:     Vec<Zone>,

    name_index:  HashMap<String, HubId>,
    coord_index: HashMap<(i32, i32), HubId>,
    zone_names:  HashMap<String, ZoneId>,
    /// Unordered hub pairs already linked (corridor or airway).
    used_pairs:  HashSet<(u32, u32)>,
}

struct RawLink {
    from:  HubId,
    to:    HubId,
    ticks: u32,
}

/// `-` splits connection directives and whitespace splits fields, so neither
/// may appear inside a name.
fn name_ok(name: &str) -> bool {
    !name.is_empty() && !name.contains('-') && !name.chars().any(char::is_whitespace)
}

fn pair_key(a: HubId, b: HubId) -> (u32, u32) {
    (a.0.min(b.0), a.0.max(b.0))
}

impl AirspaceBuilder {
    pub fn new() -> Self {
        Self {
            names:       Vec::new(),
            positions:   Vec::new(),
            costs:       Vec::new(),
            hub_zone:    Vec::new(),
            raw_links:   Vec::new(),
            zones:       Vec::new(),
            name_index:  HashMap::new(),
            coord_index: HashMap::new(),
            zone_names:  HashMap::new(),
            used_pairs:  HashSet::new(),
        }
    }

    /// Pre-allocate for the expected number of hubs and links to reduce
    /// reallocations when bulk-loading a scenario.
    pub fn with_capacity(hubs: usize, links: usize) -> Self {
        let mut b = Self::new();
        b.names.reserve(hubs);
        b.positions.reserve(hubs);
        b.costs.reserve(hubs);
        b.hub_zone.reserve(hubs);
        b.raw_links.reserve(links);
        b
    }

    // ── Hubs ──────────────────────────────────────────────────────────────

    /// Add a hub with base cost 1 and return its `HubId` (sequential from 0).
    pub fn add_hub(&mut self, name: &str, pos: GridPoint) -> MapResult<HubId> {
        self.add_hub_with_cost(name, pos, 1)
    }

    /// Add a hub with an explicit base traversal cost (must be at least 1).
    pub fn add_hub_with_cost(&mut self, name: &str, pos: GridPoint, cost: u32) -> MapResult<HubId> {
        if !name_ok(name) {
            return Err(TopologyError::BadHubName(name.to_owned()).into());
        }
        if self.name_index.contains_key(name) {
            return Err(TopologyError::DuplicateHub(name.to_owned()).into());
        }
        if let Some(&other) = self.coord_index.get(&(pos.x, pos.y)) {
            return Err(TopologyError::CoordinateClash {
                first:  self.names[other.index()].clone(),
                second: name.to_owned(),
                at:     pos,
            }
            .into());
        }
        if cost == 0 {
            return Err(TopologyError::ZeroHubCost(name.to_owned()).into());
        }

        let id = HubId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.positions.push(pos);
        self.costs.push(cost);
        self.hub_zone.push(ZoneId::INVALID);
        self.name_index.insert(name.to_owned(), id);
        self.coord_index.insert((pos.x, pos.y), id);
        Ok(id)
    }

    /// Look up a hub added earlier by name (used by the scenario parser to
    /// resolve connection and drone directives).
    pub fn hub_id(&self, name: &str) -> Option<HubId> {
        self.name_index.get(name).copied()
    }

    // ── Links ─────────────────────────────────────────────────────────────

    /// Add a **one-way** airway from `from` to `to`.
    ///
    /// Each unordered hub pair may be linked at most once — declaring both
    /// directions as separate airways would give head-on traffic two
    /// independent reservation identities, defeating swap detection.  Use
    /// [`add_corridor`](Self::add_corridor) for two-way traffic.
    pub fn add_airway(&mut self, from: HubId, to: HubId, ticks: u32) -> MapResult<()> {
        self.check_link(from, to, ticks)?;
        self.used_pairs.insert(pair_key(from, to));
        self.raw_links.push(RawLink { from, to, ticks });
        Ok(())
    }

    /// Add a **bidirectional** corridor between `a` and `b` (two directed
    /// links paired as twins by `build()`).
    pub fn add_corridor(&mut self, a: HubId, b: HubId, ticks: u32) -> MapResult<()> {
        self.check_link(a, b, ticks)?;
        self.used_pairs.insert(pair_key(a, b));
        self.raw_links.push(RawLink { from: a, to: b, ticks });
        self.raw_links.push(RawLink { from: b, to: a, ticks });
        Ok(())
    }

    fn check_link(&self, a: HubId, b: HubId, ticks: u32) -> MapResult<()> {
        for hub in [a, b] {
            if hub.index() >= self.names.len() {
                return Err(TopologyError::UnknownHub(hub).into());
            }
        }
        if a == b {
            return Err(TopologyError::SelfLink(a).into());
        }
        if self.used_pairs.contains(&pair_key(a, b)) {
            return Err(TopologyError::DuplicateLink(a, b).into());
        }
        if ticks == 0 {
            return Err(TopologyError::ZeroDuration(a, b).into());
        }
        Ok(())
    }

    // ── Zones ─────────────────────────────────────────────────────────────

    /// Declare a zone and return its `ZoneId` (sequential from 0).
    ///
    /// Non-Restricted zones need capacity ≥ 1; Restricted zones normally
    /// declare 0 (clearance holders bypass the count anyway).
    pub fn add_zone(&mut self, name: &str, kind: ZoneKind, capacity: u32) -> MapResult<ZoneId> {
        if !name_ok(name) {
            return Err(ZoneError::BadZoneName(name.to_owned()).into());
        }
        if self.zone_names.contains_key(name) {
            return Err(ZoneError::DuplicateZone(name.to_owned()).into());
        }
        if kind != ZoneKind::Restricted && capacity == 0 {
            return Err(ZoneError::ZeroCapacity(name.to_owned()).into());
        }

        let id = ZoneId(self.zones.len() as u16);
        self.zones.push(Zone {
            id,
            name: name.to_owned(),
            kind,
            capacity,
            members: Vec::new(),
        });
        self.zone_names.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Look up a zone declared earlier by name.
    pub fn zone_id(&self, name: &str) -> Option<ZoneId> {
        self.zone_names.get(name).copied()
    }

    /// Place `hub` inside `zone`.  A hub belongs to at most one zone.
    pub fn assign_zone(&mut self, hub: HubId, zone: ZoneId) -> MapResult<()> {
        if hub.index() >= self.names.len() {
            return Err(TopologyError::UnknownHub(hub).into());
        }
        if zone.index() >= self.zones.len() {
            return Err(ZoneError::UnknownZone(zone).into());
        }
        let current = self.hub_zone[hub.index()];
        if current != ZoneId::INVALID {
            return Err(ZoneError::HubInTwoZones { hub, first: current, second: zone }.into());
        }
        self.hub_zone[hub.index()] = zone;
        self.zones[zone.index()].members.push(hub);
        Ok(())
    }

    pub fn hub_count(&self) -> usize {
        self.names.len()
    }

    pub fn link_count(&self) -> usize {
        self.raw_links.len()
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Consume the builder and produce an [`Airspace`].
    ///
    /// Validates whole-map invariants (every zone has members), then sorts
    /// links by `(from, to)` for CSR construction and pairs corridor twins.
    /// Time complexity: O(E log E) for the link sort.
    pub fn build(self) -> MapResult<Airspace> {
        for zone in &self.zones {
            if zone.members.is_empty() {
                return Err(ZoneError::EmptyZone(zone.name.clone()).into());
            }
        }

        let hub_count  = self.names.len();
        let link_count = self.raw_links.len();

        // Sort links by (source, destination) so neighbor iteration is
        // ascending by destination — the planner's tie-break relies on it.
        let mut raw = self.raw_links;
        raw.sort_unstable_by_key(|l| (l.from.0, l.to.0));

        let link_from:  Vec<HubId> = raw.iter().map(|l| l.from).collect();
        let link_to:    Vec<HubId> = raw.iter().map(|l| l.to).collect();
        let link_ticks: Vec<u32>   = raw.iter().map(|l| l.ticks).collect();

        // Build CSR row pointer (hub_out_start).
        let mut hub_out_start = vec![0u32; hub_count + 1];
        for l in &raw {
            hub_out_start[l.from.index() + 1] += 1;
        }
        for i in 1..=hub_count {
            hub_out_start[i] += hub_out_start[i - 1];
        }
        debug_assert_eq!(hub_out_start[hub_count] as usize, link_count);

        // Pair corridor twins: a link's twin is the link with reversed
        // endpoints, which exists exactly when the pair came from
        // `add_corridor` (airways reject the reverse direction up front).
        let position: HashMap<(u32, u32), u32> = link_from
            .iter()
            .zip(&link_to)
            .enumerate()
            .map(|(i, (f, t))| ((f.0, t.0), i as u32))
            .collect();
        let link_twin: Vec<LinkId> = link_from
            .iter()
            .zip(&link_to)
            .map(|(f, t)| {
                position
                    .get(&(t.0, f.0))
                    .map_or(LinkId::INVALID, |&i| LinkId(i))
            })
            .collect();

        let mut zones = self.zones;
        for zone in &mut zones {
            zone.members.sort_unstable();
        }

        Ok(Airspace {
            hub_name: self.names,
            hub_pos:  self.positions,
            hub_cost: self.costs,
            hub_zone: self.hub_zone,
            hub_out_start,
            link_from,
            link_to,
            link_ticks,
            link_twin,
            zones,
            name_index: self.name_index,
        })
    }
}

impl Default for AirspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Scenario file parser.
//!
//! # Format
//!
//! Line-oriented text.  `#` starts a comment (whole-line or trailing), blank
//! lines are skipped.  A directive is `key: value` with an optional trailing
//! `[attr ...]` block, where each attribute is `k=v` or a bare flag:
//!
//! ```text
//! # twin-pad fly-in
//! zone: apron [capacity=2]
//! zone: tower [kind=restricted]
//!
//! hub: padA 0 0 [zone=apron]
//! hub: padB 0 2 [zone=apron]
//! hub: mid  1 1 [cost=2]
//! hub: gate 2 1 [zone=tower]
//!
//! connection: padA-mid
//! connection: padB-mid [ticks=2]
//! connection: mid-gate [oneway]
//!
//! drone: D1 padA gate [priority=2 clearance]
//! drone: D2 padB gate
//! ```
//!
//! | Directive     | Shape                    | Attributes                                      |
//! |---------------|--------------------------|-------------------------------------------------|
//! | `zone:`       | `zone: NAME`             | `kind=normal/priority/restricted`, `capacity=N` |
//! | `hub:`        | `hub: NAME X Y`          | `zone=NAME`, `cost=N`                           |
//! | `connection:` | `connection: A-B`        | `ticks=N`, `oneway`                             |
//! | `drone:`      | `drone: NAME START GOAL` | `priority=N`, `clearance`                       |
//!
//! Omitted attributes default to the model defaults: kind `normal`,
//! capacity 1 (0 for restricted zones), cost 1, ticks 1, two-way,
//! priority 0, no clearance.
//!
//! Loading is single-pass: a directive may only reference names declared
//! above it.  Drones receive ids in file order, so the fleet feeds straight
//! into the scheduler.  Names may not contain `-` or whitespace — the
//! grammar splits on both.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use sky_core::{Drone, DroneId, GridPoint, HubId};
use sky_map::{Airspace, AirspaceBuilder, MapResult, ZoneKind};

use crate::error::{ScenarioError, ScenarioResult};

// ── Scenario ──────────────────────────────────────────────────────────────────

/// A fully resolved scenario: the airspace plus the fleet flying in it.
///
/// Drone ids are contiguous from 0 in declaration order, ready for
/// the scheduler's roster validation.
#[derive(Debug)]
pub struct Scenario {
    pub airspace: Airspace,
    pub fleet:    Vec<Drone>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a scenario from a file on disk.
pub fn load_scenario_file(path: &Path) -> ScenarioResult<Scenario> {
    let text = std::fs::read_to_string(path)?;
    load_scenario_str(&text)
}

/// Like [`load_scenario_file`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_scenario_reader<R: Read>(mut reader: R) -> ScenarioResult<Scenario> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    load_scenario_str(&text)
}

/// Parse a scenario from in-memory text.
pub fn load_scenario_str(text: &str) -> ScenarioResult<Scenario> {
    let mut bld = AirspaceBuilder::new();
    let mut fleet: Vec<Drone> = Vec::new();
    let mut drone_names: HashSet<String> = HashSet::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;

        // Trailing comment first, then surrounding whitespace.
        let stmt = match raw.split_once('#') {
            Some((before, _)) => before,
            None => raw,
        }
        .trim();
        if stmt.is_empty() {
            continue;
        }

        let (directive, rest) = stmt
            .split_once(':')
            .ok_or_else(|| parse_err(line, "expected a 'directive: ...' line"))?;
        let (main, attrs) = split_attrs(line, rest)?;
        let fields: Vec<&str> = main.split_whitespace().collect();

        match directive.trim() {
            "zone" => parse_zone(&mut bld, line, &fields, &attrs)?,
            "hub" => parse_hub(&mut bld, line, &fields, &attrs)?,
            "connection" => parse_connection(&mut bld, line, main, &attrs)?,
            "drone" => {
                let slot = fleet.len();
                fleet.push(parse_drone(&bld, line, &fields, &attrs, slot, &mut drone_names)?);
            }
            other => return Err(parse_err(line, format!("unknown directive '{other}'"))),
        }
    }

    let airspace = bld.build()?;
    Ok(Scenario { airspace, fleet })
}

// ── Directive parsers ─────────────────────────────────────────────────────────

fn parse_zone(
    bld: &mut AirspaceBuilder,
    line: usize,
    fields: &[&str],
    attrs: &[Attr<'_>],
) -> ScenarioResult<()> {
    let name = match fields {
        [name] => *name,
        _ => return Err(parse_err(line, "zone takes 'zone: NAME'")),
    };

    let mut kind = ZoneKind::Normal;
    let mut capacity = None;
    for attr in attrs {
        match attr.key {
            "kind" => {
                let v = attr.value(line)?;
                kind = ZoneKind::parse(v)
                    .ok_or_else(|| parse_err(line, format!("unknown zone kind {v:?}")))?;
            }
            "capacity" => capacity = Some(parse_num::<u32>(line, "capacity", attr.value(line)?)?),
            other => return Err(parse_err(line, format!("unknown zone attribute '{other}'"))),
        }
    }

    // Restricted zones default to capacity 0: nobody in without clearance.
    let capacity = capacity.unwrap_or(if kind == ZoneKind::Restricted { 0 } else { 1 });
    at_line(line, bld.add_zone(name, kind, capacity))?;
    Ok(())
}

fn parse_hub(
    bld: &mut AirspaceBuilder,
    line: usize,
    fields: &[&str],
    attrs: &[Attr<'_>],
) -> ScenarioResult<()> {
    let (name, x, y) = match fields {
        [name, x, y] => (
            *name,
            parse_num::<i32>(line, "x coordinate", x)?,
            parse_num::<i32>(line, "y coordinate", y)?,
        ),
        _ => return Err(parse_err(line, "hub takes 'hub: NAME X Y'")),
    };

    let mut zone = None;
    let mut cost = None;
    for attr in attrs {
        match attr.key {
            "zone" => {
                let v = attr.value(line)?;
                zone = Some(
                    bld.zone_id(v)
                        .ok_or_else(|| parse_err(line, format!("unknown zone {v:?}")))?,
                );
            }
            "cost" => cost = Some(parse_num::<u32>(line, "cost", attr.value(line)?)?),
            other => return Err(parse_err(line, format!("unknown hub attribute '{other}'"))),
        }
    }

    let hub = match cost {
        None => at_line(line, bld.add_hub(name, GridPoint::new(x, y)))?,
        Some(c) => at_line(line, bld.add_hub_with_cost(name, GridPoint::new(x, y), c))?,
    };
    if let Some(zone) = zone {
        at_line(line, bld.assign_zone(hub, zone))?;
    }
    Ok(())
}

fn parse_connection(
    bld: &mut AirspaceBuilder,
    line: usize,
    main: &str,
    attrs: &[Attr<'_>],
) -> ScenarioResult<()> {
    let (from, to) = main
        .split_once('-')
        .ok_or_else(|| parse_err(line, "connection takes 'connection: A-B'"))?;
    let a = resolve_hub(bld, line, from.trim())?;
    let b = resolve_hub(bld, line, to.trim())?;

    let mut ticks = 1;
    let mut oneway = false;
    for attr in attrs {
        match attr.key {
            "ticks" => ticks = parse_num::<u32>(line, "ticks", attr.value(line)?)?,
            "oneway" => {
                attr.flag(line)?;
                oneway = true;
            }
            other => {
                return Err(parse_err(line, format!("unknown connection attribute '{other}'")));
            }
        }
    }

    let added = if oneway { bld.add_airway(a, b, ticks) } else { bld.add_corridor(a, b, ticks) };
    at_line(line, added)
}

fn parse_drone(
    bld: &AirspaceBuilder,
    line: usize,
    fields: &[&str],
    attrs: &[Attr<'_>],
    slot: usize,
    names: &mut HashSet<String>,
) -> ScenarioResult<Drone> {
    let (name, start, goal) = match fields {
        [name, start, goal] => (*name, *start, *goal),
        _ => return Err(parse_err(line, "drone takes 'drone: NAME START GOAL'")),
    };
    if name.contains('-') {
        return Err(parse_err(line, format!("drone name {name:?} may not contain '-'")));
    }
    if !names.insert(name.to_string()) {
        return Err(parse_err(line, format!("duplicate drone name {name:?}")));
    }
    let start = resolve_hub(bld, line, start)?;
    let goal = resolve_hub(bld, line, goal)?;

    let mut drone = Drone::new(DroneId(slot as u32), name, start, goal);
    for attr in attrs {
        match attr.key {
            "priority" => {
                drone = drone.with_priority(parse_num::<u32>(line, "priority", attr.value(line)?)?);
            }
            "clearance" => {
                attr.flag(line)?;
                drone = drone.with_clearance();
            }
            other => return Err(parse_err(line, format!("unknown drone attribute '{other}'"))),
        }
    }
    Ok(drone)
}

// ── Attribute blocks ──────────────────────────────────────────────────────────

/// One `k=v` or bare-flag token from a `[...]` block.
struct Attr<'a> {
    key:   &'a str,
    value: Option<&'a str>,
}

impl<'a> Attr<'a> {
    fn value(&self, line: usize) -> ScenarioResult<&'a str> {
        self.value
            .ok_or_else(|| parse_err(line, format!("attribute '{}' needs a value", self.key)))
    }

    fn flag(&self, line: usize) -> ScenarioResult<()> {
        match self.value {
            None => Ok(()),
            Some(_) => Err(parse_err(line, format!("attribute '{}' takes no value", self.key))),
        }
    }
}

/// Split `MAIN [attr ...]` into the main text and its attribute tokens.
fn split_attrs<'a>(line: usize, data: &'a str) -> ScenarioResult<(&'a str, Vec<Attr<'a>>)> {
    let (main, meta) = match data.split_once('[') {
        None => (data, None),
        Some((main, rest)) => match rest.split_once(']') {
            Some((meta, tail)) if tail.trim().is_empty() => (main, Some(meta)),
            _ => return Err(parse_err(line, "unterminated '[...]' attribute block")),
        },
    };

    let mut attrs = Vec::new();
    if let Some(meta) = meta {
        for token in meta.split_whitespace() {
            let attr = match token.split_once('=') {
                Some((k, v)) => Attr { key: k, value: Some(v) },
                None => Attr { key: token, value: None },
            };
            attrs.push(attr);
        }
    }
    Ok((main.trim(), attrs))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn resolve_hub(bld: &AirspaceBuilder, line: usize, name: &str) -> ScenarioResult<HubId> {
    bld.hub_id(name)
        .ok_or_else(|| parse_err(line, format!("unknown hub {name:?}")))
}

fn parse_num<T: std::str::FromStr>(line: usize, what: &str, s: &str) -> ScenarioResult<T> {
    s.parse()
        .map_err(|_| parse_err(line, format!("invalid {what} {s:?}: expected a number")))
}

fn parse_err(line: usize, msg: impl Into<String>) -> ScenarioError {
    ScenarioError::Parse { line, msg: msg.into() }
}

fn at_line<T>(line: usize, res: MapResult<T>) -> ScenarioResult<T> {
    res.map_err(|source| ScenarioError::Map { line, source })
}

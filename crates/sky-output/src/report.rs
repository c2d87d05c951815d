//! Plain-text run report.
//!
//! A terminal-friendly digest of one finished plan: a tick-by-tick movement
//! log, the drones that never made the timetable, and a performance block
//! carrying the same totals as the run-summary row.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use sky_sched::PlanOutcome;

use crate::row::{drone_name, run_summary};

/// Render `outcome` as text.
///
/// One log line per tick listing every `name->hub` move landing on that
/// tick; waits are silent, so a drone holding position simply skips a line.
pub fn render_report(outcome: &PlanOutcome) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, outcome);
    out
}

fn write_report(out: &mut String, outcome: &PlanOutcome) -> fmt::Result {
    // Moves keyed by arrival tick, in drone order within each tick.
    let mut moves: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    for (id, path) in outcome.schedule.iter() {
        let name = drone_name(&outcome.fleet, id);
        for pair in path.steps().windows(2) {
            if pair[0].hub != pair[1].hub {
                let hub = &outcome.map.hub_name[pair[1].hub.index()];
                moves
                    .entry(pair[1].arrive.0)
                    .or_default()
                    .push(format!("{name}->{hub}"));
            }
        }
    }

    writeln!(out, "--- flight log ---")?;
    for (tick, movers) in &moves {
        writeln!(out, "T{tick}: {}", movers.join(" "))?;
    }

    if !outcome.unschedulable.is_empty() {
        writeln!(out, "--- unscheduled ---")?;
        for entry in &outcome.unschedulable {
            let name = drone_name(&outcome.fleet, entry.drone);
            writeln!(out, "{name}: {}", entry.reason)?;
        }
    }

    let summary = run_summary(outcome);
    let total_flight_ticks: u64 = outcome.schedule.iter().map(|(_, p)| p.arrival().0).sum();
    let avg_ticks = if summary.scheduled == 0 {
        0.0
    } else {
        total_flight_ticks as f64 / summary.scheduled as f64
    };

    writeln!(out, "--- performance ---")?;
    writeln!(out, "total ticks          : {}", summary.makespan)?;
    writeln!(out, "moves per tick       : {:.2}", summary.moves_per_tick)?;
    writeln!(out, "avg ticks per flight : {avg_ticks:.2}")?;
    writeln!(out, "total path cost      : {}", summary.total_path_cost)?;
    Ok(())
}

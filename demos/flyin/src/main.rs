//! flyin — six-courier demo for the skyway planning engine.
//!
//! Plans a small downtown fly-in: six couriers launch from two aprons,
//! funnel through a shared core hub, and deliver to two pads and a
//! restricted tower.  One courier has no clearance for its goal and ends
//! the run unscheduled.  Swap the embedded scenario for a real file to
//! plan at city scale.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use sky_core::{DroneId, FlightPath};
use sky_output::{flight_rows, render_report, write_outcome, CsvWriter};
use sky_scenario::load_scenario_str;
use sky_sched::{SchedObserver, SchedulerBuilder};

// ── Scenario ──────────────────────────────────────────────────────────────────

// Two three-pad aprons west, deliveries east, a keep-out tower south of the
// core.  The relayW-relayE bypass is slower but dodges the expensive core.
//
//  pad1 -+                        +- mall
//  pad2 -+- relayW == core - relayE
//  pad3 -+      |       |         +- clinic
//  pad4 -+      |       |
//  pad5 -+- relayS -----+
//  pad6 -+            tower (keep-out)
const SCENARIO: &str = "\
zone: apronN [capacity=3]
zone: apronS [capacity=3]
zone: deliver
zone: keepout [kind=restricted]

hub: pad1 0 0 [zone=apronN]
hub: pad2 0 1 [zone=apronN]
hub: pad3 0 2 [zone=apronN]
hub: pad4 0 3 [zone=apronS]
hub: pad5 0 4 [zone=apronS]
hub: pad6 0 5 [zone=apronS]
hub: relayW 1 1
hub: relayS 1 4
hub: core 2 2 [cost=2]              # dense downtown airspace, dear to hold
hub: relayE 3 2
hub: mall 4 1 [zone=deliver]
hub: clinic 4 3 [zone=deliver]
hub: tower 2 4 [zone=keepout]

connection: pad1-relayW
connection: pad2-relayW
connection: pad3-relayW
connection: pad4-relayS
connection: pad5-relayS
connection: pad6-relayS
connection: relayW-core
connection: relayS-core
connection: core-relayE
connection: relayW-relayE [ticks=2]  # high bypass over the core
connection: relayE-mall
connection: relayE-clinic
connection: core-tower

drone: medic pad1 tower [priority=9 clearance]
drone: express pad2 mall [priority=5]
drone: parcelA pad3 clinic [priority=2]
drone: parcelB pad4 mall [priority=2]
drone: surveyor pad5 tower
drone: scout pad6 clinic [priority=1]
";

// ── Pass logger ───────────────────────────────────────────────────────────────

struct PassLog;

impl SchedObserver for PassLog {
    fn on_plan_success(&mut self, drone: DroneId, path: &FlightPath, attempt: u32) {
        println!(
            "    drone {} committed, arrives T{} (attempt {attempt})",
            drone.0,
            path.arrival().0
        );
    }

    fn on_pass_end(&mut self, pass: u32, committed: usize) {
        println!("  pass {pass}: {committed} flights committed");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== flyin — skyway planning demo ===");
    println!();

    // 1. Parse the embedded scenario.
    let scenario = load_scenario_str(SCENARIO)?;
    println!(
        "Airspace: {} hubs, {} links, {} zones  |  Fleet: {} couriers",
        scenario.airspace.hub_count(),
        scenario.airspace.link_count(),
        scenario.airspace.zone_count(),
        scenario.fleet.len()
    );
    println!();

    // 2. Plan the fly-in.
    let scheduler = SchedulerBuilder::new(scenario.airspace, scenario.fleet).build()?;
    let t0 = Instant::now();
    let outcome = scheduler.run(&mut PassLog)?;
    let elapsed = t0.elapsed();
    println!();

    // 3. Tick-by-tick report.
    print!("{}", render_report(&outcome));
    println!();

    // 4. CSV + JSON dump.
    std::fs::create_dir_all("output/flyin")?;
    let mut writer = CsvWriter::new(Path::new("output/flyin"))?;
    write_outcome(&mut writer, &outcome)?;

    let flights_json: Vec<_> = outcome
        .schedule
        .iter()
        .map(|(id, path)| {
            let steps: Vec<_> = path
                .steps()
                .iter()
                .map(|s| serde_json::json!({ "hub": s.hub.0, "tick": s.arrive.0 }))
                .collect();
            serde_json::json!({ "drone": outcome.fleet[id.index()].name, "steps": steps })
        })
        .collect();
    std::fs::write(
        "output/flyin/schedule.json",
        serde_json::to_string_pretty(&flights_json)?,
    )?;
    println!("Wrote output/flyin/{{positions,flights,run_summary}}.csv and schedule.json");
    println!();

    // 5. Flight table.
    println!("{:<10} {:<8} {:<5} {:<6} {:<5}", "Courier", "Arrival", "Hops", "Waits", "Cost");
    println!("{}", "-".repeat(38));
    for row in flight_rows(&outcome) {
        println!(
            "{:<10} T{:<7} {:<5} {:<6} {:<5}",
            row.name, row.arrival, row.hops, row.waits, row.path_cost
        );
    }
    println!();
    println!("Planned in {:.3} ms", elapsed.as_secs_f64() * 1e3);

    Ok(())
}

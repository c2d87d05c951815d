//! Scheduling observer trait for progress reporting and data collection.

use sky_core::{DroneId, FlightPath, Tick};
use sky_plan::PlanError;

use crate::schedule::UnschedulableReason;

/// Callbacks invoked by [`Scheduler::run`][crate::Scheduler::run] at key
/// points of a run.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — pass printer
///
/// ```rust,ignore
/// struct PassPrinter;
///
/// impl SchedObserver for PassPrinter {
///     fn on_pass_end(&mut self, pass: u32, committed: usize) {
///         println!("pass {pass}: committed {committed} flights");
///     }
/// }
/// ```
pub trait SchedObserver {
    /// Called before each planning pass over the pending drones.
    fn on_pass_start(&mut self, _pass: u32) {}

    /// Called when a drone's path is found and committed.
    ///
    /// `attempt` is 1-based: 1 means the first planner invocation succeeded.
    fn on_plan_success(&mut self, _drone: DroneId, _path: &FlightPath, _attempt: u32) {}

    /// Called when a planner invocation fails.  `horizon` is the search
    /// bound that was in effect.
    fn on_plan_failure(&mut self, _drone: DroneId, _err: &PlanError, _attempt: u32, _horizon: Tick) {}

    /// Called when a drone is declared unschedulable (terminal).
    fn on_unschedulable(&mut self, _drone: DroneId, _reason: &UnschedulableReason) {}

    /// Called after each pass with the number of flights committed in it.
    fn on_pass_end(&mut self, _pass: u32, _committed: usize) {}

    /// Called once when every drone has reached a terminal state.
    fn on_run_end(&mut self, _committed: usize, _unschedulable: usize, _makespan: Tick) {}
}

/// A [`SchedObserver`] that does nothing.  Use when you need to call `run`
/// but don't want progress callbacks.
pub struct NoopObserver;

impl SchedObserver for NoopObserver {}

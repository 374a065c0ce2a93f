//! Event-driven gate-level logic and stuck-at fault simulator.
//!
//! This crate takes a levelized netlist from `levsim_netlist` and simulates
//! it cycle by cycle with four-valued logic. Gates are scheduled on an event
//! wheel and only re-evaluated when a fan-in changes.
//!
//! # Architecture
//!
//! A [`Circuit`] owns every gate in an arena indexed by [`GateId`], with
//! fan-in and fan-out stored as ID lists. A [`Simulator`] pairs a circuit
//! with an [`EventWheel`]:
//!
//! - [`LevelWheel`] evaluates in level order, each gate at most once per
//!   pass. Logic and fault simulation use it.
//! - [`DelayWheel`] schedules each evaluation `delay` time units ahead and
//!   reports when the last one happened.
//!
//! Fault simulation runs up to 64 stuck-at faults at a time through
//! per-gate fault slots, after the good values of each cycle have settled.
//! Faulty values a flip-flop would latch are carried into the next cycle.
//!
//! # Usage
//!
//! ```ignore
//! use levsim_sim::{simulate, Circuit, SimConfig};
//!
//! let circuit = Circuit::from_files(&files)?;
//! let summary = simulate(circuit, &SimConfig::default(), vectors, |report| {
//!     println!("{}", report.outputs);
//!     Ok(())
//! })?;
//! ```
//!
//! # Modules
//!
//! - `error`: simulation error types
//! - `gate`: gate evaluation, toggles, GIC bitmaps and fault slots
//! - `fault`: the stuck-at fault record
//! - `circuit`: the gate arena and fault injection
//! - `wheel`: the level and delay event wheels
//! - `coverage`: coverage ratios and flip-flop groups
//! - `simulator`: the cycle driver

#![warn(missing_docs)]

pub mod circuit;
pub mod coverage;
pub mod error;
pub mod fault;
pub mod gate;
pub mod simulator;
pub mod wheel;

use levsim_common::Logic;
use levsim_netlist::NetlistError;

pub use circuit::{Circuit, MAX_GIC_INPUTS};
pub use coverage::{CoverageRatio, CoverageSummary, FlopGroup};
pub use error::SimError;
pub use fault::{Fault, NUM_FAULT_INJECT};
pub use gate::{FaultSlot, Gate};
pub use levsim_netlist::{FaultId, GateId};
pub use simulator::{CycleReport, Simulator};
pub use wheel::{DelayWheel, EventWheel, LevelWheel};

/// Flip-flops per state-coverage group unless configured otherwise.
pub const DEFAULT_FLOP_GROUP_SIZE: usize = 5;

/// Which simulation to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimMode {
    /// Zero-delay good-machine simulation.
    #[default]
    Logic,
    /// Good-machine simulation on the delay wheel.
    Delay,
    /// Good-machine plus stuck-at fault simulation.
    Fault,
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// The simulation to run.
    pub mode: SimMode,
    /// Collect gate input combination coverage.
    pub gic: bool,
    /// Collect toggle coverage.
    pub toggle: bool,
    /// Count any arrival at 0 or 1 as a toggle, not only true transitions.
    pub relaxed_toggle: bool,
    /// Flip-flops per state-coverage group.
    pub flop_group_size: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: SimMode::default(),
            gic: false,
            toggle: false,
            relaxed_toggle: false,
            flop_group_size: DEFAULT_FLOP_GROUP_SIZE,
        }
    }
}

/// High-level entry point: runs a circuit over a stream of input vectors.
///
/// Picks the wheel for the configured mode, runs one cycle per vector, and
/// hands each [`CycleReport`] to `on_cycle`. Stops at the first error from
/// the vector stream, the simulator, or the callback.
pub fn simulate<I, F>(
    circuit: Circuit,
    config: &SimConfig,
    vectors: I,
    on_cycle: F,
) -> Result<CoverageSummary, SimError>
where
    I: IntoIterator<Item = Result<Vec<Logic>, NetlistError>>,
    F: FnMut(&CycleReport) -> Result<(), SimError>,
{
    match config.mode {
        SimMode::Delay => run(
            Simulator::with_delay_wheel(circuit, config.clone())?,
            vectors,
            on_cycle,
        ),
        SimMode::Logic | SimMode::Fault => run(
            Simulator::with_level_wheel(circuit, config.clone())?,
            vectors,
            on_cycle,
        ),
    }
}

fn run<W, I, F>(
    mut sim: Simulator<W>,
    vectors: I,
    mut on_cycle: F,
) -> Result<CoverageSummary, SimError>
where
    W: EventWheel,
    I: IntoIterator<Item = Result<Vec<Logic>, NetlistError>>,
    F: FnMut(&CycleReport) -> Result<(), SimError>,
{
    for vector in vectors {
        let report = sim.run_cycle(&vector?)?;
        on_cycle(&report)?;
    }
    let summary = sim.summary();
    tracing::info!(cycles = summary.cycles, "simulation complete");
    Ok(summary)
}

//! The cycle driver: applies vectors, drains the wheel, and runs fault
//! batches.
//!
//! One call to [`Simulator::run_cycle`] is one clock cycle:
//!
//! 1. Clock edge: every flip-flop samples its D value from the previous
//!    cycle, before anything else changes.
//! 2. Drive the primary inputs and schedule them along with every flip-flop.
//!    The very first cycle schedules every gate instead, so constant drivers
//!    settle.
//! 3. Drain the wheel, scheduling the non-flip-flop fan-out of every gate
//!    whose value changed.
//! 4. Record flip-flop state coverage, then in fault mode run the undetected
//!    faults batch by batch against the settled good values.

use crate::circuit::Circuit;
use crate::coverage::{CoverageRatio, CoverageSummary};
use crate::error::SimError;
use crate::wheel::{DelayWheel, EventWheel, LevelWheel};
use crate::{SimConfig, SimMode};
use levsim_common::{Logic, LogicVec};
use levsim_netlist::GateId;

/// What one cycle produced.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// Zero-based cycle number.
    pub cycle: u64,
    /// Primary output values after the good pass.
    pub outputs: LogicVec,
    /// Flip-flop values after the good pass.
    pub state: LogicVec,
    /// Gate evaluations in the good pass.
    pub evaluations: usize,
    /// Time of the last evaluation, for the delay wheel.
    pub settle_time: Option<u64>,
    /// Fault coverage so far, in fault mode.
    pub fault_coverage: Option<CoverageRatio>,
}

/// Counts from one drain of the wheel.
#[derive(Clone, Copy, Debug, Default)]
struct Drained {
    evaluations: usize,
    passes: usize,
    last_time: u64,
}

/// Drives a [`Circuit`] through clock cycles with a chosen [`EventWheel`].
#[derive(Debug)]
pub struct Simulator<W: EventWheel> {
    circuit: Circuit,
    wheel: W,
    config: SimConfig,
    cycle: u64,
}

impl Simulator<LevelWheel> {
    /// Creates a simulator on a zero-delay level wheel.
    pub fn with_level_wheel(circuit: Circuit, config: SimConfig) -> Result<Self, SimError> {
        let wheel = LevelWheel::new(circuit.num_levels() as usize, circuit.num_gates());
        Self::new(circuit, wheel, config)
    }
}

impl Simulator<DelayWheel> {
    /// Creates a simulator on a delay wheel sized to the circuit's largest
    /// gate delay.
    pub fn with_delay_wheel(circuit: Circuit, config: SimConfig) -> Result<Self, SimError> {
        let wheel = DelayWheel::new(circuit.max_delay());
        Self::new(circuit, wheel, config)
    }
}

impl<W: EventWheel> Simulator<W> {
    /// Creates a simulator and configures coverage collection on the circuit.
    ///
    /// Fault simulation needs level-ordered evaluation and is rejected on a
    /// wheel that does not provide it.
    pub fn new(mut circuit: Circuit, wheel: W, config: SimConfig) -> Result<Self, SimError> {
        if config.mode == SimMode::Fault && !W::LEVEL_ORDERED {
            return Err(SimError::FaultModeRequiresLevelWheel);
        }
        circuit.set_relaxed_toggle(config.relaxed_toggle);
        if config.gic {
            circuit.enable_gic(config.flop_group_size);
        }
        Ok(Self {
            circuit,
            wheel,
            config,
            cycle: 0,
        })
    }

    /// Returns the circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Consumes the simulator and returns the circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns the number of cycles run so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Current primary output values.
    pub fn outputs(&self) -> LogicVec {
        self.circuit.output_values()
    }

    /// Current flip-flop values.
    pub fn state(&self) -> LogicVec {
        self.circuit.state_values()
    }

    /// Runs one clock cycle with the given input vector.
    ///
    /// The vector must hold exactly one value per primary input, in netlist
    /// order.
    pub fn run_cycle(&mut self, vector: &[Logic]) -> Result<CycleReport, SimError> {
        let expected = self.circuit.inputs().len();
        if vector.len() != expected {
            return Err(SimError::VectorLength {
                cycle: self.cycle,
                expected,
                found: vector.len(),
            });
        }

        self.wheel.reset_time();
        self.circuit.latch_state();
        for (index, &value) in vector.iter().enumerate() {
            if let Some(id) = self.circuit.set_input(index, value) {
                self.wheel.insert(id, self.circuit.gate(id));
            }
        }
        if self.cycle == 0 {
            for (id, gate) in self.circuit.gates() {
                self.wheel.insert(id, gate);
            }
        } else {
            for &id in self.circuit.state_vars() {
                self.wheel.insert(id, self.circuit.gate(id));
            }
        }

        let good = self.drain(false);
        self.circuit.record_state_coverage();

        let fault_coverage = if self.config.mode == SimMode::Fault {
            self.run_fault_batches();
            Some(self.circuit.fault_coverage())
        } else {
            None
        };

        let report = CycleReport {
            cycle: self.cycle,
            outputs: self.circuit.output_values(),
            state: self.circuit.state_values(),
            evaluations: good.evaluations,
            settle_time: (!W::LEVEL_ORDERED).then_some(good.last_time),
            fault_coverage,
        };
        tracing::debug!(
            cycle = self.cycle,
            evaluations = good.evaluations,
            passes = good.passes,
            outputs = %report.outputs,
            "cycle complete"
        );
        self.cycle += 1;
        Ok(report)
    }

    /// Runs every undetected fault against the settled good values.
    fn run_fault_batches(&mut self) {
        self.circuit.reset_injection();
        let mut batch = 0usize;
        loop {
            let seeded = self.circuit.inject_faults();
            if seeded.is_empty() {
                break;
            }
            for id in seeded {
                self.wheel.insert(id, self.circuit.gate(id));
            }
            let drained = self.drain(true);
            self.circuit.capture_state_faults();
            self.circuit.invalidate_fault_slots();
            tracing::debug!(
                cycle = self.cycle,
                batch,
                evaluations = drained.evaluations,
                "fault batch complete"
            );
            batch += 1;
        }
    }

    /// Evaluates scheduled gates until the wheel is empty.
    fn drain(&mut self, faulty: bool) -> Drained {
        let mut drained = Drained::default();
        loop {
            while let Some(id) = self.wheel.next() {
                drained.evaluations += 1;
                drained.last_time = self.wheel.time();
                let changed = if faulty {
                    self.circuit.fault_evaluate(id)
                } else {
                    self.circuit.evaluate(id)
                };
                if changed {
                    self.schedule_fanout(id);
                }
                self.circuit.reset_dirty(id);
            }
            drained.passes += 1;
            if self.wheel.is_empty() {
                break;
            }
        }
        tracing::trace!(
            faulty,
            evaluations = drained.evaluations,
            passes = drained.passes,
            "wheel drained"
        );
        drained
    }

    /// Flip-flop fan-out is left for the next cycle.
    fn schedule_fanout(&mut self, id: GateId) {
        for &f in self.circuit.gate(id).fanout() {
            let fanout = self.circuit.gate(f);
            if !fanout.kind().is_state() {
                self.wheel.insert(f, fanout);
            }
        }
    }

    /// Returns detected over total faults.
    pub fn fault_coverage(&self) -> CoverageRatio {
        self.circuit.fault_coverage()
    }

    /// Returns input-combination coverage, when enabled.
    pub fn gic_coverage(&self) -> Option<CoverageRatio> {
        self.circuit.gic_coverage()
    }

    /// Returns toggle coverage.
    pub fn toggle_coverage(&self) -> CoverageRatio {
        self.circuit.toggle_coverage()
    }

    /// Collects the coverage figures the configuration asked for.
    pub fn summary(&self) -> CoverageSummary {
        CoverageSummary {
            cycles: self.cycle,
            fault: (self.config.mode == SimMode::Fault).then(|| self.circuit.fault_coverage()),
            gic: self.circuit.gic_coverage(),
            toggle: self.config.toggle.then(|| self.circuit.toggle_coverage()),
        }
    }
}

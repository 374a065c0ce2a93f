//! Conformance test helpers for the levsim simulator.
//!
//! Provides reference circuits in `.lev` text form and functions that push
//! netlist, fault-list and vector text through the whole pipeline (parse,
//! build, simulate) and return the per-cycle results for assertion in
//! integration tests.

#![warn(missing_docs)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use levsim_netlist::{circuit_path, parse_dly, parse_eqf, parse_lev, parse_vector};
use levsim_sim::{
    Circuit, CoverageSummary, CycleReport, EventWheel, SimConfig, SimError, SimMode, Simulator,
};

/// ISCAS-85 c17: five inputs, six NAND gates, two outputs.
///
/// Inputs in order are G1, G2, G3, G6, G7; outputs are G22, G23.
pub const C17: &str = "\
14
c17
1 1 0 0
2 1 0 0
3 1 0 0
4 1 0 0
5 1 0 0
6 7 5 2 1 3
7 7 5 2 3 4
8 7 10 2 2 7
9 7 10 2 7 5
10 7 15 2 6 8
11 7 15 2 8 9
12 2 20 1 10
13 2 20 1 11
";

/// A one-bit toggle register with synchronous active-low reset.
///
/// Inputs are `en`, `rst_n`; the flip-flop's D is `(q ^ en) & rst_n` and the
/// single output shows `q`.
pub const TOGGLE: &str = "\
7
toggle
1 1 0 0
2 1 0 0
3 5 0 1 5
4 3 5 2 3 1
5 6 10 2 4 2
6 2 5 1 3
";

/// A two-stage shift register: `in -> q1 -> q2 -> out`.
///
/// Both flip-flops sit at level 0, the first fed straight from the input and
/// the second from the first. Only `q2` is observable.
pub const SHIFT: &str = "\
5
shift
1 1 0 0
2 5 0 1 1
3 5 0 1 2
4 2 5 1 3
";

/// Constant drivers feeding a multiplexer and a tri-state buffer.
///
/// Input `sel` picks TIE0 or TIE1 on the multiplexer. The tri-state buffer
/// drives TIE1 while `sel` is 0 and floats while it is 1; its output is
/// ANDed with `sel`. Outputs are the multiplexer, the buffer, and the AND.
pub const CONSTANTS: &str = "\
10
constants
1 1 0 0
2 13 0 0
3 12 0 0
4 16 5 3 1 2 3
5 21 5 2 3 1
6 2 10 1 4
7 2 10 1 5
8 6 10 2 5 1
9 2 15 1 8
";

/// Everything one run produced.
#[derive(Debug)]
pub struct RunResult {
    /// One report per simulated vector.
    pub reports: Vec<CycleReport>,
    /// End-of-run coverage.
    pub summary: CoverageSummary,
    /// The circuit after the last cycle, for inspecting faults and gates.
    pub circuit: Circuit,
}

impl RunResult {
    /// Primary-output strings, one per cycle.
    pub fn outputs(&self) -> Vec<String> {
        self.reports.iter().map(|r| r.outputs.to_string()).collect()
    }

    /// Flip-flop state strings, one per cycle.
    pub fn states(&self) -> Vec<String> {
        self.reports.iter().map(|r| r.state.to_string()).collect()
    }

    /// Covered fault counts, one per cycle. Empty outside fault mode.
    pub fn detected(&self) -> Vec<u64> {
        self.reports
            .iter()
            .filter_map(|r| r.fault_coverage)
            .map(|c| c.covered)
            .collect()
    }
}

/// Builds a circuit from netlist, optional delay table, and fault list text.
pub fn build_circuit(lev: &str, dly: Option<&str>, eqf: &str) -> Result<Circuit, SimError> {
    let netlist = parse_lev(lev)?;
    let delays = dly.map(parse_dly).transpose()?;
    let faults = parse_eqf(eqf)?;
    Circuit::build(&netlist, delays.as_ref(), &faults)
}

/// Simulates `vectors` (one `0`/`1`/`x` string per cycle) with the wheel the
/// configured mode calls for.
pub fn run_vectors(
    circuit: Circuit,
    config: SimConfig,
    vectors: &[&str],
) -> Result<RunResult, SimError> {
    match config.mode {
        SimMode::Delay => drive(Simulator::with_delay_wheel(circuit, config)?, vectors),
        SimMode::Logic | SimMode::Fault => {
            drive(Simulator::with_level_wheel(circuit, config)?, vectors)
        }
    }
}

fn drive<W: EventWheel>(mut sim: Simulator<W>, vectors: &[&str]) -> Result<RunResult, SimError> {
    let mut reports = Vec::with_capacity(vectors.len());
    for (i, line) in vectors.iter().enumerate() {
        let vector = parse_vector(line, i + 1)?;
        reports.push(sim.run_cycle(&vector)?);
    }
    let summary = sim.summary();
    Ok(RunResult {
        reports,
        summary,
        circuit: sim.into_circuit(),
    })
}

/// A configuration for `mode` with every other setting at its default.
pub fn config(mode: SimMode) -> SimConfig {
    SimConfig {
        mode,
        ..SimConfig::default()
    }
}

/// All `2^width` binary vectors in counting order, most significant input
/// first.
pub fn exhaustive_vectors(width: u32) -> Vec<String> {
    (0..1u64 << width)
        .map(|n| {
            (0..width)
                .rev()
                .map(|bit| if n >> bit & 1 == 1 { '1' } else { '0' })
                .collect()
        })
        .collect()
}

/// A fault list with output stuck-at-0 and stuck-at-1 on gates `1..=gates`.
pub fn output_faults(gates: u32) -> String {
    (1..=gates)
        .flat_map(|g| [format!("{g} 0 0\n"), format!("{g} 0 1\n")])
        .collect()
}

/// Writes `<dir>/<name>.lev` plus whichever optional files are given and
/// returns the circuit base path.
pub fn write_circuit(
    dir: &Path,
    name: &str,
    lev: &str,
    dly: Option<&str>,
    eqf: Option<&str>,
    vec: Option<&str>,
) -> io::Result<PathBuf> {
    let base = dir.join(name);
    fs::write(circuit_path(&base, "lev"), lev)?;
    for (ext, content) in [("dly", dly), ("eqf", eqf), ("vec", vec)] {
        if let Some(content) = content {
            fs::write(circuit_path(&base, ext), content)?;
        }
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_circuits_build() {
        for (text, gates) in [(C17, 13), (TOGGLE, 6), (SHIFT, 4), (CONSTANTS, 9)] {
            let circuit = build_circuit(text, None, "").unwrap();
            assert_eq!(circuit.num_gates(), gates);
        }
    }

    #[test]
    fn exhaustive_vectors_count_up() {
        assert_eq!(exhaustive_vectors(2), vec!["00", "01", "10", "11"]);
        assert_eq!(exhaustive_vectors(5).len(), 32);
    }

    #[test]
    fn output_faults_cover_both_polarities() {
        assert_eq!(output_faults(2), "1 0 0\n1 0 1\n2 0 0\n2 0 1\n");
    }
}

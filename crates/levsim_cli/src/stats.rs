//! `levsim stats`: summarize a circuit without simulating it.

use std::fmt;

use levsim_netlist::{load_circuit, CircuitFiles, GateKind, LoadOptions};
use serde::Serialize;

use crate::{GlobalArgs, ReportFormat, StatsArgs};

/// Shape of one circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitStats {
    /// Total gates, including inputs and outputs.
    pub gates: usize,
    /// Primary inputs.
    pub inputs: usize,
    /// Primary outputs.
    pub outputs: usize,
    /// Flip-flops.
    pub flip_flops: usize,
    /// Number of logical levels.
    pub levels: u32,
    /// Faults in the fault list, when it was read.
    pub faults: Option<usize>,
    /// Gate count per kind, in code order, zero counts omitted.
    pub kinds: Vec<(GateKind, usize)>,
}

impl CircuitStats {
    /// Collects counts from loaded circuit files.
    pub fn from_files(files: &CircuitFiles) -> Self {
        let netlist = &files.netlist;
        let kinds = GateKind::ALL
            .iter()
            .map(|&kind| (kind, netlist.count_kind(kind)))
            .filter(|&(_, n)| n > 0)
            .collect();
        Self {
            gates: netlist.len(),
            inputs: netlist.count_kind(GateKind::Input),
            outputs: netlist.count_kind(GateKind::Output),
            flip_flops: netlist.count_kind(GateKind::Dff),
            levels: if netlist.is_empty() { 0 } else { netlist.max_level() + 1 },
            faults: files.faults.as_ref().map(Vec::len),
            kinds,
        }
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "gates:      {}", self.gates)?;
        writeln!(f, "inputs:     {}", self.inputs)?;
        writeln!(f, "outputs:    {}", self.outputs)?;
        writeln!(f, "flip-flops: {}", self.flip_flops)?;
        writeln!(f, "levels:     {}", self.levels)?;
        if let Some(faults) = self.faults {
            writeln!(f, "faults:     {faults}")?;
        }
        for (kind, count) in &self.kinds {
            writeln!(f, "  {:<10}{count}", kind.name())?;
        }
        Ok(())
    }
}

/// Runs the `levsim stats` command.
pub fn run(args: &StatsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let options = LoadOptions {
        delays: false,
        faults: args.faults,
    };
    let files = load_circuit(&args.ckt, options)?;
    if !global.quiet {
        eprintln!("   Circuit {}", args.ckt.display());
    }
    let stats = CircuitStats::from_files(&files);
    match args.format {
        ReportFormat::Text => print!("{stats}"),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use levsim_netlist::{circuit_path, parse_lev};
    use std::fs;
    use tempfile::TempDir;

    const LOOP: &str = "\
6
-
1 1 0 0
2 5 0 1 3
3 8 5 2 1 2
4 2 10 1 3
5 13 0 0
";

    #[test]
    fn counts_by_kind() {
        let files = CircuitFiles {
            netlist: parse_lev(LOOP).unwrap(),
            delays: None,
            faults: None,
        };
        let stats = CircuitStats::from_files(&files);
        assert_eq!(stats.gates, 5);
        assert_eq!(stats.inputs, 1);
        assert_eq!(stats.outputs, 1);
        assert_eq!(stats.flip_flops, 1);
        assert_eq!(stats.levels, 3);
        assert_eq!(stats.faults, None);
        assert_eq!(
            stats.kinds,
            vec![
                (GateKind::Input, 1),
                (GateKind::Output, 1),
                (GateKind::Dff, 1),
                (GateKind::Or, 1),
                (GateKind::TieZero, 1),
            ]
        );
    }

    #[test]
    fn display_lists_faults_when_read() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("loop");
        fs::write(circuit_path(&base, "lev"), LOOP).unwrap();
        fs::write(circuit_path(&base, "eqf"), "3 0 0\n3 0 1\n").unwrap();
        let files = load_circuit(
            &base,
            LoadOptions {
                delays: false,
                faults: true,
            },
        )
        .unwrap();
        let text = CircuitStats::from_files(&files).to_string();
        assert!(text.contains("faults:     2\n"));
        assert!(text.contains("flip-flops: 1\n"));
    }

    #[test]
    fn serializes_to_json() {
        let files = CircuitFiles {
            netlist: parse_lev(LOOP).unwrap(),
            delays: None,
            faults: Some(vec![]),
        };
        let json = serde_json::to_value(CircuitStats::from_files(&files)).unwrap();
        assert_eq!(json["gates"], 5);
        assert_eq!(json["flip_flops"], 1);
        assert_eq!(json["faults"], 0);
        assert_eq!(json["kinds"][2], serde_json::json!(["Dff", 1]));
    }

    #[test]
    fn run_reports_missing_fault_list() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("loop");
        fs::write(circuit_path(&base, "lev"), LOOP).unwrap();
        let args = StatsArgs {
            ckt: base,
            faults: true,
            format: ReportFormat::Text,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: None,
        };
        let err = stats_err(run(&args, &global));
        assert!(err.contains("loop.eqf"));
    }

    fn stats_err(result: Result<i32, Box<dyn std::error::Error>>) -> String {
        match result {
            Ok(code) => panic!("expected an error, got exit code {code}"),
            Err(e) => e.to_string(),
        }
    }
}

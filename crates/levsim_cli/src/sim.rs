//! `levsim sim`: simulate a circuit over a stream of input vectors.
//!
//! Loads `<ckt>.lev` and whichever of `<ckt>.dly`/`<ckt>.eqf` the selected
//! simulator needs, reads vectors from `<ckt>.vec` or stdin, and prints the
//! requested per-cycle dumps to stdout. Coverage figures are written to
//! `<ckt>_gic.csv` and summarized at the end of the run.

use std::ffi::OsString;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use levsim_common::Logic;
use levsim_config::{RunConfig, SimulationMode};
use levsim_netlist::{circuit_path, load_circuit, open_vectors, LoadOptions, NetlistError, VectorReader};
use levsim_sim::{Circuit, CoverageSummary, SimConfig, SimError, SimMode};

use crate::report;
use crate::{GlobalArgs, ReportFormat, SimArgs};

/// Everything a run needs once the config file and flags are merged.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub sim: SimConfig,
    pub outputs: bool,
    pub state: bool,
    pub format: ReportFormat,
}

impl Settings {
    /// Applies command-line flags on top of the configuration file.
    pub(crate) fn resolve(args: &SimArgs, config: &RunConfig) -> Result<Self, SimError> {
        let mode = match (args.fsim, args.dly) {
            (true, true) => return Err(SimError::FaultModeRequiresLevelWheel),
            (true, false) => SimMode::Fault,
            (false, true) => SimMode::Delay,
            (false, false) => match config.simulation.mode {
                SimulationMode::Logic => SimMode::Logic,
                SimulationMode::Delay => SimMode::Delay,
                SimulationMode::Fault => SimMode::Fault,
            },
        };
        let cov = args.cov.unwrap_or_default();
        let sim = SimConfig {
            mode,
            gic: cov.gic || config.coverage.gic,
            toggle: cov.toggle || config.coverage.toggle,
            relaxed_toggle: args.relaxed || config.coverage.relaxed_toggle,
            flop_group_size: args.grp.unwrap_or(config.coverage.flop_group_size) as usize,
        };
        let format = args.format.unwrap_or(match config.output.format {
            levsim_config::ReportFormat::Text => ReportFormat::Text,
            levsim_config::ReportFormat::Json => ReportFormat::Json,
        });
        Ok(Self {
            sim,
            outputs: args.wpo || config.output.primary_outputs,
            state: args.wstate || config.output.state,
            format,
        })
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delays: self.sim.mode == SimMode::Delay,
            faults: self.sim.mode == SimMode::Fault,
        }
    }

    fn wants_coverage_file(&self) -> bool {
        self.sim.gic || self.sim.toggle
    }
}

/// Runs the `levsim sim` command.
///
/// Returns exit code 0 once every vector has been simulated.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    // Step 1: Merge the config file with flags
    let config = load_run_config(global)?;
    let settings = Settings::resolve(args, &config)?;
    if let Some(size) = args.grp {
        let mut check = RunConfig::default();
        check.coverage.flop_group_size = size;
        levsim_config::validate_config(&check)?;
    }

    // Step 2: Load the circuit
    let files = load_circuit(&args.ckt, settings.load_options())?;
    let circuit = Circuit::from_files(&files)?;
    if !global.quiet {
        eprintln!(
            "   Simulating {} ({} gates, {} faults, {:?} mode)",
            args.ckt.display(),
            circuit.num_gates(),
            circuit.num_faults(),
            settings.sim.mode
        );
    }

    // Step 3: Simulate, dumping per-cycle values to stdout
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = if args.vec {
        let vectors = open_vectors(&circuit_path(&args.ckt, "vec"))?;
        simulate_to(circuit, &settings, vectors, &mut out)?
    } else {
        let vectors = VectorReader::new(io::stdin().lock());
        simulate_to(circuit, &settings, vectors, &mut out)?
    };

    // Step 4: Coverage file and summary
    if settings.wants_coverage_file() {
        let path = coverage_file_path(&args.ckt);
        report::write_coverage_csv(&path, &summary)?;
        if !global.quiet {
            eprintln!("   Coverage: {}", path.display());
        }
    }
    match settings.format {
        ReportFormat::Text => write!(out, "{}", report::format_text(&summary))?,
        ReportFormat::Json => writeln!(out, "{}", report::format_json(&summary)?)?,
    }
    out.flush()?;

    if !global.quiet {
        eprintln!("   Finished {} cycle(s)", summary.cycles);
    }
    Ok(0)
}

/// Runs the simulation, writing the requested per-cycle lines to `out`.
///
/// State is written before primary outputs. Fault mode adds the cumulative
/// fault coverage after every cycle and delay mode the settle time.
pub(crate) fn simulate_to<I, W>(
    circuit: Circuit,
    settings: &Settings,
    vectors: I,
    out: &mut W,
) -> Result<CoverageSummary, SimError>
where
    I: IntoIterator<Item = Result<Vec<Logic>, NetlistError>>,
    W: Write,
{
    levsim_sim::simulate(circuit, &settings.sim, vectors, |report| {
        if settings.state {
            writeln!(out, "{}", report.state)?;
        }
        if settings.outputs {
            writeln!(out, "{}", report.outputs)?;
        }
        if let Some(time) = report.settle_time {
            writeln!(out, "SETTLE TIME: {time}")?;
        }
        if let Some(coverage) = report.fault_coverage {
            writeln!(out, "FAULT COV: {coverage}")?;
        }
        Ok(())
    })
}

/// Loads `--config`, else `levsim.toml` in the working directory, else
/// defaults.
fn load_run_config(global: &GlobalArgs) -> Result<RunConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &global.config {
        return Ok(levsim_config::load_config(path)?);
    }
    match levsim_config::find_config(&std::env::current_dir()?) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using configuration file");
            Ok(levsim_config::load_config(&path)?)
        }
        None => Ok(RunConfig::default()),
    }
}

/// `<ckt>_gic.csv` next to the circuit files.
fn coverage_file_path(ckt: &Path) -> PathBuf {
    let mut name = OsString::from(ckt.as_os_str());
    name.push("_gic.csv");
    PathBuf::from(name)
}

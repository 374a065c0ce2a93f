//! levsim CLI: the command-line interface for the levsim gate-level
//! simulator.
//!
//! Provides `levsim sim` for logic, delay and fault simulation of a levelized
//! netlist, and `levsim stats` for a quick look at a circuit's shape.

#![warn(missing_docs)]

mod report;
mod sim;
mod stats;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// levsim: event-driven gate-level logic and fault simulation.
#[derive(Parser, Debug)]
#[command(name = "levsim", version, about = "Gate-level logic and fault simulator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `levsim.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a circuit over a stream of input vectors.
    Sim(SimArgs),
    /// Print gate, level and fault counts for a circuit.
    Stats(StatsArgs),
}

/// Arguments for the `levsim sim` subcommand.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Circuit base name; `<ckt>.lev` is read, plus `.dly`/`.eqf`/`.vec` as
    /// requested.
    pub ckt: PathBuf,

    /// Read input vectors from `<ckt>.vec` instead of stdin.
    #[arg(long)]
    pub vec: bool,

    /// Run stuck-at fault simulation with the fault list in `<ckt>.eqf`.
    #[arg(long)]
    pub fsim: bool,

    /// Run delay-annotated simulation with the delays in `<ckt>.dly`.
    #[arg(long)]
    pub dly: bool,

    /// Print primary outputs after every cycle.
    #[arg(long)]
    pub wpo: bool,

    /// Print flip-flop state after every cycle.
    #[arg(long)]
    pub wstate: bool,

    /// Coverage metrics to collect: `g` for gate input combinations, `t` for
    /// toggles, or both.
    #[arg(long, value_parser = parse_coverage)]
    pub cov: Option<CoverageFlags>,

    /// Count toggles from X as well.
    #[arg(long)]
    pub relaxed: bool,

    /// Flip-flops per state-coverage group.
    #[arg(long)]
    pub grp: Option<u32>,

    /// End-of-run report format.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

/// Arguments for the `levsim stats` subcommand.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Circuit base name.
    pub ckt: PathBuf,

    /// Also count the faults in `<ckt>.eqf`.
    #[arg(long)]
    pub faults: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Coverage metrics selected with `--cov`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoverageFlags {
    /// Gate input combination coverage.
    pub gic: bool,
    /// Toggle coverage.
    pub toggle: bool,
}

/// End-of-run report format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn parse_coverage(s: &str) -> Result<CoverageFlags, String> {
    if s.is_empty() {
        return Err("expected one or more of `g`, `t`".to_string());
    }
    let mut flags = CoverageFlags::default();
    for c in s.chars() {
        match c {
            'g' => flags.gic = true,
            't' => flags.toggle = true,
            other => return Err(format!("unknown coverage metric `{other}`")),
        }
    }
    Ok(flags)
}

fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if global.verbose {
            "warn,levsim_sim=debug,levsim_netlist=debug,levsim_cli=debug"
        } else if global.quiet {
            "error"
        } else {
            "warn"
        };
        EnvFilter::new(level)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Sim(ref args) => sim::run(args, &global),
        Command::Stats(ref args) => stats::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sim_basic() {
        let cli = Cli::parse_from(["levsim", "sim", "c17"]);
        match cli.command {
            Command::Sim(ref args) => {
                assert_eq!(args.ckt, PathBuf::from("c17"));
                assert!(!args.vec);
                assert!(!args.fsim);
                assert!(!args.dly);
                assert!(!args.wpo);
                assert!(!args.wstate);
                assert!(args.cov.is_none());
                assert!(!args.relaxed);
                assert!(args.grp.is_none());
                assert!(args.format.is_none());
            }
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn parse_sim_with_args() {
        let cli = Cli::parse_from([
            "levsim", "sim", "s27", "--vec", "--fsim", "--wpo", "--wstate", "--cov", "gt",
            "--relaxed", "--grp", "3", "--format", "json",
        ]);
        match cli.command {
            Command::Sim(ref args) => {
                assert!(args.vec);
                assert!(args.fsim);
                assert!(args.wpo);
                assert!(args.wstate);
                assert_eq!(
                    args.cov,
                    Some(CoverageFlags {
                        gic: true,
                        toggle: true
                    })
                );
                assert!(args.relaxed);
                assert_eq!(args.grp, Some(3));
                assert_eq!(args.format, Some(ReportFormat::Json));
            }
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn parse_sim_delay() {
        let cli = Cli::parse_from(["levsim", "sim", "c17", "--dly"]);
        match cli.command {
            Command::Sim(ref args) => assert!(args.dly),
            _ => panic!("expected Sim command"),
        }
    }

    #[test]
    fn parse_coverage_flags() {
        assert_eq!(
            parse_coverage("t"),
            Ok(CoverageFlags {
                gic: false,
                toggle: true
            })
        );
        assert!(parse_coverage("").is_err());
        assert!(parse_coverage("gx").is_err());
    }

    #[test]
    fn bad_coverage_metric_rejected() {
        let result = Cli::try_parse_from(["levsim", "sim", "c17", "--cov", "q"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_stats() {
        let cli = Cli::parse_from(["levsim", "stats", "c17", "--faults"]);
        match cli.command {
            Command::Stats(ref args) => {
                assert_eq!(args.ckt, PathBuf::from("c17"));
                assert!(args.faults);
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Stats command"),
        }
    }

    #[test]
    fn parse_stats_json() {
        let cli = Cli::parse_from(["levsim", "stats", "c17", "--format", "json"]);
        match cli.command {
            Command::Stats(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Stats command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["levsim", "--quiet", "stats", "c17"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["levsim", "stats", "c17", "--verbose"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["levsim", "--config", "/path/to/levsim.toml", "stats", "c17"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/levsim.toml")));
    }

    #[test]
    fn missing_ckt_rejected() {
        assert!(Cli::try_parse_from(["levsim", "sim"]).is_err());
    }
}

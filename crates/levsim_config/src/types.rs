//! Configuration types deserialized from `levsim.toml`.

use serde::Deserialize;

/// Default number of flip-flops whose joint state forms one GIC group.
pub const DEFAULT_FLOP_GROUP_SIZE: u32 = 5;

/// Largest accepted flip-flop group size.
pub const MAX_FLOP_GROUP_SIZE: u32 = 16;

/// The top-level run configuration parsed from `levsim.toml`.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Which simulator to run.
    #[serde(default)]
    pub simulation: SimulationSection,
    /// Coverage metrics to collect.
    #[serde(default)]
    pub coverage: CoverageSection,
    /// Per-cycle dumps and report format.
    #[serde(default)]
    pub output: OutputSection,
}

/// Simulator selection.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct SimulationSection {
    /// The simulation mode.
    #[serde(default)]
    pub mode: SimulationMode,
}

/// The three simulators sharing one driver.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Zero-delay logic simulation (default).
    #[default]
    Logic,
    /// Delay-annotated logic simulation.
    Delay,
    /// Stuck-at fault simulation.
    Fault,
}

/// Coverage collection switches.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct CoverageSection {
    /// Collect gate input-combination coverage.
    #[serde(default)]
    pub gic: bool,
    /// Collect toggle coverage.
    #[serde(default)]
    pub toggle: bool,
    /// Count any arrival at 0 or 1 as a toggle, including from X.
    #[serde(default)]
    pub relaxed_toggle: bool,
    /// Flip-flops per GIC state group.
    #[serde(default = "default_flop_group_size")]
    pub flop_group_size: u32,
}

impl Default for CoverageSection {
    fn default() -> Self {
        Self {
            gic: false,
            toggle: false,
            relaxed_toggle: false,
            flop_group_size: DEFAULT_FLOP_GROUP_SIZE,
        }
    }
}

fn default_flop_group_size() -> u32 {
    DEFAULT_FLOP_GROUP_SIZE
}

/// Output switches.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct OutputSection {
    /// Print primary outputs after every cycle.
    #[serde(default)]
    pub primary_outputs: bool,
    /// Print flip-flop state after every cycle.
    #[serde(default)]
    pub state: bool,
    /// End-of-run report format.
    #[serde(default)]
    pub format: ReportFormat,
}

/// End-of-run report format.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable lines (default).
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

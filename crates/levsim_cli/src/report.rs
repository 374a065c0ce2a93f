//! End-of-run coverage reports.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use levsim_sim::{CoverageRatio, CoverageSummary};

/// Header line of the coverage CSV.
pub const CSV_HEADER: &str = "GIC, GateToggle";

/// Writes the GIC and toggle ratios as a one-row CSV. A metric that was not
/// collected is left empty.
pub fn write_coverage_csv(path: &Path, summary: &CoverageSummary) -> std::io::Result<()> {
    let cell = |r: Option<CoverageRatio>| r.map(|r| format!("{:.6}", r.ratio())).unwrap_or_default();
    let content = format!(
        "{CSV_HEADER}\n{}, {}\n",
        cell(summary.gic),
        cell(summary.toggle)
    );
    fs::write(path, content)
}

/// Human-readable summary, one metric per line.
pub fn format_text(summary: &CoverageSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Cycles: {}", summary.cycles);
    for (name, ratio) in [
        ("Fault coverage", summary.fault),
        ("GIC coverage", summary.gic),
        ("Toggle coverage", summary.toggle),
    ] {
        if let Some(ratio) = ratio {
            let _ = writeln!(out, "{name}: {ratio}");
        }
    }
    out
}

/// The summary as a JSON document.
pub fn format_json(summary: &CoverageSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

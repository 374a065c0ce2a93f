//! Coverage accumulators: ratios, flip-flop state groups, and the summary
//! reported at the end of a run.

use levsim_common::{CoverageBitmap, Logic};
use levsim_netlist::GateId;
use serde::Serialize;
use std::fmt;

/// A covered/total pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CoverageRatio {
    /// Points observed.
    pub covered: u64,
    /// Points possible.
    pub total: u64,
}

impl CoverageRatio {
    /// Creates a ratio.
    pub fn new(covered: u64, total: u64) -> Self {
        Self { covered, total }
    }

    /// Returns `covered / total`, or 0.0 when there is nothing to cover.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.covered as f64 / self.total as f64
        }
    }
}

impl std::ops::Add for CoverageRatio {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.covered + rhs.covered, self.total + rhs.total)
    }
}

impl fmt::Display for CoverageRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.2}%)",
            self.covered,
            self.total,
            self.ratio() * 100.0
        )
    }
}

/// A group of flip-flops whose joint state is one GIC coverage point set.
#[derive(Clone, Debug)]
pub struct FlopGroup {
    members: Vec<GateId>,
    seen: CoverageBitmap,
}

impl FlopGroup {
    /// Creates a group over the given flip-flops.
    pub fn new(members: Vec<GateId>) -> Self {
        let seen = CoverageBitmap::for_inputs(members.len() as u32);
        Self { members, seen }
    }

    /// Returns the flip-flops in the group.
    pub fn members(&self) -> &[GateId] {
        &self.members
    }

    /// Records the members' current joint state, first member as the most
    /// significant bit. Any `X` or `Z` skips recording.
    pub fn record(&mut self, values: impl IntoIterator<Item = Logic>) {
        let index = values
            .into_iter()
            .try_fold(0usize, |acc, v| v.to_bit().map(|b| (acc << 1) | b as usize));
        if let Some(index) = index {
            self.seen.mark(index);
        }
    }

    /// Returns the observed and possible state counts.
    pub fn coverage(&self) -> CoverageRatio {
        CoverageRatio::new(self.seen.count() as u64, self.seen.len() as u64)
    }
}

/// Splits flip-flops into consecutive groups of at most `size`.
pub fn group_flops(state_vars: &[GateId], size: usize) -> Vec<FlopGroup> {
    state_vars
        .chunks(size.max(1))
        .map(|chunk| FlopGroup::new(chunk.to_vec()))
        .collect()
}

/// End-of-run coverage figures.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Number of cycles simulated.
    pub cycles: u64,
    /// Detected over total faults, in fault simulation.
    pub fault: Option<CoverageRatio>,
    /// Input-combination coverage, when collected.
    pub gic: Option<CoverageRatio>,
    /// Toggle coverage, when collected.
    pub toggle: Option<CoverageRatio>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use Logic::*;

    #[test]
    fn ratio_handles_empty_total() {
        assert_eq!(CoverageRatio::default().ratio(), 0.0);
        assert_eq!(CoverageRatio::new(1, 4).ratio(), 0.25);
    }

    #[test]
    fn ratios_add() {
        let sum = CoverageRatio::new(1, 4) + CoverageRatio::new(2, 2);
        assert_eq!(sum, CoverageRatio::new(3, 6));
        assert_eq!(format!("{}", CoverageRatio::new(1, 4)), "1/4 (25.00%)");
    }

    #[test]
    fn groups_are_chunked() {
        let flops: Vec<GateId> = (0..7).map(GateId::from_raw).collect();
        let groups = group_flops(&flops, 5);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members().len(), 5);
        assert_eq!(groups[0].coverage().total, 32);
        assert_eq!(groups[1].coverage().total, 4);
        assert!(group_flops(&[], 5).is_empty());
    }

    #[test]
    fn group_records_known_states() {
        let mut g = FlopGroup::new(vec![GateId::from_raw(0), GateId::from_raw(1)]);
        g.record([One, Zero]);
        g.record([One, Zero]);
        g.record([X, Zero]);
        g.record([Zero, Z]);
        g.record([Zero, One]);
        assert_eq!(g.coverage(), CoverageRatio::new(2, 4));
    }

    #[test]
    fn summary_serializes() {
        let summary = CoverageSummary {
            cycles: 2,
            fault: Some(CoverageRatio::new(1, 2)),
            gic: None,
            toggle: None,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"cycles\":2"));
        assert!(json.contains("\"covered\":1"));
    }
}

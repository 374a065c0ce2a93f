//! The validated gate list a circuit is built from.

use crate::error::NetlistError;
use crate::kind::GateKind;
use serde::{Deserialize, Serialize};

/// Netlist levels are written scaled by this factor.
pub const LEVEL_SCALE: u32 = 5;

/// One gate as declared by a netlist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    /// 1-based gate id.
    pub id: u32,
    /// Gate kind.
    pub kind: GateKind,
    /// Logical level (already divided by [`LEVEL_SCALE`]).
    pub level: u32,
    /// 1-based fan-in ids, in declaration order.
    pub fanin: Vec<u32>,
}

impl GateRecord {
    /// Creates a record with an already-normalized level.
    pub fn new(id: u32, kind: GateKind, level: u32, fanin: Vec<u32>) -> Self {
        Self {
            id,
            kind,
            level,
            fanin,
        }
    }

    /// Creates a record from the scaled level written in netlist files.
    pub fn from_raw_level(id: u32, kind: GateKind, raw_level: u32, fanin: Vec<u32>) -> Self {
        Self::new(id, kind, raw_level / LEVEL_SCALE, fanin)
    }
}

/// A structurally valid list of gates.
///
/// Holding a `Netlist` guarantees ids are dense and 1-based in order, every
/// fan-in names an existing gate, each gate has the fan-ins its kind reads,
/// and every flip-flop has exactly one fan-in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Netlist {
    gates: Vec<GateRecord>,
}

impl Netlist {
    /// Validates a list of records.
    pub fn from_records(gates: Vec<GateRecord>) -> Result<Self, NetlistError> {
        let count = gates.len() as u32;
        for (position, gate) in gates.iter().enumerate() {
            if gate.id as usize != position + 1 {
                return Err(NetlistError::NonDenseId {
                    position: position + 1,
                    id: gate.id,
                });
            }
            if gate.kind.is_state() && gate.fanin.len() != 1 {
                return Err(NetlistError::DffFanin {
                    gate: gate.id,
                    count: gate.fanin.len(),
                });
            }
            if gate.fanin.len() < gate.kind.min_fanin() {
                return Err(NetlistError::Arity {
                    gate: gate.id,
                    kind: gate.kind,
                    expected: gate.kind.min_fanin(),
                    found: gate.fanin.len(),
                });
            }
            if let Some(&fanin) = gate.fanin.iter().find(|&&f| f == 0 || f > count) {
                return Err(NetlistError::UnknownFanin {
                    gate: gate.id,
                    fanin,
                });
            }
        }
        Ok(Self { gates })
    }

    /// Returns the gate records in id order.
    pub fn gates(&self) -> &[GateRecord] {
        &self.gates
    }

    /// Returns the number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the netlist has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Looks up a gate by 1-based id.
    pub fn gate(&self, id: u32) -> Option<&GateRecord> {
        id.checked_sub(1).and_then(|i| self.gates.get(i as usize))
    }

    /// Counts gates of the given kind.
    pub fn count_kind(&self, kind: GateKind) -> usize {
        self.gates.iter().filter(|g| g.kind == kind).count()
    }

    /// Returns the highest logical level, or 0 for an empty netlist.
    pub fn max_level(&self) -> u32 {
        self.gates.iter().map(|g| g.level).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and_circuit() -> Vec<GateRecord> {
        vec![
            GateRecord::new(1, GateKind::Input, 0, vec![]),
            GateRecord::new(2, GateKind::Input, 0, vec![]),
            GateRecord::new(3, GateKind::And, 1, vec![1, 2]),
            GateRecord::new(4, GateKind::Output, 2, vec![3]),
        ]
    }

    #[test]
    fn raw_level_is_floored() {
        assert_eq!(GateRecord::from_raw_level(1, GateKind::Buf, 0, vec![]).level, 0);
        assert_eq!(GateRecord::from_raw_level(1, GateKind::Buf, 4, vec![]).level, 0);
        assert_eq!(GateRecord::from_raw_level(1, GateKind::Buf, 5, vec![]).level, 1);
        assert_eq!(GateRecord::from_raw_level(1, GateKind::Buf, 14, vec![]).level, 2);
    }

    #[test]
    fn accepts_valid_netlist() {
        let n = Netlist::from_records(and_circuit()).unwrap();
        assert_eq!(n.len(), 4);
        assert_eq!(n.count_kind(GateKind::Input), 2);
        assert_eq!(n.max_level(), 2);
        assert_eq!(n.gate(3).map(|g| g.kind), Some(GateKind::And));
        assert!(n.gate(0).is_none());
        assert!(n.gate(5).is_none());
    }

    #[test]
    fn rejects_sparse_ids() {
        let mut gates = and_circuit();
        gates[2].id = 7;
        let err = Netlist::from_records(gates).unwrap_err();
        assert!(matches!(err, NetlistError::NonDenseId { position: 3, id: 7 }));
    }

    #[test]
    fn rejects_dangling_fanin() {
        let mut gates = and_circuit();
        gates[2].fanin = vec![1, 9];
        let err = Netlist::from_records(gates).unwrap_err();
        assert!(matches!(err, NetlistError::UnknownFanin { gate: 3, fanin: 9 }));
    }

    #[test]
    fn rejects_two_input_flip_flop() {
        let mut gates = and_circuit();
        gates.push(GateRecord::new(5, GateKind::Dff, 0, vec![1, 2]));
        let err = Netlist::from_records(gates).unwrap_err();
        assert!(matches!(err, NetlistError::DffFanin { gate: 5, count: 2 }));
    }

    #[test]
    fn rejects_short_mux() {
        let mut gates = and_circuit();
        gates.push(GateRecord::new(5, GateKind::Mux2, 1, vec![1, 2]));
        let err = Netlist::from_records(gates).unwrap_err();
        assert!(matches!(
            err,
            NetlistError::Arity {
                gate: 5,
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn forward_references_are_legal() {
        let gates = vec![
            GateRecord::new(1, GateKind::Dff, 0, vec![2]),
            GateRecord::new(2, GateKind::Not, 1, vec![1]),
        ];
        assert!(Netlist::from_records(gates).is_ok());
    }
}

//! Stuck-at faults and the state they carry across flip-flops.

use levsim_common::Logic;
use levsim_netlist::GateId;
use std::collections::BTreeMap;

/// Number of faults simulated together in one batch.
///
/// Every gate has this many fault slots; a fault occupies slot
/// `sequence % NUM_FAULT_INJECT` wherever its effect reaches.
pub const NUM_FAULT_INJECT: usize = 64;

/// A single stuck-at fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    sequence: u32,
    gate: GateId,
    net: u32,
    stuck_at: Logic,
    detected: bool,
    /// Faulty flip-flop values captured at the end of the fault's last batch.
    carried: BTreeMap<GateId, Logic>,
}

impl Fault {
    /// Creates an undetected fault. `sequence` is the 1-based position in
    /// the fault list.
    pub fn new(sequence: u32, gate: GateId, net: u32, stuck_at: Logic) -> Self {
        Self {
            sequence,
            gate,
            net,
            stuck_at,
            detected: false,
            carried: BTreeMap::new(),
        }
    }

    /// Returns the 1-based fault-list position.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the fault slot this fault occupies on every gate.
    pub fn slot(&self) -> usize {
        self.sequence as usize % NUM_FAULT_INJECT
    }

    /// Returns the target gate.
    pub fn gate(&self) -> GateId {
        self.gate
    }

    /// Returns the target net: 0 for the output, `i` for fan-in `i - 1`.
    pub fn net(&self) -> u32 {
        self.net
    }

    /// Returns the value the target net is stuck at.
    pub fn stuck_at(&self) -> Logic {
        self.stuck_at
    }

    /// Returns `true` once the fault has been observed at a primary output.
    pub fn is_detected(&self) -> bool {
        self.detected
    }

    /// Marks the fault detected. Detection is permanent.
    pub fn mark_detected(&mut self) {
        self.detected = true;
    }

    /// Records the faulty value a flip-flop will latch under this fault.
    pub fn store_state(&mut self, dff: GateId, value: Logic) {
        self.carried.insert(dff, value);
    }

    /// Removes and returns the carried flip-flop values.
    pub fn take_state(&mut self) -> BTreeMap<GateId, Logic> {
        std::mem::take(&mut self.carried)
    }

    /// Returns the carried flip-flop values without consuming them.
    pub fn stored_state(&self) -> &BTreeMap<GateId, Logic> {
        &self.carried
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(n: u32) -> GateId {
        GateId::from_raw(n)
    }

    #[test]
    fn slot_wraps_at_batch_width() {
        assert_eq!(Fault::new(1, gate(0), 0, Logic::One).slot(), 1);
        assert_eq!(Fault::new(64, gate(0), 0, Logic::One).slot(), 0);
        assert_eq!(Fault::new(65, gate(0), 0, Logic::One).slot(), 1);
    }

    #[test]
    fn detection_is_sticky() {
        let mut f = Fault::new(1, gate(4), 0, Logic::One);
        assert!(!f.is_detected());
        f.mark_detected();
        f.mark_detected();
        assert!(f.is_detected());
    }

    #[test]
    fn carried_state_is_taken_once() {
        let mut f = Fault::new(3, gate(2), 1, Logic::Zero);
        f.store_state(gate(7), Logic::One);
        f.store_state(gate(7), Logic::Zero);
        assert_eq!(f.stored_state().get(&gate(7)), Some(&Logic::Zero));
        let taken = f.take_state();
        assert_eq!(taken.len(), 1);
        assert!(f.stored_state().is_empty());
    }
}

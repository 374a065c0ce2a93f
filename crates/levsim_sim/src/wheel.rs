//! Event wheels: rings of FIFO queues that order gate evaluations.
//!
//! [`LevelWheel`] queues gates by logical level and drains them in level
//! order, each gate at most once per pass. [`DelayWheel`] queues gates by
//! time slot modulo the ring length, so a gate's evaluation lands `delay`
//! time units after the event that scheduled it.

use crate::gate::Gate;
use levsim_netlist::GateId;
use std::collections::VecDeque;

/// A scheduler the simulation driver drains.
pub trait EventWheel {
    /// Whether the wheel drains in topological level order, which fault
    /// simulation relies on.
    const LEVEL_ORDERED: bool;

    /// Schedules a gate.
    fn insert(&mut self, id: GateId, gate: &Gate);

    /// Dequeues the next gate, or returns `None` at the end of a pass.
    fn next(&mut self) -> Option<GateId>;

    /// Returns `true` if nothing is scheduled.
    fn is_empty(&self) -> bool;

    /// Simulated time elapsed since the last [`reset_time`](Self::reset_time).
    fn time(&self) -> u64 {
        0
    }

    /// Restarts the time counter at a cycle boundary.
    fn reset_time(&mut self) {}
}

/// Zero-delay wheel with one queue per logical level.
#[derive(Debug, Clone)]
pub struct LevelWheel {
    levels: Vec<VecDeque<GateId>>,
    /// Indexed by gate; set while a gate sits in a queue.
    pending: Vec<bool>,
    pending_count: usize,
    cursor: usize,
}

impl LevelWheel {
    /// Creates a wheel for `num_levels` levels and `num_gates` gates.
    pub fn new(num_levels: usize, num_gates: usize) -> Self {
        Self {
            levels: vec![VecDeque::new(); num_levels.max(1)],
            pending: vec![false; num_gates],
            pending_count: 0,
            cursor: 0,
        }
    }

    /// Returns the number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Returns the number of scheduled gates.
    pub fn len(&self) -> usize {
        self.pending_count
    }
}

impl EventWheel for LevelWheel {
    const LEVEL_ORDERED: bool = true;

    fn insert(&mut self, id: GateId, gate: &Gate) {
        let index = id.index();
        if index >= self.pending.len() {
            self.pending.resize(index + 1, false);
        }
        if self.pending[index] {
            return;
        }
        let level = gate.level() as usize;
        debug_assert!(
            level < self.levels.len(),
            "gate {} at level {} past last level {}",
            id.netlist_id(),
            level,
            self.levels.len() - 1
        );
        self.levels[level].push_back(id);
        self.pending[index] = true;
        self.pending_count += 1;
    }

    fn next(&mut self) -> Option<GateId> {
        while self.cursor < self.levels.len() {
            if let Some(id) = self.levels[self.cursor].pop_front() {
                self.pending[id.index()] = false;
                self.pending_count -= 1;
                return Some(id);
            }
            self.cursor += 1;
        }
        self.cursor = 0;
        None
    }

    fn is_empty(&self) -> bool {
        self.pending_count == 0
    }
}

/// Calendar wheel indexed by time slot.
///
/// Holds `max_delay + 1` slots so an event never wraps onto the slot being
/// drained. Gates are not deduplicated: a gate scheduled twice evaluates
/// twice.
#[derive(Debug, Clone)]
pub struct DelayWheel {
    slots: Vec<VecDeque<GateId>>,
    queued: usize,
    cursor: usize,
    time: u64,
}

impl DelayWheel {
    /// Creates a wheel able to hold delays up to `max_delay`.
    pub fn new(max_delay: u32) -> Self {
        Self {
            slots: vec![VecDeque::new(); max_delay as usize + 1],
            queued: 0,
            cursor: 0,
            time: 0,
        }
    }

    /// Returns the number of slots in the ring.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of queued events.
    pub fn len(&self) -> usize {
        self.queued
    }
}

impl EventWheel for DelayWheel {
    const LEVEL_ORDERED: bool = false;

    fn insert(&mut self, id: GateId, gate: &Gate) {
        let slot = (self.cursor + gate.delay() as usize) % self.slots.len();
        self.slots[slot].push_back(id);
        self.queued += 1;
    }

    fn next(&mut self) -> Option<GateId> {
        let start = self.cursor;
        loop {
            if let Some(id) = self.slots[self.cursor].pop_front() {
                self.queued -= 1;
                return Some(id);
            }
            self.cursor = (self.cursor + 1) % self.slots.len();
            self.time += 1;
            if self.cursor == start {
                self.cursor = 0;
                return None;
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.queued == 0
    }

    fn time(&self) -> u64 {
        self.time
    }

    fn reset_time(&mut self) {
        self.time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levsim_netlist::GateKind;

    fn gate(index: u32, level: u32, delay: u32) -> (GateId, Gate) {
        let id = GateId::from_raw(index);
        (id, Gate::new(id, GateKind::Buf, level, delay, vec![]))
    }

    fn drain(wheel: &mut impl EventWheel) -> Vec<u32> {
        std::iter::from_fn(|| wheel.next())
            .map(|id| id.as_raw())
            .collect()
    }

    #[test]
    fn level_wheel_at_most_once() {
        let mut wheel = LevelWheel::new(3, 4);
        let (id, g) = gate(2, 1, 1);
        wheel.insert(id, &g);
        wheel.insert(id, &g);
        assert_eq!(wheel.len(), 1);
        assert_eq!(drain(&mut wheel), vec![2]);
        assert!(wheel.is_empty());
    }

    #[test]
    fn level_wheel_orders_by_level_then_fifo() {
        let mut wheel = LevelWheel::new(3, 5);
        for (index, level) in [(0, 2), (1, 0), (2, 1), (3, 0), (4, 2)] {
            let (id, g) = gate(index, level, 1);
            wheel.insert(id, &g);
        }
        assert_eq!(drain(&mut wheel), vec![1, 3, 2, 0, 4]);
    }

    #[test]
    fn level_wheel_pass_ends_and_restarts() {
        let mut wheel = LevelWheel::new(2, 2);
        let (hi, hi_gate) = gate(0, 1, 1);
        let (lo, lo_gate) = gate(1, 0, 1);
        wheel.insert(hi, &hi_gate);
        assert_eq!(wheel.next(), Some(hi));
        // Inserted behind the cursor: waits for the next pass.
        wheel.insert(lo, &lo_gate);
        assert_eq!(wheel.next(), None);
        assert!(!wheel.is_empty());
        assert_eq!(wheel.next(), Some(lo));
        assert_eq!(wheel.next(), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "past last level 1")]
    fn level_wheel_rejects_level_past_last() {
        let mut wheel = LevelWheel::new(2, 1);
        let (id, g) = gate(0, 2, 1);
        wheel.insert(id, &g);
    }

    #[test]
    fn level_wheel_reinsert_after_drain() {
        let mut wheel = LevelWheel::new(1, 1);
        let (id, g) = gate(0, 0, 1);
        wheel.insert(id, &g);
        assert_eq!(wheel.next(), Some(id));
        wheel.insert(id, &g);
        assert_eq!(wheel.next(), Some(id));
    }

    #[test]
    fn delay_wheel_orders_by_delay() {
        let mut wheel = DelayWheel::new(3);
        assert_eq!(wheel.size(), 4);
        let (a, ga) = gate(0, 0, 3);
        let (b, gb) = gate(1, 0, 1);
        let (c, gc) = gate(2, 0, 1);
        wheel.insert(a, &ga);
        wheel.insert(b, &gb);
        wheel.insert(c, &gc);
        assert_eq!(wheel.next(), Some(b));
        assert_eq!(wheel.time(), 1);
        assert_eq!(wheel.next(), Some(c));
        assert_eq!(wheel.next(), Some(a));
        assert_eq!(wheel.time(), 3);
        assert_eq!(wheel.next(), None);
        assert!(wheel.is_empty());
    }

    #[test]
    fn delay_wheel_does_not_deduplicate() {
        let mut wheel = DelayWheel::new(1);
        let (id, g) = gate(0, 0, 1);
        wheel.insert(id, &g);
        wheel.insert(id, &g);
        assert_eq!(drain(&mut wheel), vec![0, 0]);
    }

    #[test]
    fn delay_wheel_schedules_relative_to_cursor() {
        let mut wheel = DelayWheel::new(2);
        let (a, ga) = gate(0, 0, 2);
        let (b, gb) = gate(1, 0, 2);
        wheel.insert(a, &ga);
        assert_eq!(wheel.next(), Some(a));
        // Cursor now at slot 2; delay 2 wraps to slot 1.
        wheel.insert(b, &gb);
        assert_eq!(wheel.next(), Some(b));
        assert_eq!(wheel.time(), 4);
        wheel.reset_time();
        assert_eq!(wheel.time(), 0);
    }

    #[test]
    fn empty_delay_wheel_returns_none() {
        let mut wheel = DelayWheel::new(4);
        assert_eq!(wheel.next(), None);
        assert_eq!(wheel.next(), None);
    }
}

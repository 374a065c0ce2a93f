//! Gates: per-kind evaluation, fault slots and coverage bookkeeping.
//!
//! A [`Gate`] only knows its own state. Reading fan-in values needs the whole
//! arena, so [`Circuit`](crate::circuit::Circuit) gathers the inputs and hands
//! them to [`Gate::compute`].

use crate::fault::NUM_FAULT_INJECT;
use levsim_common::{CoverageBitmap, Logic};
use levsim_netlist::{FaultId, GateId, GateKind};

/// One fault slot: the fault occupying it and this gate's value under it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaultSlot {
    /// The fault occupying the slot, `None` when the slot is free.
    pub fault: Option<FaultId>,
    /// This gate's output under the fault.
    pub value: Logic,
    /// The value was carried in from a previous cycle and is held fixed.
    pub latched: bool,
}

/// A node of the circuit graph.
#[derive(Clone, Debug)]
pub struct Gate {
    id: GateId,
    kind: GateKind,
    level: u32,
    delay: u32,
    fanin: Vec<GateId>,
    fanout: Vec<GateId>,
    output: Logic,
    /// Value an INPUT drives, or the D value a flip-flop latched at the
    /// last clock edge, on its next evaluation.
    held: Logic,
    dirty: bool,
    toggled_up: bool,
    toggled_down: bool,
    /// Fan-in positions that contribute a bit to the GIC index.
    gic_inputs: Vec<usize>,
    gic: Option<CoverageBitmap>,
    slots: Box<[FaultSlot]>,
    /// Bit `s` set when slot `s` holds a fault.
    active: u64,
    propagates: bool,
}

impl Gate {
    /// Creates a gate with output `X` and no fault slots.
    pub fn new(id: GateId, kind: GateKind, level: u32, delay: u32, fanin: Vec<GateId>) -> Self {
        Self {
            id,
            kind,
            level,
            delay,
            fanin,
            fanout: Vec::new(),
            output: Logic::X,
            held: Logic::X,
            dirty: false,
            toggled_up: false,
            toggled_down: false,
            gic_inputs: Vec::new(),
            gic: None,
            slots: Box::new([]),
            active: 0,
            propagates: false,
        }
    }

    /// Returns the gate's ID.
    pub fn id(&self) -> GateId {
        self.id
    }

    /// Returns the gate's kind.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Returns the logical level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns the delay in time units.
    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Returns the fan-in gates in declaration order.
    pub fn fanin(&self) -> &[GateId] {
        &self.fanin
    }

    /// Returns the fan-out gates.
    pub fn fanout(&self) -> &[GateId] {
        &self.fanout
    }

    pub(crate) fn add_fanout(&mut self, gate: GateId) {
        self.fanout.push(gate);
    }

    /// Returns the current good-circuit output.
    pub fn output(&self) -> Logic {
        self.output
    }

    /// Returns `true` if the last evaluation changed the output.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag once fan-out has been scheduled.
    pub fn reset_dirty(&mut self) {
        self.dirty = false;
    }

    /// Sets the value an INPUT gate drives. Ignored for other kinds.
    pub fn set_input(&mut self, value: Logic) {
        if self.kind == GateKind::Input {
            self.held = value;
        }
    }

    /// Latches the D value a flip-flop drives this cycle. Ignored for other
    /// kinds.
    pub fn latch(&mut self, value: Logic) {
        if self.kind == GateKind::Dff {
            self.held = value;
        }
    }

    /// Computes the output for the given fan-in values.
    ///
    /// INPUT and flip-flop gates drive their held value and ignore fan-in.
    /// XOR and XNOR read only the first two fan-ins. Missing fan-ins read
    /// as `X`.
    pub fn compute(&self, inputs: &[Logic]) -> Logic {
        let at = |i: usize| inputs.get(i).copied().unwrap_or(Logic::X);
        match self.kind {
            GateKind::Input | GateKind::Dff => self.held,
            GateKind::Output | GateKind::Buf => at(0),
            GateKind::Not => !at(0),
            GateKind::And => Logic::and_all(inputs.iter().copied()),
            GateKind::Nand => !Logic::and_all(inputs.iter().copied()),
            GateKind::Or => Logic::or_all(inputs.iter().copied()),
            GateKind::Nor => !Logic::or_all(inputs.iter().copied()),
            GateKind::Xor => at(0) ^ at(1),
            GateKind::Xnor => !(at(0) ^ at(1)),
            GateKind::TieOne => Logic::One,
            GateKind::TieZero => Logic::Zero,
            GateKind::TieX => Logic::X,
            GateKind::TieZ => Logic::Z,
            GateKind::Mux2 => match at(0) {
                Logic::One => at(2),
                Logic::Zero => at(1),
                Logic::X | Logic::Z => Logic::X,
            },
            GateKind::Tristate => {
                if at(1) == Logic::Zero {
                    at(0)
                } else {
                    Logic::Z
                }
            }
        }
    }

    /// Stores a newly computed output and updates dirty and toggle flags.
    ///
    /// Returns the dirty flag. OUTPUT gates never become dirty.
    pub fn apply(&mut self, value: Logic, relaxed_toggle: bool) -> bool {
        let previous = self.output;
        self.output = value;
        if self.kind == GateKind::Output || previous == value {
            return self.dirty;
        }
        self.dirty = true;
        if self.tracks_toggle() {
            let (up, down) = if relaxed_toggle {
                (value == Logic::One, value == Logic::Zero)
            } else {
                (
                    previous == Logic::Zero && value == Logic::One,
                    previous == Logic::One && value == Logic::Zero,
                )
            };
            self.toggled_up |= up;
            self.toggled_down |= down;
        }
        self.dirty
    }

    /// Returns `true` if the gate counts toward toggle coverage.
    pub fn tracks_toggle(&self) -> bool {
        !matches!(self.kind, GateKind::Input | GateKind::Output) && !self.kind.is_tie()
    }

    /// Returns `true` once a rising output transition has been seen.
    pub fn toggled_up(&self) -> bool {
        self.toggled_up
    }

    /// Returns `true` once a falling output transition has been seen.
    pub fn toggled_down(&self) -> bool {
        self.toggled_down
    }

    /// Returns `true` once both transitions have been seen.
    pub fn has_toggled(&self) -> bool {
        self.toggled_up && self.toggled_down
    }

    /// Allocates the input-combination bitmap over the given fan-in
    /// positions.
    pub(crate) fn enable_gic(&mut self, counted: Vec<usize>) {
        self.gic = Some(CoverageBitmap::for_inputs(counted.len() as u32));
        self.gic_inputs = counted;
    }

    /// Returns the input-combination bitmap, if GIC is collected here.
    pub fn gic(&self) -> Option<&CoverageBitmap> {
        self.gic.as_ref()
    }

    /// Records the combination formed by the counted fan-ins, first counted
    /// fan-in as the most significant bit. Any `X` or `Z` skips recording.
    pub fn record_gic(&mut self, inputs: &[Logic]) {
        let Some(bitmap) = self.gic.as_mut() else {
            return;
        };
        let mut index = 0usize;
        for &pos in &self.gic_inputs {
            match inputs.get(pos).and_then(|v| v.to_bit()) {
                Some(bit) => index = (index << 1) | bit as usize,
                None => return,
            }
        }
        bitmap.mark(index);
    }

    /// Allocates the fixed array of fault slots.
    pub(crate) fn enable_fault_slots(&mut self) {
        self.slots = vec![FaultSlot::default(); NUM_FAULT_INJECT].into_boxed_slice();
    }

    /// Returns the slot at `index`, if it holds a fault.
    pub fn slot(&self, index: usize) -> Option<&FaultSlot> {
        self.slots.get(index).filter(|s| s.fault.is_some())
    }

    /// Iterates over the indices of occupied slots in ascending order.
    pub fn active_slots(&self) -> impl Iterator<Item = usize> {
        let mask = self.active;
        (0..NUM_FAULT_INJECT).filter(move |s| mask & (1u64 << s) != 0)
    }

    /// Returns this gate's output under `fault`, which falls back to the
    /// good output when the fault has not reached the gate.
    pub fn faulty_value(&self, index: usize, fault: FaultId) -> Logic {
        match self.slot(index) {
            Some(slot) if slot.fault == Some(fault) => slot.value,
            _ => self.output,
        }
    }

    /// Places a fault in a slot, starting from `value`.
    ///
    /// Does nothing if the slot already holds this fault, so a fault reaching
    /// a gate along several paths keeps its evaluated value. Returns `true`
    /// if the slot was newly filled.
    pub fn add_fault(&mut self, index: usize, fault: FaultId, value: Logic, latched: bool) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.fault == Some(fault) {
            if latched {
                slot.value = value;
                slot.latched = true;
            }
            return false;
        }
        *slot = FaultSlot {
            fault: Some(fault),
            value,
            latched,
        };
        self.active |= 1u64 << index;
        true
    }

    /// Stores the faulty value for an occupied slot and returns the previous
    /// one.
    pub(crate) fn set_faulty(&mut self, index: usize, value: Logic) -> Logic {
        match self.slots.get_mut(index) {
            Some(slot) => std::mem::replace(&mut slot.value, value),
            None => value,
        }
    }

    /// Returns `true` if the last fault evaluation produced a value that
    /// fan-out must see.
    pub fn propagates_fault(&self) -> bool {
        self.propagates
    }

    pub(crate) fn set_propagates(&mut self, propagates: bool) {
        self.propagates = propagates;
    }

    /// Frees every slot.
    pub fn clear_faults(&mut self) {
        for index in self.active_slots().collect::<Vec<_>>() {
            self.slots[index] = FaultSlot::default();
        }
        self.active = 0;
        self.propagates = false;
    }
}

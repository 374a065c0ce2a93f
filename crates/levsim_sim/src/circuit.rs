//! The circuit arena: gates, adjacency, the fault list, and coverage
//! aggregation.
//!
//! A [`Circuit`] is built once from a [`Netlist`] and never changes shape.
//! During simulation only gate values, flags, fault slots and coverage state
//! change.

use crate::coverage::{group_flops, CoverageRatio, FlopGroup};
use crate::error::SimError;
use crate::fault::Fault;
use crate::gate::Gate;
use levsim_common::{Logic, LogicVec};
use levsim_netlist::{
    Arena, CircuitFiles, DelayTable, FaultId, FaultRecord, GateId, GateKind, Netlist,
};

/// Gates with more counted fan-ins than this are left out of GIC coverage.
pub const MAX_GIC_INPUTS: usize = 16;

/// All gates and faults of one circuit.
#[derive(Debug, Clone)]
pub struct Circuit {
    gates: Arena<GateId, Gate>,
    inputs: Vec<GateId>,
    outputs: Vec<GateId>,
    state_vars: Vec<GateId>,
    faults: Arena<FaultId, Fault>,
    delays: DelayTable,
    num_levels: u32,
    /// Next fault-list position to inject.
    cursor: usize,
    flop_groups: Vec<FlopGroup>,
    gic_enabled: bool,
    relaxed_toggle: bool,
    scratch: Vec<Logic>,
}

impl Circuit {
    /// Builds a circuit from a netlist, an optional delay table and a fault
    /// list.
    ///
    /// Fault targets are checked here: a fault naming a missing gate or a
    /// fan-in the gate does not have is an error.
    pub fn build(
        netlist: &Netlist,
        delays: Option<&DelayTable>,
        faults: &[FaultRecord],
    ) -> Result<Self, SimError> {
        let delays = delays.cloned().unwrap_or_default();
        let mut gates: Arena<GateId, Gate> = Arena::with_capacity(netlist.len());
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        let mut state_vars = Vec::new();

        for record in netlist.gates() {
            let fanin = record
                .fanin
                .iter()
                .filter_map(|&f| GateId::from_netlist_id(f))
                .collect();
            let id = gates.next_id();
            let gate = Gate::new(
                id,
                record.kind,
                record.level,
                delays.delay_for(record.kind),
                fanin,
            );
            gates.alloc(gate);
            match record.kind {
                GateKind::Input => inputs.push(id),
                GateKind::Output => outputs.push(id),
                GateKind::Dff => state_vars.push(id),
                _ => {}
            }
        }

        let edges: Vec<(GateId, GateId)> = gates
            .iter()
            .flat_map(|(id, g)| g.fanin().iter().map(move |&f| (f, id)))
            .collect();
        for (from, to) in edges {
            gates[from].add_fanout(to);
        }

        let mut fault_list: Arena<FaultId, Fault> = Arena::with_capacity(faults.len());
        for (position, record) in faults.iter().enumerate() {
            let target = GateId::from_netlist_id(record.gate)
                .filter(|&id| gates.try_get(id).is_some())
                .ok_or(SimError::GateNotFound(record.gate))?;
            let fanin_count = gates[target].fanin().len();
            if record.net as usize > fanin_count {
                return Err(SimError::FaultNetOutOfRange {
                    gate: record.gate,
                    net: record.net,
                    fanin_count,
                });
            }
            fault_list.alloc(Fault::new(
                position as u32 + 1,
                target,
                record.net,
                record.stuck_at,
            ));
        }
        if !fault_list.is_empty() {
            for gate in gates.values_mut() {
                gate.enable_fault_slots();
            }
        }

        let num_levels = netlist.max_level() + 1;
        tracing::debug!(
            gates = gates.len(),
            inputs = inputs.len(),
            outputs = outputs.len(),
            flops = state_vars.len(),
            levels = num_levels,
            faults = fault_list.len(),
            "built circuit"
        );

        Ok(Self {
            gates,
            inputs,
            outputs,
            state_vars,
            faults: fault_list,
            delays,
            num_levels,
            cursor: 0,
            flop_groups: Vec::new(),
            gic_enabled: false,
            relaxed_toggle: false,
            scratch: Vec::new(),
        })
    }

    /// Builds a circuit from everything the loader read.
    pub fn from_files(files: &CircuitFiles) -> Result<Self, SimError> {
        Self::build(
            &files.netlist,
            files.delays.as_ref(),
            files.faults.as_deref().unwrap_or_default(),
        )
    }

    /// Returns the number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Returns `1 + ` the highest gate level.
    pub fn num_levels(&self) -> u32 {
        self.num_levels
    }

    /// Returns the largest gate delay.
    pub fn max_delay(&self) -> u32 {
        self.delays.max_delay()
    }

    /// Returns the delay table.
    pub fn delays(&self) -> &DelayTable {
        &self.delays
    }

    /// Returns a gate by ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID does not belong to this circuit.
    pub fn gate(&self, id: GateId) -> &Gate {
        &self.gates[id]
    }

    /// Looks up a gate by its 1-based netlist id.
    pub fn gate_by_id(&self, id: u32) -> Option<&Gate> {
        GateId::from_netlist_id(id).and_then(|g| self.gates.try_get(g))
    }

    /// Iterates over all gates in id order.
    pub fn gates(&self) -> impl Iterator<Item = (GateId, &Gate)> {
        self.gates.iter()
    }

    /// Returns the primary inputs in netlist order.
    pub fn inputs(&self) -> &[GateId] {
        &self.inputs
    }

    /// Returns the primary outputs in netlist order.
    pub fn outputs(&self) -> &[GateId] {
        &self.outputs
    }

    /// Returns the flip-flops in netlist order.
    pub fn state_vars(&self) -> &[GateId] {
        &self.state_vars
    }

    /// Returns the `index`-th primary input.
    pub fn input(&self, index: usize) -> Option<GateId> {
        self.inputs.get(index).copied()
    }

    /// Returns the `index`-th primary output.
    pub fn output(&self, index: usize) -> Option<GateId> {
        self.outputs.get(index).copied()
    }

    /// Returns the `index`-th flip-flop.
    pub fn state_var(&self, index: usize) -> Option<GateId> {
        self.state_vars.get(index).copied()
    }

    /// Sets the value the `index`-th primary input drives and returns its ID.
    pub fn set_input(&mut self, index: usize, value: Logic) -> Option<GateId> {
        let id = self.input(index)?;
        self.gates[id].set_input(value);
        Some(id)
    }

    /// Snapshot of the primary outputs.
    pub fn output_values(&self) -> LogicVec {
        self.outputs.iter().map(|&id| self.gates[id].output()).collect()
    }

    /// Snapshot of the flip-flop states.
    pub fn state_values(&self) -> LogicVec {
        self.state_vars
            .iter()
            .map(|&id| self.gates[id].output())
            .collect()
    }

    /// Returns the fault list.
    pub fn faults(&self) -> impl Iterator<Item = (FaultId, &Fault)> {
        self.faults.iter()
    }

    /// Returns a fault by ID.
    pub fn fault(&self, id: FaultId) -> &Fault {
        &self.faults[id]
    }

    /// Returns the number of faults.
    pub fn num_faults(&self) -> usize {
        self.faults.len()
    }

    /// Selects strict or relaxed toggle counting.
    pub fn set_relaxed_toggle(&mut self, relaxed: bool) {
        self.relaxed_toggle = relaxed;
    }

    /// Allocates GIC bitmaps and groups the flip-flops `group_size` at a time.
    ///
    /// Every non-constant, non-flip-flop gate with fan-in carries a bitmap,
    /// OUTPUT gates included; INPUT gates have nothing to combine. TIE0 and
    /// TIE1 fan-ins are not counted; TIEX and TIEZ fan-ins are, and block
    /// recording.
    pub fn enable_gic(&mut self, group_size: usize) {
        let counted_inputs: Vec<Vec<usize>> = self
            .gates
            .values()
            .map(|g| {
                g.fanin()
                    .iter()
                    .enumerate()
                    .filter(|&(_, &f)| !self.gates[f].kind().is_constant())
                    .map(|(pos, _)| pos)
                    .collect()
            })
            .collect();
        for ((id, gate), counted) in self.gates.iter_mut().zip(counted_inputs) {
            let kind = gate.kind();
            if matches!(kind, GateKind::Input | GateKind::Dff) || kind.is_tie() {
                continue;
            }
            if counted.len() > MAX_GIC_INPUTS {
                tracing::warn!(
                    gate = id.netlist_id(),
                    fanin = counted.len(),
                    "fan-in too wide for GIC coverage; gate excluded"
                );
                continue;
            }
            gate.enable_gic(counted);
        }
        self.flop_groups = group_flops(&self.state_vars, group_size);
        self.gic_enabled = true;
    }

    /// Evaluates a gate against its fan-ins' good values.
    ///
    /// Updates the output, dirty and toggle flags, and the GIC bitmap.
    /// Returns the dirty flag.
    pub fn evaluate(&mut self, id: GateId) -> bool {
        let mut inputs = std::mem::take(&mut self.scratch);
        inputs.clear();
        inputs.extend(self.gates[id].fanin().iter().map(|&f| self.gates[f].output()));
        let gate = &mut self.gates[id];
        let value = gate.compute(&inputs);
        let dirty = gate.apply(value, self.relaxed_toggle);
        gate.record_gic(&inputs);
        self.scratch = inputs;
        dirty
    }

    /// Clock edge: every flip-flop latches its D fan-in's current good
    /// value, which it drives once evaluated this cycle.
    ///
    /// Called before new inputs are applied, so a flip-flop fed by an input
    /// or by another flip-flop sees the previous cycle's value.
    pub fn latch_state(&mut self) {
        for i in 0..self.state_vars.len() {
            let dff = self.state_vars[i];
            let d = self.gates[dff]
                .fanin()
                .first()
                .map_or(Logic::X, |&d| self.gates[d].output());
            self.gates[dff].latch(d);
        }
    }

    /// Clears a gate's dirty flag.
    pub fn reset_dirty(&mut self, id: GateId) {
        self.gates[id].reset_dirty();
    }

    /// Records the joint state of each flip-flop group.
    pub fn record_state_coverage(&mut self) {
        for group in &mut self.flop_groups {
            let values: Vec<Logic> = group
                .members()
                .iter()
                .map(|&m| self.gates[m].output())
                .collect();
            group.record(values);
        }
    }

    /// Evaluates a gate under every fault occupying one of its slots.
    ///
    /// A fault's target net is forced to the stuck-at value; other gates
    /// read each fan-in's value under the same fault. A faulty value that
    /// differs from the good one is pushed into the fan-out's slots, and at a
    /// primary output it detects the fault when neither value is `X`.
    ///
    /// Flip-flops hold the good value unless the fault targets their output
    /// or carried a value in from the previous cycle.
    ///
    /// Returns `true` if any slot differs from the good value or changed, in
    /// which case fan-out must be re-evaluated.
    pub fn fault_evaluate(&mut self, id: GateId) -> bool {
        let kind = self.gates[id].kind();
        let good = self.gates[id].output();
        let active: Vec<usize> = self.gates[id].active_slots().collect();
        let mut inputs = std::mem::take(&mut self.scratch);
        let mut propagates = false;

        for s in active {
            let Some(slot) = self.gates[id].slot(s).copied() else {
                continue;
            };
            let Some(fid) = slot.fault else {
                continue;
            };
            let fault = &self.faults[fid];
            let forced_net = (fault.gate() == id).then(|| fault.net());
            let stuck = fault.stuck_at();

            let value = match (kind, forced_net) {
                (_, Some(0)) => stuck,
                (GateKind::Dff, _) if slot.latched => slot.value,
                (GateKind::Dff, _) => good,
                (_, forced) => {
                    inputs.clear();
                    inputs.extend(
                        self.gates[id]
                            .fanin()
                            .iter()
                            .map(|&f| self.gates[f].faulty_value(s, fid)),
                    );
                    if let Some(pin) = forced.and_then(|net| inputs.get_mut(net as usize - 1)) {
                        *pin = stuck;
                    }
                    self.gates[id].compute(&inputs)
                }
            };

            let previous = self.gates[id].set_faulty(s, value);
            if value != good || value != previous {
                propagates = true;
            }
            if value != good {
                for k in 0..self.gates[id].fanout().len() {
                    let f = self.gates[id].fanout()[k];
                    let fanout = &mut self.gates[f];
                    if !fanout.kind().is_state() {
                        let start = fanout.output();
                        fanout.add_fault(s, fid, start, false);
                    }
                }
                if kind == GateKind::Output && value != Logic::X && good != Logic::X {
                    let fault = &mut self.faults[fid];
                    if !fault.is_detected() {
                        tracing::trace!(
                            fault = fault.sequence(),
                            gate = id.netlist_id(),
                            "fault detected"
                        );
                        fault.mark_detected();
                    }
                }
            }
        }

        self.scratch = inputs;
        self.gates[id].set_propagates(propagates);
        propagates
    }

    /// Restarts fault injection at the head of the fault list.
    pub fn reset_injection(&mut self) {
        self.cursor = 0;
    }

    /// Injects the next batch of undetected faults.
    ///
    /// A batch spans up to [`NUM_FAULT_INJECT`](crate::fault::NUM_FAULT_INJECT)
    /// consecutive fault-list positions; detected faults in the window are
    /// skipped and the cursor still moves past them. Each injected fault
    /// occupies its slot on the target gate, and any flip-flop values it
    /// carried from the previous cycle are pinned on those flip-flops.
    ///
    /// Returns the gates to seed into the wheel, or an empty list once the
    /// fault list is exhausted.
    pub fn inject_faults(&mut self) -> Vec<GateId> {
        let mut seeded = Vec::new();
        while seeded.is_empty() && self.cursor < self.faults.len() {
            let end = (self.cursor + crate::fault::NUM_FAULT_INJECT).min(self.faults.len());
            for position in self.cursor..end {
                let fid = FaultId::from_raw(position as u32);
                let fault = &mut self.faults[fid];
                if fault.is_detected() {
                    continue;
                }
                let slot = fault.slot();
                let target = fault.gate();
                let carried = fault.take_state();

                // Pinned values first: a flip-flop's own D-pin fault keeps
                // the value it carried rather than restarting from good.
                for (dff, value) in carried {
                    self.gates[dff].add_fault(slot, fid, value, true);
                    seeded.push(dff);
                }
                let start = self.gates[target].output();
                self.gates[target].add_fault(slot, fid, start, false);
                seeded.push(target);
            }
            self.cursor = end;
        }
        seeded
    }

    /// Captures, for each flip-flop, the faulty D values it will latch.
    ///
    /// A value is stored in the fault's state when it differs from the good
    /// D value and the good D value is not `X`.
    pub fn capture_state_faults(&mut self) {
        for i in 0..self.state_vars.len() {
            let dff = self.state_vars[i];
            let Some(&d) = self.gates[dff].fanin().first() else {
                continue;
            };
            let good_d = self.gates[d].output();
            if good_d == Logic::X {
                continue;
            }
            let captured: Vec<(FaultId, Logic)> = self.gates[d]
                .active_slots()
                .filter_map(|s| self.gates[d].slot(s))
                .filter_map(|slot| slot.fault.map(|f| (f, slot.value)))
                .chain(
                    self.gates[dff]
                        .active_slots()
                        .filter_map(|s| self.gates[dff].slot(s))
                        .filter_map(|slot| slot.fault)
                        .filter(|&f| self.faults[f].gate() == dff && self.faults[f].net() == 1)
                        .map(|f| (f, self.faults[f].stuck_at())),
                )
                .filter(|&(_, value)| value != good_d)
                .collect();
            for (fid, value) in captured {
                self.faults[fid].store_state(dff, value);
            }
        }
    }

    /// Frees every fault slot on every gate.
    pub fn invalidate_fault_slots(&mut self) {
        for gate in self.gates.values_mut() {
            gate.clear_faults();
        }
    }

    /// Returns detected over total faults.
    pub fn fault_coverage(&self) -> CoverageRatio {
        let detected = self.faults.values().filter(|f| f.is_detected()).count();
        CoverageRatio::new(detected as u64, self.faults.len() as u64)
    }

    /// Returns observed over possible input combinations, gates and
    /// flip-flop groups together. `None` unless GIC was enabled.
    pub fn gic_coverage(&self) -> Option<CoverageRatio> {
        if !self.gic_enabled {
            return None;
        }
        let gates = self
            .gates
            .values()
            .filter_map(|g| g.gic())
            .map(|b| CoverageRatio::new(b.count() as u64, b.len() as u64))
            .fold(CoverageRatio::default(), |acc, r| acc + r);
        let flops = self
            .flop_groups
            .iter()
            .map(FlopGroup::coverage)
            .fold(CoverageRatio::default(), |acc, r| acc + r);
        Some(gates + flops)
    }

    /// Returns observed over possible output transitions. Each eligible gate
    /// contributes one point per direction.
    pub fn toggle_coverage(&self) -> CoverageRatio {
        let (covered, eligible) = self
            .gates
            .values()
            .filter(|g| g.tracks_toggle())
            .fold((0u64, 0u64), |(covered, eligible), g| {
                (
                    covered + g.toggled_up() as u64 + g.toggled_down() as u64,
                    eligible + 1,
                )
            });
        CoverageRatio::new(covered, 2 * eligible)
    }
}

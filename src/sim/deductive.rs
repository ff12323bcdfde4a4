//! Deductive fault simulation
//!
//! A single pass over the netlist computes, for every node, its fault-free value and the
//! list of faults that would flip it. Faults reaching a primary output are detected.

use crate::error::{Error, Result};
use crate::network::{GateId, GateType, Netlist, NodeId};

use super::{Fault, FaultSet, FaultUniverse};

/// Per-vector simulation state: golden values, fault lists and evaluated gates
///
/// It is reset before each vector; nothing in it survives from one vector to the next.
#[derive(Clone, Debug, Default)]
pub struct SimulationState {
    values: Vec<Option<bool>>,
    faults: Vec<FaultSet>,
    evaluated: Vec<bool>,
}

impl SimulationState {
    /// Create an empty state for a netlist
    pub fn new(netlist: &Netlist) -> SimulationState {
        SimulationState {
            values: vec![None; netlist.nb_nodes()],
            faults: vec![FaultSet::new(); netlist.nb_nodes()],
            evaluated: vec![false; netlist.nb_gates()],
        }
    }

    /// Mark every node unassigned and every gate unevaluated
    pub fn reset(&mut self) {
        self.values.fill(None);
        for f in self.faults.iter_mut() {
            f.clear();
        }
        self.evaluated.fill(false);
    }

    /// Golden value of a node, if already assigned
    pub fn value(&self, node: NodeId) -> Option<bool> {
        self.values[node.ind()]
    }

    /// Faults observable at a node; only meaningful once the node is assigned
    pub fn faults(&self, node: NodeId) -> &FaultSet {
        &self.faults[node.ind()]
    }

    /// Returns whether the gate has been evaluated for the current vector
    pub fn is_evaluated(&self, gate: GateId) -> bool {
        self.evaluated[gate.ind()]
    }

    fn assign(&mut self, node: NodeId, value: bool, faults: FaultSet) {
        debug_assert!(self.values[node.ind()].is_none(), "node {node} assigned twice");
        self.values[node.ind()] = Some(value);
        self.faults[node.ind()] = faults;
    }
}

/// Compute the fault list at the output of a gate, before adding the output's own faults
///
/// With c the controlling value of the gate, a fault flips the output if it flips all
/// inputs at c and none of the others. Single-input gates forward their input's list.
pub fn propagate_faults(gate_type: GateType, values: &[bool], faults: &[&FaultSet]) -> FaultSet {
    debug_assert_eq!(values.len(), gate_type.nb_inputs());
    debug_assert_eq!(faults.len(), gate_type.nb_inputs());
    match gate_type.controlling_value() {
        None => faults[0].clone(),
        Some(c) => {
            let (f1, f2) = (faults[0], faults[1]);
            match (values[0] == c, values[1] == c) {
                (false, false) => f1.union(f2).copied().collect(),
                (true, false) => f1.difference(f2).copied().collect(),
                (false, true) => f2.difference(f1).copied().collect(),
                (true, true) => f1.intersection(f2).copied().collect(),
            }
        }
    }
}

/// Add the faults hosted by a node to its fault list, if they change its golden value
pub fn add_local_faults(faults: &mut FaultSet, local: Option<[Fault; 2]>, golden: bool) {
    for f in local.into_iter().flatten() {
        if f.is_excited_by(golden) {
            faults.insert(f);
        }
    }
}

/// Deductive simulator for a netlist and a fault universe
#[derive(Clone, Debug)]
pub struct DeductiveSimulator<'a> {
    netlist: &'a Netlist,
    universe: &'a FaultUniverse,
    state: SimulationState,
}

impl<'a> DeductiveSimulator<'a> {
    /// Build a simulator
    pub fn new(netlist: &'a Netlist, universe: &'a FaultUniverse) -> DeductiveSimulator<'a> {
        DeductiveSimulator {
            netlist,
            universe,
            state: SimulationState::new(netlist),
        }
    }

    /// State after the last simulated vector
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Simulate one vector, with one value per primary input in declaration order
    ///
    /// After this call, every node carries its golden value and the faults observable on it.
    pub fn run(&mut self, input_values: &[bool]) -> Result<()> {
        let netlist = self.netlist;
        if input_values.len() != netlist.nb_inputs() {
            return Err(Error::VectorLengthMismatch {
                expected: netlist.nb_inputs(),
                actual: input_values.len(),
            });
        }
        self.state.reset();
        for (&node, &value) in netlist.inputs().iter().zip(input_values) {
            let mut faults = FaultSet::new();
            add_local_faults(&mut faults, self.universe.local_faults(node), value);
            self.state.assign(node, value, faults);
        }
        for &g in netlist.topo_order() {
            self.run_gate(g)?;
        }
        for &o in netlist.outputs() {
            if self.state.value(o).is_none() {
                return Err(Error::StuckEvaluation {
                    gate: netlist.driver(o),
                    node: o,
                });
            }
        }
        Ok(())
    }

    /// Evaluate a gate whose inputs are all assigned, and propagate the faults to its output
    fn run_gate(&mut self, g: GateId) -> Result<()> {
        let gate = self.netlist.gate(g);
        debug_assert!(!self.state.is_evaluated(g));
        let deps = gate.dependencies();
        let mut values = [false; 2];
        for (v, &d) in values.iter_mut().zip(deps) {
            *v = self.state.value(d).ok_or(Error::StuckEvaluation {
                gate: Some(g),
                node: d,
            })?;
        }
        let values = &values[..deps.len()];
        let value = gate.gate_type().eval(values);
        let input_faults: Vec<&FaultSet> = deps.iter().map(|d| self.state.faults(*d)).collect();
        let mut faults = propagate_faults(gate.gate_type(), values, &input_faults);
        add_local_faults(&mut faults, self.universe.local_faults(gate.output()), value);
        self.state.assign(gate.output(), value, faults);
        self.state.evaluated[g.ind()] = true;
        Ok(())
    }

    /// Faults observable at each primary output, in declaration order
    pub fn output_faults(&self) -> Vec<(NodeId, FaultSet)> {
        self.netlist
            .outputs()
            .iter()
            .map(|o| (*o, self.state.faults(*o).clone()))
            .collect()
    }

    /// Faults observable at any primary output
    pub fn detected_faults(&self) -> FaultSet {
        let mut ret = FaultSet::new();
        for o in self.netlist.outputs() {
            ret.extend(self.state.faults(*o).iter().copied());
        }
        ret
    }

    /// Golden values at the primary outputs
    pub fn output_values(&self) -> Vec<bool> {
        self.netlist
            .outputs()
            .iter()
            .map(|o| self.state.value(*o).unwrap_or(false))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{propagate_faults, DeductiveSimulator};
    use crate::error::Error;
    use crate::network::generators::testcases;
    use crate::network::{GateType, NodeId};
    use crate::sim::{Fault, FaultSet, FaultSites, FaultUniverse};

    fn set(faults: &[Fault]) -> FaultSet {
        faults.iter().copied().collect()
    }

    #[test]
    fn test_propagation_rules() {
        let n = NodeId::new;
        let a = Fault::stuck_at_0(n(1));
        let b = Fault::stuck_at_1(n(2));
        let shared = Fault::stuck_at_0(n(5));
        let f1 = set(&[a, shared]);
        let f2 = set(&[b, shared]);
        let inputs = [&f1, &f2];

        // Neither input controlling
        assert_eq!(
            propagate_faults(GateType::And, &[true, true], &inputs),
            set(&[a, b, shared])
        );
        assert_eq!(
            propagate_faults(GateType::Nor, &[false, false], &inputs),
            set(&[a, b, shared])
        );
        // First input controlling
        assert_eq!(
            propagate_faults(GateType::Nand, &[false, true], &inputs),
            set(&[a])
        );
        // Second input controlling
        assert_eq!(
            propagate_faults(GateType::Or, &[false, true], &inputs),
            set(&[b])
        );
        // Both controlling
        assert_eq!(
            propagate_faults(GateType::And, &[false, false], &inputs),
            set(&[shared])
        );
        // Single input
        assert_eq!(propagate_faults(GateType::Inv, &[true], &[&f1]), f1);
        assert_eq!(propagate_faults(GateType::Buf, &[false], &[&f2]), f2);
    }

    #[test]
    fn test_and2() {
        let n = NodeId::new;
        let net = testcases::and2();
        let u = FaultUniverse::new(&net, FaultSites::PrimaryInputs);
        let mut sim = DeductiveSimulator::new(&net, &u);

        sim.run(&[true, true]).unwrap();
        assert_eq!(sim.state().value(n(3)), Some(true));
        assert_eq!(sim.state().faults(n(1)), &set(&[Fault::stuck_at_0(n(1))]));
        assert_eq!(
            sim.detected_faults(),
            set(&[Fault::stuck_at_0(n(1)), Fault::stuck_at_0(n(2))])
        );

        sim.run(&[false, false]).unwrap();
        assert_eq!(sim.state().value(n(3)), Some(false));
        assert_eq!(sim.state().faults(n(2)), &set(&[Fault::stuck_at_1(n(2))]));
        assert!(sim.detected_faults().is_empty());

        sim.run(&[false, true]).unwrap();
        assert_eq!(
            sim.output_faults(),
            vec![(n(3), set(&[Fault::stuck_at_1(n(1))]))]
        );
    }

    #[test]
    fn test_gate_output_sites() {
        let n = NodeId::new;
        let net = testcases::c17();
        let u = FaultUniverse::new(&net, FaultSites::GateOutputs);
        let mut sim = DeductiveSimulator::new(&net, &u);
        sim.run(&[false; 5]).unwrap();
        // All inputs at 0: every internal Nand is at 1, outputs at 0
        assert_eq!(sim.output_values(), vec![false, false]);
        // Primary inputs are not sites: they carry no fault
        assert!(sim.state().faults(n(1)).is_empty());
        // 16 = Nand(2, 11) with 2 at 0: the fault on 11 is masked
        assert_eq!(sim.state().faults(n(16)), &set(&[Fault::stuck_at_0(n(16))]));
        assert_eq!(
            sim.state().faults(n(22)),
            &set(&[
                Fault::stuck_at_0(n(10)),
                Fault::stuck_at_0(n(16)),
                Fault::stuck_at_1(n(22)),
            ])
        );
        assert_eq!(
            sim.state().faults(n(23)),
            &set(&[
                Fault::stuck_at_0(n(16)),
                Fault::stuck_at_0(n(19)),
                Fault::stuck_at_1(n(23)),
            ])
        );
    }

    #[test]
    fn test_every_node_assigned() {
        let net = testcases::c17();
        let u = FaultUniverse::new(&net, FaultSites::All);
        let mut sim = DeductiveSimulator::new(&net, &u);
        sim.run(&[true, false, true, true, false]).unwrap();
        for i in 0..net.nb_nodes() {
            let node = NodeId::new(i as u32);
            assert_eq!(sim.state().value(node).is_some(), net.is_declared(node));
        }
        for &g in net.topo_order() {
            assert!(sim.state().is_evaluated(g));
        }
    }

    #[test]
    fn test_length_mismatch() {
        let net = testcases::and2();
        let u = FaultUniverse::new(&net, FaultSites::All);
        let mut sim = DeductiveSimulator::new(&net, &u);
        assert!(matches!(
            sim.run(&[true]),
            Err(Error::VectorLengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }
}

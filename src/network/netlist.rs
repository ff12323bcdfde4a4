use core::fmt;

use crate::error::NetlistError;
use crate::network::gates::Gate;
use crate::network::signal::{GateId, NodeId};

/// Representation of a combinational circuit as a netlist of nodes and gates
///
/// The netlist is immutable once built: it is validated on construction, and the order
/// in which gates must be evaluated is computed once and kept with it.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
    gates: Vec<Gate>,
    /// Gate driving each node, if any
    drivers: Vec<Option<GateId>>,
    /// Gates reading each node, once per input pin
    fanouts: Vec<Vec<GateId>>,
    /// Whether each node is a primary input
    is_input: Vec<bool>,
    /// Whether each node is a primary output
    is_output: Vec<bool>,
    /// Gates in dependency order
    topo_order: Vec<GateId>,
}

impl Netlist {
    /// Build and validate a netlist from its primary inputs, gates and primary outputs
    ///
    /// Inputs and outputs keep their declaration order. Gates are identified by their
    /// position in `gates`.
    pub fn new(
        inputs: Vec<NodeId>,
        gates: Vec<Gate>,
        outputs: Vec<NodeId>,
    ) -> Result<Netlist, NetlistError> {
        let nb_nodes = inputs
            .iter()
            .chain(outputs.iter())
            .copied()
            .chain(gates.iter().flat_map(|g| {
                g.dependencies()
                    .iter()
                    .copied()
                    .chain(std::iter::once(g.output()))
            }))
            .map(|n| n.ind() + 1)
            .max()
            .unwrap_or(0);

        let mut ret = Netlist {
            inputs,
            outputs,
            gates,
            drivers: vec![None; nb_nodes],
            fanouts: vec![Vec::new(); nb_nodes],
            is_input: vec![false; nb_nodes],
            is_output: vec![false; nb_nodes],
            topo_order: Vec::new(),
        };
        ret.check_arity()?;
        ret.assign_drivers()?;
        ret.check_declared()?;
        ret.topo_sort()?;
        Ok(ret)
    }

    /// Return the number of primary inputs
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Return the number of primary outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Return the number of gates
    pub fn nb_gates(&self) -> usize {
        self.gates.len()
    }

    /// Return the size of the node index space (largest node identity + 1)
    pub fn nb_nodes(&self) -> usize {
        self.drivers.len()
    }

    /// Get the primary input at index i
    pub fn input(&self, i: usize) -> NodeId {
        self.inputs[i]
    }

    /// Get the primary output at index i
    pub fn output(&self, i: usize) -> NodeId {
        self.outputs[i]
    }

    /// Primary inputs, in declaration order
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Primary outputs, in declaration order
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Get a gate
    pub fn gate(&self, g: GateId) -> &Gate {
        &self.gates[g.ind()]
    }

    /// All gates with their identity, in declaration order
    pub fn gates(&self) -> impl Iterator<Item = (GateId, &Gate)> + '_ {
        self.gates
            .iter()
            .enumerate()
            .map(|(i, g)| (GateId::new(i as u32), g))
    }

    /// Nodes driven by a gate, in gate declaration order
    pub fn gate_outputs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.gates.iter().map(|g| g.output())
    }

    /// Gate driving a node, or None for primary inputs
    pub fn driver(&self, n: NodeId) -> Option<GateId> {
        self.drivers[n.ind()]
    }

    /// Gates reading a node
    pub fn fanout(&self, n: NodeId) -> &[GateId] {
        &self.fanouts[n.ind()]
    }

    /// Returns whether the node is a primary input
    pub fn is_input(&self, n: NodeId) -> bool {
        self.is_input[n.ind()]
    }

    /// Returns whether the node is a primary output
    pub fn is_output(&self, n: NodeId) -> bool {
        self.is_output[n.ind()]
    }

    /// Returns whether the node is a primary input or a gate output
    pub fn is_declared(&self, n: NodeId) -> bool {
        n.ind() < self.nb_nodes() && (self.is_input(n) || self.driver(n).is_some())
    }

    /// Gates in an order where each gate comes after the gates driving its inputs
    pub fn topo_order(&self) -> &[GateId] {
        &self.topo_order
    }

    fn check_arity(&self) -> Result<(), NetlistError> {
        for (id, g) in self.gates() {
            if !g.has_valid_arity() {
                return Err(NetlistError::WrongArity {
                    gate: id,
                    gate_type: g.gate_type(),
                    expected: g.gate_type().nb_inputs(),
                    actual: g.dependencies().len(),
                });
            }
        }
        Ok(())
    }

    fn assign_drivers(&mut self) -> Result<(), NetlistError> {
        for &i in &self.inputs {
            if self.is_input[i.ind()] {
                return Err(NetlistError::DuplicateInput(i));
            }
            self.is_input[i.ind()] = true;
        }
        for &o in &self.outputs {
            self.is_output[o.ind()] = true;
        }
        for (i, g) in self.gates.iter().enumerate() {
            let id = GateId::new(i as u32);
            let out = g.output();
            if self.is_input[out.ind()] {
                return Err(NetlistError::DrivenInput {
                    node: out,
                    gate: id,
                });
            }
            if let Some(first) = self.drivers[out.ind()] {
                return Err(NetlistError::MultipleDrivers {
                    node: out,
                    first,
                    second: id,
                });
            }
            self.drivers[out.ind()] = Some(id);
            for d in g.dependencies() {
                self.fanouts[d.ind()].push(id);
            }
        }
        Ok(())
    }

    fn check_declared(&self) -> Result<(), NetlistError> {
        for (id, g) in self.gates() {
            for &d in g.dependencies() {
                if !self.is_declared(d) {
                    return Err(NetlistError::UndeclaredNode { gate: id, node: d });
                }
            }
        }
        for &o in &self.outputs {
            if !self.is_declared(o) {
                return Err(NetlistError::UndeclaredOutput(o));
            }
        }
        Ok(())
    }

    /// Compute the evaluation order, failing on combinational loops
    fn topo_sort(&mut self) -> Result<(), NetlistError> {
        // Count the inputs of each gate that are not yet available
        let mut pending: Vec<usize> = self
            .gates
            .iter()
            .map(|g| {
                g.dependencies()
                    .iter()
                    .filter(|d| self.drivers[d.ind()].is_some())
                    .count()
            })
            .collect();

        // Start with gates fed only by primary inputs
        let mut to_visit: Vec<GateId> = (0..self.nb_gates())
            .filter(|g| pending[*g] == 0)
            .map(|g| GateId::new(g as u32))
            .collect();
        let mut order = Vec::with_capacity(self.nb_gates());
        while let Some(g) = to_visit.pop() {
            order.push(g);
            let out = self.gate(g).output();
            for &f in &self.fanouts[out.ind()] {
                pending[f.ind()] -= 1;
                if pending[f.ind()] == 0 {
                    to_visit.push(f);
                }
            }
        }

        if order.len() != self.nb_gates() {
            return Err(NetlistError::CombinationalLoop(self.find_loop(&pending)));
        }
        self.topo_order = order;
        Ok(())
    }

    /// Find a node on a combinational loop, given the gates that could not be sorted
    fn find_loop(&self, pending: &[usize]) -> NodeId {
        // Every unsorted gate has an input driven by another unsorted gate: walk back until a repeat
        let mut visited = vec![false; self.nb_gates()];
        let mut cur = pending.iter().position(|p| *p != 0).unwrap_or(0);
        loop {
            if visited[cur] {
                return self.gates[cur].output();
            }
            visited[cur] = true;
            let next = self.gates[cur]
                .dependencies()
                .iter()
                .filter_map(|d| self.drivers[d.ind()])
                .find(|g| pending[g.ind()] != 0);
            match next {
                Some(g) => cur = g.ind(),
                None => return self.gates[cur].output(),
            }
        }
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Netlist with {} inputs, {} outputs and {} gates:",
            self.nb_inputs(),
            self.nb_outputs(),
            self.nb_gates()
        )?;
        write!(f, "\tINPUT")?;
        for i in &self.inputs {
            write!(f, " {}", i)?;
        }
        writeln!(f)?;
        for g in &self.gates {
            writeln!(f, "\t{}", g)?;
        }
        write!(f, "\tOUTPUT")?;
        for o in &self.outputs {
            write!(f, " {}", o)?;
        }
        writeln!(f)
    }
}

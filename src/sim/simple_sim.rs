use crate::error::{Error, Result};
use crate::network::{Netlist, NodeId};

use super::Fault;

/// Structure for golden simulation based directly on the netlist, one fault at a time
#[derive(Clone, Debug)]
pub struct SimpleSimulator<'a> {
    netlist: &'a Netlist,
    node_values: Vec<bool>,
}

impl<'a> SimpleSimulator<'a> {
    pub fn from_netlist(netlist: &'a Netlist) -> SimpleSimulator<'a> {
        SimpleSimulator {
            netlist,
            node_values: vec![false; netlist.nb_nodes()],
        }
    }

    /// Simulate the fault-free circuit and return the output values
    pub fn run(&mut self, input_values: &[bool]) -> Result<Vec<bool>> {
        self.run_with_fault(input_values, None)
    }

    /// Simulate the circuit with a node forced to a value and return the output values
    pub fn run_with_fault(
        &mut self,
        input_values: &[bool],
        fault: Option<Fault>,
    ) -> Result<Vec<bool>> {
        let netlist = self.netlist;
        if input_values.len() != netlist.nb_inputs() {
            return Err(Error::VectorLengthMismatch {
                expected: netlist.nb_inputs(),
                actual: input_values.len(),
            });
        }
        self.reset();
        for (i, v) in netlist.inputs().iter().zip(input_values) {
            self.set_value(*i, *v, fault);
        }
        let mut values = Vec::with_capacity(2);
        for &g in netlist.topo_order() {
            let gate = netlist.gate(g);
            values.clear();
            values.extend(gate.dependencies().iter().map(|d| self.node_values[d.ind()]));
            let v = gate.gate_type().eval(&values);
            self.set_value(gate.output(), v, fault);
        }
        Ok(self.get_output_values())
    }

    fn reset(&mut self) {
        self.node_values.fill(false);
    }

    fn set_value(&mut self, node: NodeId, value: bool, fault: Option<Fault>) {
        self.node_values[node.ind()] = match fault {
            Some(f) if f.node == node => f.value,
            _ => value,
        };
    }

    fn get_output_values(&self) -> Vec<bool> {
        self.netlist
            .outputs()
            .iter()
            .map(|o| self.node_values[o.ind()])
            .collect()
    }
}

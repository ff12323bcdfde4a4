//! Compute netlist statistics
//!
//! ```
//! # use dfsim::{Gate, Netlist, NodeId};
//! # let n = NodeId::new;
//! # let net = Netlist::new(vec![n(1), n(2)], vec![Gate::and(n(1), n(2), n(3))], vec![n(3)]).unwrap();
//! use dfsim::network::stats::stats;
//! let stats = stats(&net);
//!
//! // Check that there is no inverter
//! assert_eq!(stats.nb_inv, 0);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use crate::network::GateType;
use crate::Netlist;

/// Number of inputs, outputs and gates in a netlist
#[derive(Clone, Debug, Default)]
pub struct NetlistStats {
    /// Number of inputs
    pub nb_inputs: usize,
    /// Number of outputs
    pub nb_outputs: usize,
    /// Size of the node index space
    pub nb_nodes: usize,
    /// Number of And gates
    pub nb_and: usize,
    /// Number of Or gates
    pub nb_or: usize,
    /// Number of Nand gates
    pub nb_nand: usize,
    /// Number of Nor gates
    pub nb_nor: usize,
    /// Number of inverters
    pub nb_inv: usize,
    /// Number of buffers
    pub nb_buf: usize,
    /// Length of the longest path from a primary input, in gates
    pub depth: usize,
}

impl NetlistStats {
    /// Total number of gates
    pub fn nb_gates(&self) -> usize {
        self.nb_and + self.nb_or + self.nb_nand + self.nb_nor + self.nb_inv + self.nb_buf
    }
}

impl fmt::Display for NetlistStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Outputs: {}", self.nb_outputs)?;
        writeln!(f, "  Nodes: {}", self.nb_nodes)?;
        writeln!(f, "  Gates: {}", self.nb_gates())?;
        writeln!(f, "  Depth: {}", self.depth)?;
        let counts = [
            ("And", self.nb_and),
            ("Or", self.nb_or),
            ("Nand", self.nb_nand),
            ("Nor", self.nb_nor),
            ("Inv", self.nb_inv),
            ("Buf", self.nb_buf),
        ];
        for (name, nb) in counts {
            if nb != 0 {
                writeln!(f, "  {}: {}", name, nb)?;
            }
        }
        fmt::Result::Ok(())
    }
}

/// Compute the statistics of the netlist
pub fn stats(a: &Netlist) -> NetlistStats {
    use GateType::*;
    let mut ret = NetlistStats {
        nb_inputs: a.nb_inputs(),
        nb_outputs: a.nb_outputs(),
        nb_nodes: a.nb_nodes(),
        ..Default::default()
    };
    for (_, g) in a.gates() {
        match g.gate_type() {
            And => ret.nb_and += 1,
            Or => ret.nb_or += 1,
            Nand => ret.nb_nand += 1,
            Nor => ret.nb_nor += 1,
            Inv => ret.nb_inv += 1,
            Buf => ret.nb_buf += 1,
        }
    }

    let mut level = vec![0usize; a.nb_nodes()];
    for &g in a.topo_order() {
        let gate = a.gate(g);
        let l = gate
            .dependencies()
            .iter()
            .map(|d| level[d.ind()])
            .max()
            .unwrap_or(0);
        level[gate.output().ind()] = l + 1;
    }
    ret.depth = level.into_iter().max().unwrap_or(0);
    ret
}

#[cfg(test)]
mod tests {
    use super::stats;
    use crate::network::generators::testcases;

    #[test]
    fn test_c17() {
        let s = stats(&testcases::c17());
        assert_eq!(s.nb_inputs, 5);
        assert_eq!(s.nb_outputs, 2);
        assert_eq!(s.nb_nand, 6);
        assert_eq!(s.nb_gates(), 6);
        assert_eq!(s.depth, 3);
    }
}

//! Netlist generators and templates

/// Adder generators
pub mod adder {
    use crate::{Gate, Netlist, NodeId};

    struct Builder {
        nb_nodes: u32,
        gates: Vec<Gate>,
    }

    impl Builder {
        fn fresh(&mut self) -> NodeId {
            self.nb_nodes += 1;
            NodeId::new(self.nb_nodes)
        }

        fn xor(&mut self, a: NodeId, b: NodeId) -> NodeId {
            let o = self.fresh();
            let n = self.fresh();
            let x = self.fresh();
            self.gates.push(Gate::or(a, b, o));
            self.gates.push(Gate::nand(a, b, n));
            self.gates.push(Gate::and(o, n, x));
            x
        }
    }

    /// A simple ripple-carry adder built from And, Or and Nand gates
    ///
    /// Inputs are a0, b0, a1, b1, ..., followed by the carry in. Outputs are the sum bits
    /// followed by the carry out.
    pub fn ripple_carry(len: usize) -> Netlist {
        let mut b = Builder {
            nb_nodes: 0,
            gates: Vec::new(),
        };
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for _ in 0..len {
            let x = b.fresh();
            let y = b.fresh();
            inputs.push(x);
            inputs.push(y);
        }
        let mut c = b.fresh();
        inputs.push(c);
        for i in 0..len {
            let (x, y) = (inputs[2 * i], inputs[2 * i + 1]);
            let p = b.xor(x, y);
            let s = b.xor(p, c);
            outputs.push(s);
            let g = b.fresh();
            let t = b.fresh();
            let next_c = b.fresh();
            b.gates.push(Gate::and(x, y, g));
            b.gates.push(Gate::and(p, c, t));
            b.gates.push(Gate::or(g, t, next_c));
            c = next_c;
        }
        outputs.push(c);
        Netlist::new(inputs, b.gates, outputs).expect("generated adder is valid")
    }
}

/// Random netlist generators, used to check the simulators against each other
pub mod random {
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use crate::{Gate, GateType, Netlist, NodeId};

    /// Generate a random combinational netlist
    ///
    /// Gates read previously created nodes, so the result is always acyclic; gates are
    /// shuffled afterwards so that declaration order is not a valid evaluation order.
    /// Nodes without fanout become primary outputs, as well as a few random internal nodes.
    pub fn random_netlist(nb_inputs: usize, nb_gates: usize, seed: u64) -> Netlist {
        assert!(nb_inputs > 0);
        let mut rng = SmallRng::seed_from_u64(seed);
        let inputs: Vec<NodeId> = (0..nb_inputs).map(|i| NodeId::new(i as u32 + 1)).collect();
        let mut nodes = inputs.clone();
        let mut gates = Vec::new();
        for _ in 0..nb_gates {
            let gate_type = *GateType::ALL.choose(&mut rng).unwrap();
            let deps: Vec<NodeId> = (0..gate_type.nb_inputs())
                .map(|_| *nodes.choose(&mut rng).unwrap())
                .collect();
            let output = NodeId::new(nodes.len() as u32 + 1);
            gates.push(Gate::new(gate_type, &deps, output));
            nodes.push(output);
        }

        let mut used = vec![false; nodes.len() + 1];
        for g in &gates {
            for d in g.dependencies() {
                used[d.ind()] = true;
            }
        }
        let mut outputs: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|n| !used[n.ind()] || rng.gen_ratio(1, 8))
            .collect();
        if outputs.is_empty() {
            outputs.push(*nodes.last().unwrap());
        }

        gates.shuffle(&mut rng);
        Netlist::new(inputs, gates, outputs).expect("generated netlist is valid")
    }
}

/// Simple netlists to test functionality
pub mod testcases {
    use crate::{Gate, Netlist, NodeId};

    /// A single 2-input And gate: `INPUT 1 2`, `AND 1 2 3`, `OUTPUT 3`
    pub fn and2() -> Netlist {
        let n = NodeId::new;
        Netlist::new(vec![n(1), n(2)], vec![Gate::and(n(1), n(2), n(3))], vec![n(3)])
            .expect("valid netlist")
    }

    /// The ISCAS-85 c17 benchmark: 5 inputs, 6 Nand gates, 2 outputs
    pub fn c17() -> Netlist {
        let n = NodeId::new;
        Netlist::new(
            vec![n(1), n(2), n(3), n(6), n(7)],
            vec![
                Gate::nand(n(1), n(3), n(10)),
                Gate::nand(n(3), n(6), n(11)),
                Gate::nand(n(2), n(11), n(16)),
                Gate::nand(n(11), n(7), n(19)),
                Gate::nand(n(10), n(16), n(22)),
                Gate::nand(n(16), n(19), n(23)),
            ],
            vec![n(22), n(23)],
        )
        .expect("valid netlist")
    }

    /// A circuit with redundant logic: `a & !a` feeds an Or, making some faults undetectable
    pub fn redundant() -> Netlist {
        let n = NodeId::new;
        Netlist::new(
            vec![n(1), n(2)],
            vec![
                Gate::inv(n(1), n(3)),
                Gate::and(n(1), n(3), n(4)),
                Gate::or(n(4), n(2), n(5)),
            ],
            vec![n(5)],
        )
        .expect("valid netlist")
    }
}

#[cfg(test)]
mod tests {
    use super::{adder, random, testcases};

    #[test]
    fn test_generators() {
        let a = adder::ripple_carry(4);
        assert_eq!(a.nb_inputs(), 9);
        assert_eq!(a.nb_outputs(), 5);
        assert_eq!(a.nb_gates(), 4 * 9);

        assert_eq!(testcases::c17().nb_gates(), 6);
        assert_eq!(testcases::and2().nb_gates(), 1);
        assert_eq!(testcases::redundant().nb_gates(), 3);

        for seed in 0..20 {
            let net = random::random_netlist(4, 15, seed);
            assert_eq!(net.nb_inputs(), 4);
            assert_eq!(net.nb_gates(), 15);
            assert!(net.nb_outputs() > 0);
            assert_eq!(net.topo_order().len(), 15);
        }
    }
}

use std::fmt;
use std::str::FromStr;

use crate::network::signal::NodeId;

/// Types of logic gates supported by the simulator
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum GateType {
    /// 2-input And gate
    And,
    /// 2-input Or gate
    Or,
    /// 2-input Nand gate
    Nand,
    /// 2-input Nor gate
    Nor,
    /// Inverter
    Inv,
    /// Buffer
    Buf,
}

impl GateType {
    /// All gate types
    pub const ALL: [GateType; 6] = [
        GateType::And,
        GateType::Or,
        GateType::Nand,
        GateType::Nor,
        GateType::Inv,
        GateType::Buf,
    ];

    /// Number of inputs taken by a gate of this type
    pub fn nb_inputs(&self) -> usize {
        use GateType::*;
        match self {
            And | Or | Nand | Nor => 2,
            Inv | Buf => 1,
        }
    }

    /// Input value that forces the output of the gate regardless of the other input
    ///
    /// None for single-input gates, where no masking is possible.
    pub fn controlling_value(&self) -> Option<bool> {
        use GateType::*;
        match self {
            And | Nand => Some(false),
            Or | Nor => Some(true),
            Inv | Buf => None,
        }
    }

    /// Returns whether the output is inverted compared to the And/Or/Buf base function
    pub fn is_inverting(&self) -> bool {
        matches!(self, GateType::Nand | GateType::Nor | GateType::Inv)
    }

    /// Compute the output of the gate from its input values
    pub fn eval(&self, values: &[bool]) -> bool {
        use GateType::*;
        debug_assert_eq!(values.len(), self.nb_inputs());
        let base = match self {
            And | Nand => values.iter().all(|v| *v),
            Or | Nor => values.iter().any(|v| *v),
            Inv | Buf => values[0],
        };
        base ^ self.is_inverting()
    }
}

impl FromStr for GateType {
    type Err = String;

    fn from_str(s: &str) -> Result<GateType, String> {
        use GateType::*;
        match s.to_uppercase().as_str() {
            "AND" => Ok(And),
            "OR" => Ok(Or),
            "NAND" => Ok(Nand),
            "NOR" => Ok(Nor),
            "INV" | "NOT" => Ok(Inv),
            "BUF" | "BUFF" => Ok(Buf),
            _ => Err(format!("unknown gate type {s}")),
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use GateType::*;
        let name = match self {
            And => "AND",
            Or => "OR",
            Nand => "NAND",
            Nor => "NOR",
            Inv => "INV",
            Buf => "BUF",
        };
        write!(f, "{name}")
    }
}

/// Logic gate: a type, its input nodes and the node it drives
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Gate {
    gate_type: GateType,
    inputs: Box<[NodeId]>,
    output: NodeId,
}

impl Gate {
    /// Create a gate; the number of inputs is checked when building the netlist
    pub fn new(gate_type: GateType, inputs: &[NodeId], output: NodeId) -> Gate {
        Gate {
            gate_type,
            inputs: inputs.into(),
            output,
        }
    }

    /// Create a 2-input And
    pub fn and(a: NodeId, b: NodeId, output: NodeId) -> Gate {
        Gate::new(GateType::And, &[a, b], output)
    }

    /// Create a 2-input Or
    pub fn or(a: NodeId, b: NodeId, output: NodeId) -> Gate {
        Gate::new(GateType::Or, &[a, b], output)
    }

    /// Create a 2-input Nand
    pub fn nand(a: NodeId, b: NodeId, output: NodeId) -> Gate {
        Gate::new(GateType::Nand, &[a, b], output)
    }

    /// Create a 2-input Nor
    pub fn nor(a: NodeId, b: NodeId, output: NodeId) -> Gate {
        Gate::new(GateType::Nor, &[a, b], output)
    }

    /// Create an inverter
    pub fn inv(a: NodeId, output: NodeId) -> Gate {
        Gate::new(GateType::Inv, &[a], output)
    }

    /// Create a buffer
    pub fn buf(a: NodeId, output: NodeId) -> Gate {
        Gate::new(GateType::Buf, &[a], output)
    }

    /// Type of the gate
    pub fn gate_type(&self) -> GateType {
        self.gate_type
    }

    /// Obtain all nodes feeding this gate
    pub fn dependencies(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Node driven by this gate
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Returns whether the number of inputs matches the gate type
    pub fn has_valid_arity(&self) -> bool {
        self.inputs.len() == self.gate_type.nb_inputs()
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gate_type)?;
        for i in self.inputs.iter() {
            write!(f, " {}", i)?;
        }
        write!(f, " {}", self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::{Gate, GateType};
    use crate::network::NodeId;

    #[test]
    fn test_truth_tables() {
        use GateType::*;
        for a in [false, true] {
            assert_eq!(Inv.eval(&[a]), !a);
            assert_eq!(Buf.eval(&[a]), a);
            for b in [false, true] {
                assert_eq!(And.eval(&[a, b]), a & b);
                assert_eq!(Or.eval(&[a, b]), a | b);
                assert_eq!(Nand.eval(&[a, b]), !(a & b));
                assert_eq!(Nor.eval(&[a, b]), !(a | b));
            }
        }
    }

    #[test]
    fn test_controlling_value() {
        use GateType::*;
        assert_eq!(And.controlling_value(), Some(false));
        assert_eq!(Nand.controlling_value(), Some(false));
        assert_eq!(Or.controlling_value(), Some(true));
        assert_eq!(Nor.controlling_value(), Some(true));
        assert_eq!(Inv.controlling_value(), None);
        assert_eq!(Buf.controlling_value(), None);
        for t in GateType::ALL {
            // A controlling value on any input decides the output alone
            if let Some(c) = t.controlling_value() {
                assert_eq!(t.eval(&[c, false]), t.eval(&[c, true]));
                assert_eq!(t.eval(&[false, c]), t.eval(&[true, c]));
            }
        }
    }

    #[test]
    fn test_parse() {
        for t in GateType::ALL {
            assert_eq!(t.to_string().parse::<GateType>(), Ok(t));
        }
        assert_eq!("not".parse::<GateType>(), Ok(GateType::Inv));
        assert_eq!("Buff".parse::<GateType>(), Ok(GateType::Buf));
        assert!("XOR".parse::<GateType>().is_err());
    }

    #[test]
    fn test_gate() {
        let g = Gate::nand(NodeId::new(1), NodeId::new(2), NodeId::new(5));
        assert_eq!(g.to_string(), "NAND 1 2 5");
        assert!(g.has_valid_arity());
        let bad = Gate::new(GateType::Inv, &[NodeId::new(1), NodeId::new(2)], NodeId::new(3));
        assert!(!bad.has_valid_arity());
    }
}

use std::fmt;

/// Identity of a node (a wire) in the netlist
///
/// Node identities are the small integers used in the circuit description.
/// They index dense arrays, so large gaps waste memory but are allowed.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node identity from its index
    pub fn new(ind: u32) -> NodeId {
        NodeId(ind)
    }

    /// Obtain the index of the node
    pub fn ind(&self) -> usize {
        self.0 as usize
    }

    /// Return the internal representation of the node
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl From<u32> for NodeId {
    fn from(ind: u32) -> NodeId {
        NodeId(ind)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a gate, in declaration order
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct GateId(u32);

impl GateId {
    /// Create a gate identity from its index
    pub fn new(ind: u32) -> GateId {
        GateId(ind)
    }

    /// Obtain the index of the gate
    pub fn ind(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gate #{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{GateId, NodeId};

    #[test]
    fn test_format() {
        assert_eq!(format!("{}", NodeId::new(12)), "12");
        assert_eq!(format!("{}", GateId::new(3)), "gate #3");
        assert_eq!(NodeId::from(7).ind(), 7);
        assert!(NodeId::new(2) < NodeId::new(10));
    }
}

use std::collections::BTreeSet;
use std::fmt;

use crate::network::NodeId;

/// A single stuck-at fault: a node whose value is forced to a constant
///
/// Faults are ordered by node, then by value.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fault {
    /// Node where the fault is located
    pub node: NodeId,
    /// Fault value
    pub value: bool,
}

/// Set of faults, kept sorted
pub type FaultSet = BTreeSet<Fault>;

impl Fault {
    /// Create a fault forcing `node` to `value`
    pub fn new(node: NodeId, value: bool) -> Fault {
        Fault { node, value }
    }

    /// Stuck-at-0 fault on a node
    pub fn stuck_at_0(node: NodeId) -> Fault {
        Fault::new(node, false)
    }

    /// Stuck-at-1 fault on a node
    pub fn stuck_at_1(node: NodeId) -> Fault {
        Fault::new(node, true)
    }

    /// Both stuck-at faults of a node
    pub fn both(node: NodeId) -> [Fault; 2] {
        [Fault::stuck_at_0(node), Fault::stuck_at_1(node)]
    }

    /// Returns whether the fault changes the value of its node, given its fault-free value
    pub fn is_excited_by(&self, golden: bool) -> bool {
        self.value != golden
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s-a-{}", self.node, i32::from(self.value))
    }
}

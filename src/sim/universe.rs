use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::network::{Netlist, NodeId};

use super::Fault;

/// Category of nodes where stuck-at faults are considered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultSites {
    /// Primary inputs only
    PrimaryInputs,
    /// Primary outputs only
    PrimaryOutputs,
    /// Gate outputs only
    GateOutputs,
    /// Primary inputs and primary outputs
    InputsOutputs,
    /// Primary inputs, primary outputs and gate outputs
    All,
}

impl FaultSites {
    /// All categories, in the order of their numbering (1 to 5)
    pub const ALL: [FaultSites; 5] = [
        FaultSites::PrimaryInputs,
        FaultSites::PrimaryOutputs,
        FaultSites::GateOutputs,
        FaultSites::InputsOutputs,
        FaultSites::All,
    ];

    /// Returns whether primary inputs are fault sites
    pub fn has_inputs(&self) -> bool {
        matches!(
            self,
            FaultSites::PrimaryInputs | FaultSites::InputsOutputs | FaultSites::All
        )
    }

    /// Returns whether primary outputs are fault sites
    pub fn has_outputs(&self) -> bool {
        matches!(
            self,
            FaultSites::PrimaryOutputs | FaultSites::InputsOutputs | FaultSites::All
        )
    }

    /// Returns whether gate outputs are fault sites
    pub fn has_gate_outputs(&self) -> bool {
        matches!(self, FaultSites::GateOutputs | FaultSites::All)
    }
}

impl TryFrom<u32> for FaultSites {
    type Error = Error;

    fn try_from(choice: u32) -> Result<FaultSites> {
        match choice {
            1..=5 => Ok(FaultSites::ALL[choice as usize - 1]),
            _ => Err(Error::InvalidSiteSelection(choice.to_string())),
        }
    }
}

impl FromStr for FaultSites {
    type Err = Error;

    fn from_str(s: &str) -> Result<FaultSites> {
        use FaultSites::*;
        match s.trim().to_lowercase().as_str() {
            "1" | "pi" | "inputs" => Ok(PrimaryInputs),
            "2" | "po" | "outputs" => Ok(PrimaryOutputs),
            "3" | "go" | "gates" => Ok(GateOutputs),
            "4" | "pi-po" | "io" => Ok(InputsOutputs),
            "5" | "all" => Ok(All),
            _ => Err(Error::InvalidSiteSelection(s.to_string())),
        }
    }
}

impl fmt::Display for FaultSites {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FaultSites::*;
        let name = match self {
            PrimaryInputs => "primary inputs",
            PrimaryOutputs => "primary outputs",
            GateOutputs => "gate outputs",
            InputsOutputs => "primary inputs and outputs",
            All => "primary inputs, primary outputs and gate outputs",
        };
        write!(f, "{name}")
    }
}

/// All faults considered for a simulation run
///
/// Each fault site hosts a stuck-at-0 and a stuck-at-1 fault. A node belonging to
/// several categories is counted once.
#[derive(Clone, Debug)]
pub struct FaultUniverse {
    sites: Vec<NodeId>,
    is_site: Vec<bool>,
}

impl FaultUniverse {
    /// Build the fault universe for a category of sites
    pub fn new(netlist: &Netlist, sites: FaultSites) -> FaultUniverse {
        let mut nodes = Vec::new();
        if sites.has_inputs() {
            nodes.extend_from_slice(netlist.inputs());
        }
        if sites.has_outputs() {
            nodes.extend_from_slice(netlist.outputs());
        }
        if sites.has_gate_outputs() {
            nodes.extend(netlist.gate_outputs());
        }
        FaultUniverse::from_nodes(netlist, nodes)
    }

    /// Build the fault universe from an arbitrary list of sites
    pub fn from_nodes<I: IntoIterator<Item = NodeId>>(netlist: &Netlist, nodes: I) -> FaultUniverse {
        let mut sites: Vec<NodeId> = nodes.into_iter().collect();
        sites.sort();
        sites.dedup();
        let mut is_site = vec![false; netlist.nb_nodes()];
        for s in &sites {
            assert!(netlist.is_declared(*s), "Fault site {s} is not in the netlist");
            is_site[s.ind()] = true;
        }
        FaultUniverse { sites, is_site }
    }

    /// Number of faults
    pub fn len(&self) -> usize {
        2 * self.sites.len()
    }

    /// Returns whether there is no fault at all
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Fault sites, sorted
    pub fn sites(&self) -> &[NodeId] {
        &self.sites
    }

    /// All faults, sorted
    pub fn faults(&self) -> impl Iterator<Item = Fault> + '_ {
        self.sites.iter().flat_map(|s| Fault::both(*s))
    }

    /// Returns whether the node is a fault site
    pub fn is_site(&self, node: NodeId) -> bool {
        self.is_site.get(node.ind()).copied().unwrap_or(false)
    }

    /// Returns whether the fault is part of the universe
    pub fn contains(&self, fault: &Fault) -> bool {
        self.is_site(fault.node)
    }

    /// The stuck-at-0 and stuck-at-1 faults hosted by a node, if it is a fault site
    pub fn local_faults(&self, node: NodeId) -> Option<[Fault; 2]> {
        if self.is_site(node) {
            Some(Fault::both(node))
        } else {
            None
        }
    }
}

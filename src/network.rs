//! Representation and handling of combinational netlists

mod gates;
pub mod generators;
mod netlist;
mod signal;
pub mod stats;

pub use gates::{Gate, GateType};
pub use netlist::Netlist;
pub use signal::{GateId, NodeId};

//! Deductive fault simulation for combinational circuits
//!
//! This crate computes which single stuck-at faults are detected by a set of test vectors,
//! and the resulting fault coverage.
//! A stuck-at fault forces a wire to a constant 0 or 1. It is detected by a vector when the
//! faulty circuit gives a different value than the fault-free circuit on some primary output.
//!
//! # Usage
//!
//! ```bash
//! # Show available commands
//! dfsim help
//! # Show statistics about a circuit
//! dfsim show c17.txt
//! # Enter vectors one by one, with faults on all nodes
//! dfsim simulate c17.txt --sites all
//! # Apply random vectors until 95% of the faults on gate outputs are detected
//! dfsim coverage c17.txt --sites go --target 95
//! ```
//!
//! Circuits are described with one statement per line:
//! ```text
//!     INPUT 1 2 3 6 7 -1
//!     NAND 1 3 10
//!     NAND 3 6 11
//!     NAND 2 11 16
//!     NAND 11 7 19
//!     NAND 10 16 22
//!     NAND 16 19 23
//!     OUTPUT 22 23 -1
//! ```
//!
//! # Development
//!
//! ## Algorithm
//!
//! Deductive fault simulation computes, in a single pass over the circuit, the value of each
//! node and the list of faults that would flip it.
//! For a gate with controlling value c (0 for And and Nand, 1 for Or and Nor), a fault flips
//! the output if it flips every input at c and no other input.
//! All faults are simulated at once, for the cost of a few set operations per gate.
//!
//! ## Datastructures
//!
//! `Netlist` is an immutable graph of two-input and single-input gates, validated when it is
//! built. The order of evaluation is computed once at that time, so that simulating a vector
//! never needs to search for ready gates.
//!
//! For example, here is a single And gate:
//! ```
//! # use dfsim::{Gate, Netlist, NodeId};
//! let n = NodeId::new;
//! let net = Netlist::new(vec![n(1), n(2)], vec![Gate::and(n(1), n(2), n(3))], vec![n(3)]).unwrap();
//! assert_eq!(dfsim::sim::simulate(&net, &[true, true]).unwrap(), vec![true]);
//! ```
//!
//! A `FaultUniverse` selects the nodes hosting faults. A `Session` then applies vectors
//! and accumulates the detected faults. The results go to a `ReportSink`.

#![warn(missing_docs)]

pub mod error;
pub mod io;
pub mod network;
pub mod report;
pub mod sim;

pub use error::{Error, NetlistError, Result};
pub use network::{stats, Gate, GateId, GateType, Netlist, NodeId};

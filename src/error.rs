//! Error types

use thiserror::Error;

use crate::network::{GateId, GateType, NodeId};

/// The result of a simulation operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned when loading, configuring or running a simulation failed.
#[derive(Debug, Error)]
pub enum Error {
    /// The circuit topology is invalid.
    #[error("malformed netlist: {0}")]
    MalformedNetlist(#[from] NetlistError),

    /// The fault site category is not one of the five recognized ones.
    #[error("invalid fault site selection {0:?}: expected 1-5, pi, po, go, pi-po or all")]
    InvalidSiteSelection(String),

    /// The coverage target is outside of [0, 100).
    #[error("invalid coverage target {0}: must be at least 0 and below 100%")]
    InvalidTarget(f64),

    /// A test vector does not have one bit per primary input.
    #[error("test vector has {actual} bits, expected {expected} (one per primary input)")]
    VectorLengthMismatch {
        /// Number of primary inputs
        expected: usize,
        /// Length of the vector supplied
        actual: usize,
    },

    /// A test vector contains something else than 0 and 1.
    #[error("invalid test vector {0:?}: only 0 and 1 are allowed")]
    InvalidVector(String),

    /// A gate was reached before one of its inputs was assigned.
    ///
    /// This should never happen on a netlist that passed validation.
    #[error(
        "evaluation stuck: node {node} is unassigned{}",
        .gate.map(|g| format!(" when evaluating {g}")).unwrap_or_default()
    )]
    StuckEvaluation {
        /// Gate that could not be evaluated, if any
        gate: Option<GateId>,
        /// Node that is still unassigned
        node: NodeId,
    },

    /// A vector was submitted to a session that is already finished.
    #[error("the simulation session is finished")]
    SessionFinished,

    /// The textual circuit description could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// Line number, starting at 1
        line: usize,
        /// What went wrong
        message: String,
    },

    /// An IO error occured while reading a circuit or vectors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns whether the error only concerns one test vector, which may be entered again
    pub fn is_vector_error(&self) -> bool {
        matches!(
            self,
            Error::VectorLengthMismatch { .. } | Error::InvalidVector(_)
        )
    }
}

/// Reason why a netlist was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetlistError {
    /// A gate reads a node that is neither a primary input nor a gate output.
    #[error("{gate} reads node {node}, which is not driven by anything")]
    UndeclaredNode {
        /// Gate reading the node
        gate: GateId,
        /// Node that is never driven
        node: NodeId,
    },

    /// A primary output is neither a primary input nor a gate output.
    #[error("primary output {0} is not driven by anything")]
    UndeclaredOutput(NodeId),

    /// A node is declared twice as a primary input.
    #[error("node {0} is declared twice as a primary input")]
    DuplicateInput(NodeId),

    /// A node is driven by a gate and is also a primary input.
    #[error("node {node} is a primary input but is also driven by {gate}")]
    DrivenInput {
        /// Primary input node
        node: NodeId,
        /// Gate driving it
        gate: GateId,
    },

    /// A node is driven by two different gates.
    #[error("node {node} is driven by both {first} and {second}")]
    MultipleDrivers {
        /// Node driven twice
        node: NodeId,
        /// First driver
        first: GateId,
        /// Second driver
        second: GateId,
    },

    /// A gate does not have the number of inputs its type requires.
    #[error("{gate} is a {gate_type} gate with {actual} inputs, expected {expected}")]
    WrongArity {
        /// Offending gate
        gate: GateId,
        /// Type of the gate
        gate_type: GateType,
        /// Number of inputs required by the type
        expected: usize,
        /// Number of inputs given
        actual: usize,
    },

    /// The gates form a combinational loop through this node.
    #[error("combinational loop through node {0}")]
    CombinationalLoop(NodeId),
}

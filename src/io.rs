//! Read circuits and test vectors from files

mod netlist;
mod vectors;

use std::fs::File;
use std::path::Path;

pub use netlist::{read_netlist, write_netlist};
pub use vectors::{format_vector, parse_vector, read_vectors, PromptVectors};

use crate::error::Result;
use crate::Netlist;

/// Read a netlist from a file
pub fn read_netlist_file(path: &Path) -> Result<Netlist> {
    let f = File::open(path)?;
    read_netlist(f)
}

/// Read test vectors from a file, one per line
pub fn read_vector_file(path: &Path) -> Result<Vec<Vec<bool>>> {
    let f = File::open(path)?;
    read_vectors(f)
}

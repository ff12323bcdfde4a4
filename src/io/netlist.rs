//! IO for textual netlists

use std::io::{BufRead, BufReader, Read, Write};

use fxhash::FxHashSet;
use tracing::warn;

use crate::error::{Error, Result};
use crate::network::{Gate, GateType, Netlist, NodeId};

fn parse_error(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

fn parse_node(line: usize, token: &str) -> Result<NodeId> {
    token
        .parse::<u32>()
        .map(NodeId::new)
        .map_err(|_| parse_error(line, format!("invalid node identifier {token:?}")))
}

/// Parse the node list of an INPUT or OUTPUT line, with its optional -1 terminator
fn parse_node_list<'a, I>(line: usize, tokens: I) -> Result<Vec<NodeId>>
where
    I: Iterator<Item = &'a str>,
{
    let tokens: Vec<&str> = tokens.collect();
    let tokens = match tokens.split_last() {
        Some((&"-1", rest)) => rest,
        _ => &tokens[..],
    };
    tokens.iter().map(|t| parse_node(line, t)).collect()
}

/// Read a netlist in the simple textual format used by fault simulation exercises
///
/// Each line holds a keyword followed by node identifiers:
/// ```text
///     # This is a comment
///     INPUT 1 2 3 -1
///     NAND 1 2 4
///     INV 3 5
///     OR 4 5 6
///     OUTPUT 6 -1
/// ```
/// Gates list their inputs then their output. Gate types are AND, OR, NAND, NOR,
/// INV (or NOT) and BUF (or BUFF), in any case. The trailing -1 is optional.
pub fn read_netlist<R: Read>(r: R) -> Result<Netlist> {
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut seen_outputs = FxHashSet::default();
    let mut gates = Vec::new();
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let line = i + 1;
        let l = l?;
        let t = l.split('#').next().unwrap_or_default().trim();
        if t.is_empty() {
            continue;
        }
        let mut tokens = t.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        match keyword.to_uppercase().as_str() {
            "INPUT" => inputs.extend(parse_node_list(line, tokens)?),
            "OUTPUT" => {
                for o in parse_node_list(line, tokens)? {
                    if seen_outputs.insert(o) {
                        outputs.push(o);
                    } else {
                        warn!("line {line}: output {o} declared twice, ignoring");
                    }
                }
            }
            _ => {
                let gate_type: GateType = keyword
                    .parse()
                    .map_err(|e: String| parse_error(line, e))?;
                let nodes = tokens
                    .map(|t| parse_node(line, t))
                    .collect::<Result<Vec<NodeId>>>()?;
                if nodes.len() != gate_type.nb_inputs() + 1 {
                    return Err(parse_error(
                        line,
                        format!(
                            "{gate_type} gate expects {} inputs and an output, got {} nodes",
                            gate_type.nb_inputs(),
                            nodes.len()
                        ),
                    ));
                }
                let (deps, output) = nodes.split_at(gate_type.nb_inputs());
                gates.push(Gate::new(gate_type, deps, output[0]));
            }
        }
    }
    Ok(Netlist::new(inputs, gates, outputs)?)
}

/// Write a netlist in the format read by [`read_netlist`]
pub fn write_netlist<W: Write>(w: &mut W, netlist: &Netlist) -> std::io::Result<()> {
    write!(w, "INPUT")?;
    for i in netlist.inputs() {
        write!(w, " {i}")?;
    }
    writeln!(w, " -1")?;
    for (_, g) in netlist.gates() {
        writeln!(w, "{g}")?;
    }
    write!(w, "OUTPUT")?;
    for o in netlist.outputs() {
        write!(w, " {o}")?;
    }
    writeln!(w, " -1")
}

#[cfg(test)]
mod tests {
    use super::{read_netlist, write_netlist};
    use crate::error::{Error, NetlistError};
    use crate::network::generators::testcases;
    use crate::network::{GateType, NodeId};

    const C17: &str = "# ISCAS c17
INPUT 1 2 3 6 7 -1
NAND 1 3 10
NAND 3 6 11
NAND 2 11 16
NAND 11 7 19
NAND 10 16 22
NAND 16 19 23
OUTPUT 22 23 -1
";

    #[test]
    fn test_basic_read() {
        let net = read_netlist(C17.as_bytes()).unwrap();
        assert_eq!(net.nb_inputs(), 5);
        assert_eq!(net.nb_outputs(), 2);
        assert_eq!(net.nb_gates(), 6);
        assert_eq!(net.input(3), NodeId::new(6));
        assert_eq!(net.output(1), NodeId::new(23));
        assert!(net.gates().all(|(_, g)| g.gate_type() == GateType::Nand));
    }

    #[test]
    fn test_aliases_and_comments() {
        let example = "input 1 2
            not 1 3   # inverter
            Buff 2 4
            nor 3 4 5

            OUTPUT 5";
        let net = read_netlist(example.as_bytes()).unwrap();
        assert_eq!(net.nb_gates(), 3);
        let types: Vec<_> = net.gates().map(|(_, g)| g.gate_type()).collect();
        assert_eq!(types, vec![GateType::Inv, GateType::Buf, GateType::Nor]);
    }

    #[test]
    fn test_duplicate_output() {
        let net = read_netlist("INPUT 1 2\nAND 1 2 3\nOUTPUT 3 3".as_bytes()).unwrap();
        assert_eq!(net.nb_outputs(), 1);
    }

    #[test]
    fn test_parse_errors() {
        let res = read_netlist("INPUT 1 2\nXOR 1 2 3\nOUTPUT 3".as_bytes());
        assert!(matches!(res, Err(Error::Parse { line: 2, .. })));
        let res = read_netlist("INPUT 1 a\n".as_bytes());
        assert!(matches!(res, Err(Error::Parse { line: 1, .. })));
        let res = read_netlist("INPUT 1 2\n\nAND 1 3\n".as_bytes());
        assert!(matches!(res, Err(Error::Parse { line: 3, .. })));
    }

    #[test]
    fn test_malformed() {
        let res = read_netlist("INPUT 1\nAND 1 2 3\nOUTPUT 3".as_bytes());
        assert!(matches!(
            res,
            Err(Error::MalformedNetlist(NetlistError::UndeclaredNode { .. }))
        ));
        let res = read_netlist("INPUT 1\nAND 1 3 2\nINV 2 3\nOUTPUT 3".as_bytes());
        assert!(matches!(
            res,
            Err(Error::MalformedNetlist(NetlistError::CombinationalLoop(_)))
        ));
    }

    #[test]
    fn test_write_read() {
        let net = testcases::c17();
        let mut buf = Vec::new();
        write_netlist(&mut buf, &net).unwrap();
        let read = read_netlist(buf.as_slice()).unwrap();
        assert_eq!(read.inputs(), net.inputs());
        assert_eq!(read.outputs(), net.outputs());
        assert_eq!(read.nb_gates(), net.nb_gates());
    }
}

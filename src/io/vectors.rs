//! IO for test vectors
//!
//! A vector is a string of 0 and 1, one bit per primary input in declaration order.
//! It may be prefixed by its number, as in `3: 01101`.

use std::io::{BufRead, BufReader, Read, Write};

use crate::error::{Error, Result};
use crate::sim::VectorSource;

/// Parse a single test vector
pub fn parse_vector(s: &str) -> Result<Vec<bool>> {
    let t = s.trim();
    let bits = match t.split_once(':') {
        Some((num, bits)) if num.trim().chars().all(|c| c.is_ascii_digit()) => bits,
        _ => t,
    };
    let mut ret = Vec::new();
    for c in bits.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '0' => ret.push(false),
            '1' => ret.push(true),
            _ => return Err(Error::InvalidVector(t.to_string())),
        }
    }
    if ret.is_empty() {
        return Err(Error::InvalidVector(t.to_string()));
    }
    Ok(ret)
}

/// Format a test vector as a string of 0 and 1
pub fn format_vector(v: &[bool]) -> String {
    v.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

/// Read test vectors, one per line
///
/// Blank lines and lines starting with # are ignored. Lengths are not checked here.
pub fn read_vectors<R: Read>(r: R) -> Result<Vec<Vec<bool>>> {
    let mut ret = Vec::new();
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let l = l?;
        let t = l.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let v = parse_vector(t).map_err(|e| Error::Parse {
            line: i + 1,
            message: e.to_string(),
        })?;
        ret.push(v);
    }
    Ok(ret)
}

/// Vectors entered by an operator, with a prompt before each one
///
/// The session stops on end of input, on an empty line, or on `q`, `n` and similar answers.
pub struct PromptVectors<R: BufRead, W: Write> {
    input: R,
    prompt: W,
}

impl<R: BufRead, W: Write> PromptVectors<R, W> {
    /// Read vectors from `input`, writing prompts to `prompt`
    pub fn new(input: R, prompt: W) -> Self {
        PromptVectors { input, prompt }
    }

    fn read_line(&mut self, nb_inputs: usize) -> std::io::Result<Option<String>> {
        write!(self.prompt, "Input vector ({nb_inputs} inputs): ")?;
        self.prompt.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> VectorSource for PromptVectors<R, W> {
    fn next_vector(&mut self, nb_inputs: usize) -> Option<Result<Vec<bool>>> {
        loop {
            let line = match self.read_line(nb_inputs) {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => return Some(Err(e.into())),
            };
            let t = line.trim();
            if t.starts_with('#') {
                continue;
            }
            return match t.to_lowercase().as_str() {
                "" | "q" | "quit" | "exit" | "n" | "no" => None,
                _ => Some(parse_vector(t)),
            };
        }
    }
}

//! Streaming reader for input vectors.
//!
//! One vector per line, one character per primary input: `0`, `1`, `x` or
//! `X`. A line reading `END` stops the stream, as does end of input.

use crate::error::NetlistError;
use levsim_common::Logic;
use std::io::BufRead;

/// Line that terminates a vector stream.
pub const END_MARKER: &str = "END";

/// Iterator over the vectors of a stream.
///
/// Yields one `Vec<Logic>` per line. Length checking against the circuit's
/// input count is left to the simulator.
pub struct VectorReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> VectorReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            done: false,
        }
    }

    /// Returns the number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for VectorReader<R> {
    type Item = Result<Vec<Logic>, NetlistError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                Some(Ok(line)) => line,
            };
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == END_MARKER {
                self.done = true;
                return None;
            }
            return Some(parse_vector(line, self.line_no));
        }
    }
}

/// Parses one vector line. `z` is not an input value.
pub fn parse_vector(line: &str, line_no: usize) -> Result<Vec<Logic>, NetlistError> {
    line.chars()
        .enumerate()
        .map(|(col, ch)| match ch {
            '0' => Ok(Logic::Zero),
            '1' => Ok(Logic::One),
            'x' | 'X' => Ok(Logic::X),
            _ => Err(NetlistError::InvalidVectorChar {
                line: line_no,
                column: col + 1,
                ch,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Logic::*;

    fn read_all(text: &str) -> Vec<Result<Vec<Logic>, NetlistError>> {
        VectorReader::new(text.as_bytes()).collect()
    }

    #[test]
    fn stops_at_end_marker() {
        let vectors = read_all("01\nx1\nEND\n11\n");
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].as_ref().unwrap(), &vec![Zero, One]);
        assert_eq!(vectors[1].as_ref().unwrap(), &vec![X, One]);
    }

    #[test]
    fn stops_at_end_of_stream() {
        let vectors = read_all("1X0\r\n\n010");
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].as_ref().unwrap(), &vec![One, X, Zero]);
    }

    #[test]
    fn rejects_floating_input() {
        let mut reader = VectorReader::new("01\n0z\n".as_bytes());
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            NetlistError::InvalidVectorChar {
                line: 2,
                column: 2,
                ch: 'z'
            }
        ));
        assert_eq!(reader.line_number(), 2);
    }

    #[test]
    fn empty_stream() {
        assert!(read_all("").is_empty());
        assert!(read_all("END\n").is_empty());
    }
}

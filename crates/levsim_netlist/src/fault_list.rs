//! Stuck-at fault records and the reader for fault-list (`.eqf`) text.
//!
//! Each non-blank line is `gate_id net_index stuck_at`. Net 0 is the gate
//! output and net `i > 0` is fan-in `i - 1`.

use crate::error::NetlistError;
use levsim_common::Logic;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

const FORMAT: &str = "eqf";

/// One stuck-at fault as declared by a fault list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// 1-based target gate id.
    pub gate: u32,
    /// Target net: 0 for the output, `i` for fan-in `i - 1`.
    pub net: u32,
    /// The value the net is stuck at, `Zero` or `One`.
    pub stuck_at: Logic,
}

impl FaultRecord {
    /// Creates a fault record from a stuck-at bit.
    pub fn new(gate: u32, net: u32, stuck_at: bool) -> Self {
        Self {
            gate,
            net,
            stuck_at: Logic::from_bool(stuck_at),
        }
    }
}

/// Parses fault-list text held in memory.
pub fn parse_eqf(text: &str) -> Result<Vec<FaultRecord>, NetlistError> {
    read_eqf(text.as_bytes())
}

/// Reads fault-list text from a stream, in file order.
pub fn read_eqf(reader: impl BufRead) -> Result<Vec<FaultRecord>, NetlistError> {
    let mut faults = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        let [gate, net, sa, ..] = fields[..] else {
            return Err(NetlistError::Malformed {
                format: FORMAT,
                line: line_no,
                reason: "expected 'gate net stuck_at'".to_string(),
            });
        };
        let number = |token: &str| {
            token.parse::<u32>().map_err(|_| NetlistError::Malformed {
                format: FORMAT,
                line: line_no,
                reason: format!("invalid number '{token}'"),
            })
        };
        let stuck_at = match sa {
            "0" => false,
            "1" => true,
            other => {
                return Err(NetlistError::Malformed {
                    format: FORMAT,
                    line: line_no,
                    reason: format!("stuck-at value must be 0 or 1, found '{other}'"),
                })
            }
        };
        faults.push(FaultRecord::new(number(gate)?, number(net)?, stuck_at));
    }
    tracing::debug!(faults = faults.len(), "read fault list");
    Ok(faults)
}

//! Reader for leveled netlist (`.lev`) text.
//!
//! Layout:
//!
//! ```text
//! N                       # N - 1 gate lines follow
//! <ignored line>
//! id kind raw_level fanin_count fanin... [ignored trailing fields]
//! ```

use crate::error::NetlistError;
use crate::kind::GateKind;
use crate::netlist::{GateRecord, Netlist};
use std::io::BufRead;

const FORMAT: &str = "lev";

/// Parses netlist text held in memory.
pub fn parse_lev(text: &str) -> Result<Netlist, NetlistError> {
    read_lev(text.as_bytes())
}

/// Reads netlist text from a stream.
pub fn read_lev(reader: impl BufRead) -> Result<Netlist, NetlistError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|l| (i + 1, l)));

    let (header_no, header) = next_nonblank(&mut lines)?.ok_or(NetlistError::Malformed {
        format: FORMAT,
        line: 1,
        reason: "empty netlist".to_string(),
    })?;
    let count_token = header.split_whitespace().next().unwrap_or_default();
    let declared: usize = parse_field(count_token, header_no, "gate count")?;
    let declared = declared.saturating_sub(1);

    // The line after the header carries nothing the simulator uses.
    lines.next().transpose()?;

    let mut records = Vec::with_capacity(declared);
    while records.len() < declared {
        let Some((line_no, line)) = next_nonblank(&mut lines)? else {
            break;
        };
        records.push(parse_gate_line(&line, line_no)?);
    }
    if records.len() != declared {
        return Err(NetlistError::GateCountMismatch {
            declared,
            found: records.len(),
        });
    }
    tracing::debug!(gates = records.len(), "read netlist");
    Netlist::from_records(records)
}

fn next_nonblank(
    lines: &mut impl Iterator<Item = std::io::Result<(usize, String)>>,
) -> Result<Option<(usize, String)>, NetlistError> {
    for item in lines {
        let (no, line) = item?;
        if !line.trim().is_empty() {
            return Ok(Some((no, line)));
        }
    }
    Ok(None)
}

fn parse_gate_line(line: &str, line_no: usize) -> Result<GateRecord, NetlistError> {
    let mut fields = line.split_whitespace();
    let mut next = |what: &str| -> Result<u32, NetlistError> {
        let token = fields.next().ok_or_else(|| NetlistError::Malformed {
            format: FORMAT,
            line: line_no,
            reason: format!("missing {what}"),
        })?;
        parse_field(token, line_no, what)
    };

    let id = next("gate id")?;
    let code = next("gate kind")?;
    let raw_level = next("level")?;
    let fanin_count = next("fan-in count")?;
    let fanin = (0..fanin_count)
        .map(|_| next("fan-in id"))
        .collect::<Result<Vec<_>, _>>()?;

    let kind = GateKind::from_code(code).ok_or(NetlistError::UnknownGateKind { gate: id, code })?;
    Ok(GateRecord::from_raw_level(id, kind, raw_level, fanin))
}

fn parse_field<T: std::str::FromStr>(
    token: &str,
    line: usize,
    what: &str,
) -> Result<T, NetlistError> {
    token.parse().map_err(|_| NetlistError::Malformed {
        format: FORMAT,
        line,
        reason: format!("invalid {what} '{token}'"),
    })
}

//! Per-kind gate delays and the reader for delay (`.dly`) text.
//!
//! Each non-blank line is `<kind token> <delay>`. The token is matched
//! case-insensitively against a keyword table: an exact keyword wins, and
//! otherwise the longest keyword contained in the token does. `NAND2X1`
//! therefore resolves to NAND and never to AND.

use crate::error::NetlistError;
use crate::kind::GateKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Delay applied to kinds with no table entry.
pub const DEFAULT_DELAY: u32 = 1;

const FORMAT: &str = "dly";

const KEYWORDS: &[(&str, GateKind)] = &[
    ("input", GateKind::Input),
    ("pi", GateKind::Input),
    ("output", GateKind::Output),
    ("po", GateKind::Output),
    ("xnor", GateKind::Xnor),
    ("xor", GateKind::Xor),
    ("nand", GateKind::Nand),
    ("and", GateKind::And),
    ("nor", GateKind::Nor),
    ("or", GateKind::Or),
    ("not", GateKind::Not),
    ("inv", GateKind::Not),
    ("buf", GateKind::Buf),
    ("buffer", GateKind::Buf),
    ("dff", GateKind::Dff),
    ("flipflop", GateKind::Dff),
    ("tie1", GateKind::TieOne),
    ("tieone", GateKind::TieOne),
    ("tie0", GateKind::TieZero),
    ("tiezero", GateKind::TieZero),
    ("tiex", GateKind::TieX),
    ("tiez", GateKind::TieZ),
    ("mux", GateKind::Mux2),
    ("mux2", GateKind::Mux2),
    ("tristate", GateKind::Tristate),
    ("tribuf", GateKind::Tristate),
];

/// Resolves a delay-file token to a gate kind.
pub fn kind_for_token(token: &str) -> Option<GateKind> {
    let token = token.to_ascii_lowercase();
    if let Some(&(_, kind)) = KEYWORDS.iter().find(|(kw, _)| *kw == token) {
        return Some(kind);
    }
    KEYWORDS
        .iter()
        .filter(|(kw, _)| token.contains(kw))
        .fold(None::<(&str, GateKind)>, |best, &(kw, kind)| match best {
            Some((b, _)) if b.len() >= kw.len() => best,
            _ => Some((kw, kind)),
        })
        .map(|(_, kind)| kind)
}

/// Delay in time units per gate kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayTable {
    delays: BTreeMap<GateKind, u32>,
}

impl DelayTable {
    /// Creates an empty table; every kind gets [`DEFAULT_DELAY`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay for a kind, replacing any earlier entry.
    pub fn set(&mut self, kind: GateKind, delay: u32) {
        self.delays.insert(kind, delay);
    }

    /// Returns the delay for a kind.
    pub fn delay_for(&self, kind: GateKind) -> u32 {
        self.delays.get(&kind).copied().unwrap_or(DEFAULT_DELAY)
    }

    /// Returns the largest delay any kind can have.
    pub fn max_delay(&self) -> u32 {
        self.delays
            .values()
            .copied()
            .max()
            .map_or(DEFAULT_DELAY, |m| m.max(DEFAULT_DELAY))
    }

    /// Returns the number of explicit entries.
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Returns `true` if no kind has an explicit entry.
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }
}

/// Parses delay text held in memory.
pub fn parse_dly(text: &str) -> Result<DelayTable, NetlistError> {
    read_dly(text.as_bytes())
}

/// Reads delay text from a stream.
pub fn read_dly(reader: impl BufRead) -> Result<DelayTable, NetlistError> {
    let mut table = DelayTable::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let mut fields = line.split_whitespace();
        let Some(token) = fields.next() else {
            continue;
        };
        let kind = kind_for_token(token).ok_or_else(|| NetlistError::UnknownDelayKind {
            line: line_no,
            token: token.to_string(),
        })?;
        let delay = fields
            .next()
            .and_then(|d| d.parse::<u32>().ok())
            .ok_or_else(|| NetlistError::Malformed {
                format: FORMAT,
                line: line_no,
                reason: format!("expected integer delay after '{token}'"),
            })?;
        table.set(kind, delay);
    }
    tracing::debug!(entries = table.len(), max = table.max_delay(), "read delay table");
    Ok(table)
}

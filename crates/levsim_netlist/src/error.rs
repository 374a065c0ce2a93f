//! Error types for reading netlist, delay, fault-list and vector data.

use crate::kind::GateKind;
use std::path::PathBuf;

/// Errors produced while reading or validating circuit description data.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// An I/O error occurred while reading an input stream.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A required circuit file does not exist.
    #[error("missing file: {}", .0.display())]
    MissingFile(PathBuf),

    /// A line could not be parsed.
    #[error("{format} line {line}: {reason}")]
    Malformed {
        /// Which kind of file the line came from (`lev`, `dly`, `eqf`).
        format: &'static str,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// A gate declares a kind code outside the known set.
    #[error("gate {gate}: unknown gate kind code {code}")]
    UnknownGateKind {
        /// 1-based gate id.
        gate: u32,
        /// The offending kind code.
        code: u32,
    },

    /// A flip-flop declares other than exactly one fan-in.
    #[error("gate {gate}: flip-flop must have exactly one fan-in, found {count}")]
    DffFanin {
        /// 1-based gate id.
        gate: u32,
        /// Number of declared fan-ins.
        count: usize,
    },

    /// A gate declares fewer fan-ins than its kind reads.
    #[error("gate {gate}: {kind} needs at least {expected} fan-in(s), found {found}")]
    Arity {
        /// 1-based gate id.
        gate: u32,
        /// The gate's kind.
        kind: GateKind,
        /// Minimum fan-in count for the kind.
        expected: usize,
        /// Number of declared fan-ins.
        found: usize,
    },

    /// A gate record's id does not match its position in the netlist.
    #[error("gate record {position} carries id {id}; ids must be dense and 1-based")]
    NonDenseId {
        /// 1-based position of the record.
        position: usize,
        /// The id found there.
        id: u32,
    },

    /// A fan-in refers to a gate that does not exist.
    #[error("gate {gate}: fan-in {fanin} does not name a gate")]
    UnknownFanin {
        /// 1-based gate id.
        gate: u32,
        /// The unresolved fan-in id.
        fanin: u32,
    },

    /// A delay-file token names no gate kind.
    #[error("dly line {line}: unrecognised gate kind '{token}'")]
    UnknownDelayKind {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// An input vector holds a character other than `0`, `1`, `x` or `X`.
    #[error("vector line {line}, column {column}: invalid input character '{ch}'")]
    InvalidVectorChar {
        /// 1-based line number.
        line: usize,
        /// 1-based column.
        column: usize,
        /// The offending character.
        ch: char,
    },

    /// The netlist header declares a different number of gates than follow it.
    #[error("netlist declares {declared} gates but {found} were read")]
    GateCountMismatch {
        /// Gate count from the header.
        declared: usize,
        /// Gate lines actually present.
        found: usize,
    },
}

//! Gate kinds and their numeric netlist codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of gate kinds a netlist may declare.
///
/// The discriminants are not the file codes; use [`GateKind::from_code`] and
/// [`GateKind::code`] to convert.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum GateKind {
    /// Primary input; value is set externally each cycle.
    Input,
    /// Primary output; passes fan-in 0 through.
    Output,
    /// Exclusive OR of the first two fan-ins.
    Xor,
    /// Inverted [`GateKind::Xor`].
    Xnor,
    /// D flip-flop; latches its single fan-in.
    Dff,
    /// AND across all fan-ins.
    And,
    /// Inverted [`GateKind::And`].
    Nand,
    /// OR across all fan-ins.
    Or,
    /// Inverted [`GateKind::Or`].
    Nor,
    /// Inverter.
    Not,
    /// Buffer.
    Buf,
    /// Constant 1.
    TieOne,
    /// Constant 0.
    TieZero,
    /// Constant X.
    TieX,
    /// Constant Z.
    TieZ,
    /// Two-way multiplexer: `[select, d0, d1]`.
    Mux2,
    /// Tri-state buffer: `[data, enable]`, active-low enable.
    Tristate,
}

impl GateKind {
    /// Every kind, in code order.
    pub const ALL: [GateKind; 17] = [
        GateKind::Input,
        GateKind::Output,
        GateKind::Xor,
        GateKind::Xnor,
        GateKind::Dff,
        GateKind::And,
        GateKind::Nand,
        GateKind::Or,
        GateKind::Nor,
        GateKind::Not,
        GateKind::Buf,
        GateKind::TieOne,
        GateKind::TieZero,
        GateKind::TieX,
        GateKind::TieZ,
        GateKind::Mux2,
        GateKind::Tristate,
    ];

    /// Maps a netlist kind code to a kind.
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => GateKind::Input,
            2 => GateKind::Output,
            3 => GateKind::Xor,
            4 => GateKind::Xnor,
            5 => GateKind::Dff,
            6 => GateKind::And,
            7 => GateKind::Nand,
            8 => GateKind::Or,
            9 => GateKind::Nor,
            10 => GateKind::Not,
            11 => GateKind::Buf,
            12 => GateKind::TieOne,
            13 => GateKind::TieZero,
            14 => GateKind::TieX,
            15 => GateKind::TieZ,
            16 => GateKind::Mux2,
            21 => GateKind::Tristate,
            _ => return None,
        })
    }

    /// Returns the netlist kind code.
    pub fn code(self) -> u32 {
        match self {
            GateKind::Input => 1,
            GateKind::Output => 2,
            GateKind::Xor => 3,
            GateKind::Xnor => 4,
            GateKind::Dff => 5,
            GateKind::And => 6,
            GateKind::Nand => 7,
            GateKind::Or => 8,
            GateKind::Nor => 9,
            GateKind::Not => 10,
            GateKind::Buf => 11,
            GateKind::TieOne => 12,
            GateKind::TieZero => 13,
            GateKind::TieX => 14,
            GateKind::TieZ => 15,
            GateKind::Mux2 => 16,
            GateKind::Tristate => 21,
        }
    }

    /// Returns the upper-case display name.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Input => "INPUT",
            GateKind::Output => "OUTPUT",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
            GateKind::Dff => "DFF",
            GateKind::And => "AND",
            GateKind::Nand => "NAND",
            GateKind::Or => "OR",
            GateKind::Nor => "NOR",
            GateKind::Not => "NOT",
            GateKind::Buf => "BUF",
            GateKind::TieOne => "TIE1",
            GateKind::TieZero => "TIE0",
            GateKind::TieX => "TIEX",
            GateKind::TieZ => "TIEZ",
            GateKind::Mux2 => "MUX2",
            GateKind::Tristate => "TRISTATE",
        }
    }

    /// Returns `true` for the four constant sources.
    pub fn is_tie(self) -> bool {
        matches!(
            self,
            GateKind::TieOne | GateKind::TieZero | GateKind::TieX | GateKind::TieZ
        )
    }

    /// Returns `true` for the two sources of a known constant, TIE0 and TIE1.
    pub fn is_constant(self) -> bool {
        matches!(self, GateKind::TieOne | GateKind::TieZero)
    }

    /// Returns `true` for the flip-flop kind.
    pub fn is_state(self) -> bool {
        self == GateKind::Dff
    }

    /// Minimum number of fan-ins the kind reads.
    pub fn min_fanin(self) -> usize {
        match self {
            GateKind::Input
            | GateKind::TieOne
            | GateKind::TieZero
            | GateKind::TieX
            | GateKind::TieZ => 0,
            GateKind::Output
            | GateKind::Dff
            | GateKind::Not
            | GateKind::Buf
            | GateKind::And
            | GateKind::Nand
            | GateKind::Or
            | GateKind::Nor => 1,
            GateKind::Xor | GateKind::Xnor | GateKind::Tristate => 2,
            GateKind::Mux2 => 3,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

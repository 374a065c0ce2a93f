//! Four-valued logic values with Z-absorbing gate operators.
//!
//! The operators here are the ones the gate evaluator folds across fan-in.
//! They differ from IEEE 1164 in one respect: a high-impedance operand carries
//! no information and is skipped, so `Z & v == v`, `Z | v == v` and
//! `Z ^ v == v`. Inversion keeps `Z` as `Z`, which makes NAND/NOR/XNOR the
//! exact complement of AND/OR/XOR for every input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A single four-valued logic value.
///
/// - `Zero`: logic low (driven 0)
/// - `One`: logic high (driven 1)
/// - `X`: unknown or uninitialized value
/// - `Z`: high-impedance (floating, not driven)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Logic {
    /// Logic low (0).
    Zero = 0,
    /// Logic high (1).
    One = 1,
    /// Unknown or uninitialized.
    #[default]
    X = 2,
    /// High-impedance (tri-state).
    Z = 3,
}

impl Logic {
    /// Converts a character to a [`Logic`] value.
    ///
    /// Accepts '0', '1', 'x'/'X', and 'z'/'Z'.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Logic::Zero),
            '1' => Some(Logic::One),
            'x' | 'X' => Some(Logic::X),
            'z' | 'Z' => Some(Logic::Z),
            _ => None,
        }
    }

    /// Maps a stuck-at bit to its driven value.
    pub fn from_bool(bit: bool) -> Self {
        if bit {
            Logic::One
        } else {
            Logic::Zero
        }
    }

    /// Returns the display character for this value.
    pub fn as_char(self) -> char {
        match self {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'X',
            Logic::Z => 'Z',
        }
    }

    /// Returns `true` for the two driven values `0` and `1`.
    pub fn is_known(self) -> bool {
        matches!(self, Logic::Zero | Logic::One)
    }

    /// Returns the bit for a driven value, `None` for `X` and `Z`.
    pub fn to_bit(self) -> Option<bool> {
        match self {
            Logic::Zero => Some(false),
            Logic::One => Some(true),
            Logic::X | Logic::Z => None,
        }
    }

    /// Folds `&` over a sequence. An empty sequence yields `X`.
    pub fn and_all(values: impl IntoIterator<Item = Logic>) -> Logic {
        fold(values, |a, b| a & b)
    }

    /// Folds `|` over a sequence. An empty sequence yields `X`.
    pub fn or_all(values: impl IntoIterator<Item = Logic>) -> Logic {
        fold(values, |a, b| a | b)
    }

    /// Folds `^` over a sequence. An empty sequence yields `X`.
    pub fn xor_all(values: impl IntoIterator<Item = Logic>) -> Logic {
        fold(values, |a, b| a ^ b)
    }
}

fn fold(values: impl IntoIterator<Item = Logic>, op: impl Fn(Logic, Logic) -> Logic) -> Logic {
    let mut iter = values.into_iter();
    match iter.next() {
        Some(first) => iter.fold(first, op),
        None => Logic::X,
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// AND truth table (row = lhs, column = rhs):
/// ```text
///     0  1  X  Z
/// 0 | 0  0  0  0
/// 1 | 0  1  X  1
/// X | 0  X  X  X
/// Z | 0  1  X  Z
/// ```
impl BitAnd for Logic {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Z, v) | (v, Z) => v,
            (Zero, _) | (_, Zero) => Zero,
            (One, One) => One,
            _ => X,
        }
    }
}

/// OR truth table:
/// ```text
///     0  1  X  Z
/// 0 | 0  1  X  0
/// 1 | 1  1  1  1
/// X | X  1  X  X
/// Z | 0  1  X  Z
/// ```
impl BitOr for Logic {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Z, v) | (v, Z) => v,
            (One, _) | (_, One) => One,
            (Zero, Zero) => Zero,
            _ => X,
        }
    }
}

/// XOR truth table:
/// ```text
///     0  1  X  Z
/// 0 | 0  1  X  0
/// 1 | 1  0  X  1
/// X | X  X  X  X
/// Z | 0  1  X  Z
/// ```
impl BitXor for Logic {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Z, v) | (v, Z) => v,
            (X, _) | (_, X) => X,
            (a, b) if a == b => Zero,
            _ => One,
        }
    }
}

/// NOT: `!0 = 1`, `!1 = 0`, `!X = X`, `!Z = Z`.
impl Not for Logic {
    type Output = Self;

    fn not(self) -> Self {
        use Logic::*;
        match self {
            Zero => One,
            One => Zero,
            X => X,
            Z => Z,
        }
    }
}

//! Packed vectors of four-valued logic values for output and state snapshots.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector of [`Logic`] values packed two bits per value.
///
/// Used for per-cycle snapshots of primary outputs and flip-flop state.
/// Position 0 is the first primary output (or first flip-flop) in netlist
/// order, and is printed first by `Display`.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LogicVec {
    width: u32,
    /// Two bits per position, using the `Logic` discriminants.
    data: Vec<u64>,
}

const VALUES_PER_WORD: u32 = 32;

impl LogicVec {
    /// Creates a new `LogicVec` of the given width, initialized to all `X`.
    pub fn new(width: u32) -> Self {
        let mut v = Self {
            width,
            data: vec![0; word_count(width)],
        };
        for i in 0..width {
            v.set(i, Logic::X);
        }
        v
    }

    /// Returns the number of positions.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns `true` for a zero-width snapshot, e.g. the state of a purely
    /// combinational circuit.
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Reads one position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`width`](Self::width).
    pub fn get(&self, index: u32) -> Logic {
        let (word, shift) = self.locate(index);
        match (self.data[word] >> shift) & 0b11 {
            0 => Logic::Zero,
            1 => Logic::One,
            2 => Logic::X,
            _ => Logic::Z,
        }
    }

    /// Writes one position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`width`](Self::width).
    pub fn set(&mut self, index: u32, value: Logic) {
        let (word, shift) = self.locate(index);
        let cleared = self.data[word] & !(0b11u64 << shift);
        self.data[word] = cleared | ((value as u64) << shift);
    }

    fn locate(&self, index: u32) -> (usize, u32) {
        assert!(index < self.width, "position {index} past width {}", self.width);
        (
            (index / VALUES_PER_WORD) as usize,
            (index % VALUES_PER_WORD) * 2,
        )
    }

    /// Iterates over the values in position order.
    pub fn iter(&self) -> impl Iterator<Item = Logic> + '_ {
        (0..self.width).map(|i| self.get(i))
    }

    /// Concatenates the values into an integer, position 0 as the most
    /// significant bit.
    ///
    /// Returns `None` if any value is `X` or `Z`, or the width exceeds 64.
    pub fn to_index(&self) -> Option<u64> {
        if self.width > 64 {
            return None;
        }
        self.iter()
            .try_fold(0u64, |acc, v| v.to_bit().map(|b| (acc << 1) | b as u64))
    }

    /// Returns the number of positions holding `X`.
    pub fn count_unknown(&self) -> usize {
        self.iter().filter(|&v| v == Logic::X).count()
    }

    /// Parses a string such as `"10XZ"`, first character at position 0.
    ///
    /// Returns `None` if the string contains invalid characters.
    pub fn from_str_positional(s: &str) -> Option<Self> {
        s.chars()
            .map(Logic::from_char)
            .collect::<Option<Vec<_>>>()
            .map(|values| values.into_iter().collect())
    }
}

impl FromIterator<Logic> for LogicVec {
    fn from_iter<T: IntoIterator<Item = Logic>>(iter: T) -> Self {
        let values: Vec<Logic> = iter.into_iter().collect();
        let mut v = Self {
            width: values.len() as u32,
            data: vec![0; word_count(values.len() as u32)],
        };
        for (i, value) in values.into_iter().enumerate() {
            v.set(i as u32, value);
        }
        v
    }
}

impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in self.iter() {
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicVec({self})")
    }
}

fn word_count(width: u32) -> usize {
    width.div_ceil(VALUES_PER_WORD) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_initializes_to_unknown() {
        let v = LogicVec::new(40);
        assert_eq!(v.width(), 40);
        assert!(v.iter().all(|l| l == Logic::X));
        assert_eq!(v.count_unknown(), 40);
    }

    #[test]
    fn set_get_roundtrip() {
        let mut v = LogicVec::new(4);
        v.set(0, Logic::Zero);
        v.set(1, Logic::One);
        v.set(2, Logic::X);
        v.set(3, Logic::Z);
        assert_eq!(v.get(0), Logic::Zero);
        assert_eq!(v.get(1), Logic::One);
        assert_eq!(v.get(2), Logic::X);
        assert_eq!(v.get(3), Logic::Z);
    }

    #[test]
    fn display_is_positional() {
        let v: LogicVec = [Logic::One, Logic::Zero, Logic::X, Logic::Z]
            .into_iter()
            .collect();
        assert_eq!(format!("{v}"), "10XZ");
        assert_eq!(format!("{v:?}"), "LogicVec(10XZ)");
    }

    #[test]
    fn from_str_positional() {
        let v = LogicVec::from_str_positional("0x1").unwrap();
        assert_eq!(v.get(0), Logic::Zero);
        assert_eq!(v.get(1), Logic::X);
        assert_eq!(v.get(2), Logic::One);
        assert!(LogicVec::from_str_positional("01a").is_none());
    }

    #[test]
    fn to_index_msb_first() {
        let v = LogicVec::from_str_positional("110").unwrap();
        assert_eq!(v.to_index(), Some(0b110));
        let unknown = LogicVec::from_str_positional("1X0").unwrap();
        assert_eq!(unknown.to_index(), None);
        let floating = LogicVec::from_str_positional("Z").unwrap();
        assert_eq!(floating.to_index(), None);
    }

    #[test]
    fn empty_vector() {
        let v = LogicVec::default();
        assert!(v.is_empty());
        assert_eq!(format!("{v}"), "");
        assert_eq!(v.to_index(), Some(0));
    }

    #[test]
    fn large_width_spanning_words() {
        let mut v = LogicVec::new(100);
        v.set(0, Logic::One);
        v.set(50, Logic::Zero);
        v.set(99, Logic::Z);
        assert_eq!(v.get(0), Logic::One);
        assert_eq!(v.get(50), Logic::Zero);
        assert_eq!(v.get(99), Logic::Z);
        assert_eq!(v.get(1), Logic::X);
    }

    #[test]
    fn serde_roundtrip() {
        let v = LogicVec::from_str_positional("10XZ1010").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let back: LogicVec = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}

//! Packed bitmaps recording which input combinations have been observed.

use serde::{Deserialize, Serialize};

/// Number of flags packed per u64 word.
const BITS_PER_WORD: usize = 64;

/// A fixed-size set of observed combination indices.
///
/// Sized once at construction (`2^inputs` entries for a gate or flip-flop
/// group) and only ever has bits set, never cleared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageBitmap {
    len: usize,
    data: Vec<u64>,
}

impl CoverageBitmap {
    /// Creates a bitmap with `2^inputs` unset entries.
    pub fn for_inputs(inputs: u32) -> Self {
        Self::with_len(1usize << inputs)
    }

    /// Creates a bitmap with `len` unset entries.
    pub fn with_len(len: usize) -> Self {
        Self {
            len,
            data: vec![0; len.div_ceil(BITS_PER_WORD)],
        }
    }

    /// Returns the number of possible combinations.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Marks a combination as observed. Indices past the end are ignored.
    pub fn mark(&mut self, index: usize) {
        if index < self.len {
            self.data[index / BITS_PER_WORD] |= 1u64 << (index % BITS_PER_WORD);
        }
    }

    /// Returns `true` if the combination has been observed.
    pub fn is_marked(&self, index: usize) -> bool {
        index < self.len && self.data[index / BITS_PER_WORD] & (1u64 << (index % BITS_PER_WORD)) != 0
    }

    /// Returns the number of distinct combinations observed.
    pub fn count(&self) -> usize {
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }
}

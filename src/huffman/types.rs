//! Huffman entry and symbol histogram types.

use crate::hop::types::{Hop, NUM_HOPS};

/// Length value marking a symbol absent from the code.
pub const UNUSED_LENGTH: u8 = 15;
/// Bits per transmitted code length.
pub const LENGTH_BITS: u32 = 4;
/// Longest code a transmitted table may declare.
pub const MAX_CODE_LENGTH: u8 = 14;

/// One symbol of a canonical Huffman code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanEntry {
    pub symbol: Hop,
    /// Code length in bits, or [`UNUSED_LENGTH`].
    pub length: u8,
    /// Right-aligned code value; meaningless when unused.
    pub code: u32,
    /// Occurrences in the plane the code was built for (0 when parsed).
    pub count: u64,
}

impl HuffmanEntry {
    pub fn unused(symbol: Hop) -> Self {
        Self {
            symbol,
            length: UNUSED_LENGTH,
            code: 0,
            count: 0,
        }
    }

    #[inline]
    pub fn is_used(&self) -> bool {
        self.length != UNUSED_LENGTH
    }
}

/// Occurrence counts of the 9 hops over one plane kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HopHistogram {
    counts: [u64; NUM_HOPS],
}

impl HopHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, hop: Hop) {
        self.counts[hop.index()] += 1;
    }

    pub fn add_all(&mut self, hops: &[Hop]) {
        for &h in hops {
            self.add(h);
        }
    }

    pub fn merge(&mut self, other: &HopHistogram) {
        for (a, b) in self.counts.iter_mut().zip(other.counts.iter()) {
            *a += b;
        }
    }

    pub fn count(&self, hop: Hop) -> u64 {
        self.counts[hop.index()]
    }

    pub fn counts(&self) -> &[u64; NUM_HOPS] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

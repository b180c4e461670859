//! Canonical Huffman coding of hop symbols.

pub mod table;
pub mod types;

pub use table::HuffmanTable;
pub use types::{HopHistogram, HuffmanEntry, LENGTH_BITS, MAX_CODE_LENGTH, UNUSED_LENGTH};

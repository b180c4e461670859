//! Bit-level I/O for LHE frames.
//!
//! Every frame field, from the mode byte to the last hop symbol, goes through
//! one MSB-first [`BitWriter`] and is read back by a [`BitReader`] that refuses
//! to consume more than its bit budget.

pub mod bit_reader;
pub mod bit_writer;

pub use bit_reader::BitReader;
pub use bit_writer::BitWriter;

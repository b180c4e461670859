//! Bit reader for consuming MSB-first bits from a frame payload.
//!
//! Bits are buffered in a 64-bit container packed at the MSB side and refilled
//! a byte at a time. The reader carries a hard budget (by default the payload
//! size in bits); any read that would cross it fails with
//! [`LheError::TruncatedBitstream`] instead of yielding padding.

use crate::error::{LheError, Result};

pub struct BitReader<'a> {
    src: &'a [u8],
    /// Next byte of `src` to load into the container.
    pos: usize,
    /// Bits are packed at the MSB side.
    bits: u64,
    /// Number of valid bits in `bits`.
    count: u32,
    consumed: u64,
    budget: u64,
}

impl<'a> BitReader<'a> {
    /// Reader over `src` whose budget is the whole slice.
    pub fn new(src: &'a [u8]) -> Self {
        Self::with_budget(src, src.len() as u64 * 8)
    }

    /// Reader over `src` that stops after `budget_bits` bits (capped to the slice).
    pub fn with_budget(src: &'a [u8], budget_bits: u64) -> Self {
        Self {
            src,
            pos: 0,
            bits: 0,
            count: 0,
            consumed: 0,
            budget: budget_bits.min(src.len() as u64 * 8),
        }
    }

    #[inline]
    fn refill(&mut self) {
        while self.count <= 56 && self.pos < self.src.len() {
            self.bits |= (self.src[self.pos] as u64) << (56 - self.count);
            self.count += 8;
            self.pos += 1;
        }
    }

    /// Read one bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u32> {
        if self.consumed >= self.budget {
            return Err(LheError::TruncatedBitstream);
        }
        if self.count == 0 {
            self.refill();
        }
        let bit = (self.bits >> 63) as u32;
        self.bits <<= 1;
        self.count -= 1;
        self.consumed += 1;
        Ok(bit)
    }

    /// Read `num_bits` (at most 32) bits, returned right-aligned.
    #[inline]
    pub fn read_bits(&mut self, num_bits: u32) -> Result<u32> {
        debug_assert!(num_bits <= 32);
        if num_bits == 0 {
            return Ok(0);
        }
        if self.consumed + num_bits as u64 > self.budget {
            return Err(LheError::TruncatedBitstream);
        }
        if self.count < num_bits {
            self.refill();
        }
        let value = (self.bits >> (64 - num_bits)) as u32;
        self.bits <<= num_bits;
        self.count -= num_bits;
        self.consumed += num_bits as u64;
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Four bytes, least significant first.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        for b in &mut bytes {
            *b = self.read_u8()?;
        }
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn bits_consumed(&self) -> u64 {
        self.consumed
    }

    pub fn bits_remaining(&self) -> u64 {
        self.budget - self.consumed
    }
}

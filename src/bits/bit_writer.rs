//! Bit writer producing the MSB-first byte stream read by [`super::BitReader`].
//!
//! Values are passed right-aligned. Whole bytes are flushed as soon as they
//! are complete; [`BitWriter::finish`] zero-pads the trailing partial byte.

pub struct BitWriter {
    output: Vec<u8>,
    /// Bits are packed at the MSB side.
    bits: u64,
    /// Number of valid bits in `bits` (always < 8 between calls).
    count: u32,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            bits: 0,
            count: 0,
        }
    }

    /// Write the low `num_bits` (at most 32) bits of `value`, most significant first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, num_bits: u32) {
        debug_assert!(num_bits <= 32);
        debug_assert!(
            num_bits == 32 || value >> num_bits == 0,
            "value has bits beyond num_bits: value={:#x}, num_bits={}",
            value,
            num_bits
        );
        if num_bits == 0 {
            return;
        }
        self.bits |= (value as u64) << (64 - self.count - num_bits);
        self.count += num_bits;
        while self.count >= 8 {
            self.output.push((self.bits >> 56) as u8);
            self.bits <<= 8;
            self.count -= 8;
        }
    }

    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u32, 1);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write_bits(value as u32, 8);
    }

    /// Four bytes, least significant first.
    pub fn write_u32_le(&mut self, value: u32) {
        for b in value.to_le_bytes() {
            self.write_u8(b);
        }
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.output.len() as u64 * 8 + self.count as u64
    }

    /// Flush the trailing partial byte (zero padded) and return the stream.
    pub fn finish(mut self) -> Vec<u8> {
        if self.count > 0 {
            self.output.push((self.bits >> 56) as u8);
        }
        self.output
    }
}

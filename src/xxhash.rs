//! Thin wrapper around the `xxhash-rust` crate.
//!
//! The container stores an XXH32 (seed 0) of every frame payload.

pub use xxhash_rust::xxh32::Xxh32 as Xxh32State;

/// One-shot XXH32.
///
/// `xxh32_oneshot(b"", 0)` == `0x02CC5D05`.
#[inline]
pub fn xxh32_oneshot(data: &[u8], seed: u32) -> u32 {
    xxhash_rust::xxh32::xxh32(data, seed)
}

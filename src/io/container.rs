//! `.lhe` container: a frame count followed by checksummed frame payloads.
//!
//! ```text
//! magic        "LHE1"
//! frame_count  u32 LE
//! per frame:   length u32 LE | XXH32(payload, seed 0) u32 LE | payload
//! ```

use std::io::Write;

use crate::error::{LheError, Result};
use crate::xxhash::xxh32_oneshot;

pub const LHE_MAGIC: [u8; 4] = *b"LHE1";
pub const CONTAINER_HEADER_SIZE: usize = 8;
pub const FRAME_PREFIX_SIZE: usize = 8;

/// One frame located inside a container buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerFrame<'a> {
    pub payload: &'a [u8],
    pub checksum: u32,
    /// Offset of the frame prefix from the start of the container.
    pub offset: usize,
}

#[inline]
fn le32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

pub fn is_container(data: &[u8]) -> bool {
    data.len() >= LHE_MAGIC.len() && data[..LHE_MAGIC.len()] == LHE_MAGIC
}

/// Write a complete container holding `frames`.
pub fn write_container<W: Write>(out: &mut W, frames: &[Vec<u8>]) -> Result<()> {
    let count = u32::try_from(frames.len())
        .map_err(|_| LheError::InvalidArgument("too many frames for one container"))?;
    out.write_all(&LHE_MAGIC)?;
    out.write_all(&count.to_le_bytes())?;
    for payload in frames {
        let len = u32::try_from(payload.len())
            .map_err(|_| LheError::InvalidArgument("frame payload larger than 4 GiB"))?;
        out.write_all(&len.to_le_bytes())?;
        out.write_all(&xxh32_oneshot(payload, 0).to_le_bytes())?;
        out.write_all(payload)?;
    }
    Ok(())
}

/// Split a container into its frames, verifying every checksum.
pub fn read_container(data: &[u8]) -> Result<Vec<ContainerFrame<'_>>> {
    if data.len() < CONTAINER_HEADER_SIZE {
        if data.len() < LHE_MAGIC.len() || is_container(data) {
            return Err(LheError::TruncatedBitstream);
        }
        return Err(LheError::UnsupportedFormat("not an LHE container".into()));
    }
    if !is_container(data) {
        return Err(LheError::UnsupportedFormat("not an LHE container".into()));
    }
    let count = le32(data, 4) as usize;
    let mut frames = Vec::with_capacity(count.min(data.len() / FRAME_PREFIX_SIZE));
    let mut pos = CONTAINER_HEADER_SIZE;
    for _ in 0..count {
        if data.len() - pos < FRAME_PREFIX_SIZE {
            return Err(LheError::TruncatedBitstream);
        }
        let len = le32(data, pos) as usize;
        let checksum = le32(data, pos + 4);
        let start = pos + FRAME_PREFIX_SIZE;
        if data.len() - start < len {
            return Err(LheError::TruncatedBitstream);
        }
        let payload = &data[start..start + len];
        let actual = xxh32_oneshot(payload, 0);
        if actual != checksum {
            return Err(LheError::ChecksumMismatch {
                expected: checksum,
                actual,
            });
        }
        frames.push(ContainerFrame {
            payload,
            checksum,
            offset: pos,
        });
        pos = start + len;
    }
    if pos != data.len() {
        return Err(LheError::UnsupportedFormat(format!(
            "{} trailing bytes after the last frame",
            data.len() - pos
        )));
    }
    Ok(frames)
}

//! Error type shared by the codec core and the container/image layer.
//!
//! Every variant is fatal for the frame being processed: no partially decoded
//! frame is ever handed back to the caller.

use std::fmt;
use std::io;

/// Errors reported by the LHE codec.
#[derive(Debug)]
pub enum LheError {
    /// Mode byte, dimensions, block grid, quality byte or relevance mesh out of range.
    MalformedHeader(&'static str),
    /// Duplicate codes, prefix violation, over-subscribed lengths or no used symbol.
    InvalidHuffmanTable(&'static str),
    /// The bit budget was exhausted before the frame was complete.
    TruncatedBitstream,
    /// A plane or symbol buffer of the given size could not be reserved.
    AllocationFailed(usize),
    /// Caller-supplied buffers or parameters are inconsistent with the frame.
    InvalidArgument(&'static str),
    /// Container payload does not match its stored XXH32.
    ChecksumMismatch { expected: u32, actual: u32 },
    /// Image or container data in a layout the codec does not read.
    UnsupportedFormat(String),
    /// Underlying file or stream failure.
    Io(io::Error),
}

impl LheError {
    /// Short stable name of the error kind, used in CLI diagnostics.
    pub fn error_name(&self) -> &'static str {
        match self {
            LheError::MalformedHeader(_) => "ERROR_malformedHeader",
            LheError::InvalidHuffmanTable(_) => "ERROR_invalidHuffmanTable",
            LheError::TruncatedBitstream => "ERROR_truncatedBitstream",
            LheError::AllocationFailed(_) => "ERROR_allocationFailed",
            LheError::InvalidArgument(_) => "ERROR_invalidArgument",
            LheError::ChecksumMismatch { .. } => "ERROR_checksumMismatch",
            LheError::UnsupportedFormat(_) => "ERROR_unsupportedFormat",
            LheError::Io(_) => "ERROR_io",
        }
    }
}

impl fmt::Display for LheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LheError::MalformedHeader(what) => write!(f, "malformed frame header: {what}"),
            LheError::InvalidHuffmanTable(what) => write!(f, "invalid Huffman table: {what}"),
            LheError::TruncatedBitstream => f.write_str("truncated bitstream"),
            LheError::AllocationFailed(bytes) => {
                write!(f, "allocation of {bytes} bytes failed")
            }
            LheError::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            LheError::ChecksumMismatch { expected, actual } => write!(
                f,
                "frame checksum mismatch: stored {expected:08X}, computed {actual:08X}"
            ),
            LheError::UnsupportedFormat(what) => write!(f, "unsupported format: {what}"),
            LheError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for LheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LheError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LheError {
    fn from(e: io::Error) -> Self {
        LheError::Io(e)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LheError>;

/// Reserve a zeroed byte buffer, reporting failure instead of aborting.
pub(crate) fn try_alloc_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| LheError::AllocationFailed(len))?;
    buf.resize(len, 0);
    Ok(buf)
}

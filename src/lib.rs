// lhe: Logarithmical Hopping Encoding image and video codec

pub mod bits;
pub mod config;
pub mod error;
pub mod tables;
pub mod hop;
pub mod huffman;
pub mod mesh;
pub mod frame;
pub mod io;
pub mod xxhash;
pub mod cli;

// ── Version constants ─────────────────────────────────────────────────────────
pub const LHE_VERSION_MAJOR: u32 = 0;
pub const LHE_VERSION_MINOR: u32 = 3;
pub const LHE_VERSION_RELEASE: u32 = 0;
pub const LHE_VERSION_NUMBER: u32 =
    LHE_VERSION_MAJOR * 100 * 100 + LHE_VERSION_MINOR * 100 + LHE_VERSION_RELEASE;
pub const LHE_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

pub fn version_number() -> u32 {
    LHE_VERSION_NUMBER
}

pub fn version_string() -> &'static str {
    LHE_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use error::{LheError, Result};
pub use frame::codec::FrameCodec;
pub use frame::encode::EncodedFrame;
pub use frame::plane::{ChannelPlane, Frame};
pub use frame::prefs::CodecConfig;
pub use frame::types::{Channel, ChromaFormat, Execution, FrameMode};
pub use hop::{Hop, HopPredictor, PredictionVariant};
pub use mesh::RelevanceMesh;
pub use tables::PrecomputedTables;

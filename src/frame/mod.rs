//! LHE frame codec: header, planes, configuration and the encode/decode passes.
//!
//! Bitstream of one frame, written through a single MSB-first bit writer:
//!
//! 1. mode byte (mode | chroma format << 4), width and height (u32 LE),
//!    blocks wide and high (u8 each), then the ratio with the weighted
//!    prediction flag in its top bit;
//! 2. one seed byte per block, luma blocks then both chroma planes;
//! 3. chroma then luma Huffman lengths, 9 × 4 bits each;
//! 4. advanced mode: quality byte, then 3 + 3 bits per mesh corner;
//! 5. Huffman-coded hops, channel by channel, block by block.

pub mod codec;
pub mod decode;
pub mod encode;
pub mod header;
pub mod plane;
pub mod prefs;
pub mod types;

pub use codec::FrameCodec;
pub use decode::{inspect_frame, FrameSummary};
pub use encode::EncodedFrame;
pub use header::{FrameHeader, FRAME_HEADER_SIZE};
pub use plane::{ChannelPlane, Frame};
pub use prefs::CodecConfig;
pub use types::{Channel, ChromaFormat, Execution, FrameMode};

//! Frame-level enums: coding mode, chroma layout, channel and execution.

use crate::error::{LheError, Result};

/// Coding mode, stored in the low nibble of the mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FrameMode {
    /// One block covering the whole plane.
    BasicSequential = 0,
    /// Block grid, every block at full resolution.
    #[default]
    BasicParallel = 1,
    /// Block grid with relevance-driven downsampling.
    Advanced = 2,
}

impl FrameMode {
    pub fn from_nibble(v: u8) -> Result<Self> {
        match v {
            0 => Ok(FrameMode::BasicSequential),
            1 => Ok(FrameMode::BasicParallel),
            2 => Ok(FrameMode::Advanced),
            _ => Err(LheError::MalformedHeader("unknown frame mode")),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FrameMode::BasicSequential => "basic-sequential",
            FrameMode::BasicParallel => "basic-parallel",
            FrameMode::Advanced => "advanced",
        }
    }
}

/// Chroma subsampling, stored in the high nibble of the mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ChromaFormat {
    #[default]
    Yuv420 = 0,
    Yuv422 = 1,
    Yuv444 = 2,
}

impl ChromaFormat {
    pub fn from_nibble(v: u8) -> Result<Self> {
        match v {
            0 => Ok(ChromaFormat::Yuv420),
            1 => Ok(ChromaFormat::Yuv422),
            2 => Ok(ChromaFormat::Yuv444),
            _ => Err(LheError::MalformedHeader("unknown chroma format")),
        }
    }

    /// Horizontal and vertical subsampling factors.
    pub fn subsampling(self) -> (usize, usize) {
        match self {
            ChromaFormat::Yuv420 => (2, 2),
            ChromaFormat::Yuv422 => (2, 1),
            ChromaFormat::Yuv444 => (1, 1),
        }
    }

    /// Chroma plane size for a `width × height` luma plane.
    pub fn chroma_dims(self, width: usize, height: usize) -> (usize, usize) {
        let (sx, sy) = self.subsampling();
        (width.div_ceil(sx), height.div_ceil(sy))
    }

    pub fn name(self) -> &'static str {
        match self {
            ChromaFormat::Yuv420 => "4:2:0",
            ChromaFormat::Yuv422 => "4:2:2",
            ChromaFormat::Yuv444 => "4:4:4",
        }
    }
}

/// Plane of a frame, in bitstream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Luma = 0,
    ChromaA = 1,
    ChromaB = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Luma, Channel::ChromaA, Channel::ChromaB];

    pub fn is_chroma(self) -> bool {
        self != Channel::Luma
    }
}

/// How per-block prediction is scheduled. Output is identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    Sequential,
    #[default]
    Parallel,
}

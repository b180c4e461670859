//! Fixed frame header: mode byte, dimensions, block grid and hop parameters.
//!
//! ```text
//! mode byte   low nibble = FrameMode, high nibble = ChromaFormat
//! width       u32 LE
//! height      u32 LE
//! blocks_w    u8
//! blocks_h    u8
//! params      bit 7 = weighted prediction, bits 0..7 = ratio
//! ```

use crate::bits::{BitReader, BitWriter};
use crate::config::{DIMENSION_MAX, PIXELS_MAX};
use crate::error::{LheError, Result};
use crate::frame::types::{ChromaFormat, FrameMode};
use crate::hop::predictor::PredictionVariant;
use crate::mesh::types::{BlockGrid, SIDE_MIN};
use crate::tables::{TABLE_RATIO_MAX, TABLE_RATIO_MIN};

/// Header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 12;

const WEIGHTED_FLAG: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub mode: FrameMode,
    pub chroma_format: ChromaFormat,
    pub width: u32,
    pub height: u32,
    pub blocks_w: u8,
    pub blocks_h: u8,
    /// Hop curve ratio the frame was coded with.
    pub ratio: u8,
    pub prediction: PredictionVariant,
}

impl FrameHeader {
    /// Check ranges and that the grid yields non-empty blocks on every plane
    /// (at least `SIDE_MIN` wide in advanced mode).
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LheError::MalformedHeader("zero frame dimension"));
        }
        if self.width > DIMENSION_MAX || self.height > DIMENSION_MAX {
            return Err(LheError::MalformedHeader("frame dimension too large"));
        }
        if self.width as u64 * self.height as u64 > PIXELS_MAX {
            return Err(LheError::MalformedHeader("frame has too many pixels"));
        }
        if self.blocks_w == 0 || self.blocks_h == 0 {
            return Err(LheError::MalformedHeader("block grid has no blocks"));
        }
        if self.mode == FrameMode::BasicSequential && (self.blocks_w, self.blocks_h) != (1, 1) {
            return Err(LheError::MalformedHeader("basic-sequential frames use a 1x1 grid"));
        }
        if !(TABLE_RATIO_MIN..=TABLE_RATIO_MAX).contains(&self.ratio) {
            return Err(LheError::MalformedHeader("ratio outside [20, 40]"));
        }
        if self.prediction == PredictionVariant::Weighted && self.mode != FrameMode::BasicSequential {
            return Err(LheError::MalformedHeader("weighted prediction outside basic-sequential mode"));
        }
        self.grids().map(|_| ())
    }

    pub fn luma_dims(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    pub fn chroma_dims(&self) -> (usize, usize) {
        let (w, h) = self.luma_dims();
        self.chroma_format.chroma_dims(w, h)
    }

    /// Full-resolution luma and chroma grids.
    pub fn grids(&self) -> Result<(BlockGrid, BlockGrid)> {
        let (w, h) = self.luma_dims();
        let luma = BlockGrid::partition(w, h, self.blocks_w as usize, self.blocks_h as usize)?;
        let (sx, sy) = self.chroma_format.subsampling();
        let chroma = luma.derive_subsampled(sx, sy)?;
        if self.mode == FrameMode::Advanced {
            luma.require_min_side(SIDE_MIN)?;
            chroma.require_min_side(SIDE_MIN)?;
        }
        Ok((luma, chroma))
    }

    pub fn write(&self, writer: &mut BitWriter) {
        writer.write_u8(((self.chroma_format as u8) << 4) | self.mode as u8);
        writer.write_u32_le(self.width);
        writer.write_u32_le(self.height);
        writer.write_u8(self.blocks_w);
        writer.write_u8(self.blocks_h);
        let weighted = match self.prediction {
            PredictionVariant::Average => 0,
            PredictionVariant::Weighted => WEIGHTED_FLAG,
        };
        writer.write_u8(weighted | self.ratio);
    }

    /// Parse and validate.
    pub fn read(reader: &mut BitReader<'_>) -> Result<Self> {
        let mode_byte = reader.read_u8()?;
        let mode = FrameMode::from_nibble(mode_byte & 0x0F)?;
        let chroma_format = ChromaFormat::from_nibble(mode_byte >> 4)?;
        let width = reader.read_u32_le()?;
        let height = reader.read_u32_le()?;
        let blocks_w = reader.read_u8()?;
        let blocks_h = reader.read_u8()?;
        let params = reader.read_u8()?;
        let header = Self {
            mode,
            chroma_format,
            width,
            height,
            blocks_w,
            blocks_h,
            ratio: params & !WEIGHTED_FLAG,
            prediction: if params & WEIGHTED_FLAG != 0 {
                PredictionVariant::Weighted
            } else {
                PredictionVariant::Average
            },
        };
        header.validate()?;
        Ok(header)
    }
}

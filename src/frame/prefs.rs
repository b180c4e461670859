// prefs.rs: codec configuration shared by encoder and decoder.
//
// `CodecConfig` is a plain value type with `Default` and clamping setters,
// validated once when a `FrameCodec` is created. Environment and CLI
// overrides are applied on top of the defaults by the binary.

use crate::config::{
    BLOCKS_HEIGHT_DEFAULT, BLOCKS_WIDTH_DEFAULT, NB_WORKERS_DEFAULT, NB_WORKERS_MAX,
    QUALITY_DEFAULT, QUALITY_MAX, RATIO_DEFAULT,
};
use crate::error::{LheError, Result};
use crate::frame::types::{ChromaFormat, Execution, FrameMode};
use crate::hop::predictor::PredictionVariant;
use crate::mesh::types::{grid_boundaries, SIDE_MIN};
use crate::tables::{TABLE_RATIO_MAX, TABLE_RATIO_MIN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Mode used by the encoder. The decoder follows the bitstream.
    pub mode: FrameMode,
    /// Requested block grid; see [`CodecConfig::fit_grid`].
    pub blocks_w: u8,
    pub blocks_h: u8,
    /// `rmax · 10`, in [20, 40].
    pub ratio: u8,
    /// Advanced-mode quality, 0..=99.
    pub quality: u8,
    /// Interior prediction rule; must match between encoder and decoder.
    pub prediction: PredictionVariant,
    pub execution: Execution,
    /// Block workers. 0 = rayon's default (one per logical core).
    pub nb_workers: usize,
    /// Layout RGB and gray images are converted to before encoding.
    pub chroma_format: ChromaFormat,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            mode: FrameMode::default(),
            blocks_w: BLOCKS_WIDTH_DEFAULT,
            blocks_h: BLOCKS_HEIGHT_DEFAULT,
            ratio: RATIO_DEFAULT,
            quality: QUALITY_DEFAULT,
            prediction: PredictionVariant::default(),
            execution: Execution::default(),
            nb_workers: NB_WORKERS_DEFAULT,
            chroma_format: ChromaFormat::default(),
        }
    }
}

/// Whether `n` blocks over `len` pixels leave every luma and chroma block at
/// least `min_side` wide.
fn axis_fits(len: usize, n: usize, sub: usize, min_side: usize) -> bool {
    let bounds = grid_boundaries(len, n);
    bounds.windows(2).all(|w| {
        w[1] - w[0] >= min_side && w[1].div_ceil(sub) - w[0].div_ceil(sub) >= min_side
    })
}

fn fit_axis(len: usize, requested: u8, sub: usize, min_side: usize) -> u8 {
    let mut n = requested.max(1);
    while n > 1 && !axis_fits(len, n as usize, sub, min_side) {
        n -= 1;
    }
    n
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: FrameMode) {
        self.mode = mode;
    }

    pub fn set_blocks(&mut self, blocks_w: u8, blocks_h: u8) {
        self.blocks_w = blocks_w.max(1);
        self.blocks_h = blocks_h.max(1);
    }

    pub fn set_ratio(&mut self, ratio: u8) {
        self.ratio = ratio;
    }

    /// Sets the quality, clamped to [`QUALITY_MAX`]. Returns the stored value.
    pub fn set_quality(&mut self, quality: u8) -> u8 {
        self.quality = quality.min(QUALITY_MAX);
        self.quality
    }

    pub fn set_prediction(&mut self, prediction: PredictionVariant) {
        self.prediction = prediction;
    }

    pub fn set_execution(&mut self, execution: Execution) {
        self.execution = execution;
    }

    /// Sets the worker count, clamped to [`NB_WORKERS_MAX`]. Returns the stored value.
    pub fn set_nb_workers(&mut self, nb_workers: usize) -> usize {
        self.nb_workers = nb_workers.min(NB_WORKERS_MAX);
        self.nb_workers
    }

    pub fn set_chroma_format(&mut self, chroma_format: ChromaFormat) {
        self.chroma_format = chroma_format;
    }

    pub fn validate(&self) -> Result<()> {
        if !(TABLE_RATIO_MIN..=TABLE_RATIO_MAX).contains(&self.ratio) {
            return Err(LheError::InvalidArgument("ratio outside [20, 40]"));
        }
        if self.quality > QUALITY_MAX {
            return Err(LheError::InvalidArgument("quality above 99"));
        }
        if self.blocks_w == 0 || self.blocks_h == 0 {
            return Err(LheError::InvalidArgument("block grid has no blocks"));
        }
        if self.prediction == PredictionVariant::Weighted && self.mode != FrameMode::BasicSequential {
            return Err(LheError::InvalidArgument(
                "weighted prediction requires basic-sequential mode",
            ));
        }
        Ok(())
    }

    /// Largest grid, up to the requested one, whose blocks are all non-empty
    /// (and at least `SIDE_MIN` on every plane in advanced mode) for a frame
    /// of this size and chroma layout.
    pub fn fit_grid(&self, width: usize, height: usize, chroma_format: ChromaFormat) -> (u8, u8) {
        if self.mode == FrameMode::BasicSequential {
            return (1, 1);
        }
        let min_side = if self.mode == FrameMode::Advanced { SIDE_MIN } else { 1 };
        let (sx, sy) = chroma_format.subsampling();
        (
            fit_axis(width, self.blocks_w, sx, min_side),
            fit_axis(height, self.blocks_h, sy, min_side),
        )
    }
}

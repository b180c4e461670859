//! Raster-scan hop predictor shared by encoder and decoder.
//!
//! The decoder turns a hop sequence into pixels; the encoder picks, pixel by
//! pixel, the hop whose reconstruction is closest to the original and then
//! reconstructs exactly as the decoder will. Both directions run the same
//! scan, so neighbours are always reconstructed values.

use crate::error::{LheError, Result};
use crate::hop::types::{Hop, HopState};
use crate::tables::{PrecomputedTables, TABLE_RATIO_MAX, TABLE_RATIO_MIN};

/// Interior prediction rule.
///
/// Chosen by the encoder and carried in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionVariant {
    /// `(left + upper_right) >> 1`.
    #[default]
    Average,
    /// `(4 · left + 3 · upper_right) / 7`. Single-block frames only.
    Weighted,
}

/// Hop predictor bound to one table set, ratio and interior rule.
#[derive(Debug, Clone, Copy)]
pub struct HopPredictor<'t> {
    tables: &'t PrecomputedTables,
    ratio: u8,
    variant: PredictionVariant,
}

fn check_geometry(len: usize, width: usize, height: usize, stride: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(LheError::InvalidArgument("empty block"));
    }
    if stride < width {
        return Err(LheError::InvalidArgument("stride smaller than block width"));
    }
    if len < (height - 1) * stride + width {
        return Err(LheError::InvalidArgument("pixel buffer smaller than block"));
    }
    Ok(())
}

impl<'t> HopPredictor<'t> {
    pub fn new(tables: &'t PrecomputedTables, ratio: u8, variant: PredictionVariant) -> Result<Self> {
        if !(TABLE_RATIO_MIN..=TABLE_RATIO_MAX).contains(&ratio) {
            return Err(LheError::InvalidArgument("ratio outside [20, 40]"));
        }
        Ok(Self {
            tables,
            ratio,
            variant,
        })
    }

    pub fn ratio(&self) -> u8 {
        self.ratio
    }

    pub fn variant(&self) -> PredictionVariant {
        self.variant
    }

    /// Prediction for a pixel other than the block corner.
    #[inline]
    fn predict(&self, recon: &[u8], stride: usize, width: usize, x: usize, y: usize) -> u8 {
        let at = y * stride + x;
        if y == 0 {
            return recon[at - 1];
        }
        let up = recon[at - stride];
        if x == 0 {
            return up;
        }
        let left = recon[at - 1] as u32;
        if x == width - 1 {
            return ((left + up as u32) >> 1) as u8;
        }
        let upper_right = recon[at - stride + 1] as u32;
        match self.variant {
            PredictionVariant::Average => ((left + upper_right) >> 1) as u8,
            PredictionVariant::Weighted => ((4 * left + 3 * upper_right) / 7) as u8,
        }
    }

    /// Walk one block in raster order.
    ///
    /// `choose(index, predicted, step)` supplies the hop of every pixel but
    /// the corner, which always reconstructs to `seed` and counts as a null
    /// hop. `observe` sees the state after each pixel.
    fn scan(
        &self,
        seed: u8,
        width: usize,
        height: usize,
        recon: &mut [u8],
        stride: usize,
        mut choose: impl FnMut(usize, u8, u8) -> Hop,
        mut observe: impl FnMut(&HopState),
    ) {
        let mut state = HopState::new();
        for y in 0..height {
            for x in 0..width {
                if x == 0 && y == 0 {
                    recon[0] = seed;
                    state.advance(Hop::Null);
                    observe(&state);
                    continue;
                }
                if x == 0 {
                    state.reset();
                }
                let predicted = self.predict(recon, stride, width, x, y);
                let hop = choose(y * width + x, predicted, state.step);
                recon[y * stride + x] =
                    self.tables.reconstruct(predicted, self.ratio, state.step, hop);
                state.advance(hop);
                observe(&state);
            }
        }
    }

    /// Reconstruct a `width × height` block into `dst` from its seed and hops.
    ///
    /// `hops` holds one symbol per pixel in raster order; the first one
    /// belongs to the corner and is ignored.
    pub fn decode(
        &self,
        seed: u8,
        hops: &[Hop],
        width: usize,
        height: usize,
        dst: &mut [u8],
        stride: usize,
    ) -> Result<()> {
        check_geometry(dst.len(), width, height, stride)?;
        if hops.len() != width * height {
            return Err(LheError::InvalidArgument("hop count does not match block size"));
        }
        self.scan(seed, width, height, dst, stride, |i, _, _| hops[i], |_| {});
        Ok(())
    }

    /// Like [`decode`](Self::decode), also returning the state after every pixel.
    pub fn decode_traced(
        &self,
        seed: u8,
        hops: &[Hop],
        width: usize,
        height: usize,
        dst: &mut [u8],
        stride: usize,
    ) -> Result<Vec<HopState>> {
        check_geometry(dst.len(), width, height, stride)?;
        if hops.len() != width * height {
            return Err(LheError::InvalidArgument("hop count does not match block size"));
        }
        let mut trace = Vec::with_capacity(hops.len());
        self.scan(seed, width, height, dst, stride, |i, _, _| hops[i], |s| trace.push(*s));
        Ok(trace)
    }

    /// Choose hops for a `width × height` block of `src`.
    ///
    /// The block's own top-left pixel is the seed. Returns the hop sequence
    /// (null hop for the corner) and writes the decoder's reconstruction into
    /// `recon`.
    pub fn encode(
        &self,
        src: &[u8],
        src_stride: usize,
        width: usize,
        height: usize,
        recon: &mut [u8],
        recon_stride: usize,
    ) -> Result<Vec<Hop>> {
        check_geometry(src.len(), width, height, src_stride)?;
        check_geometry(recon.len(), width, height, recon_stride)?;
        let seed = src[0];
        let mut hops = Vec::new();
        hops.try_reserve_exact(width * height)
            .map_err(|_| LheError::AllocationFailed(width * height))?;
        hops.push(Hop::Null);
        let tables = self.tables;
        let ratio = self.ratio;
        self.scan(
            seed,
            width,
            height,
            recon,
            recon_stride,
            |i, predicted, step| {
                let original = src[(i / width) * src_stride + i % width];
                let hop = tables.best_hop(ratio, step, original, predicted);
                hops.push(hop);
                hop
            },
            |_| {},
        );
        Ok(hops)
    }
}

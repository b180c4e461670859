//! Elastic down- and upsampling of advanced-mode blocks.
//!
//! A downsampled block side of `n` samples splits the block side into `n`
//! cells whose widths grow linearly from the PPP at one edge to the PPP at the
//! other. The encoder averages each cell; the decoder interpolates linearly
//! between cell centres.

use crate::mesh::types::{Block, Corner};

/// `side + 1` strictly increasing cell boundaries from 0 to `len`.
pub fn elastic_cells(len: usize, side: usize, ppp_start: f32, ppp_end: f32) -> Vec<usize> {
    debug_assert!(side >= 1 && side <= len);
    let weights: Vec<f32> = (0..side)
        .map(|k| {
            let t = (k as f32 + 0.5) / side as f32;
            (ppp_start + (ppp_end - ppp_start) * t).max(f32::EPSILON)
        })
        .collect();
    let total: f32 = weights.iter().sum();

    let mut bounds = Vec::with_capacity(side + 1);
    bounds.push(0);
    let mut acc = 0.0f32;
    for (k, w) in weights.iter().enumerate().take(side - 1) {
        acc += w;
        let ideal = (len as f32 * acc / total).round() as usize;
        let prev = bounds[k];
        bounds.push(ideal.max(prev + 1).min(len - (side - 1 - k)));
    }
    bounds.push(len);
    bounds
}

/// Cell boundaries of one block along both axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCells {
    pub x: Vec<usize>,
    pub y: Vec<usize>,
}

impl BlockCells {
    pub fn for_block(block: &Block) -> Self {
        use Corner::*;
        let left = (block.ppp_x[TopLeft as usize] + block.ppp_x[BottomLeft as usize]) / 2.0;
        let right = (block.ppp_x[TopRight as usize] + block.ppp_x[BottomRight as usize]) / 2.0;
        let top = (block.ppp_y[TopLeft as usize] + block.ppp_y[TopRight as usize]) / 2.0;
        let bottom = (block.ppp_y[BottomLeft as usize] + block.ppp_y[BottomRight as usize]) / 2.0;
        Self {
            x: elastic_cells(block.width(), block.downsampled_x_side, left, right),
            y: elastic_cells(block.height(), block.downsampled_y_side, top, bottom),
        }
    }

    pub fn side_x(&self) -> usize {
        self.x.len() - 1
    }

    pub fn side_y(&self) -> usize {
        self.y.len() - 1
    }
}

/// Average every cell of `src` (block-local, `src_stride`) into `dst` (`side_x × side_y`).
pub fn downsample(src: &[u8], src_stride: usize, cells: &BlockCells, dst: &mut [u8]) {
    let side_x = cells.side_x();
    for (j, ys) in cells.y.windows(2).enumerate() {
        for (i, xs) in cells.x.windows(2).enumerate() {
            let mut sum = 0u64;
            for y in ys[0]..ys[1] {
                let row = &src[y * src_stride..];
                sum += row[xs[0]..xs[1]].iter().map(|&v| v as u64).sum::<u64>();
            }
            let n = ((ys[1] - ys[0]) * (xs[1] - xs[0])) as u64;
            dst[j * side_x + i] = ((sum + n / 2) / n) as u8;
        }
    }
}

/// For each output pixel: the two samples around it and the weight of the second.
fn taps(bounds: &[usize]) -> Vec<(usize, usize, f32)> {
    let side = bounds.len() - 1;
    let len = bounds[side];
    let centres: Vec<f32> = bounds.windows(2).map(|b| (b[0] + b[1]) as f32 / 2.0).collect();
    (0..len)
        .map(|p| {
            if side == 1 {
                return (0, 0, 0.0);
            }
            let pos = p as f32 + 0.5;
            let mut i = 0;
            while i + 2 < side && centres[i + 1] <= pos {
                i += 1;
            }
            let t = ((pos - centres[i]) / (centres[i + 1] - centres[i])).clamp(0.0, 1.0);
            (i, i + 1, t)
        })
        .collect()
}

/// Interpolate `samples` (`side_x × side_y`) back to the full block in `dst`.
pub fn upsample(samples: &[u8], cells: &BlockCells, dst: &mut [u8], dst_stride: usize) {
    let side_x = cells.side_x();
    let tx = taps(&cells.x);
    let ty = taps(&cells.y);
    let width = tx.len();

    let mut rows = vec![0f32; cells.side_y() * width];
    for j in 0..cells.side_y() {
        let src = &samples[j * side_x..(j + 1) * side_x];
        for (x, &(a, b, t)) in tx.iter().enumerate() {
            rows[j * width + x] = src[a] as f32 * (1.0 - t) + src[b] as f32 * t;
        }
    }
    for (y, &(a, b, t)) in ty.iter().enumerate() {
        let out = &mut dst[y * dst_stride..y * dst_stride + width];
        for (x, px) in out.iter_mut().enumerate() {
            let v = rows[a * width + x] * (1.0 - t) + rows[b * width + x] * t;
            *px = (v + 0.5).floor().clamp(0.0, 255.0) as u8;
        }
    }
}

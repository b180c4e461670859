//! Encoder-side perceptual relevance estimation.
//!
//! A single-block hop pass over the luma plane measures horizontal activity,
//! a pass over its transpose vertical activity. Around each mesh corner the
//! mean hop magnitude, saturated at [`PR_HOP_SATURATION`], gives the corner's
//! relevance on that axis.

use crate::error::{try_alloc_zeroed, Result};
use crate::hop::predictor::HopPredictor;
use crate::hop::types::Hop;
use crate::mesh::types::{BlockGrid, RelevanceCorner, RelevanceLevel, RelevanceMesh};

/// Mean hop magnitude that already counts as fully relevant.
pub const PR_HOP_SATURATION: f32 = 2.0;

/// `[centre - half, centre + half)` clipped to `[0, len)`, never empty.
fn window(centre: usize, half: usize, len: usize) -> (usize, usize) {
    let half = half.max(1);
    let lo = centre.saturating_sub(half).min(len - 1);
    let hi = (centre + half).min(len).max(lo + 1);
    (lo, hi)
}

fn relevance_of(sum: u64, n: u64) -> RelevanceLevel {
    let mean = sum as f32 / n.max(1) as f32;
    RelevanceLevel::quantize((mean / PR_HOP_SATURATION).min(1.0))
}

/// Estimate the relevance mesh of a luma plane for the given grid.
pub fn estimate_mesh(
    predictor: &HopPredictor<'_>,
    luma: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    grid: &BlockGrid,
) -> Result<RelevanceMesh> {
    let mut recon = try_alloc_zeroed(width * height)?;
    let hops_x = predictor.encode(luma, stride, width, height, &mut recon, width)?;

    let mut transposed = try_alloc_zeroed(width * height)?;
    for y in 0..height {
        for x in 0..width {
            transposed[x * height + y] = luma[y * stride + x];
        }
    }
    let hops_y = predictor.encode(&transposed, height, height, width, &mut recon, height)?;

    let magnitude = |h: Hop| h.magnitude() as u64;
    let half_w = width / grid.blocks_w() / 2;
    let half_h = height / grid.blocks_h() / 2;

    let mut mesh = RelevanceMesh::new(grid.blocks_w(), grid.blocks_h());
    for (cy, &py) in grid.y_bounds().iter().enumerate() {
        let (y0, y1) = window(py, half_h, height);
        for (cx, &px) in grid.x_bounds().iter().enumerate() {
            let (x0, x1) = window(px, half_w, width);
            let (mut sum_x, mut sum_y) = (0u64, 0u64);
            for y in y0..y1 {
                for x in x0..x1 {
                    sum_x += magnitude(hops_x[y * width + x]);
                    sum_y += magnitude(hops_y[x * height + y]);
                }
            }
            let n = ((y1 - y0) * (x1 - x0)) as u64;
            mesh.set(
                cx,
                cy,
                RelevanceCorner::new(relevance_of(sum_x, n), relevance_of(sum_y, n)),
            );
        }
    }
    Ok(mesh)
}

//! Relevance → pixels-per-sample conversion and downsampled block shapes.

use crate::error::{LheError, Result};
use crate::mesh::types::{Block, BlockGrid, Corner, RelevanceCorner, RelevanceMesh, PPP_MIN, SIDE_MIN};

/// `2^(quality / 10)`: how strongly relevance pulls the PPP toward 1.
pub fn compression_factor(quality: u8) -> f32 {
    2f32.powf(quality as f32 / 10.0)
}

/// Largest PPP a block side allows (the side shrinks to [`SIDE_MIN`] samples).
pub fn ppp_max(block_side: usize) -> f32 {
    (block_side as f32 / SIDE_MIN as f32).max(PPP_MIN)
}

/// `1 + (ppp_max − 1)(1 − r) / (1 + cf · ppp_max · r)`.
///
/// Decreasing in `relevance`; `ppp_max` at 0 and exactly 1 at 1.
pub fn relevance_to_ppp(relevance: f32, ppp_max: f32, compression_factor: f32) -> f32 {
    let r = relevance.clamp(0.0, 1.0);
    let ppp = 1.0 + (ppp_max - 1.0) * (1.0 - r) / (1.0 + compression_factor * ppp_max * r);
    ppp.clamp(PPP_MIN, ppp_max)
}

fn side_from_ppp(len: usize, ppp_a: f32, ppp_b: f32) -> usize {
    (len as f32 / ((ppp_a + ppp_b) / 2.0)).ceil() as usize
}

/// Rescale `ppp` so its mean equals `len / side`.
fn elastic_fit(ppp: &mut [f32; 4], len: usize, side: usize, max: f32) {
    let mean = ppp.iter().sum::<f32>() / 4.0;
    let target = len as f32 / side as f32;
    if mean <= 0.0 {
        return;
    }
    let scale = target / mean;
    for p in ppp.iter_mut() {
        *p = (*p * scale).clamp(PPP_MIN, max.max(PPP_MIN));
    }
}

/// Compute the PPPs and downsampled sides of one luma block from its corners.
pub fn shape_block(block: &mut Block, corners: &[RelevanceCorner; 4], compression_factor: f32) {
    let (w, h) = (block.width(), block.height());
    let (max_x, max_y) = (ppp_max(w), ppp_max(h));
    let mut ppp_x = corners.map(|c| relevance_to_ppp(c.x.value(), max_x, compression_factor));
    let mut ppp_y = corners.map(|c| relevance_to_ppp(c.y.value(), max_y, compression_factor));

    use Corner::*;
    let side_x = side_from_ppp(w, ppp_x[TopLeft as usize], ppp_x[TopRight as usize])
        .max(side_from_ppp(w, ppp_x[BottomLeft as usize], ppp_x[BottomRight as usize]))
        .max(SIDE_MIN)
        .min(w);
    let side_y = side_from_ppp(h, ppp_y[TopLeft as usize], ppp_y[BottomLeft as usize])
        .max(side_from_ppp(h, ppp_y[TopRight as usize], ppp_y[BottomRight as usize]))
        .max(SIDE_MIN)
        .min(h);

    elastic_fit(&mut ppp_x, w, side_x, max_x);
    elastic_fit(&mut ppp_y, h, side_y, max_y);

    block.ppp_x = ppp_x;
    block.ppp_y = ppp_y;
    block.downsampled_x_side = side_x;
    block.downsampled_y_side = side_y;
}

/// Shape every block of a luma grid from the mesh.
pub fn apply_mesh(grid: &mut BlockGrid, mesh: &RelevanceMesh, quality: u8) -> Result<()> {
    if mesh.blocks_w() != grid.blocks_w() || mesh.blocks_h() != grid.blocks_h() {
        return Err(LheError::InvalidArgument("relevance mesh does not match block grid"));
    }
    grid.require_min_side(SIDE_MIN)?;
    let cf = compression_factor(quality);
    for by in 0..grid.blocks_h() {
        for bx in 0..grid.blocks_w() {
            let corners = mesh.block_corners(bx, by);
            shape_block(grid.block_mut(bx, by), &corners, cf);
        }
    }
    Ok(())
}

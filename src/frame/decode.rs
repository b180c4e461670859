//! Frame decoder: header → seeds → Huffman tables → (mesh) → hops → pixels.
//!
//! Entropy decoding is sequential; block reconstruction runs through the
//! codec's [`BlockContext`].

use crate::bits::BitReader;
use crate::config::QUALITY_MAX;
use crate::error::{try_alloc_zeroed, LheError, Result};
use crate::frame::codec::BlockContext;
use crate::frame::header::FrameHeader;
use crate::frame::plane::{ChannelPlane, Frame};
use crate::frame::types::{Channel, Execution, FrameMode};
use crate::hop::predictor::HopPredictor;
use crate::hop::types::Hop;
use crate::huffman::HuffmanTable;
use crate::mesh::ppp::apply_mesh;
use crate::mesh::resample::{upsample, BlockCells};
use crate::mesh::types::{Block, BlockGrid, RelevanceMesh};
use crate::tables::PrecomputedTables;

/// Everything in a frame before the hop symbols.
#[derive(Debug, Clone)]
pub struct FrameSummary {
    pub header: FrameHeader,
    /// Seeds per channel, block raster order.
    pub seeds: [Vec<u8>; 3],
    pub chroma_table: HuffmanTable,
    pub luma_table: HuffmanTable,
    /// Advanced mode only.
    pub quality: Option<u8>,
    pub mesh: Option<RelevanceMesh>,
    /// Bits taken by everything above.
    pub header_bits: u64,
}

fn read_summary(reader: &mut BitReader<'_>) -> Result<(FrameSummary, BlockGrid, BlockGrid)> {
    let header = FrameHeader::read(reader)?;
    let (mut luma_grid, mut chroma_grid) = header.grids()?;

    let mut seeds: [Vec<u8>; 3] = Default::default();
    for (ch, s) in Channel::ALL.iter().zip(seeds.iter_mut()) {
        let n = if ch.is_chroma() { chroma_grid.len() } else { luma_grid.len() };
        s.reserve_exact(n);
        for _ in 0..n {
            s.push(reader.read_u8()?);
        }
    }

    let chroma_table = HuffmanTable::read_header(reader)?;
    let luma_table = HuffmanTable::read_header(reader)?;

    let (quality, mesh) = if header.mode == FrameMode::Advanced {
        let quality = reader.read_u8()?;
        if quality > QUALITY_MAX {
            return Err(LheError::MalformedHeader("quality above 99"));
        }
        let mesh = RelevanceMesh::read(reader, luma_grid.blocks_w(), luma_grid.blocks_h())?;
        apply_mesh(&mut luma_grid, &mesh, quality)?;
        let (sx, sy) = header.chroma_format.subsampling();
        chroma_grid = luma_grid.derive_subsampled(sx, sy)?;
        (Some(quality), Some(mesh))
    } else {
        (None, None)
    };

    let summary = FrameSummary {
        header,
        seeds,
        chroma_table,
        luma_table,
        quality,
        mesh,
        header_bits: reader.bits_consumed(),
    };
    Ok((summary, luma_grid, chroma_grid))
}

/// Parse a frame up to (not including) its hop symbols.
pub fn inspect_frame(data: &[u8]) -> Result<FrameSummary> {
    let mut reader = BitReader::new(data);
    Ok(read_summary(&mut reader)?.0)
}

fn decode_block(predictor: &HopPredictor<'_>, block: &Block, seed: u8, hops: &[Hop]) -> Result<Vec<u8>> {
    let (w, h) = (block.width(), block.height());
    let mut out = try_alloc_zeroed(w * h)?;
    if block.is_downsampled() {
        let (sx, sy) = (block.downsampled_x_side, block.downsampled_y_side);
        let mut samples = try_alloc_zeroed(sx * sy)?;
        predictor.decode(seed, hops, sx, sy, &mut samples, sx)?;
        upsample(&samples, &BlockCells::for_block(block), &mut out, w);
    } else {
        predictor.decode(seed, hops, w, h, &mut out, w)?;
    }
    Ok(out)
}

/// Decode one frame. Ratio and interior prediction come from the header.
pub(crate) fn decode_frame(tables: &PrecomputedTables, execution: Execution, data: &[u8]) -> Result<Frame> {
    let mut reader = BitReader::new(data);
    let (summary, luma_grid, chroma_grid) = read_summary(&mut reader)?;
    let header = summary.header;
    let ctx = BlockContext {
        predictor: HopPredictor::new(tables, header.ratio, header.prediction)?,
        execution,
    };

    // Every symbol takes at least one bit.
    let total_samples = luma_grid.sample_count() as u64 + 2 * chroma_grid.sample_count() as u64;
    if total_samples > reader.bits_remaining() {
        return Err(LheError::TruncatedBitstream);
    }

    let grid_of = |ch: Channel| if ch.is_chroma() { &chroma_grid } else { &luma_grid };
    let mut symbols: Vec<Vec<Vec<Hop>>> = Vec::with_capacity(3);
    for ch in Channel::ALL {
        let table = if ch.is_chroma() { &summary.chroma_table } else { &summary.luma_table };
        let mut per_block = Vec::with_capacity(grid_of(ch).len());
        for block in grid_of(ch).blocks() {
            let mut hops = Vec::new();
            table.decode_into(&mut reader, block.sample_count(), &mut hops)?;
            per_block.push(hops);
        }
        symbols.push(per_block);
    }

    let (w, h) = header.luma_dims();
    let (cw, chh) = header.chroma_dims();
    let mut planes = Vec::with_capacity(3);
    for (i, ch) in Channel::ALL.iter().enumerate() {
        let grid = grid_of(*ch);
        let seeds = &summary.seeds[i];
        let hops = &symbols[i];
        let predictor = ctx.predictor;
        let blocks = ctx.map_blocks(grid.len(), |b| {
            decode_block(&predictor, &grid.blocks()[b], seeds[b], &hops[b])
        })?;
        let (pw, ph) = if ch.is_chroma() { (cw, chh) } else { (w, h) };
        let mut plane = ChannelPlane::new(pw, ph)?;
        for (block, pixels) in grid.blocks().iter().zip(&blocks) {
            plane.blit(block.x_ini, block.y_ini, block.width(), block.height(), pixels, block.width());
        }
        planes.push(plane);
    }
    let mut planes = planes.into_iter();
    let (Some(y), Some(a), Some(b)) = (planes.next(), planes.next(), planes.next()) else {
        return Err(LheError::InvalidArgument("frame needs three planes"));
    };

    crate::displaylevel!(
        4,
        "lhe: decoded {}x{} {} frame ({}), {}x{} blocks, {} of {} bits\n",
        w,
        h,
        header.mode.name(),
        header.chroma_format.name(),
        header.blocks_w,
        header.blocks_h,
        reader.bits_consumed(),
        data.len() * 8
    );

    Frame::from_planes(header.chroma_format, [y, a, b])
}

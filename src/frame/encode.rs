//! Frame encoder: blocks → hops (closed loop) → Huffman → bitstream.

use crate::bits::BitWriter;
use crate::error::{try_alloc_zeroed, LheError, Result};
use crate::frame::codec::BlockContext;
use crate::frame::header::FrameHeader;
use crate::frame::plane::{ChannelPlane, Frame};
use crate::frame::prefs::CodecConfig;
use crate::frame::types::{Channel, FrameMode};
use crate::hop::predictor::HopPredictor;
use crate::hop::types::Hop;
use crate::huffman::{HopHistogram, HuffmanTable};
use crate::mesh::ppp::apply_mesh;
use crate::mesh::relevance::estimate_mesh;
use crate::mesh::resample::{downsample, upsample, BlockCells};
use crate::mesh::types::{Block, BlockGrid, RelevanceMesh};

/// Result of encoding one frame.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    pub bytes: Vec<u8>,
    /// The frame a decoder reconstructs from `bytes`.
    pub reconstruction: Frame,
    /// Relevance mesh used (advanced mode only).
    pub mesh: Option<RelevanceMesh>,
}

struct CodedBlock {
    seed: u8,
    hops: Vec<Hop>,
    histogram: HopHistogram,
    /// Full-size reconstruction, `width × height`.
    recon: Vec<u8>,
}

fn histogram_of(hops: &[Hop]) -> HopHistogram {
    let mut h = HopHistogram::new();
    h.add_all(hops);
    h
}

fn encode_block(predictor: &HopPredictor<'_>, plane: &ChannelPlane, block: &Block) -> Result<CodedBlock> {
    let (w, h) = (block.width(), block.height());
    let src = plane.region(block.x_ini, block.y_ini);
    let mut recon = try_alloc_zeroed(w * h)?;
    if block.is_downsampled() {
        let cells = BlockCells::for_block(block);
        let (sx, sy) = (block.downsampled_x_side, block.downsampled_y_side);
        let mut samples = try_alloc_zeroed(sx * sy)?;
        downsample(src, plane.stride(), &cells, &mut samples);
        let mut sample_recon = try_alloc_zeroed(sx * sy)?;
        let hops = predictor.encode(&samples, sx, sx, sy, &mut sample_recon, sx)?;
        upsample(&sample_recon, &cells, &mut recon, w);
        Ok(CodedBlock {
            seed: samples[0],
            histogram: histogram_of(&hops),
            hops,
            recon,
        })
    } else {
        let hops = predictor.encode(src, plane.stride(), w, h, &mut recon, w)?;
        Ok(CodedBlock {
            seed: src[0],
            histogram: histogram_of(&hops),
            hops,
            recon,
        })
    }
}

fn encode_plane(ctx: &BlockContext<'_>, plane: &ChannelPlane, grid: &BlockGrid) -> Result<Vec<CodedBlock>> {
    let predictor = ctx.predictor;
    ctx.map_blocks(grid.len(), |i| encode_block(&predictor, plane, &grid.blocks()[i]))
}

fn assemble_plane(width: usize, height: usize, grid: &BlockGrid, coded: &[CodedBlock]) -> Result<ChannelPlane> {
    let mut plane = ChannelPlane::new(width, height)?;
    for (block, c) in grid.blocks().iter().zip(coded) {
        plane.blit(block.x_ini, block.y_ini, block.width(), block.height(), &c.recon, block.width());
    }
    Ok(plane)
}

fn as_argument_error(e: LheError) -> LheError {
    match e {
        LheError::MalformedHeader(what) => LheError::InvalidArgument(what),
        other => other,
    }
}

pub(crate) fn encode_frame(
    ctx: &BlockContext<'_>,
    config: &CodecConfig,
    frame: &Frame,
    mesh: Option<&RelevanceMesh>,
) -> Result<EncodedFrame> {
    let (blocks_w, blocks_h) = match config.mode {
        FrameMode::BasicSequential => (1, 1),
        _ => (config.blocks_w, config.blocks_h),
    };
    let width = u32::try_from(frame.width())
        .map_err(|_| LheError::InvalidArgument("frame too wide"))?;
    let height = u32::try_from(frame.height())
        .map_err(|_| LheError::InvalidArgument("frame too tall"))?;
    let header = FrameHeader {
        mode: config.mode,
        chroma_format: frame.chroma_format(),
        width,
        height,
        blocks_w,
        blocks_h,
        ratio: config.ratio,
        prediction: config.prediction,
    };
    header.validate().map_err(as_argument_error)?;
    let (mut luma_grid, mut chroma_grid) = header.grids().map_err(as_argument_error)?;

    let mesh = if config.mode == FrameMode::Advanced {
        let luma = frame.plane(Channel::Luma);
        let mesh = match mesh {
            Some(m) => m.clone(),
            None => estimate_mesh(
                &ctx.predictor,
                luma.data(),
                luma.width(),
                luma.height(),
                luma.stride(),
                &luma_grid,
            )?,
        };
        apply_mesh(&mut luma_grid, &mesh, config.quality)?;
        let (sx, sy) = frame.chroma_format().subsampling();
        chroma_grid = luma_grid.derive_subsampled(sx, sy)?;
        Some(mesh)
    } else {
        None
    };

    let grid_of = |ch: Channel| if ch.is_chroma() { &chroma_grid } else { &luma_grid };
    let mut coded = Vec::with_capacity(3);
    for ch in Channel::ALL {
        coded.push(encode_plane(ctx, frame.plane(ch), grid_of(ch))?);
    }

    let mut luma_hist = HopHistogram::new();
    let mut chroma_hist = HopHistogram::new();
    for (ch, blocks) in Channel::ALL.iter().zip(&coded) {
        let hist = if ch.is_chroma() { &mut chroma_hist } else { &mut luma_hist };
        for b in blocks {
            hist.merge(&b.histogram);
        }
    }
    let luma_table = HuffmanTable::from_histogram(&luma_hist)?;
    let chroma_table = HuffmanTable::from_histogram(&chroma_hist)?;

    let payload_bits = luma_table.encoded_bits(&luma_hist) + chroma_table.encoded_bits(&chroma_hist);
    let mut writer = BitWriter::with_capacity((payload_bits / 8) as usize + 1024);
    header.write(&mut writer);
    for blocks in &coded {
        for b in blocks {
            writer.write_u8(b.seed);
        }
    }
    chroma_table.write_header(&mut writer);
    luma_table.write_header(&mut writer);
    if let Some(mesh) = &mesh {
        writer.write_u8(config.quality);
        mesh.write(&mut writer);
    }
    for (ch, blocks) in Channel::ALL.iter().zip(&coded) {
        let table = if ch.is_chroma() { &chroma_table } else { &luma_table };
        for b in blocks {
            for &hop in &b.hops {
                table.encode_symbol(&mut writer, hop)?;
            }
        }
    }
    let bytes = writer.finish();

    let (w, h) = header.luma_dims();
    let (cw, ch) = header.chroma_dims();
    let reconstruction = Frame::from_planes(
        header.chroma_format,
        [
            assemble_plane(w, h, &luma_grid, &coded[0])?,
            assemble_plane(cw, ch, &chroma_grid, &coded[1])?,
            assemble_plane(cw, ch, &chroma_grid, &coded[2])?,
        ],
    )?;

    crate::displaylevel!(
        4,
        "lhe: encoded {}x{} {} frame ({}), {}x{} blocks, {} luma + {} chroma hops -> {} bytes\n",
        w,
        h,
        header.mode.name(),
        header.chroma_format.name(),
        blocks_w,
        blocks_h,
        luma_hist.total(),
        chroma_hist.total(),
        bytes.len()
    );

    Ok(EncodedFrame {
        bytes,
        reconstruction,
        mesh,
    })
}

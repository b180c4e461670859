//! Image/sequence file → `.lhe` container.

use std::path::Path;
use std::time::Instant;

use crate::error::{LheError, Result};
use crate::frame::codec::FrameCodec;
use crate::frame::plane::Frame;
use crate::frame::prefs::CodecConfig;
use crate::frame::types::ChromaFormat;
use crate::io::container::write_container;
use crate::io::file_io::{create_output, final_time_display, read_input};
use crate::io::image::{parse_pnm, read_yuv_frames, yuv_frame_size, ImageFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// Frame size of raw YUV input.
    pub yuv_size: Option<(usize, usize)>,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    pub frames: usize,
    /// Planar YUV bytes of all input frames.
    pub raw_bytes: u64,
    /// Container size.
    pub encoded_bytes: u64,
    /// Block grid actually used.
    pub blocks: (u8, u8),
}

/// Read every frame of an uncompressed input file.
pub fn load_frames(
    path: &Path,
    chroma_format: ChromaFormat,
    yuv_size: Option<(usize, usize)>,
) -> Result<Vec<Frame>> {
    let format = ImageFormat::from_path(path).ok_or_else(|| {
        LheError::UnsupportedFormat(format!("cannot tell the image format of {}", path.display()))
    })?;
    let data = read_input(path)?;
    match format {
        ImageFormat::Pgm | ImageFormat::Ppm => Ok(vec![parse_pnm(&data, chroma_format)?]),
        ImageFormat::Yuv => {
            let (w, h) = yuv_size.ok_or(LheError::InvalidArgument("raw YUV input needs --size WxH"))?;
            read_yuv_frames(&data, w, h, chroma_format)
        }
    }
}

/// Encode frames one after another.
pub fn encode_frames(codec: &FrameCodec, frames: &[Frame]) -> Result<Vec<Vec<u8>>> {
    let total = frames.len();
    frames
        .iter()
        .enumerate()
        .map(|(i, f)| {
            crate::displaylevel!(3, "\rEncoding frame {}/{}   ", i + 1, total);
            codec.encode(f)
        })
        .collect()
}

/// Encode `input` into a container at `output`.
///
/// The requested block grid is reduced when the frame is too small for it.
pub fn encode_file(
    config: &CodecConfig,
    input: &Path,
    output: &Path,
    options: EncodeOptions,
) -> Result<EncodeStats> {
    let start = Instant::now();
    let frames = load_frames(input, config.chroma_format, options.yuv_size)?;
    let first = frames
        .first()
        .ok_or_else(|| LheError::UnsupportedFormat("input holds no frame".into()))?;
    let (w, h) = (first.width(), first.height());

    let mut config = config.clone();
    let fitted = config.fit_grid(w, h, config.chroma_format);
    if config.mode != crate::frame::types::FrameMode::BasicSequential
        && fitted != (config.blocks_w, config.blocks_h)
    {
        crate::displaylevel!(
            2,
            "note: block grid reduced from {}x{} to {}x{} for a {}x{} frame\n",
            config.blocks_w,
            config.blocks_h,
            fitted.0,
            fitted.1,
            w,
            h
        );
    }
    config.set_blocks(fitted.0, fitted.1);

    let codec = FrameCodec::new(config)?;
    let payloads = encode_frames(&codec, &frames)?;
    crate::displaylevel!(3, "\n");

    let mut out = create_output(output, options.overwrite)?;
    write_container(&mut out, &payloads)?;
    std::io::Write::flush(&mut out)?;

    let raw_bytes = (frames.len() * yuv_frame_size(w, h, codec.config().chroma_format)) as u64;
    let encoded_bytes = crate::io::container::CONTAINER_HEADER_SIZE as u64
        + payloads
            .iter()
            .map(|p| (p.len() + crate::io::container::FRAME_PREFIX_SIZE) as u64)
            .sum::<u64>();
    crate::displaylevel!(
        2,
        "Encoded {} frame(s) : {} -> {} bytes, {:.2}%\n",
        frames.len(),
        raw_bytes,
        encoded_bytes,
        encoded_bytes as f64 / raw_bytes.max(1) as f64 * 100.0
    );
    final_time_display(start, raw_bytes);

    Ok(EncodeStats {
        frames: frames.len(),
        raw_bytes,
        encoded_bytes,
        blocks: fitted,
    })
}

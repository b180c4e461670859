//! `.lhe` container → image/sequence file.

use std::path::Path;
use std::time::Instant;

use crate::error::{LheError, Result};
use crate::frame::codec::FrameCodec;
use crate::frame::plane::Frame;
use crate::frame::prefs::CodecConfig;
use crate::io::container::read_container;
use crate::io::file_io::{final_time_display, read_input, write_output};
use crate::io::image::{encode_pnm, write_yuv_frame, yuv_frame_size, ImageFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub frames: usize,
    pub encoded_bytes: u64,
    /// Planar YUV bytes of all decoded frames.
    pub raw_bytes: u64,
}

/// Decode every frame of a container held in memory.
pub fn decode_container(codec: &FrameCodec, data: &[u8]) -> Result<Vec<Frame>> {
    let frames = read_container(data)?;
    let total = frames.len();
    frames
        .iter()
        .enumerate()
        .map(|(i, f)| {
            crate::displaylevel!(3, "\rDecoding frame {}/{}   ", i + 1, total);
            codec.decode(f.payload)
        })
        .collect()
}

/// Decode `input` and write it in the format implied by `output`'s extension.
pub fn decode_file(config: &CodecConfig, input: &Path, output: &Path, overwrite: bool) -> Result<DecodeStats> {
    let start = Instant::now();
    let format = ImageFormat::from_path(output).ok_or_else(|| {
        LheError::UnsupportedFormat(format!("cannot tell the image format of {}", output.display()))
    })?;
    let data = read_input(input)?;
    let codec = FrameCodec::new(config.clone())?;
    let frames = decode_container(&codec, &data)?;
    crate::displaylevel!(3, "\n");

    let bytes = match format {
        ImageFormat::Pgm | ImageFormat::Ppm => match frames.as_slice() {
            [frame] => encode_pnm(frame, format)?,
            _ => {
                return Err(LheError::InvalidArgument(
                    "PGM/PPM output holds exactly one frame; use .yuv for sequences",
                ))
            }
        },
        ImageFormat::Yuv => {
            let mut out = Vec::new();
            for f in &frames {
                write_yuv_frame(f, &mut out);
            }
            out
        }
    };
    write_output(output, &bytes, overwrite)?;

    let raw_bytes = frames
        .iter()
        .map(|f| yuv_frame_size(f.width(), f.height(), f.chroma_format()) as u64)
        .sum();
    crate::displaylevel!(
        2,
        "Decoded {} frame(s) : {} -> {} bytes\n",
        frames.len(),
        data.len(),
        raw_bytes
    );
    final_time_display(start, raw_bytes);

    Ok(DecodeStats {
        frames: frames.len(),
        encoded_bytes: data.len() as u64,
        raw_bytes,
    })
}

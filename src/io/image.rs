//! Uncompressed image formats: binary PGM/PPM and raw planar YUV sequences.

use std::path::Path;

use crate::error::{LheError, Result};
use crate::frame::plane::{ChannelPlane, Frame};
use crate::frame::types::{Channel, ChromaFormat};
use crate::io::color::{frame_to_rgb, rgb_to_frame};

/// Uncompressed layouts the CLI reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// P5, 8-bit gray. Written from the luma plane.
    Pgm,
    /// P6, 8-bit RGB.
    Ppm,
    /// Concatenated planar frames (I420 / I422 / I444).
    Yuv,
}

impl ImageFormat {
    /// Guess from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pgm" => Some(ImageFormat::Pgm),
            "ppm" => Some(ImageFormat::Ppm),
            "yuv" | "i420" | "i422" | "i444" => Some(ImageFormat::Yuv),
            _ => None,
        }
    }
}

// ── PNM ──────────────────────────────────────────────────────────────────────

/// Cursor over a PNM header: whitespace-separated tokens, `#` comments.
struct PnmHeader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PnmHeader<'a> {
    fn skip_blank(&mut self) {
        while self.pos < self.data.len() {
            match self.data[self.pos] {
                b'#' => {
                    while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                c if c.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    fn token(&mut self) -> Result<&'a [u8]> {
        self.skip_blank();
        let start = self.pos;
        while self.pos < self.data.len() && !self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(LheError::UnsupportedFormat("PNM header ends early".into()));
        }
        Ok(&self.data[start..self.pos])
    }

    fn number(&mut self) -> Result<usize> {
        let tok = self.token()?;
        std::str::from_utf8(tok)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| LheError::UnsupportedFormat("PNM header field is not a number".into()))
    }
}

/// Parse a binary PGM or PPM image into a frame of the given chroma layout.
pub fn parse_pnm(data: &[u8], chroma_format: ChromaFormat) -> Result<Frame> {
    let mut h = PnmHeader { data, pos: 0 };
    let magic = h.token()?;
    let channels = match magic {
        b"P5" => 1,
        b"P6" => 3,
        other => {
            return Err(LheError::UnsupportedFormat(format!(
                "PNM magic {:?} (only P5 and P6 are read)",
                String::from_utf8_lossy(other)
            )))
        }
    };
    let width = h.number()?;
    let height = h.number()?;
    let maxval = h.number()?;
    if maxval != 255 {
        return Err(LheError::UnsupportedFormat(format!("PNM maxval {maxval} (only 255 is read)")));
    }
    if width == 0 || height == 0 {
        return Err(LheError::UnsupportedFormat("PNM image has no pixels".into()));
    }
    // Exactly one whitespace byte separates the header from the raster.
    let raster_start = h.pos + 1;
    let raster_len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| LheError::UnsupportedFormat("PNM image too large".into()))?;
    if data.len() < raster_start || data.len() - raster_start < raster_len {
        return Err(LheError::TruncatedBitstream);
    }
    let raster = &data[raster_start..raster_start + raster_len];

    if channels == 3 {
        return rgb_to_frame(raster, width, height, chroma_format);
    }
    let mut frame = Frame::new(width, height, chroma_format)?;
    frame.plane_mut(Channel::Luma).data_mut().copy_from_slice(raster);
    Ok(frame)
}

/// Serialize a frame as P5 (luma only) or P6 (converted to RGB).
pub fn encode_pnm(frame: &Frame, format: ImageFormat) -> Result<Vec<u8>> {
    let (w, h) = (frame.width(), frame.height());
    let (magic, raster) = match format {
        ImageFormat::Pgm => ("P5", frame.plane(Channel::Luma).to_packed()),
        ImageFormat::Ppm => ("P6", frame_to_rgb(frame)),
        ImageFormat::Yuv => {
            return Err(LheError::InvalidArgument("raw YUV is not a PNM format"));
        }
    };
    let mut out = format!("{magic}\n{w} {h}\n255\n").into_bytes();
    out.extend_from_slice(&raster);
    Ok(out)
}

// ── Raw planar YUV ───────────────────────────────────────────────────────────

/// Bytes of one planar frame.
pub fn yuv_frame_size(width: usize, height: usize, chroma_format: ChromaFormat) -> usize {
    let (cw, ch) = chroma_format.chroma_dims(width, height);
    width * height + 2 * cw * ch
}

/// Split a raw planar sequence into frames.
pub fn read_yuv_frames(
    data: &[u8],
    width: usize,
    height: usize,
    chroma_format: ChromaFormat,
) -> Result<Vec<Frame>> {
    if width == 0 || height == 0 {
        return Err(LheError::InvalidArgument("raw YUV needs a frame size"));
    }
    let frame_size = yuv_frame_size(width, height, chroma_format);
    if data.is_empty() || data.len() % frame_size != 0 {
        return Err(LheError::UnsupportedFormat(format!(
            "raw YUV size {} is not a multiple of the {}-byte frame",
            data.len(),
            frame_size
        )));
    }
    let (cw, ch) = chroma_format.chroma_dims(width, height);
    data.chunks_exact(frame_size)
        .map(|chunk| {
            let (y, rest) = chunk.split_at(width * height);
            let (u, v) = rest.split_at(cw * ch);
            Frame::from_planes(
                chroma_format,
                [
                    ChannelPlane::from_vec(width, height, width, y.to_vec())?,
                    ChannelPlane::from_vec(cw, ch, cw, u.to_vec())?,
                    ChannelPlane::from_vec(cw, ch, cw, v.to_vec())?,
                ],
            )
        })
        .collect()
}

/// Append one frame as packed planar YUV.
pub fn write_yuv_frame(frame: &Frame, out: &mut Vec<u8>) {
    for plane in frame.planes() {
        out.extend_from_slice(&plane.to_packed());
    }
}

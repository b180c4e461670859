//! Full-range BT.601 RGB ↔ YCbCr conversion with chroma (sub)sampling.

use crate::error::{LheError, Result};
use crate::frame::plane::{ChannelPlane, Frame};
use crate::frame::types::{Channel, ChromaFormat};

#[inline]
fn to_u8(v: f32) -> u8 {
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Convert packed RGB (3 bytes per pixel, no padding) into a YUV frame.
///
/// Chroma samples average the `sx × sy` pixels they cover.
pub fn rgb_to_frame(rgb: &[u8], width: usize, height: usize, chroma_format: ChromaFormat) -> Result<Frame> {
    if rgb.len() < width * height * 3 {
        return Err(LheError::InvalidArgument("RGB buffer smaller than image"));
    }
    let mut luma = ChannelPlane::new(width, height)?;
    let mut cb_full = vec![0f32; width * height];
    let mut cr_full = vec![0f32; width * height];
    for (i, px) in rgb.chunks_exact(3).take(width * height).enumerate() {
        let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
        luma.data_mut()[i] = to_u8(0.299 * r + 0.587 * g + 0.114 * b);
        cb_full[i] = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
        cr_full[i] = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    }

    let (sx, sy) = chroma_format.subsampling();
    let (cw, ch) = chroma_format.chroma_dims(width, height);
    let mut cb = ChannelPlane::new(cw, ch)?;
    let mut cr = ChannelPlane::new(cw, ch)?;
    for cy in 0..ch {
        for cx in 0..cw {
            let (mut sb, mut sr, mut n) = (0f32, 0f32, 0f32);
            for y in cy * sy..((cy + 1) * sy).min(height) {
                for x in cx * sx..((cx + 1) * sx).min(width) {
                    sb += cb_full[y * width + x];
                    sr += cr_full[y * width + x];
                    n += 1.0;
                }
            }
            cb.set(cx, cy, to_u8(sb / n));
            cr.set(cx, cy, to_u8(sr / n));
        }
    }
    Frame::from_planes(chroma_format, [luma, cb, cr])
}

/// Convert a frame back to packed RGB, replicating each chroma sample over
/// the pixels it covers.
pub fn frame_to_rgb(frame: &Frame) -> Vec<u8> {
    let (w, h) = (frame.width(), frame.height());
    let (sx, sy) = frame.chroma_format().subsampling();
    let luma = frame.plane(Channel::Luma);
    let cb = frame.plane(Channel::ChromaA);
    let cr = frame.plane(Channel::ChromaB);
    let mut out = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            let yv = luma.get(x, y) as f32;
            let u = cb.get(x / sx, y / sy) as f32 - 128.0;
            let v = cr.get(x / sx, y / sy) as f32 - 128.0;
            out.push(to_u8(yv + 1.402 * v));
            out.push(to_u8(yv - 0.344_136 * u - 0.714_136 * v));
            out.push(to_u8(yv + 1.772 * u));
        }
    }
    out
}

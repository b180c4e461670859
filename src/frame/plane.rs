//! Raw pixel planes with stride, and the three-plane frame.

use crate::error::{try_alloc_zeroed, LheError, Result};
use crate::frame::types::{Channel, ChromaFormat};

/// One 8-bit channel: `height` rows of `width` pixels, rows `stride` bytes apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPlane {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl ChannelPlane {
    /// Zeroed plane with `stride == width`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let data = try_alloc_zeroed(width * height)?;
        Ok(Self {
            width,
            height,
            stride: width,
            data,
        })
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self> {
        let mut plane = Self::new(width, height)?;
        plane.data.fill(value);
        Ok(plane)
    }

    /// Wrap an existing buffer; it must hold `height` rows of `stride` bytes
    /// (the last row may stop at `width`).
    pub fn from_vec(width: usize, height: usize, stride: usize, data: Vec<u8>) -> Result<Self> {
        if stride < width {
            return Err(LheError::InvalidArgument("stride smaller than width"));
        }
        if height > 0 && data.len() < (height - 1) * stride + width {
            return Err(LheError::InvalidArgument("plane buffer too small"));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..y * self.stride + self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.stride + x] = value;
    }

    /// View starting at `(x, y)`, sharing this plane's stride.
    pub fn region(&self, x: usize, y: usize) -> &[u8] {
        &self.data[y * self.stride + x..]
    }

    /// Copy a `width × height` block from `src` (rows `src_stride` apart) to `(x0, y0)`.
    pub fn blit(&mut self, x0: usize, y0: usize, width: usize, height: usize, src: &[u8], src_stride: usize) {
        for y in 0..height {
            let dst = y0 + y;
            self.row_mut(dst)[x0..x0 + width]
                .copy_from_slice(&src[y * src_stride..y * src_stride + width]);
        }
    }

    /// Tightly packed copy (`stride == width`).
    pub fn to_packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }
}

/// A YUV frame: full-size luma plus two chroma planes sized by the chroma format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    chroma_format: ChromaFormat,
    planes: [ChannelPlane; 3],
}

impl Frame {
    /// Black-luma, neutral-chroma frame.
    pub fn new(width: usize, height: usize, chroma_format: ChromaFormat) -> Result<Self> {
        let (cw, ch) = chroma_format.chroma_dims(width, height);
        Ok(Self {
            chroma_format,
            planes: [
                ChannelPlane::new(width, height)?,
                ChannelPlane::filled(cw, ch, 128)?,
                ChannelPlane::filled(cw, ch, 128)?,
            ],
        })
    }

    /// Assemble a frame from planes whose sizes agree with `chroma_format`.
    pub fn from_planes(chroma_format: ChromaFormat, planes: [ChannelPlane; 3]) -> Result<Self> {
        let (cw, ch) = chroma_format.chroma_dims(planes[0].width(), planes[0].height());
        for p in &planes[1..] {
            if p.width() != cw || p.height() != ch {
                return Err(LheError::InvalidArgument("chroma plane size does not match format"));
            }
        }
        Ok(Self {
            chroma_format,
            planes,
        })
    }

    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    pub fn chroma_format(&self) -> ChromaFormat {
        self.chroma_format
    }

    pub fn plane(&self, channel: Channel) -> &ChannelPlane {
        &self.planes[channel as usize]
    }

    pub fn plane_mut(&mut self, channel: Channel) -> &mut ChannelPlane {
        &mut self.planes[channel as usize]
    }

    pub fn planes(&self) -> &[ChannelPlane; 3] {
        &self.planes
    }

    pub fn into_planes(self) -> [ChannelPlane; 3] {
        self.planes
    }
}

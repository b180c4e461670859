//! Block grid and perceptual-relevance mesh types.

use crate::bits::{BitReader, BitWriter};
use crate::error::{LheError, Result};

/// Smallest downsampled block side, and smallest block side in advanced mode.
pub const SIDE_MIN: usize = 2;
/// Smallest pixels-per-sample value (no downsampling).
pub const PPP_MIN: f32 = 1.0;
/// Bits per transmitted relevance level.
pub const RELEVANCE_BITS: u32 = 3;
/// Quantized relevance values, indexed by level.
pub const RELEVANCE_LEVELS: [f32; 6] = [0.0, 0.125, 0.25, 0.5, 0.75, 1.0];

/// One of the 6 quantized relevance levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RelevanceLevel(u8);

impl RelevanceLevel {
    pub const ZERO: RelevanceLevel = RelevanceLevel(0);
    pub const MAX: RelevanceLevel = RelevanceLevel(RELEVANCE_LEVELS.len() as u8 - 1);

    pub fn from_index(index: u8) -> Option<Self> {
        ((index as usize) < RELEVANCE_LEVELS.len()).then_some(RelevanceLevel(index))
    }

    /// Snap a raw relevance in [0, 1] down to the nearest level at or below it.
    pub fn quantize(relevance: f32) -> Self {
        let mut level = 0;
        for (i, &threshold) in RELEVANCE_LEVELS.iter().enumerate().skip(1) {
            if relevance >= threshold {
                level = i;
            }
        }
        RelevanceLevel(level as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn value(self) -> f32 {
        RELEVANCE_LEVELS[self.0 as usize]
    }
}

/// Relevance of one mesh corner along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelevanceCorner {
    pub x: RelevanceLevel,
    pub y: RelevanceLevel,
}

impl RelevanceCorner {
    pub fn new(x: RelevanceLevel, y: RelevanceLevel) -> Self {
        Self { x, y }
    }

    pub fn uniform(level: RelevanceLevel) -> Self {
        Self { x: level, y: level }
    }
}

/// Block corners, in the order PPP arrays are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

/// `(blocks_w + 1) × (blocks_h + 1)` corner relevances, raster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceMesh {
    blocks_w: usize,
    blocks_h: usize,
    corners: Vec<RelevanceCorner>,
}

impl RelevanceMesh {
    pub fn new(blocks_w: usize, blocks_h: usize) -> Self {
        Self::uniform(blocks_w, blocks_h, RelevanceLevel::ZERO)
    }

    pub fn uniform(blocks_w: usize, blocks_h: usize, level: RelevanceLevel) -> Self {
        Self {
            blocks_w,
            blocks_h,
            corners: vec![RelevanceCorner::uniform(level); (blocks_w + 1) * (blocks_h + 1)],
        }
    }

    pub fn blocks_w(&self) -> usize {
        self.blocks_w
    }

    pub fn blocks_h(&self) -> usize {
        self.blocks_h
    }

    #[inline]
    fn corner_index(&self, cx: usize, cy: usize) -> usize {
        cy * (self.blocks_w + 1) + cx
    }

    pub fn get(&self, cx: usize, cy: usize) -> RelevanceCorner {
        self.corners[self.corner_index(cx, cy)]
    }

    pub fn set(&mut self, cx: usize, cy: usize, corner: RelevanceCorner) {
        let i = self.corner_index(cx, cy);
        self.corners[i] = corner;
    }

    /// The four corners of block `(bx, by)`, indexed by [`Corner`].
    pub fn block_corners(&self, bx: usize, by: usize) -> [RelevanceCorner; 4] {
        [
            self.get(bx, by),
            self.get(bx + 1, by),
            self.get(bx, by + 1),
            self.get(bx + 1, by + 1),
        ]
    }

    pub fn write(&self, writer: &mut BitWriter) {
        for c in &self.corners {
            writer.write_bits(c.x.index() as u32, RELEVANCE_BITS);
            writer.write_bits(c.y.index() as u32, RELEVANCE_BITS);
        }
    }

    pub fn read(reader: &mut BitReader<'_>, blocks_w: usize, blocks_h: usize) -> Result<Self> {
        let mut mesh = Self::new(blocks_w, blocks_h);
        for c in &mut mesh.corners {
            let x = reader.read_bits(RELEVANCE_BITS)? as u8;
            let y = reader.read_bits(RELEVANCE_BITS)? as u8;
            match (RelevanceLevel::from_index(x), RelevanceLevel::from_index(y)) {
                (Some(x), Some(y)) => *c = RelevanceCorner::new(x, y),
                _ => return Err(LheError::MalformedHeader("relevance level out of range")),
            }
        }
        Ok(mesh)
    }
}

/// One rectangular block of a plane.
///
/// Sides equal to the block size mean the block is coded at full resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub x_ini: usize,
    pub x_fin: usize,
    pub y_ini: usize,
    pub y_fin: usize,
    pub downsampled_x_side: usize,
    pub downsampled_y_side: usize,
    /// Per-corner pixels-per-sample, indexed by [`Corner`].
    pub ppp_x: [f32; 4],
    pub ppp_y: [f32; 4],
}

impl Block {
    /// Full-resolution block covering `[x_ini, x_fin) × [y_ini, y_fin)`.
    pub fn full(x_ini: usize, x_fin: usize, y_ini: usize, y_fin: usize) -> Self {
        Self {
            x_ini,
            x_fin,
            y_ini,
            y_fin,
            downsampled_x_side: x_fin - x_ini,
            downsampled_y_side: y_fin - y_ini,
            ppp_x: [PPP_MIN; 4],
            ppp_y: [PPP_MIN; 4],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.x_fin - self.x_ini
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y_fin - self.y_ini
    }

    pub fn is_downsampled(&self) -> bool {
        self.downsampled_x_side < self.width() || self.downsampled_y_side < self.height()
    }

    /// Number of coded samples (one hop symbol each).
    pub fn sample_count(&self) -> usize {
        self.downsampled_x_side * self.downsampled_y_side
    }
}

/// `(i · len) / n` for `i` in `0..=n`.
pub fn grid_boundaries(len: usize, n: usize) -> Vec<usize> {
    (0..=n).map(|i| i * len / n).collect()
}

fn ceil_div(a: usize, b: usize) -> usize {
    a.div_ceil(b)
}

/// Flat block arena for one plane, indexed `by * blocks_w + bx`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGrid {
    blocks_w: usize,
    blocks_h: usize,
    x_bounds: Vec<usize>,
    y_bounds: Vec<usize>,
    blocks: Vec<Block>,
}

impl BlockGrid {
    /// Partition a `width × height` plane into `blocks_w × blocks_h` full-resolution blocks.
    pub fn partition(width: usize, height: usize, blocks_w: usize, blocks_h: usize) -> Result<Self> {
        if blocks_w == 0 || blocks_h == 0 {
            return Err(LheError::MalformedHeader("block grid has no blocks"));
        }
        Self::from_bounds(
            blocks_w,
            blocks_h,
            grid_boundaries(width, blocks_w),
            grid_boundaries(height, blocks_h),
        )
    }

    fn from_bounds(
        blocks_w: usize,
        blocks_h: usize,
        x_bounds: Vec<usize>,
        y_bounds: Vec<usize>,
    ) -> Result<Self> {
        let empty = |b: &[usize]| b.windows(2).any(|w| w[1] <= w[0]);
        if empty(&x_bounds) || empty(&y_bounds) {
            return Err(LheError::MalformedHeader("block grid produces an empty block"));
        }
        let mut blocks = Vec::with_capacity(blocks_w * blocks_h);
        for by in 0..blocks_h {
            for bx in 0..blocks_w {
                blocks.push(Block::full(
                    x_bounds[bx],
                    x_bounds[bx + 1],
                    y_bounds[by],
                    y_bounds[by + 1],
                ));
            }
        }
        Ok(Self {
            blocks_w,
            blocks_h,
            x_bounds,
            y_bounds,
            blocks,
        })
    }

    /// Chroma grid: boundaries `ceil(b / s)`, shapes scaled from the luma blocks.
    pub fn derive_subsampled(&self, sub_x: usize, sub_y: usize) -> Result<Self> {
        let xb = self.x_bounds.iter().map(|&b| ceil_div(b, sub_x)).collect();
        let yb = self.y_bounds.iter().map(|&b| ceil_div(b, sub_y)).collect();
        let mut grid = Self::from_bounds(self.blocks_w, self.blocks_h, xb, yb)?;
        for (chroma, luma) in grid.blocks.iter_mut().zip(self.blocks.iter()) {
            if luma.downsampled_x_side < luma.width() {
                chroma.downsampled_x_side = ceil_div(luma.downsampled_x_side, sub_x)
                    .max(SIDE_MIN)
                    .min(chroma.width());
            }
            if luma.downsampled_y_side < luma.height() {
                chroma.downsampled_y_side = ceil_div(luma.downsampled_y_side, sub_y)
                    .max(SIDE_MIN)
                    .min(chroma.height());
            }
            chroma.ppp_x = luma.ppp_x;
            chroma.ppp_y = luma.ppp_y;
        }
        Ok(grid)
    }

    /// Every block side must be at least `min` pixels.
    pub fn require_min_side(&self, min: usize) -> Result<()> {
        if self.blocks.iter().any(|b| b.width() < min || b.height() < min) {
            return Err(LheError::MalformedHeader("block smaller than the minimum side"));
        }
        Ok(())
    }

    pub fn blocks_w(&self) -> usize {
        self.blocks_w
    }

    pub fn blocks_h(&self) -> usize {
        self.blocks_h
    }

    pub fn x_bounds(&self) -> &[usize] {
        &self.x_bounds
    }

    pub fn y_bounds(&self) -> &[usize] {
        &self.y_bounds
    }

    #[inline]
    pub fn index(&self, bx: usize, by: usize) -> usize {
        by * self.blocks_w + bx
    }

    pub fn block(&self, bx: usize, by: usize) -> &Block {
        &self.blocks[self.index(bx, by)]
    }

    pub fn block_mut(&mut self, bx: usize, by: usize) -> &mut Block {
        let i = self.index(bx, by);
        &mut self.blocks[i]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total coded samples over all blocks.
    pub fn sample_count(&self) -> usize {
        self.blocks.iter().map(Block::sample_count).sum()
    }
}

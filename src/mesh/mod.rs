//! Advanced-mode block mesh: grid partitioning, perceptual relevance,
//! pixels-per-sample shapes and elastic resampling.

pub mod ppp;
pub mod relevance;
pub mod resample;
pub mod types;

pub use ppp::{apply_mesh, compression_factor, ppp_max, relevance_to_ppp, shape_block};
pub use relevance::{estimate_mesh, PR_HOP_SATURATION};
pub use resample::{downsample, elastic_cells, upsample, BlockCells};
pub use types::{
    grid_boundaries, Block, BlockGrid, Corner, RelevanceCorner, RelevanceLevel, RelevanceMesh,
    PPP_MIN, RELEVANCE_BITS, RELEVANCE_LEVELS, SIDE_MIN,
};

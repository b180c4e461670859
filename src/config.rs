// config.rs: Compile-time configuration constants.
//
// Runtime values start from these and can be overridden by the LHE_QUALITY /
// LHE_NBWORKERS environment variables (see `cli::op_mode`) and then by CLI
// flags.

// Ratio (rmax · 10) used to grow hop magnitudes away from the step.
// Must lie inside the precomputed table range [20, 40].
pub const RATIO_DEFAULT: u8 = 25;

// Quality of advanced-mode frames, 0..=99. Higher quality keeps more samples.
// Can be overridden by the LHE_QUALITY environment variable or `--quality`.
pub const QUALITY_DEFAULT: u8 = 50;

// Highest accepted quality value.
pub const QUALITY_MAX: u8 = 99;

// Default block grid for basic-parallel and advanced frames.
// Clamped to the frame size by the CLI when the frame is smaller.
pub const BLOCKS_WIDTH_DEFAULT: u8 = 8;
pub const BLOCKS_HEIGHT_DEFAULT: u8 = 8;

// Default number of worker threads. 0 = one per logical core (rayon default).
// Can be overridden by the LHE_NBWORKERS environment variable or `--workers`.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Maximum number of block workers selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Largest accepted frame side, in pixels.
pub const DIMENSION_MAX: u32 = 1 << 15;

// Largest accepted luma plane, in pixels.
pub const PIXELS_MAX: u64 = 1 << 28;

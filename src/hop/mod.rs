//! Hop symbols, step adaptation and the raster-scan predictor.

pub mod predictor;
pub mod types;

pub use predictor::{HopPredictor, PredictionVariant};
pub use types::{adapt_step, Hop, HopState, MAX_STEP, MIN_STEP, NUM_HOPS, START_STEP};

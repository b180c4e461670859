//! `FrameCodec`: one table set, one configuration, optional dedicated worker pool.

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{LheError, Result};
use crate::frame::decode::decode_frame;
use crate::frame::encode::{encode_frame, EncodedFrame};
use crate::frame::plane::Frame;
use crate::frame::prefs::CodecConfig;
use crate::frame::types::{Execution, FrameMode};
use crate::hop::predictor::HopPredictor;
use crate::mesh::types::RelevanceMesh;
use crate::tables::PrecomputedTables;

/// Per-frame context handed to the encode and decode passes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BlockContext<'a> {
    pub predictor: HopPredictor<'a>,
    pub execution: Execution,
}

impl BlockContext<'_> {
    /// Run `f` over block indices `0..n`, in order or on the rayon pool.
    pub fn map_blocks<T, F>(&self, n: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync + Send,
    {
        match self.execution {
            Execution::Sequential => (0..n).map(f).collect(),
            Execution::Parallel => (0..n).into_par_iter().map(f).collect(),
        }
    }
}

/// Encoder/decoder for single LHE frames.
///
/// The lookup tables are built once (or shared through [`FrameCodec::with_tables`])
/// and only ever read afterwards.
pub struct FrameCodec {
    tables: Arc<PrecomputedTables>,
    config: CodecConfig,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for FrameCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCodec")
            .field("config", &self.config)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

impl FrameCodec {
    /// Build the tables and validate `config`.
    pub fn new(config: CodecConfig) -> Result<Self> {
        Self::with_tables(Arc::new(PrecomputedTables::build()), config)
    }

    /// Reuse an existing table set.
    pub fn with_tables(tables: Arc<PrecomputedTables>, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        let pool = if config.execution == Execution::Parallel && config.nb_workers > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.nb_workers)
                .thread_name(|i| format!("lhe-block-{i}"))
                .build()
                .map_err(|_| LheError::InvalidArgument("cannot start block worker pool"))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            tables,
            config,
            pool,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn tables(&self) -> &Arc<PrecomputedTables> {
        &self.tables
    }

    fn context(&self) -> Result<BlockContext<'_>> {
        Ok(BlockContext {
            predictor: HopPredictor::new(&self.tables, self.config.ratio, self.config.prediction)?,
            execution: self.config.execution,
        })
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Encode one frame with the configured mode.
    pub fn encode(&self, frame: &Frame) -> Result<Vec<u8>> {
        Ok(self.encode_with_reconstruction(frame)?.bytes)
    }

    /// Encode one frame and also return what a decoder will reconstruct.
    pub fn encode_with_reconstruction(&self, frame: &Frame) -> Result<EncodedFrame> {
        let ctx = self.context()?;
        self.install(|| encode_frame(&ctx, &self.config, frame, None))
    }

    /// Advanced-mode encode with a caller-supplied relevance mesh.
    pub fn encode_with_mesh(&self, frame: &Frame, mesh: &RelevanceMesh) -> Result<EncodedFrame> {
        if self.config.mode != FrameMode::Advanced {
            return Err(LheError::InvalidArgument("relevance mesh given for a basic-mode frame"));
        }
        let ctx = self.context()?;
        self.install(|| encode_frame(&ctx, &self.config, frame, Some(mesh)))
    }

    /// Decode one frame. Any error rejects the whole frame.
    ///
    /// Only the execution settings of the configuration apply; everything
    /// that shapes the pixels is read from the frame itself.
    pub fn decode(&self, data: &[u8]) -> Result<Frame> {
        self.install(|| decode_frame(&self.tables, self.config.execution, data))
    }
}

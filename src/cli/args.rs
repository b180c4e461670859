//! Command-line argument parsing for the `lhe` binary.
//!
//! [`Cli`] is the clap-derived top level; [`Cli::codec_config`] folds the
//! environment defaults and the encode flags into a [`CodecConfig`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::cli::arg_utils::{parse_block_grid, parse_dimensions};
use crate::cli::op_mode::{init_nb_workers, init_quality};
use crate::config::{QUALITY_MAX, RATIO_DEFAULT};
use crate::frame::prefs::CodecConfig;
use crate::frame::types::{ChromaFormat, Execution, FrameMode};
use crate::hop::predictor::PredictionVariant;
use crate::tables::{TABLE_RATIO_MAX, TABLE_RATIO_MIN};

#[derive(Debug, Parser)]
#[command(name = "lhe", version, about = "LHE (Logarithmical Hopping Encoding) image and video codec")]
pub struct Cli {
    /// Increase verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Decrease verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a PGM, PPM or raw YUV file into an .lhe container
    Encode(EncodeArgs),
    /// Decode an .lhe container into PGM, PPM or raw YUV
    Decode(DecodeArgs),
    /// List the frames and headers of .lhe files
    Info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One block, sequential
    Sequential,
    /// Block grid, blocks coded independently
    Parallel,
    /// Block grid with perceptual-relevance downsampling
    Advanced,
}

impl From<ModeArg> for FrameMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Sequential => FrameMode::BasicSequential,
            ModeArg::Parallel => FrameMode::BasicParallel,
            ModeArg::Advanced => FrameMode::Advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChromaArg {
    #[value(name = "420")]
    Yuv420,
    #[value(name = "422")]
    Yuv422,
    #[value(name = "444")]
    Yuv444,
}

impl From<ChromaArg> for ChromaFormat {
    fn from(c: ChromaArg) -> Self {
        match c {
            ChromaArg::Yuv420 => ChromaFormat::Yuv420,
            ChromaArg::Yuv422 => ChromaFormat::Yuv422,
            ChromaArg::Yuv444 => ChromaFormat::Yuv444,
        }
    }
}

/// Execution and output flags shared by encode and decode.
#[derive(Debug, Clone, Args)]
pub struct CodecArgs {
    /// Block worker threads; 0 = one per core [env: LHE_NBWORKERS]
    #[arg(short = 'T', long)]
    pub workers: Option<usize>,
    /// Code blocks on the calling thread
    #[arg(long)]
    pub sequential: bool,
    /// Overwrite the output file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EncodeArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    #[arg(short, long, value_enum, default_value_t = ModeArg::Parallel)]
    pub mode: ModeArg,
    /// Block grid, e.g. 8x8
    #[arg(short, long, value_parser = parse_block_grid)]
    pub blocks: Option<(u8, u8)>,
    /// Advanced-mode quality, 0..=99 [env: LHE_QUALITY]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=QUALITY_MAX as i64))]
    pub quality: Option<u8>,
    /// Hop curve ratio (rmax x 10)
    #[arg(long, default_value_t = RATIO_DEFAULT,
          value_parser = clap::value_parser!(u8).range(TABLE_RATIO_MIN as i64..=TABLE_RATIO_MAX as i64))]
    pub ratio: u8,
    /// Use the (4*left + 3*upper-right)/7 interior predictor (sequential mode only)
    #[arg(long)]
    pub weighted: bool,
    /// Chroma subsampling of the coded frame
    #[arg(long, value_enum, default_value_t = ChromaArg::Yuv420)]
    pub chroma: ChromaArg,
    /// Frame size of raw .yuv input, e.g. 352x288
    #[arg(long, value_parser = parse_dimensions)]
    pub size: Option<(usize, usize)>,
    #[command(flatten)]
    pub codec: CodecArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DecodeArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    #[command(flatten)]
    pub codec: CodecArgs,
}

impl Cli {
    /// Display level implied by `-v`/`-q`, starting from the default of 2.
    pub fn display_level(&self) -> u32 {
        (2 + self.verbose as i32 - self.quiet as i32).clamp(0, 4) as u32
    }
}

impl CodecArgs {
    fn apply(&self, config: &mut CodecConfig) {
        config.set_nb_workers(self.workers.unwrap_or_else(init_nb_workers));
        if self.sequential {
            config.set_execution(Execution::Sequential);
        }
    }
}

impl EncodeArgs {
    pub fn codec_config(&self) -> CodecConfig {
        let mut config = CodecConfig::new();
        config.set_mode(self.mode.into());
        if let Some((w, h)) = self.blocks {
            config.set_blocks(w, h);
        }
        config.set_quality(self.quality.unwrap_or_else(init_quality));
        config.set_chroma_format(self.chroma.into());
        config.set_ratio(self.ratio);
        if self.weighted {
            config.set_prediction(PredictionVariant::Weighted);
        }
        self.codec.apply(&mut config);
        config
    }
}

impl DecodeArgs {
    pub fn codec_config(&self) -> CodecConfig {
        let mut config = CodecConfig::new();
        self.codec.apply(&mut config);
        config
    }
}

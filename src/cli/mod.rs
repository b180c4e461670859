//! Command-line interface for the `lhe` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings, the MB multiplier and the shared `DISPLAY_LEVEL`. |
//! | [`arg_utils`] | Integer and `WxH` parsers used by clap and the environment helpers. |
//! | [`op_mode`]   | Environment-based defaults (`LHE_QUALITY`, `LHE_NBWORKERS`) and worker-count resolution. |
//! | [`args`]      | The clap-derived [`args::Cli`] and its conversion into a `CodecConfig`. |

pub mod constants;
pub mod arg_utils;
pub mod op_mode;
pub mod args;

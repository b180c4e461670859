//! Binary entry point for the `lhe` command-line tool.
//!
//! 1. [`Cli::parse`] processes all flags (clap prints help/version and exits).
//! 2. The display level is set from `-v`/`-q`.
//! 3. [`run`] dispatches to the file operations in [`lhe::io`].
//!
//! Any error is printed with its context chain and the process exits with 1.

use anyhow::{Context, Result};
use clap::Parser;

use lhe::cli::args::{Cli, Command};
use lhe::cli::constants::{set_display_level, COMPRESSOR_NAME, LHE_EXTENSION};
use lhe::cli::op_mode::effective_nb_workers;
use lhe::io::{decode_file, display_files_info, encode_file, EncodeOptions};
use lhe::LheError;

fn welcome(nb_workers: usize) {
    lhe::displaylevel!(
        3,
        "*** {} v{} {}-bit, {} worker(s) ***\n",
        COMPRESSOR_NAME,
        lhe::LHE_VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8,
        effective_nb_workers(nb_workers)
    );
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Encode(args) => {
            let config = args.codec_config();
            welcome(config.nb_workers);
            lhe::displaylevel!(
                4,
                "mode {}, blocks {}x{}, ratio {}, quality {}, chroma {}\n",
                config.mode.name(),
                config.blocks_w,
                config.blocks_h,
                config.ratio,
                config.quality,
                config.chroma_format.name()
            );
            if !args.output.to_string_lossy().ends_with(LHE_EXTENSION) {
                lhe::displaylevel!(2, "warning: output name does not end with {}\n", LHE_EXTENSION);
            }
            let options = EncodeOptions {
                yuv_size: args.size,
                overwrite: args.codec.force,
            };
            encode_file(&config, &args.input, &args.output, options).with_context(|| {
                format!("encoding {} into {}", args.input.display(), args.output.display())
            })?;
        }
        Command::Decode(args) => {
            let config = args.codec_config();
            welcome(config.nb_workers);
            decode_file(&config, &args.input, &args.output, args.codec.force).with_context(|| {
                format!("decoding {} into {}", args.input.display(), args.output.display())
            })?;
        }
        Command::Info { files } => {
            let paths: Vec<&std::path::Path> = files.iter().map(|p| p.as_path()).collect();
            display_files_info(&paths).context("listing .lhe files")?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    set_display_level(cli.display_level());

    if let Err(e) = run(cli) {
        lhe::displaylevel!(1, "{}: {:#}\n", COMPRESSOR_NAME, e);
        if let Some(err) = e.downcast_ref::<LheError>() {
            lhe::displaylevel!(3, "{}: {}\n", COMPRESSOR_NAME, err.error_name());
        }
        std::process::exit(1);
    }
}

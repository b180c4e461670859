//! File primitives shared by the encode, decode and info operations.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::cli::constants::MB;
use crate::error::{LheError, Result};

/// Read a whole input file; directories are rejected up front.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.is_dir() {
        return Err(LheError::InvalidArgument("input is a directory"));
    }
    Ok(fs::read(path)?)
}

/// Create (or, with `overwrite`, replace) an output file.
pub fn create_output(path: &Path, overwrite: bool) -> Result<BufWriter<File>> {
    if !overwrite && path.exists() {
        return Err(LheError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to overwrite)", path.display()),
        )));
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Write `bytes` to `path` in one go.
pub fn write_output(path: &Path, bytes: &[u8], overwrite: bool) -> Result<()> {
    let mut out = create_output(path, overwrite)?;
    out.write_all(bytes)?;
    out.flush()?;
    Ok(())
}

/// Level-3 summary of elapsed time and throughput over `bytes` of raw pixels.
pub fn final_time_display(start: Instant, bytes: u64) {
    let secs = start.elapsed().as_secs_f64();
    let speed = if secs > 0.0 {
        bytes as f64 / MB as f64 / secs
    } else {
        0.0
    };
    crate::displaylevel!(3, "Done in {:.2} s ==> {:.2} MiB/s\n", secs, speed);
}

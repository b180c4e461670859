//! Container listing for the `info` subcommand.
//!
//! Walks the frames of a `.lhe` file without reconstructing any pixel and
//! reports header, tables and mesh statistics per frame.

use std::path::Path;

use crate::error::Result;
use crate::frame::decode::{inspect_frame, FrameSummary};
use crate::io::container::read_container;
use crate::io::file_io::read_input;

/// Per-frame line of the listing.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    pub summary: FrameSummary,
    pub payload_bytes: usize,
    pub checksum: u32,
}

/// Everything `info` prints about one file.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub file_bytes: u64,
    pub frames: Vec<FrameInfo>,
}

pub fn container_info(path: &Path) -> Result<ContainerInfo> {
    let data = read_input(path)?;
    let mut frames = Vec::new();
    for f in read_container(&data)? {
        frames.push(FrameInfo {
            summary: inspect_frame(f.payload)?,
            payload_bytes: f.payload.len(),
            checksum: f.checksum,
        });
    }
    Ok(ContainerInfo {
        file_bytes: data.len() as u64,
        frames,
    })
}

fn format_lengths(lengths: &[u8]) -> String {
    lengths
        .iter()
        .map(|&l| if l == crate::huffman::UNUSED_LENGTH { "-".to_string() } else { l.to_string() })
        .collect::<Vec<_>>()
        .join(",")
}

/// Print the listing of every file to stdout; stops at the first unreadable file.
pub fn display_files_info(paths: &[&Path]) -> Result<()> {
    for path in paths {
        let info = container_info(path)?;
        crate::displayout!("{}: {} frame(s), {} bytes\n", path.display(), info.frames.len(), info.file_bytes);
        crate::displayout!(
            "{:>5}  {:<16} {:>11} {:>6} {:>7} {:>9} {:>8}\n",
            "Frame", "Mode", "Size", "Chroma", "Blocks", "Bytes", "XXH32"
        );
        for (i, f) in info.frames.iter().enumerate() {
            let h = &f.summary.header;
            crate::displayout!(
                "{:>5}  {:<16} {:>11} {:>6} {:>7} {:>9} {:08X}\n",
                i,
                h.mode.name(),
                format!("{}x{}", h.width, h.height),
                h.chroma_format.name(),
                format!("{}x{}", h.blocks_w, h.blocks_h),
                f.payload_bytes,
                f.checksum
            );
            crate::displaylevel!(3, "       ratio {}, {:?} prediction\n", h.ratio, h.prediction);
            crate::displaylevel!(
                3,
                "       luma lengths [{}], chroma lengths [{}]\n",
                format_lengths(&f.summary.luma_table.lengths()),
                format_lengths(&f.summary.chroma_table.lengths())
            );
            if let Some(q) = f.summary.quality {
                crate::displaylevel!(3, "       quality {}\n", q);
            }
        }
    }
    Ok(())
}

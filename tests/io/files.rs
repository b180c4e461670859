// Tests for the file-level encode / decode / info operations.

use std::fs;

use lhe::io::{container_info, decode_file, encode_file, EncodeOptions};
use lhe::{ChromaFormat, CodecConfig, FrameMode, LheError};
use tempfile::TempDir;

fn write_pgm(dir: &TempDir, name: &str, w: usize, h: usize, f: impl Fn(usize, usize) -> u8) -> std::path::PathBuf {
    let mut data = format!("P5\n{w} {h}\n255\n").into_bytes();
    for y in 0..h {
        for x in 0..w {
            data.push(f(x, y));
        }
    }
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

fn overwrite() -> EncodeOptions {
    EncodeOptions {
        yuv_size: None,
        overwrite: true,
    }
}

#[test]
fn flat_pgm_round_trips_through_files() {
    let dir = TempDir::new().unwrap();
    let input = write_pgm(&dir, "flat.pgm", 40, 24, |_, _| 99);
    let packed = dir.path().join("flat.lhe");
    let output = dir.path().join("back.pgm");

    for mode in [FrameMode::BasicSequential, FrameMode::BasicParallel, FrameMode::Advanced] {
        let mut config = CodecConfig::new();
        config.set_mode(mode);
        let stats = encode_file(&config, &input, &packed, overwrite()).unwrap();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.encoded_bytes, fs::metadata(&packed).unwrap().len());

        let d = decode_file(&config, &packed, &output, true).unwrap();
        assert_eq!(d.frames, 1);
        assert_eq!(fs::read(&output).unwrap(), fs::read(&input).unwrap(), "{mode:?}");
    }
}

#[test]
fn textured_pgm_keeps_its_geometry() {
    let dir = TempDir::new().unwrap();
    let input = write_pgm(&dir, "ramp.pgm", 57, 31, |x, y| ((x * 4 + y * 3) % 250) as u8 + 3);
    let packed = dir.path().join("ramp.lhe");
    let output = dir.path().join("ramp.ppm");
    let config = CodecConfig::new();
    encode_file(&config, &input, &packed, overwrite()).unwrap();
    decode_file(&config, &packed, &output, true).unwrap();
    let ppm = fs::read(&output).unwrap();
    assert!(ppm.starts_with(b"P6\n57 31\n255\n"));
    assert_eq!(ppm.len(), b"P6\n57 31\n255\n".len() + 57 * 31 * 3);
}

#[test]
fn small_frames_get_a_smaller_grid() {
    let dir = TempDir::new().unwrap();
    let input = write_pgm(&dir, "tiny.pgm", 6, 6, |x, y| (x * 30 + y) as u8 + 1);
    let packed = dir.path().join("tiny.lhe");
    let mut config = CodecConfig::new();
    config.set_blocks(8, 8);
    let stats = encode_file(&config, &input, &packed, overwrite()).unwrap();
    assert_eq!(stats.blocks, (3, 3));
    let info = container_info(&packed).unwrap();
    assert_eq!(info.frames[0].summary.header.blocks_w, 3);
}

#[test]
fn yuv_sequence_round_trip() {
    let dir = TempDir::new().unwrap();
    let (w, h) = (16, 8);
    let frame_size = w * h + 2 * (w / 2) * (h / 2);
    let data: Vec<u8> = (0..frame_size * 3).map(|i| 128u8.wrapping_add((i / frame_size) as u8 * 20)).collect();
    let input = dir.path().join("clip.yuv");
    fs::write(&input, &data).unwrap();
    let packed = dir.path().join("clip.lhe");
    let output = dir.path().join("clip_out.yuv");

    let config = CodecConfig::new();
    let options = EncodeOptions {
        yuv_size: Some((w, h)),
        overwrite: true,
    };
    let stats = encode_file(&config, &input, &packed, options).unwrap();
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.raw_bytes, data.len() as u64);

    let info = container_info(&packed).unwrap();
    assert_eq!(info.frames.len(), 3);
    for f in &info.frames {
        assert_eq!(f.summary.header.chroma_format, ChromaFormat::Yuv420);
        assert_eq!((f.summary.header.width, f.summary.header.height), (16, 8));
    }

    decode_file(&config, &packed, &output, true).unwrap();
    assert_eq!(fs::read(&output).unwrap(), data);

    // A sequence does not fit in one PGM.
    let err = decode_file(&config, &packed, &dir.path().join("one.pgm"), true).unwrap_err();
    assert!(matches!(err, LheError::InvalidArgument(_)));
}

#[test]
fn raw_yuv_needs_a_size() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("clip.yuv");
    fs::write(&input, [0u8; 96]).unwrap();
    let err = encode_file(&CodecConfig::new(), &input, &dir.path().join("o.lhe"), EncodeOptions::default())
        .unwrap_err();
    assert!(matches!(err, LheError::InvalidArgument(_)));
}

#[test]
fn existing_output_is_kept_without_overwrite() {
    let dir = TempDir::new().unwrap();
    let input = write_pgm(&dir, "a.pgm", 8, 8, |_, _| 50);
    let packed = dir.path().join("a.lhe");
    fs::write(&packed, b"keep me").unwrap();
    let err = encode_file(&CodecConfig::new(), &input, &packed, EncodeOptions::default()).unwrap_err();
    assert!(matches!(err, LheError::Io(_)));
    assert_eq!(fs::read(&packed).unwrap(), b"keep me");
}

#[test]
fn unknown_extensions_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    fs::write(&input, b"\x89PNG").unwrap();
    let err = encode_file(&CodecConfig::new(), &input, &dir.path().join("o.lhe"), overwrite()).unwrap_err();
    assert!(matches!(err, LheError::UnsupportedFormat(_)));
}

//! Damaged input through the library and the binary.
//!
//! Every failure must surface as an `LheError` (or exit code 1 from the CLI);
//! nothing may panic and no partial frame may come back.

use std::fs;
use std::process::Command;

use lhe::io::{decode_container, read_container, write_container};
use lhe::{Channel, ChromaFormat, CodecConfig, Frame, FrameCodec, FrameMode, LheError};
use tempfile::TempDir;

fn codec(mode: FrameMode) -> FrameCodec {
    let mut config = CodecConfig::new();
    config.set_mode(mode);
    config.set_blocks(4, 3);
    FrameCodec::new(config).unwrap()
}

fn frame() -> Frame {
    let mut f = Frame::new(40, 24, ChromaFormat::Yuv420).unwrap();
    for (i, ch) in Channel::ALL.into_iter().enumerate() {
        let p = f.plane_mut(ch);
        for y in 0..p.height() {
            for x in 0..p.width() {
                p.set(x, y, ((x * 7 + y * 5 + i * 50) % 230 + 10) as u8);
            }
        }
    }
    f
}

#[test]
fn every_truncation_is_an_error() {
    for mode in [FrameMode::BasicSequential, FrameMode::BasicParallel, FrameMode::Advanced] {
        let codec = codec(mode);
        let bytes = codec.encode(&frame()).unwrap();
        for cut in 0..bytes.len() {
            assert!(codec.decode(&bytes[..cut]).is_err(), "{mode:?} cut at {cut}");
        }
    }
}

#[test]
fn corrupted_payloads_never_panic() {
    for mode in [FrameMode::BasicParallel, FrameMode::Advanced] {
        let codec = codec(mode);
        let bytes = codec.encode(&frame()).unwrap();
        for i in 0..bytes.len() {
            let mut bad = bytes.clone();
            bad[i] ^= 0x5A;
            if let Ok(f) = codec.decode(&bad) {
                assert!(f.width() > 0 && f.height() > 0);
            }
        }
    }
}

#[test]
fn rechecksummed_bad_header_is_reported() {
    let codec = codec(FrameMode::BasicParallel);
    let mut payload = codec.encode(&frame()).unwrap();
    payload[0] = 0x0F;
    let mut container = Vec::new();
    write_container(&mut container, &[payload]).unwrap();
    assert_eq!(read_container(&container).unwrap().len(), 1);
    assert!(matches!(
        decode_container(&codec, &container),
        Err(LheError::MalformedHeader(_))
    ));
}

#[test]
fn damaged_container_fails_before_decoding() {
    let codec = codec(FrameMode::BasicParallel);
    let payloads = vec![codec.encode(&frame()).unwrap(), codec.encode(&frame()).unwrap()];
    let mut container = Vec::new();
    write_container(&mut container, &payloads).unwrap();

    let mut flipped = container.clone();
    let last = flipped.len() - 1;
    flipped[last] ^= 1;
    assert!(matches!(
        decode_container(&codec, &flipped),
        Err(LheError::ChecksumMismatch { .. })
    ));

    // A frame count larger than what follows.
    let mut short = container.clone();
    short[4] = 3;
    assert!(matches!(
        decode_container(&codec, &short),
        Err(LheError::TruncatedBitstream)
    ));
}

#[test]
fn cli_reports_damage_with_exit_code_one() {
    let dir = TempDir::new().unwrap();
    let codec = codec(FrameMode::BasicParallel);
    let mut container = Vec::new();
    write_container(&mut container, &[codec.encode(&frame()).unwrap()]).unwrap();
    let last = container.len() - 1;
    container[last] ^= 0x80;
    fs::write(dir.path().join("bad.lhe"), &container).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_lhe"))
        .args(["decode", "bad.lhe", "bad.pgm"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("checksum mismatch"));
    assert!(!dir.path().join("bad.pgm").exists());
}

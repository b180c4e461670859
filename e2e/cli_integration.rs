// e2e/cli_integration.rs: the `lhe` binary as a black box.
//
// Covers encode/decode dispatch, the info listing, overwrite handling and
// exit codes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn lhe_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lhe"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(lhe_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run lhe")
}

/// A 32x24 PGM with a flat background and a brighter square.
fn write_pgm(dir: &Path) -> PathBuf {
    let mut data = b"P5\n32 24\n255\n".to_vec();
    for y in 0..24 {
        for x in 0..32 {
            data.push(if (8..16).contains(&x) && (8..16).contains(&y) { 180 } else { 60 });
        }
    }
    let path = dir.join("square.pgm");
    fs::write(&path, data).unwrap();
    path
}

fn write_ppm(dir: &Path) -> PathBuf {
    let mut data = b"P6\n16 16\n255\n".to_vec();
    for _ in 0..16 * 16 {
        data.extend_from_slice(&[90, 90, 90]);
    }
    let path = dir.join("gray.ppm");
    fs::write(&path, data).unwrap();
    path
}

// ── Encode / decode ──────────────────────────────────────────────────────────

#[test]
fn pgm_round_trip() {
    let dir = TempDir::new().unwrap();
    write_pgm(dir.path());
    for mode in ["sequential", "parallel", "advanced"] {
        let out = run(dir.path(), &["encode", "-f", "square.pgm", "square.lhe", "-m", mode]);
        assert!(out.status.success(), "{mode}: {}", String::from_utf8_lossy(&out.stderr));
        let out = run(dir.path(), &["decode", "-f", "square.lhe", "back.pgm"]);
        assert!(out.status.success(), "{mode}: {}", String::from_utf8_lossy(&out.stderr));

        let back = fs::read(dir.path().join("back.pgm")).unwrap();
        assert!(back.starts_with(b"P5\n32 24\n255\n"));
        assert_eq!(back.len(), 13 + 32 * 24);
    }
}

#[test]
fn gray_ppm_round_trip_is_exact() {
    let dir = TempDir::new().unwrap();
    let input = write_ppm(dir.path());
    let out = run(dir.path(), &["encode", "gray.ppm", "gray.lhe", "--chroma", "444"]);
    assert!(out.status.success());
    let out = run(dir.path(), &["decode", "gray.lhe", "gray_out.ppm"]);
    assert!(out.status.success());
    assert_eq!(fs::read(dir.path().join("gray_out.ppm")).unwrap(), fs::read(input).unwrap());
}

#[test]
fn raw_yuv_needs_size() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("clip.yuv"), vec![100u8; 16 * 8 * 3 / 2 * 2]).unwrap();

    let out = run(dir.path(), &["encode", "clip.yuv", "clip.lhe"]);
    assert_eq!(out.status.code(), Some(1));

    let out = run(dir.path(), &["encode", "clip.yuv", "clip.lhe", "--size", "16x8"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let out = run(dir.path(), &["decode", "clip.lhe", "clip_out.yuv"]);
    assert!(out.status.success());
    assert_eq!(fs::read(dir.path().join("clip_out.yuv")).unwrap(), vec![100u8; 16 * 8 * 3]);
}

// ── Overwrite ────────────────────────────────────────────────────────────────

#[test]
fn existing_output_needs_force() {
    let dir = TempDir::new().unwrap();
    write_pgm(dir.path());
    fs::write(dir.path().join("square.lhe"), b"precious").unwrap();

    let out = run(dir.path(), &["encode", "square.pgm", "square.lhe"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));
    assert_eq!(fs::read(dir.path().join("square.lhe")).unwrap(), b"precious");

    let out = run(dir.path(), &["encode", "-f", "square.pgm", "square.lhe"]);
    assert!(out.status.success());
}

// ── Info ─────────────────────────────────────────────────────────────────────

#[test]
fn info_lists_frames() {
    let dir = TempDir::new().unwrap();
    write_pgm(dir.path());
    assert!(run(dir.path(), &["encode", "square.pgm", "square.lhe", "-b", "2x2"]).status.success());

    let out = run(dir.path(), &["info", "square.lhe"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("32x24"), "{stdout}");
    assert!(stdout.contains("2x2"), "{stdout}");
}

#[test]
fn info_rejects_foreign_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.lhe"), b"hello world").unwrap();
    let out = run(dir.path(), &["info", "notes.lhe"]);
    assert_eq!(out.status.code(), Some(1));
}

// ── Arguments ────────────────────────────────────────────────────────────────

#[test]
fn version_and_help() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));

    let out = run(dir.path(), &["encode", "--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("--quality"));
}

#[test]
fn bad_arguments_fail() {
    let dir = TempDir::new().unwrap();
    let cases: [&[&str]; 4] = [
        &[],
        &["squash", "a", "b"],
        &["encode", "a.pgm"],
        &["encode", "a.pgm", "a.lhe", "--ratio", "50"],
    ];
    for args in cases {
        let out = run(dir.path(), args);
        assert!(!out.status.success(), "{args:?}");
    }
}

#[test]
fn missing_input_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["decode", "nowhere.lhe", "x.pgm"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("lhe: "));
}

#[test]
fn quiet_encode_prints_nothing() {
    let dir = TempDir::new().unwrap();
    write_pgm(dir.path());
    let out = run(dir.path(), &["-qq", "encode", "square.pgm", "square.lhe"]);
    assert!(out.status.success());
    assert!(out.stderr.is_empty());
    assert!(out.stdout.is_empty());
}

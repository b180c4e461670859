// Tests for PGM/PPM and raw YUV conversion.

use lhe::io::{encode_pnm, parse_pnm, read_yuv_frames, write_yuv_frame, ImageFormat};
use lhe::{Channel, ChromaFormat, LheError};

fn ppm(width: usize, height: usize, rgb: &[u8]) -> Vec<u8> {
    let mut data = format!("P6\n{width} {height}\n255\n").into_bytes();
    data.extend_from_slice(rgb);
    data
}

#[test]
fn pgm_round_trip() {
    let pixels: Vec<u8> = (0..35).map(|i| (i * 7) as u8).collect();
    let mut data = b"P5\n7 5\n255\n".to_vec();
    data.extend_from_slice(&pixels);
    let frame = parse_pnm(&data, ChromaFormat::Yuv420).unwrap();
    assert_eq!((frame.width(), frame.height()), (7, 5));
    assert_eq!(frame.plane(Channel::Luma).to_packed(), pixels);
    assert!(frame.plane(Channel::ChromaA).data().iter().all(|&v| v == 128));
    assert_eq!(encode_pnm(&frame, ImageFormat::Pgm).unwrap(), data);
}

#[test]
fn gray_ppm_has_neutral_chroma() {
    let rgb: Vec<u8> = (0..16).flat_map(|i| [i * 10, i * 10, i * 10]).collect();
    let frame = parse_pnm(&ppm(4, 4, &rgb), ChromaFormat::Yuv444).unwrap();
    for ch in [Channel::ChromaA, Channel::ChromaB] {
        assert!(frame.plane(ch).data().iter().all(|&v| v == 128), "{ch:?}");
    }
    let back = encode_pnm(&frame, ImageFormat::Ppm).unwrap();
    assert_eq!(back, ppm(4, 4, &rgb));
}

#[test]
fn colour_survives_444_conversion() {
    let rgb = [255, 0, 0, 0, 255, 0, 0, 0, 255, 200, 150, 100];
    let frame = parse_pnm(&ppm(2, 2, &rgb), ChromaFormat::Yuv444).unwrap();
    let back = encode_pnm(&frame, ImageFormat::Ppm).unwrap();
    let header_len = b"P6\n2 2\n255\n".len();
    for (a, b) in rgb.iter().zip(&back[header_len..]) {
        assert!((*a as i32 - *b as i32).abs() <= 3, "{rgb:?} vs {:?}", &back[header_len..]);
    }
}

#[test]
fn unsupported_pnm_variants() {
    assert!(matches!(
        parse_pnm(b"P2\n1 1\n255\n0", ChromaFormat::Yuv420),
        Err(LheError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        parse_pnm(b"P5\n1 1\n65535\n\x00\x00", ChromaFormat::Yuv420),
        Err(LheError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        parse_pnm(b"P5\n4 4\n255\n\x00", ChromaFormat::Yuv420),
        Err(LheError::TruncatedBitstream)
    ));
}

#[test]
fn yuv_sequences_split_into_frames() {
    // 4x2 I420: 8 luma + 2 + 2 chroma bytes per frame.
    let data: Vec<u8> = (0..36).collect();
    let frames = read_yuv_frames(&data, 4, 2, ChromaFormat::Yuv420).unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[1].plane(Channel::Luma).get(0, 0), 12);
    assert_eq!(frames[1].plane(Channel::ChromaB).get(1, 0), 23);

    let mut out = Vec::new();
    for f in &frames {
        write_yuv_frame(f, &mut out);
    }
    assert_eq!(out, data);
    assert!(read_yuv_frames(&data[..35], 4, 2, ChromaFormat::Yuv420).is_err());
}

//! End-to-end frame coding on CIF-sized synthetic pictures.
//!
//! Drives `FrameCodec` and the container layer together the way the binary
//! does, with every mode and chroma layout.

use std::sync::{Arc, OnceLock};

use lhe::io::{decode_container, read_container, write_container};
use lhe::{Channel, ChromaFormat, CodecConfig, Frame, FrameCodec, FrameMode, PrecomputedTables};

const W: usize = 176;
const H: usize = 144;

fn tables() -> Arc<PrecomputedTables> {
    static TABLES: OnceLock<Arc<PrecomputedTables>> = OnceLock::new();
    TABLES.get_or_init(|| Arc::new(PrecomputedTables::build())).clone()
}

fn codec(mode: FrameMode, quality: u8) -> FrameCodec {
    let mut config = CodecConfig::new();
    config.set_mode(mode);
    config.set_quality(quality);
    FrameCodec::with_tables(tables(), config).unwrap()
}

/// Soft blobs over a ramp, with one hard-edged rectangle.
fn picture(chroma: ChromaFormat, phase: usize) -> Frame {
    let mut frame = Frame::new(W, H, chroma).unwrap();
    for (i, ch) in [Channel::Luma, Channel::ChromaA, Channel::ChromaB].into_iter().enumerate() {
        let p = frame.plane_mut(ch);
        let (pw, ph) = (p.width(), p.height());
        for y in 0..ph {
            for x in 0..pw {
                let fx = x as f32 / pw as f32;
                let fy = y as f32 / ph as f32;
                let blob = ((fx * 9.0 + phase as f32).sin() * (fy * 7.0).cos() * 60.0) as i32;
                let mut v = 60 + (fx * 80.0) as i32 + blob + i as i32 * 15;
                if (pw / 3..pw / 2).contains(&x) && (ph / 4..ph / 2).contains(&y) {
                    v = 230;
                }
                p.set(x, y, v.clamp(1, 255) as u8);
            }
        }
    }
    frame
}

fn psnr(a: &[u8], b: &[u8]) -> f64 {
    let mse = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64;
    if mse == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (255.0 * 255.0 / mse).log10()
}

#[test]
fn every_mode_and_layout_decodes_to_the_encoder_view() {
    for mode in [FrameMode::BasicSequential, FrameMode::BasicParallel, FrameMode::Advanced] {
        for chroma in [ChromaFormat::Yuv420, ChromaFormat::Yuv422, ChromaFormat::Yuv444] {
            let codec = codec(mode, 50);
            let frame = picture(chroma, 0);
            let encoded = codec.encode_with_reconstruction(&frame).unwrap();
            let decoded = codec.decode(&encoded.bytes).unwrap();
            assert_eq!(decoded, encoded.reconstruction, "{mode:?} {chroma:?}");
            assert!(encoded.bytes.len() < W * H * 3, "{mode:?} {chroma:?} did not compress");
        }
    }
}

#[test]
fn basic_parallel_quality() {
    let codec = codec(FrameMode::BasicParallel, 50);
    let frame = picture(ChromaFormat::Yuv420, 1);
    let decoded = codec.decode(&codec.encode(&frame).unwrap()).unwrap();
    let db = psnr(frame.plane(Channel::Luma).data(), decoded.plane(Channel::Luma).data());
    assert!(db > 26.0, "luma PSNR {db:.2} dB");
}

#[test]
fn advanced_quality_trades_size() {
    let frame = picture(ChromaFormat::Yuv420, 2);
    let low = codec(FrameMode::Advanced, 0).encode(&frame).unwrap();
    let high = codec(FrameMode::Advanced, 99).encode(&frame).unwrap();
    assert!(low.len() < high.len(), "q0 {} bytes, q99 {} bytes", low.len(), high.len());
}

#[test]
fn sequence_through_a_container() {
    let codec = codec(FrameMode::BasicParallel, 50);
    let frames: Vec<Frame> = (0..4).map(|i| picture(ChromaFormat::Yuv420, i)).collect();
    let encoded: Vec<_> = frames
        .iter()
        .map(|f| codec.encode_with_reconstruction(f).unwrap())
        .collect();
    let payloads: Vec<Vec<u8>> = encoded.iter().map(|e| e.bytes.clone()).collect();

    let mut container = Vec::new();
    write_container(&mut container, &payloads).unwrap();
    assert_eq!(read_container(&container).unwrap().len(), 4);

    let decoded = decode_container(&codec, &container).unwrap();
    for (d, e) in decoded.iter().zip(&encoded) {
        assert_eq!(d, &e.reconstruction);
    }
}

#[test]
fn fresh_tables_give_identical_bytes() {
    let frame = picture(ChromaFormat::Yuv444, 3);
    let shared = codec(FrameMode::Advanced, 60).encode(&frame).unwrap();
    let mut config = CodecConfig::new();
    config.set_mode(FrameMode::Advanced);
    config.set_quality(60);
    let own = FrameCodec::new(config).unwrap().encode(&frame).unwrap();
    assert_eq!(shared, own);
}

#![no_main]
use std::sync::{Arc, OnceLock};

use libfuzzer_sys::fuzz_target;
use lhe::{Channel, ChromaFormat, CodecConfig, Frame, FrameCodec, FrameMode, PrecomputedTables};

fn tables() -> Arc<PrecomputedTables> {
    static TABLES: OnceLock<Arc<PrecomputedTables>> = OnceLock::new();
    TABLES.get_or_init(|| Arc::new(PrecomputedTables::build())).clone()
}

// Layout of the input: [w, h, mode, chroma, blocks, quality, pixels...].
fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let width = data[0] as usize % 64 + 1;
    let height = data[1] as usize % 64 + 1;
    let mode = [FrameMode::BasicSequential, FrameMode::BasicParallel, FrameMode::Advanced]
        [data[2] as usize % 3];
    let chroma = [ChromaFormat::Yuv420, ChromaFormat::Yuv422, ChromaFormat::Yuv444]
        [data[3] as usize % 3];
    let blocks = data[4] % 8 + 1;
    let pixels = &data[6..];

    let mut config = CodecConfig::new();
    config.set_mode(mode);
    config.set_chroma_format(chroma);
    config.set_quality(data[5]);
    config.set_blocks(blocks, blocks);
    let (bw, bh) = config.fit_grid(width, height, chroma);
    config.set_blocks(bw, bh);
    let Ok(codec) = FrameCodec::with_tables(tables(), config) else {
        return;
    };

    let Ok(mut frame) = Frame::new(width, height, chroma) else {
        return;
    };
    let mut k = 0usize;
    for ch in Channel::ALL {
        let p = frame.plane_mut(ch);
        for y in 0..p.height() {
            for x in 0..p.width() {
                let v = pixels.get(k % pixels.len().max(1)).copied().unwrap_or(128);
                p.set(x, y, v);
                k += 1;
            }
        }
    }

    // A frame the grid cannot hold is rejected; anything accepted must decode
    // to exactly what the encoder reconstructed.
    let Ok(encoded) = codec.encode_with_reconstruction(&frame) else {
        return;
    };
    let decoded = codec
        .decode(&encoded.bytes)
        .expect("self-encoded frame must decode");
    assert_eq!(decoded, encoded.reconstruction);
});

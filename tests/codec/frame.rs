// Tests for whole-frame encoding and decoding through FrameCodec.

use lhe::frame::{inspect_frame, FRAME_HEADER_SIZE};
use lhe::mesh::{RelevanceCorner, RelevanceLevel, RelevanceMesh};
use lhe::{Channel, ChromaFormat, CodecConfig, Execution, FrameMode, LheError, PredictionVariant};

use crate::common::{codec, flat_frame, gradient_frame};

const MODES: [FrameMode; 3] = [FrameMode::BasicSequential, FrameMode::BasicParallel, FrameMode::Advanced];
const CHROMAS: [ChromaFormat; 3] = [ChromaFormat::Yuv420, ChromaFormat::Yuv422, ChromaFormat::Yuv444];

fn config(mode: FrameMode, blocks: (u8, u8)) -> CodecConfig {
    let mut c = CodecConfig::new();
    c.set_mode(mode);
    c.set_blocks(blocks.0, blocks.1);
    c
}

#[test]
fn decoder_matches_encoder_reconstruction() {
    for mode in MODES {
        for chroma in CHROMAS {
            let frame = gradient_frame(37, 23, chroma);
            let codec = codec(config(mode, (4, 3)));
            let encoded = codec.encode_with_reconstruction(&frame).unwrap();
            let decoded = codec.decode(&encoded.bytes).unwrap();
            assert_eq!(decoded, encoded.reconstruction, "{mode:?} {chroma:?}");
            assert_eq!(decoded.width(), 37);
            assert_eq!(decoded.height(), 23);
            assert_eq!(decoded.chroma_format(), chroma);
        }
    }
}

#[test]
fn flat_frames_round_trip_exactly() {
    for mode in MODES {
        for chroma in CHROMAS {
            let frame = flat_frame(48, 32, chroma, [200, 90, 160]);
            let codec = codec(config(mode, (4, 4)));
            let bytes = codec.encode(&frame).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), frame, "{mode:?} {chroma:?}");
        }
    }
}

#[test]
fn basic_modes_stay_close_to_the_source() {
    let frame = gradient_frame(64, 48, ChromaFormat::Yuv444);
    for mode in [FrameMode::BasicSequential, FrameMode::BasicParallel] {
        let codec = codec(config(mode, (4, 4)));
        let decoded = codec.decode(&codec.encode(&frame).unwrap()).unwrap();
        let src = frame.plane(Channel::Luma).data();
        let out = decoded.plane(Channel::Luma).data();
        let mad: f64 = src
            .iter()
            .zip(out)
            .map(|(&a, &b)| (a as f64 - b as f64).abs())
            .sum::<f64>()
            / src.len() as f64;
        assert!(mad < 12.0, "{mode:?}: mean abs error {mad}");
    }
}

#[test]
fn parallel_execution_is_deterministic() {
    let frame = gradient_frame(80, 64, ChromaFormat::Yuv420);
    for mode in [FrameMode::BasicParallel, FrameMode::Advanced] {
        let mut seq = config(mode, (8, 8));
        seq.set_execution(Execution::Sequential);
        let mut par = config(mode, (8, 8));
        par.set_execution(Execution::Parallel);
        let mut pooled = par.clone();
        pooled.set_nb_workers(3);

        let a = codec(seq).encode(&frame).unwrap();
        let b = codec(par).encode(&frame).unwrap();
        let c = codec(pooled).encode(&frame).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}

#[test]
fn header_layout() {
    let frame = gradient_frame(300, 2, ChromaFormat::Yuv422);
    let bytes = codec(config(FrameMode::BasicParallel, (3, 1))).encode(&frame).unwrap();
    assert!(bytes.len() > FRAME_HEADER_SIZE);
    assert_eq!(bytes[0], (1 << 4) | 1);
    assert_eq!(&bytes[1..5], &300u32.to_le_bytes());
    assert_eq!(&bytes[5..9], &2u32.to_le_bytes());
    assert_eq!(&bytes[9..12], &[3, 1, 25]);

    let summary = inspect_frame(&bytes).unwrap();
    assert_eq!(summary.header.mode, FrameMode::BasicParallel);
    assert_eq!(summary.header.chroma_format, ChromaFormat::Yuv422);
    assert_eq!(summary.seeds[0].len(), 3);
    assert_eq!(summary.seeds[1].len(), 3);
    assert_eq!(summary.quality, None);
    assert!(summary.mesh.is_none());
}

#[test]
fn seeds_are_block_corners() {
    let frame = gradient_frame(64, 32, ChromaFormat::Yuv444);
    let bytes = codec(config(FrameMode::BasicParallel, (2, 2))).encode(&frame).unwrap();
    let summary = inspect_frame(&bytes).unwrap();
    let luma = frame.plane(Channel::Luma);
    assert_eq!(
        summary.seeds[0],
        vec![luma.get(0, 0), luma.get(32, 0), luma.get(0, 16), luma.get(32, 16)]
    );
    let chroma_b = frame.plane(Channel::ChromaB);
    assert_eq!(summary.seeds[2][3], chroma_b.get(32, 16));
}

#[test]
fn sequential_mode_uses_one_block() {
    let frame = gradient_frame(40, 30, ChromaFormat::Yuv420);
    let bytes = codec(config(FrameMode::BasicSequential, (8, 8))).encode(&frame).unwrap();
    assert_eq!(&bytes[9..11], &[1, 1]);
}

#[test]
fn advanced_frames_carry_quality_and_mesh() {
    let frame = gradient_frame(64, 64, ChromaFormat::Yuv420);
    let mut c = config(FrameMode::Advanced, (2, 2));
    c.set_quality(70);
    let codec = codec(c);

    let mut mesh = RelevanceMesh::uniform(2, 2, RelevanceLevel::from_index(3).unwrap());
    mesh.set(1, 1, RelevanceCorner::uniform(RelevanceLevel::MAX));
    let encoded = codec.encode_with_mesh(&frame, &mesh).unwrap();
    assert_eq!(encoded.mesh.as_ref(), Some(&mesh));

    let summary = inspect_frame(&encoded.bytes).unwrap();
    assert_eq!(summary.quality, Some(70));
    assert_eq!(summary.mesh, Some(mesh));
    assert_eq!(codec.decode(&encoded.bytes).unwrap(), encoded.reconstruction);
}

#[test]
fn low_relevance_costs_fewer_bytes() {
    let frame = gradient_frame(64, 64, ChromaFormat::Yuv420);
    let codec = codec(config(FrameMode::Advanced, (2, 2)));
    let low = codec.encode_with_mesh(&frame, &RelevanceMesh::new(2, 2)).unwrap();
    let high = codec
        .encode_with_mesh(&frame, &RelevanceMesh::uniform(2, 2, RelevanceLevel::MAX))
        .unwrap();
    assert!(low.bytes.len() < high.bytes.len());
}

#[test]
fn mesh_only_for_advanced_mode() {
    let frame = gradient_frame(32, 32, ChromaFormat::Yuv420);
    let codec = codec(config(FrameMode::BasicParallel, (2, 2)));
    assert!(matches!(
        codec.encode_with_mesh(&frame, &RelevanceMesh::new(2, 2)),
        Err(LheError::InvalidArgument(_))
    ));
}

#[test]
fn weighted_prediction_round_trips_in_sequential_mode() {
    let frame = gradient_frame(33, 17, ChromaFormat::Yuv420);
    let mut c = config(FrameMode::BasicSequential, (1, 1));
    c.set_prediction(PredictionVariant::Weighted);
    let codec = codec(c);
    let encoded = codec.encode_with_reconstruction(&frame).unwrap();
    assert_eq!(codec.decode(&encoded.bytes).unwrap(), encoded.reconstruction);

    // The decoder's own settings do not matter; the rule travels with the frame.
    let parallel = crate::common::codec(config(FrameMode::BasicParallel, (2, 2)))
        .encode_with_reconstruction(&frame)
        .unwrap();
    assert_eq!(codec.decode(&parallel.bytes).unwrap(), parallel.reconstruction);
}

#[test]
fn hop_parameters_travel_with_the_frame() {
    let frame = gradient_frame(32, 32, ChromaFormat::Yuv420);
    let default_decoder = codec(CodecConfig::default());

    let mut steep = config(FrameMode::BasicParallel, (2, 2));
    steep.set_ratio(40);
    let mut weighted = config(FrameMode::BasicSequential, (1, 1));
    weighted.set_prediction(PredictionVariant::Weighted);
    let mut both = weighted.clone();
    both.set_ratio(20);

    for c in [steep, weighted, both] {
        let encoded = codec(c.clone()).encode_with_reconstruction(&frame).unwrap();
        let header = inspect_frame(&encoded.bytes).unwrap().header;
        assert_eq!((header.ratio, header.prediction), (c.ratio, c.prediction));
        assert_eq!(default_decoder.decode(&encoded.bytes).unwrap(), encoded.reconstruction, "{c:?}");
    }
}

#[test]
fn weighted_flag_on_a_block_grid_rejected() {
    let frame = gradient_frame(32, 32, ChromaFormat::Yuv420);
    let codec = codec(config(FrameMode::BasicParallel, (2, 2)));
    let mut bytes = codec.encode(&frame).unwrap();
    bytes[FRAME_HEADER_SIZE - 1] |= 0x80;
    assert!(matches!(codec.decode(&bytes), Err(LheError::MalformedHeader(_))));
    bytes[FRAME_HEADER_SIZE - 1] = 41;
    assert!(matches!(codec.decode(&bytes), Err(LheError::MalformedHeader(_))));
}

#[test]
fn weighted_prediction_rejected_for_block_grids() {
    let mut c = config(FrameMode::BasicParallel, (2, 2));
    c.set_prediction(PredictionVariant::Weighted);
    assert!(lhe::FrameCodec::with_tables(crate::common::tables(), c).is_err());
}

#[test]
fn grid_too_fine_for_frame() {
    let frame = gradient_frame(8, 8, ChromaFormat::Yuv420);
    let codec = codec(config(FrameMode::BasicParallel, (16, 16)));
    assert!(matches!(codec.encode(&frame), Err(LheError::InvalidArgument(_))));
    let fitted = config(FrameMode::BasicParallel, (16, 16)).fit_grid(8, 8, ChromaFormat::Yuv420);
    assert_eq!(fitted, (4, 4));
}

#[test]
fn truncated_frames_fail() {
    let frame = gradient_frame(64, 64, ChromaFormat::Yuv420);
    for mode in MODES {
        let coder = codec(config(mode, (4, 4)));
        let bytes = coder.encode(&frame).unwrap();
        for cut in [0, 5, FRAME_HEADER_SIZE, bytes.len() / 2, bytes.len() - 1] {
            assert!(
                matches!(coder.decode(&bytes[..cut]), Err(LheError::TruncatedBitstream)),
                "{mode:?} cut at {cut}"
            );
        }
    }
}

#[test]
fn bad_mode_byte_rejected() {
    let frame = gradient_frame(16, 16, ChromaFormat::Yuv420);
    let codec = codec(config(FrameMode::BasicParallel, (2, 2)));
    let mut bytes = codec.encode(&frame).unwrap();
    bytes[0] = 0x03;
    assert!(matches!(codec.decode(&bytes), Err(LheError::MalformedHeader(_))));
    bytes[0] = 0x31;
    assert!(matches!(codec.decode(&bytes), Err(LheError::MalformedHeader(_))));
}

#[test]
fn zero_dimension_rejected() {
    let frame = gradient_frame(16, 16, ChromaFormat::Yuv420);
    let codec = codec(config(FrameMode::BasicParallel, (2, 2)));
    let mut bytes = codec.encode(&frame).unwrap();
    bytes[1..5].copy_from_slice(&0u32.to_le_bytes());
    assert!(matches!(codec.decode(&bytes), Err(LheError::MalformedHeader(_))));
}

#[test]
fn corrupt_huffman_lengths_rejected() {
    let frame = gradient_frame(16, 16, ChromaFormat::Yuv420);
    let codec = codec(config(FrameMode::BasicSequential, (1, 1)));
    let mut bytes = codec.encode(&frame).unwrap();
    // Header, then one seed per plane, then the chroma lengths.
    let tables_at = FRAME_HEADER_SIZE + 3;
    for b in &mut bytes[tables_at..tables_at + 4] {
        *b = 0x11;
    }
    assert!(matches!(codec.decode(&bytes), Err(LheError::InvalidHuffmanTable(_))));
}

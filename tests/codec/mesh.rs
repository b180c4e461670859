// Tests for block grids, relevance meshes, PPP shapes and elastic resampling.

use lhe::bits::{BitReader, BitWriter};
use lhe::mesh::{
    apply_mesh, downsample, elastic_cells, estimate_mesh, grid_boundaries, relevance_to_ppp,
    upsample, BlockCells, BlockGrid, RelevanceCorner, RelevanceLevel, RelevanceMesh, SIDE_MIN,
};
use lhe::{HopPredictor, LheError, PredictionVariant};

use crate::common::{noise, tables};

#[test]
fn full_relevance_keeps_full_resolution() {
    let mut grid = BlockGrid::partition(64, 64, 2, 2).unwrap();
    let mesh = RelevanceMesh::uniform(2, 2, RelevanceLevel::MAX);
    apply_mesh(&mut grid, &mesh, 50).unwrap();
    for b in grid.blocks() {
        assert_eq!(b.downsampled_x_side, b.width());
        assert_eq!(b.downsampled_y_side, b.height());
        assert!(!b.is_downsampled());
    }
}

#[test]
fn zero_relevance_shrinks_to_minimum() {
    let mut grid = BlockGrid::partition(64, 64, 2, 2).unwrap();
    apply_mesh(&mut grid, &RelevanceMesh::new(2, 2), 50).unwrap();
    for b in grid.blocks() {
        assert_eq!(b.downsampled_x_side, SIDE_MIN);
        assert_eq!(b.downsampled_y_side, SIDE_MIN);
        assert_eq!(b.sample_count(), SIDE_MIN * SIDE_MIN);
    }
}

#[test]
fn sides_stay_between_minimum_and_block() {
    let grid = BlockGrid::partition(90, 50, 3, 2).unwrap();
    let mut mesh = RelevanceMesh::new(3, 2);
    let levels: Vec<RelevanceLevel> = (0..6).filter_map(RelevanceLevel::from_index).collect();
    for cy in 0..=2 {
        for cx in 0..=3 {
            mesh.set(
                cx,
                cy,
                RelevanceCorner::new(levels[(cx + cy) % 6], levels[(cx * 2 + cy) % 6]),
            );
        }
    }
    for quality in [0u8, 30, 99] {
        let mut g = grid.clone();
        apply_mesh(&mut g, &mesh, quality).unwrap();
        for b in g.blocks() {
            assert!((SIDE_MIN..=b.width()).contains(&b.downsampled_x_side));
            assert!((SIDE_MIN..=b.height()).contains(&b.downsampled_y_side));
        }
    }
    grid.require_min_side(SIDE_MIN).unwrap();
}

#[test]
fn higher_quality_keeps_more_samples() {
    let mesh = RelevanceMesh::uniform(2, 2, RelevanceLevel::from_index(2).unwrap());
    let count = |q: u8| {
        let mut g = BlockGrid::partition(128, 128, 2, 2).unwrap();
        apply_mesh(&mut g, &mesh, q).unwrap();
        g.sample_count()
    };
    assert!(count(90) >= count(10));
}

#[test]
fn ppp_decreases_with_relevance() {
    let mut last = f32::INFINITY;
    for level in (0..6).filter_map(RelevanceLevel::from_index) {
        let ppp = relevance_to_ppp(level.value(), 16.0, 32.0);
        assert!(ppp <= last);
        assert!((1.0..=16.0).contains(&ppp));
        last = ppp;
    }
}

#[test]
fn mesh_must_match_grid() {
    let mut grid = BlockGrid::partition(64, 64, 2, 2).unwrap();
    assert!(matches!(
        apply_mesh(&mut grid, &RelevanceMesh::new(3, 2), 50),
        Err(LheError::InvalidArgument(_))
    ));
}

#[test]
fn quantize_snaps_down() {
    let q = |v: f32| RelevanceLevel::quantize(v).value();
    assert_eq!(q(0.0), 0.0);
    assert_eq!(q(0.1), 0.0);
    assert_eq!(q(0.125), 0.125);
    assert_eq!(q(0.3), 0.25);
    assert_eq!(q(0.6), 0.5);
    assert_eq!(q(0.99), 0.75);
    assert_eq!(q(1.0), 1.0);
}

#[test]
fn mesh_bits_round_trip() {
    let mut mesh = RelevanceMesh::new(2, 1);
    mesh.set(1, 0, RelevanceCorner::new(RelevanceLevel::MAX, RelevanceLevel::ZERO));
    mesh.set(2, 1, RelevanceCorner::uniform(RelevanceLevel::from_index(3).unwrap()));
    let mut w = BitWriter::new();
    mesh.write(&mut w);
    assert_eq!(w.bit_len(), 6 * 6);
    let bytes = w.finish();
    let back = RelevanceMesh::read(&mut BitReader::new(&bytes), 2, 1).unwrap();
    assert_eq!(back, mesh);
}

#[test]
fn relevance_level_seven_is_malformed() {
    // x = 7, y = 0
    let bytes = [0b1110_0000];
    assert!(matches!(
        RelevanceMesh::read(&mut BitReader::new(&bytes), 0, 0),
        Err(LheError::MalformedHeader(_))
    ));
}

#[test]
fn grid_boundaries_spread_remainders() {
    assert_eq!(grid_boundaries(10, 3), vec![0, 3, 6, 10]);
    let grid = BlockGrid::partition(10, 7, 3, 2).unwrap();
    assert_eq!(grid.len(), 6);
    let chroma = grid.derive_subsampled(2, 2).unwrap();
    assert_eq!(chroma.x_bounds(), &[0, 2, 3, 5]);
    assert_eq!(chroma.y_bounds(), &[0, 2, 4]);
}

#[test]
fn empty_blocks_rejected() {
    assert!(BlockGrid::partition(3, 8, 4, 1).is_err());
    assert!(BlockGrid::partition(8, 8, 0, 1).is_err());
}

#[test]
fn elastic_cells_are_strictly_increasing() {
    for (len, side, a, b) in [(32, 5, 1.0, 7.0), (17, 17, 1.0, 1.0), (40, 2, 16.0, 3.0), (9, 8, 4.0, 1.0)] {
        let cells = elastic_cells(len, side, a, b);
        assert_eq!(cells.len(), side + 1);
        assert_eq!(cells[0], 0);
        assert_eq!(cells[side], len);
        assert!(cells.windows(2).all(|w| w[0] < w[1]), "{cells:?}");
    }
}

#[test]
fn flat_block_survives_resampling() {
    let mut grid = BlockGrid::partition(24, 16, 1, 1).unwrap();
    apply_mesh(&mut grid, &RelevanceMesh::uniform(1, 1, RelevanceLevel::from_index(1).unwrap()), 40).unwrap();
    let block = grid.block(0, 0).clone();
    assert!(block.is_downsampled());
    let cells = BlockCells::for_block(&block);

    let src = vec![143u8; 24 * 16];
    let mut samples = vec![0u8; cells.side_x() * cells.side_y()];
    downsample(&src, 24, &cells, &mut samples);
    assert!(samples.iter().all(|&v| v == 143));
    let mut back = vec![0u8; 24 * 16];
    upsample(&samples, &cells, &mut back, 24);
    assert_eq!(back, src);
}

#[test]
fn upsampling_a_ramp_stays_between_samples() {
    let cells = BlockCells {
        x: vec![0, 4, 8],
        y: vec![0, 4],
    };
    let mut out = vec![0u8; 8 * 4];
    upsample(&[10, 50], &cells, &mut out, 8);
    let row = &out[..8];
    assert!(row.windows(2).all(|w| w[0] <= w[1]), "{row:?}");
    assert_eq!(row[0], 10);
    assert_eq!(row[7], 50);
}

#[test]
fn estimated_mesh_tracks_activity() {
    let t = tables();
    let p = HopPredictor::new(&t, 25, PredictionVariant::Average).unwrap();
    let grid = BlockGrid::partition(64, 64, 4, 4).unwrap();

    let flat = vec![90u8; 64 * 64];
    let mesh = estimate_mesh(&p, &flat, 64, 64, 64, &grid).unwrap();
    assert_eq!(mesh, RelevanceMesh::new(4, 4));

    let busy = noise(64 * 64, 11);
    let mesh = estimate_mesh(&p, &busy, 64, 64, 64, &grid).unwrap();
    let c = mesh.get(2, 2);
    assert!(c.x > RelevanceLevel::ZERO && c.y > RelevanceLevel::ZERO);
}

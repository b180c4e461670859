// Tests for the precomputed reconstruction and best-hop tables.

use lhe::hop::{Hop, MAX_STEP, MIN_STEP};
use lhe::tables::{TABLE_RATIO_MAX, TABLE_RATIO_MIN, TABLE_STEP_MAX, TABLE_STEP_MIN};

use crate::common::tables;

#[test]
fn null_hop_reconstructs_the_prediction() {
    let t = tables();
    for p in 1..=255u8 {
        for step in MIN_STEP..=MAX_STEP {
            assert_eq!(t.reconstruct(p, 25, step, Hop::Null), p);
        }
    }
}

#[test]
fn ladders_are_monotone_and_in_range() {
    let t = tables();
    for ratio in TABLE_RATIO_MIN..=TABLE_RATIO_MAX {
        for step in TABLE_STEP_MIN..=TABLE_STEP_MAX {
            for p in 0..=255u8 {
                let l = t.ladder(p, ratio, step);
                assert_eq!(l.len(), 9);
                assert!(
                    l.windows(2).all(|w| w[0] <= w[1]),
                    "ladder {l:?} not sorted for p={p} ratio={ratio} step={step}"
                );
                assert!(l[0] >= 1, "p={p} ratio={ratio} step={step}");
            }
        }
    }
}

#[test]
fn positive_hops_grow_with_ratio() {
    let t = tables();
    let low = t.reconstruct(100, TABLE_RATIO_MIN, 8, Hop::Pos4);
    let high = t.reconstruct(100, TABLE_RATIO_MAX, 8, Hop::Pos4);
    assert!(high >= low);
    assert!(high > t.reconstruct(100, TABLE_RATIO_MAX, 8, Hop::Pos3));
}

#[test]
fn best_hop_is_closest_on_the_ladder() {
    let t = tables();
    for ratio in TABLE_RATIO_MIN..=TABLE_RATIO_MAX {
        for step in TABLE_STEP_MIN..=TABLE_STEP_MAX {
            for p in (0..=255u8).step_by(3) {
                let l = t.ladder(p, ratio, step);
                for original in 0..=255u8 {
                    let d = |h: Hop| (l[h.index()] as i32 - original as i32).abs();
                    let best = l.iter().map(|&v| (v as i32 - original as i32).abs()).min().unwrap();
                    let chosen = t.best_hop(ratio, step, original, p);
                    assert_eq!(d(chosen), best, "p={p} o={original} ratio={ratio} step={step}");
                }
            }
        }
    }
}

#[test]
fn exact_prediction_picks_null() {
    let t = tables();
    for p in 1..=255u8 {
        assert_eq!(t.best_hop(25, 7, p, p), Hop::Null);
    }
}

#[test]
fn ties_prefer_higher_priority() {
    let t = tables();
    // Prediction 1 at the floor: Null, Neg1..Neg4 all reconstruct to 1.
    assert_eq!(t.best_hop(25, 7, 0, 1), Hop::Null);
    // Prediction 255 at the ceiling: Null, Pos1..Pos4 all reconstruct to 255.
    assert_eq!(t.best_hop(25, 7, 255, 255), Hop::Null);
}

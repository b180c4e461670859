//! Precomputed reconstruction and hop-selection tables.
//!
//! Both tables are pure functions of the model constants below and are built
//! once per codec instance, then shared read-only (by `Arc`) with every block
//! worker.
//!
//! * `reconstruct[predicted][ratio][step][hop]`: value a hop reconstructs to.
//! * `best_hop[ratio][step][original][predicted]`: hop whose reconstruction is
//!   closest to `original`.

use rayon::prelude::*;

use crate::hop::types::{Hop, NUM_HOPS};

// ── Model constants ──────────────────────────────────────────────────────────

/// Fraction of the distance to the range bound the outermost hop may cover.
pub const PERCENT_RANGE: f32 = 0.8;
/// Exponent applied to the range fraction (three hop levels above the step).
pub const HOP_EXPONENT: f32 = 1.0 / 3.0;

/// Ratio values are `rmax · 10`; the table covers `rmax` in [2.0, 4.0].
pub const TABLE_RATIO_MIN: u8 = 20;
pub const TABLE_RATIO_MAX: u8 = 40;
pub const TABLE_STEP_MIN: u8 = 1;
pub const TABLE_STEP_MAX: u8 = 19;

/// Smallest reconstructed value; 0 is promoted to 1.
pub const RECONSTRUCT_MIN: i32 = 1;
pub const RECONSTRUCT_MAX: i32 = 255;

const NUM_RATIOS: usize = (TABLE_RATIO_MAX - TABLE_RATIO_MIN) as usize + 1;
const NUM_STEPS: usize = (TABLE_STEP_MAX - TABLE_STEP_MIN) as usize + 1;
const NUM_VALUES: usize = 256;

const LADDERS_PER_VALUE: usize = NUM_RATIOS * NUM_STEPS * NUM_HOPS;
const RECONSTRUCT_LEN: usize = NUM_VALUES * LADDERS_PER_VALUE;
const BEST_HOP_PER_RATIO: usize = NUM_STEPS * NUM_VALUES * NUM_VALUES;
const BEST_HOP_LEN: usize = NUM_RATIOS * BEST_HOP_PER_RATIO;

/// The two lookup tables of the hop model.
pub struct PrecomputedTables {
    reconstruct: Box<[u8]>,
    /// Stored as hop indices.
    best_hop: Box<[u8]>,
}

impl std::fmt::Debug for PrecomputedTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrecomputedTables")
            .field("reconstruct_len", &self.reconstruct.len())
            .field("best_hop_len", &self.best_hop.len())
            .finish()
    }
}

/// `min(max_ratio, (PERCENT_RANGE · distance / step)^(1/3))`, floored at 1 so
/// hop magnitudes never shrink as the hop index moves away from the null hop.
fn ratio_factor(distance: u8, step: u8, max_ratio: f32) -> f32 {
    let reach = (PERCENT_RANGE * distance as f32 / step as f32).powf(HOP_EXPONENT);
    reach.min(max_ratio).max(1.0)
}

fn clamp_value(v: i32) -> u8 {
    v.clamp(RECONSTRUCT_MIN, RECONSTRUCT_MAX) as u8
}

/// Fill the 9 reconstruction values for one (predicted, ratio, step).
fn fill_ladder(predicted: u8, ratio: u8, step: u8, ladder: &mut [u8]) {
    let max_ratio = ratio as f32 / 10.0;
    let up = ratio_factor(255 - predicted, step, max_ratio);
    let down = ratio_factor(predicted, step, max_ratio);
    let p = predicted as i32;

    ladder[Hop::Null.index()] = clamp_value(p);
    let mut up_k = 1.0f32;
    let mut down_k = 1.0f32;
    for k in 0..4 {
        let pos_mag = (step as f32 * up_k) as i32;
        let neg_mag = (step as f32 * down_k) as i32;
        ladder[Hop::Pos1.index() + k] = clamp_value(p + pos_mag);
        ladder[Hop::Neg1.index() - k] = clamp_value(p - neg_mag);
        up_k *= up;
        down_k *= down;
    }
}

/// Best hop for every original value given one sorted ladder.
///
/// The closest reconstruction is always one of the two ladder values around
/// `original`, so a single sweep over the distinct values replaces a 9-way
/// search per original. Equal distances prefer the lower priority rank.
fn fill_best_hops(ladder: &[u8], mut emit: impl FnMut(usize, Hop)) {
    let mut distinct = [(0u8, Hop::Null); NUM_HOPS];
    let mut n = 0;
    for hop in Hop::ALL {
        let v = ladder[hop.index()];
        if n > 0 && distinct[n - 1].0 == v {
            if hop.priority_rank() < distinct[n - 1].1.priority_rank() {
                distinct[n - 1].1 = hop;
            }
        } else {
            distinct[n] = (v, hop);
            n += 1;
        }
    }

    let mut j = 0;
    for original in 0..NUM_VALUES {
        let o = original as u8;
        while j + 1 < n && distinct[j + 1].0 <= o {
            j += 1;
        }
        let (lo_v, lo_hop) = distinct[j];
        let hop = if lo_v >= o || j + 1 == n {
            lo_hop
        } else {
            let (hi_v, hi_hop) = distinct[j + 1];
            let (d_lo, d_hi) = (o - lo_v, hi_v - o);
            if d_lo != d_hi {
                if d_lo < d_hi {
                    lo_hop
                } else {
                    hi_hop
                }
            } else if lo_hop.priority_rank() < hi_hop.priority_rank() {
                lo_hop
            } else {
                hi_hop
            }
        };
        emit(original, hop);
    }
}

#[inline]
fn ratio_slot(ratio: u8) -> usize {
    debug_assert!((TABLE_RATIO_MIN..=TABLE_RATIO_MAX).contains(&ratio));
    (ratio - TABLE_RATIO_MIN) as usize
}

#[inline]
fn step_slot(step: u8) -> usize {
    debug_assert!((TABLE_STEP_MIN..=TABLE_STEP_MAX).contains(&step));
    (step - TABLE_STEP_MIN) as usize
}

#[inline]
fn ladder_offset(predicted: u8, ratio: u8, step: u8) -> usize {
    predicted as usize * LADDERS_PER_VALUE
        + (ratio_slot(ratio) * NUM_STEPS + step_slot(step)) * NUM_HOPS
}

impl PrecomputedTables {
    /// Build both tables. Ratio slabs are filled in parallel.
    ///
    /// # Panics
    /// If the model constants are inconsistent. This is a build-time
    /// invariant, never a runtime condition.
    pub fn build() -> Self {
        assert!(
            PERCENT_RANGE > 0.0 && PERCENT_RANGE <= 1.0,
            "PERCENT_RANGE out of (0, 1]"
        );
        assert!(TABLE_RATIO_MIN >= 10 && TABLE_RATIO_MIN <= TABLE_RATIO_MAX);
        assert!(TABLE_STEP_MIN >= 1 && TABLE_STEP_MIN <= TABLE_STEP_MAX);

        let mut reconstruct = vec![0u8; RECONSTRUCT_LEN];
        reconstruct
            .par_chunks_mut(LADDERS_PER_VALUE)
            .enumerate()
            .for_each(|(predicted, slab)| {
                for (r, ratio_slab) in slab.chunks_mut(NUM_STEPS * NUM_HOPS).enumerate() {
                    let ratio = TABLE_RATIO_MIN + r as u8;
                    for (s, ladder) in ratio_slab.chunks_mut(NUM_HOPS).enumerate() {
                        fill_ladder(predicted as u8, ratio, TABLE_STEP_MIN + s as u8, ladder);
                    }
                }
            });

        let mut best_hop = vec![0u8; BEST_HOP_LEN];
        best_hop
            .par_chunks_mut(BEST_HOP_PER_RATIO)
            .enumerate()
            .for_each(|(r, slab)| {
                let ratio = TABLE_RATIO_MIN + r as u8;
                for (s, step_slab) in slab.chunks_mut(NUM_VALUES * NUM_VALUES).enumerate() {
                    let step = TABLE_STEP_MIN + s as u8;
                    for predicted in 0..NUM_VALUES {
                        let off = ladder_offset(predicted as u8, ratio, step);
                        let ladder = &reconstruct[off..off + NUM_HOPS];
                        fill_best_hops(ladder, |original, hop| {
                            step_slab[original * NUM_VALUES + predicted] = hop as u8;
                        });
                    }
                }
            });

        Self {
            reconstruct: reconstruct.into_boxed_slice(),
            best_hop: best_hop.into_boxed_slice(),
        }
    }

    /// Value `hop` reconstructs to around `predicted`.
    #[inline]
    pub fn reconstruct(&self, predicted: u8, ratio: u8, step: u8, hop: Hop) -> u8 {
        self.reconstruct[ladder_offset(predicted, ratio, step) + hop.index()]
    }

    /// All 9 reconstruction values around `predicted`, in hop index order.
    #[inline]
    pub fn ladder(&self, predicted: u8, ratio: u8, step: u8) -> &[u8] {
        let off = ladder_offset(predicted, ratio, step);
        &self.reconstruct[off..off + NUM_HOPS]
    }

    /// Hop whose reconstruction around `predicted` is closest to `original`.
    #[inline]
    pub fn best_hop(&self, ratio: u8, step: u8, original: u8, predicted: u8) -> Hop {
        let idx = (ratio_slot(ratio) * NUM_STEPS + step_slot(step)) * NUM_VALUES * NUM_VALUES
            + original as usize * NUM_VALUES
            + predicted as usize;
        // Entries are written from `Hop` discriminants only.
        Hop::from_index(self.best_hop[idx] as usize).unwrap_or(Hop::Null)
    }
}

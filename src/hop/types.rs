//! Hop symbols and the adaptive step state machine.

/// Smallest adaptive step.
pub const MIN_STEP: u8 = 4;
/// Largest adaptive step, also the value an edge resets the step to.
pub const MAX_STEP: u8 = 10;
/// Step at the start of every block and every block row.
pub const START_STEP: u8 = 7;

/// Number of hop symbols.
pub const NUM_HOPS: usize = 9;

/// One of the 9 quantized prediction-error symbols.
///
/// Lower indices reconstruct darker than the prediction, higher indices
/// lighter; [`Hop::Null`] (index 4) reconstructs the prediction itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Hop {
    Neg4 = 0,
    Neg3 = 1,
    Neg2 = 2,
    Neg1 = 3,
    #[default]
    Null = 4,
    Pos1 = 5,
    Pos2 = 6,
    Pos3 = 7,
    Pos4 = 8,
}

impl Hop {
    /// All hops in index order.
    pub const ALL: [Hop; NUM_HOPS] = [
        Hop::Neg4,
        Hop::Neg3,
        Hop::Neg2,
        Hop::Neg1,
        Hop::Null,
        Hop::Pos1,
        Hop::Pos2,
        Hop::Pos3,
        Hop::Pos4,
    ];

    /// Hops ordered by increasing magnitude, positive before negative.
    ///
    /// Used to break ties in hop selection and to order canonical Huffman
    /// codes of equal length.
    pub const PRIORITY: [Hop; NUM_HOPS] = [
        Hop::Null,
        Hop::Pos1,
        Hop::Neg1,
        Hop::Pos2,
        Hop::Neg2,
        Hop::Pos3,
        Hop::Neg3,
        Hop::Pos4,
        Hop::Neg4,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Hop> {
        Hop::ALL.get(index).copied()
    }

    /// Distance from the null hop: 0 for [`Hop::Null`], 4 for the extreme hops.
    #[inline]
    pub fn magnitude(self) -> u8 {
        (self as i8 - Hop::Null as i8).unsigned_abs()
    }

    /// Position of this hop in [`Hop::PRIORITY`].
    #[inline]
    pub fn priority_rank(self) -> usize {
        match self {
            Hop::Null => 0,
            Hop::Pos1 => 1,
            Hop::Neg1 => 2,
            Hop::Pos2 => 3,
            Hop::Neg2 => 4,
            Hop::Pos3 => 5,
            Hop::Neg3 => 6,
            Hop::Pos4 => 7,
            Hop::Neg4 => 8,
        }
    }

    /// Hops -1, 0 and +1 count as small for step adaptation.
    #[inline]
    pub fn is_small(self) -> bool {
        self.magnitude() <= 1
    }
}

/// Step adaptation after one pixel.
///
/// Two consecutive small hops shrink the step by one (never below
/// [`MIN_STEP`]); anything else resets it to [`MAX_STEP`].
#[inline]
pub fn adapt_step(step: u8, last_was_small: bool, hop: Hop) -> (u8, bool) {
    let small = hop.is_small();
    if small && last_was_small {
        (step.saturating_sub(1).max(MIN_STEP), true)
    } else {
        (MAX_STEP, small)
    }
}

/// Per-scan predictor state. Block-local; never shared between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopState {
    pub step: u8,
    pub last_was_small: bool,
}

impl Default for HopState {
    fn default() -> Self {
        Self::new()
    }
}

impl HopState {
    pub fn new() -> Self {
        Self {
            step: START_STEP,
            last_was_small: false,
        }
    }

    /// Back to the start-of-row state.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn advance(&mut self, hop: Hop) {
        let (step, last_was_small) = adapt_step(self.step, self.last_was_small, hop);
        self.step = step;
        self.last_was_small = last_was_small;
    }
}

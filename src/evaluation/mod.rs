//! This module implements "static" [evaluation], i.e. predicting the relative
//! value/score of a given position without [`crate::search`].
//!
//! The evaluation is only ever used to rank the candidate moves of a rollout
//! against each other, so scores of different positions are not comparable and
//! carry no units.
//!
//! [evaluation]: https://www.chessprogramming.org/Evaluation

use std::fmt::Display;

use crate::game::bitboard::Line;
use crate::game::core::{validate_width, Player};
use crate::game::Bitboard;

mod features;

/// Weight of the mobility and safe moves differentials.
const MOBILITY_WEIGHT: i32 = 11;
/// Bonus for the horizontal player when the hole parity is even.
const HORIZONTAL_PARITY_BONUS: i32 = 10;
/// Bonus for the vertical player when the hole parity is odd.
const VERTICAL_PARITY_BONUS: i32 = 9;

/// A thin wrapper around i32, same size and ergonomics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    value: i32,
}

impl Score {
    /// Lower than any score [`Evaluator::evaluate`] can produce.
    pub const MIN: Self = Self { value: i32::MIN };

    #[must_use]
    #[allow(missing_docs)]
    pub const fn value(self) -> i32 {
        self.value
    }
}

impl From<i32> for Score {
    fn from(value: i32) -> Self {
        Self { value }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Number of non-overlapping dominoes a greedy scan fits into a line of
/// placement candidates: the lowest candidate is taken and the one right above
/// it (which would share a cell) is discarded, until no candidates are left.
#[must_use]
pub fn greedy_packing(mut candidates: Line) -> u8 {
    let mut count = 0;
    while candidates != 0 {
        let lowest = candidates & candidates.wrapping_neg();
        candidates &= !(lowest | (lowest << 1));
        count += 1;
    }
    count
}

/// Precomputes [`greedy_packing`] for every mask of `width` bits.
pub(crate) fn packing_table(width: u8) -> Vec<u8> {
    let masks: Line = 1 << width;
    (0..masks).map(greedy_packing).collect()
}

/// Static evaluation for boards of a fixed width. Holds the precomputed
/// greedy packing table, which is why it is built once and reused by all
/// rollouts.
#[derive(Clone)]
pub struct Evaluator {
    width: u8,
    packing: Vec<u8>,
}

impl Evaluator {
    /// Builds the lookup table for `width x width` boards (`2^width` entries).
    ///
    /// # Errors
    ///
    /// Fails if the width is not supported.
    pub fn new(width: u8) -> anyhow::Result<Self> {
        validate_width(width)?;
        Ok(Self {
            width,
            packing: packing_table(width),
        })
    }

    /// Width of the boards this evaluator accepts.
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Looks up the number of non-overlapping dominoes that fit into a line of
    /// placement candidates.
    #[must_use]
    pub fn packing(&self, candidates: Line) -> u8 {
        self.packing[candidates as usize]
    }

    /// Evaluates the position from the `perspective` player's point of view.
    ///
    /// Combines mobility and "safe" moves differentials (horizontal minus
    /// vertical, weighted and signed by the perspective) with a bonus driven
    /// by the parity of the number of holes: in the endgame the parity of
    /// the cells nobody can cover decides who runs out of moves first.
    #[must_use]
    pub fn evaluate(&self, board: &Bitboard, perspective: Player) -> Score {
        debug_assert_eq!(board.width(), self.width);
        let lines = board.lines();
        let mobility = features::horizontal_mobility(lines) as i32
            - features::vertical_mobility(lines, &self.packing) as i32;
        let safe = features::horizontal_safe(lines) as i32
            - features::vertical_safe(lines, &self.packing) as i32;
        let bonus = parity_bonus(features::holes(lines), perspective);
        Score::from(perspective.sign() * MOBILITY_WEIGHT * (mobility + safe) + bonus)
    }
}

fn parity_bonus(holes: u32, perspective: Player) -> i32 {
    let parity = (holes + 1) / 2 % 2;
    match (perspective, parity) {
        (Player::Horizontal, 0) => HORIZONTAL_PARITY_BONUS,
        (Player::Vertical, 1) => VERTICAL_PARITY_BONUS,
        _ => 0,
    }
}

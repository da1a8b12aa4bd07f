//! Greedy rollout policy. Instead of playing uniformly random moves, each
//! simulated player picks the move with the best static evaluation and breaks
//! ties at random. Greedy games reach realistic endgames much faster than
//! random ones, which is what makes a few hundred milliseconds of search
//! useful on big boards.

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::evaluation::{Evaluator, Score};
use crate::game::core::MAX_MOVES;
use crate::game::{Bitboard, Move, Player};

/// Plays simulated games on [`Bitboard`]s of a fixed width.
#[derive(Clone)]
pub struct RolloutPolicy {
    evaluator: Evaluator,
}

impl RolloutPolicy {
    /// Creates a policy for `width x width` boards.
    ///
    /// # Errors
    ///
    /// Fails if the width is not supported.
    pub fn new(width: u8) -> anyhow::Result<Self> {
        Ok(Self {
            evaluator: Evaluator::new(width)?,
        })
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Width of the boards this policy plays on.
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.evaluator.width()
    }

    /// Picks one of the moves with the highest evaluation from `player`'s
    /// perspective, uniformly at random among ties. Returns `None` if `player`
    /// has no legal moves.
    ///
    /// Every candidate is applied in place, evaluated and taken back: the board
    /// is unchanged when this returns.
    pub fn choose_move(
        &self,
        board: &mut Bitboard,
        player: Player,
        rng: &mut impl Rng,
    ) -> Option<Move> {
        let mut best_score = Score::MIN;
        let mut best_moves = ArrayVec::<Move, MAX_MOVES>::new();
        for candidate in board.generate_moves(player) {
            let score = self
                .evaluator
                .evaluate(&board.place(candidate, player), player);
            if score > best_score {
                best_score = score;
                best_moves.clear();
            }
            if score == best_score {
                best_moves.push(candidate);
            }
        }
        best_moves.choose(rng).copied()
    }

    /// Plays the game out until the player to move is stuck and returns the
    /// winner, i.e. the other player. `board` holds the final position
    /// afterwards.
    pub fn rollout(&self, board: &mut Bitboard, mut player: Player, rng: &mut impl Rng) -> Player {
        while let Some(placement) = self.choose_move(board, player, rng) {
            board.make_move(placement, player);
            player = !player;
        }
        !player
    }
}

//! Move generation over the square-centric [`Board`].
//!
//! Search tree nodes keep their own move lists. Descending two plies changes
//! only a couple of cells, so a node's list can be derived from its
//! grandparent's (same player to move) by [`filter_moves`] instead of scanning
//! the whole board again.

use crate::game::board::Board;
use crate::game::core::{Move, Player};

/// Returns all legal moves of `player`, column by column.
#[must_use]
pub fn generate_moves(board: &Board, player: Player) -> Vec<Move> {
    let (dx, dy) = player.offset();
    let width = board.width();
    let mut moves = Vec::new();
    for x in 0..width - dx {
        for y in 0..width - dy {
            if !board.is_occupied(x, y) && !board.is_occupied(x + dx, y + dy) {
                moves.push(Move::new(x, y));
            }
        }
    }
    moves
}

/// Keeps the `candidates` that are still legal for `player`, preserving their
/// order.
///
/// `candidates` has to be a superset of the legal moves, which holds for the
/// move list of any ancestor position with the same player to move: occupying
/// cells never creates new placements.
#[must_use]
pub fn filter_moves(candidates: &[Move], board: &Board, player: Player) -> Vec<Move> {
    let (dx, dy) = player.offset();
    candidates
        .iter()
        .copied()
        .filter(|candidate| {
            !board.is_occupied(candidate.x, candidate.y)
                && !board.is_occupied(candidate.x + dx, candidate.y + dy)
        })
        .collect()
}

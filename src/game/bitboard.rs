//! Packed [`Bitboard`] representation used by the evaluation and the rollouts.
//!
//! Every column of the board is a *line*: bit `y` of line `x` is set iff the
//! cell `(x, y)` is **empty**. Vertical dominoes live inside a single line and
//! horizontal dominoes span two adjacent lines at the same bit, so the legal
//! placements of both players can be computed for a whole line with a couple
//! of bitwise operations.
//!
//! The square-centric [`Board`] used by the search tree and this
//! representation are exact complements of each other: see the `From`
//! conversions, which are the only seam between the two.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt;
use std::ops::Deref;

use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::game::board::Board;
use crate::game::core::{Move, Player, MAX_BOARD_WIDTH, MAX_MOVES};

/// One packed column. Wider than [`MAX_BOARD_WIDTH`] bits so that complements
/// and one-bit shifts never lose information: bits beyond the board width read
/// as "occupied" after a complement, which is exactly how the board edge is
/// treated.
pub type Line = u32;

/// Packed board: one [`Line`] per column.
///
/// Lines beyond the board width are kept at zero (fully occupied) and never
/// read.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Bitboard {
    width: u8,
    lines: [Line; MAX_BOARD_WIDTH as usize],
}

impl Bitboard {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Returns the active lines, one per column.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines[..usize::from(self.width)]
    }

    /// Line with all cells of a column empty.
    #[must_use]
    pub const fn full_line(&self) -> Line {
        (1 << self.width) - 1
    }

    /// Returns true if `(x, y)` is empty.
    #[must_use]
    pub fn is_empty(&self, x: u8, y: u8) -> bool {
        self.lines[usize::from(x)] & (1 << y) != 0
    }

    fn occupy(&mut self, x: u8, y: u8) {
        self.lines[usize::from(x)] &= !(1 << y);
    }

    fn vacate(&mut self, x: u8, y: u8) {
        self.lines[usize::from(x)] |= 1 << y;
    }

    /// Places a domino. The move has to be legal.
    pub fn make_move(&mut self, placement: Move, player: Player) {
        let (second_x, second_y) = placement.second_cell(player);
        debug_assert!(self.is_empty(placement.x, placement.y));
        debug_assert!(self.is_empty(second_x, second_y));
        self.occupy(placement.x, placement.y);
        self.occupy(second_x, second_y);
    }

    /// Removes a domino previously placed by [`Bitboard::make_move`].
    pub fn unmake_move(&mut self, placement: Move, player: Player) {
        let (second_x, second_y) = placement.second_cell(player);
        self.vacate(placement.x, placement.y);
        self.vacate(second_x, second_y);
    }

    /// Places a domino for the lifetime of the returned guard. The board is
    /// restored when the guard is dropped.
    #[must_use]
    pub fn place(&mut self, placement: Move, player: Player) -> Placement<'_> {
        self.make_move(placement, player);
        Placement {
            board: self,
            placement,
            player,
        }
    }

    /// Mask of the rows `y` of line `x` where `player` can put the top-left
    /// cell of a domino.
    #[must_use]
    pub fn placements(&self, x: u8, player: Player) -> Line {
        let line = self.lines[usize::from(x)];
        match player {
            Player::Vertical => line & (line >> 1),
            Player::Horizontal if x + 1 < self.width => line & self.lines[usize::from(x) + 1],
            Player::Horizontal => 0,
        }
    }

    /// Returns true if `player` has at least one legal move.
    #[must_use]
    pub fn has_moves(&self, player: Player) -> bool {
        (0..self.width).any(|x| self.placements(x, player) != 0)
    }

    /// Generates all legal moves of `player` in the same order as
    /// [`crate::game::movegen::generate_moves`] without allocating.
    #[must_use]
    pub fn generate_moves(&self, player: Player) -> ArrayVec<Move, MAX_MOVES> {
        let mut moves = ArrayVec::new();
        for x in 0..self.width {
            for y in LineIterator::new(self.placements(x, player)) {
                moves.push(Move::new(x, y));
            }
        }
        moves
    }
}

impl From<&Board> for Bitboard {
    fn from(board: &Board) -> Self {
        let mut lines = [0; MAX_BOARD_WIDTH as usize];
        for (x, line) in (0..board.width()).zip(lines.iter_mut()) {
            for y in 0..board.width() {
                if !board.is_occupied(x, y) {
                    *line |= 1 << y;
                }
            }
        }
        Self {
            width: board.width(),
            lines,
        }
    }
}

impl fmt::Debug for Bitboard {
    /// Prints the board row by row, `1` for empty cells and `.` for occupied
    /// ones.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            (0..self.width)
                .map(|y| {
                    (0..self.width)
                        .map(|x| if self.is_empty(x, y) { '1' } else { '.' })
                        .join(SQUARE_SEPARATOR)
                })
                .join(LINE_SEPARATOR)
        )
    }
}

/// Scoped domino placement: derefs to the board with the domino placed and
/// takes it back on drop.
pub struct Placement<'a> {
    board: &'a mut Bitboard,
    placement: Move,
    player: Player,
}

impl Deref for Placement<'_> {
    type Target = Bitboard;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.unmake_move(self.placement, self.player);
    }
}

/// Iterates over the set bits of a [`Line`] from the least significant one
/// through [BitScan] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub(crate) struct LineIterator {
    bits: Line,
}

impl LineIterator {
    pub(crate) const fn new(bits: Line) -> Self {
        Self { bits }
    }
}

impl Iterator for LineIterator {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Get the LS1B and consume it from the iterator.
        let next_index = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        // trailing_zeros() of a non-zero u32 is always below 32.
        u8::try_from(next_index).ok()
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

//! Square-centric board representations: the boolean occupancy [`Board`] that
//! the search tree walks and the [`Grid`] of [`Cell`]s the outside world
//! talks in.
//!
//! Both are indexed by `(x, y)` where `x` is the column and `y` is the row. The
//! storage is column-major so that a column maps directly onto one packed line
//! of [`crate::game::bitboard::Bitboard`].

use std::fmt;

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::game::bitboard::Bitboard;
use crate::game::core::{validate_width, Cell, Move, Player};

const LINE_SEPARATOR: &str = "\n";

/// Occupancy grid: only whether a cell is covered matters for the rules, not by
/// whom.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    occupied: Vec<bool>,
}

impl Board {
    /// Creates an empty `width x width` board.
    ///
    /// # Errors
    ///
    /// Fails if the width is not supported, see
    /// [`crate::game::core::MAX_BOARD_WIDTH`].
    pub fn empty(width: u8) -> anyhow::Result<Self> {
        validate_width(width)?;
        Ok(Self {
            width,
            occupied: vec![false; usize::from(width) * usize::from(width)],
        })
    }

    /// Parses the puzzle format: `width` rows of `width` characters each, `-`
    /// standing for an empty cell and anything else for an occupied one.
    ///
    /// # Errors
    ///
    /// Fails if the board is not square or its width is not supported.
    pub fn from_rows(rows: &[&str]) -> anyhow::Result<Self> {
        let width = u8::try_from(rows.len()).context("too many rows")?;
        let mut board = Self::empty(width)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != rows.len() {
                bail!(
                    "row {y} should have {} cells, got {}: '{row}'",
                    rows.len(),
                    row.chars().count()
                );
            }
            for (x, cell) in row.chars().enumerate() {
                if cell != '-' {
                    board.occupied[usize::from(width) * x + y] = true;
                }
            }
        }
        Ok(board)
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn width(&self) -> u8 {
        self.width
    }

    fn index(&self, x: u8, y: u8) -> usize {
        debug_assert!(x < self.width && y < self.width);
        usize::from(x) * usize::from(self.width) + usize::from(y)
    }

    /// Returns true if `(x, y)` is covered by a domino.
    #[must_use]
    pub fn is_occupied(&self, x: u8, y: u8) -> bool {
        self.occupied[self.index(x, y)]
    }

    /// Covers a single cell.
    pub fn occupy(&mut self, x: u8, y: u8) {
        let index = self.index(x, y);
        self.occupied[index] = true;
    }

    /// Returns true if both cells of the placement are on the board and empty.
    #[must_use]
    pub fn is_legal(&self, placement: Move, player: Player) -> bool {
        let (second_x, second_y) = placement.second_cell(player);
        second_x < self.width
            && second_y < self.width
            && !self.is_occupied(placement.x, placement.y)
            && !self.is_occupied(second_x, second_y)
    }

    /// Places a domino. The move has to be legal.
    pub fn make_move(&mut self, placement: Move, player: Player) {
        debug_assert!(self.is_legal(placement, player));
        let (second_x, second_y) = placement.second_cell(player);
        self.occupy(placement.x, placement.y);
        self.occupy(second_x, second_y);
    }

    /// Overwrites this board with `other` without reallocating.
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.width, other.width);
        self.occupied.copy_from_slice(&other.occupied);
    }

    /// Number of covered cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&occupied| occupied).count()
    }
}

impl From<&Bitboard> for Board {
    fn from(bitboard: &Bitboard) -> Self {
        let width = bitboard.width();
        let mut occupied = Vec::with_capacity(usize::from(width) * usize::from(width));
        for x in 0..width {
            occupied.extend((0..width).map(|y| !bitboard.is_empty(x, y)));
        }
        Self { width, occupied }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            (0..self.width)
                .map(|y| {
                    (0..self.width)
                        .map(|x| if self.is_occupied(x, y) { '#' } else { '.' })
                        .collect::<String>()
                })
                .join(LINE_SEPARATOR)
        )
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Board as the tournament server sees it: every cell remembers the orientation
/// of the piece covering it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty `width x width` grid.
    ///
    /// # Errors
    ///
    /// Fails if the width is not supported.
    pub fn empty(width: u8) -> anyhow::Result<Self> {
        validate_width(width)?;
        Ok(Self {
            width,
            cells: vec![Cell::Empty; usize::from(width) * usize::from(width)],
        })
    }

    /// Decodes the tournament wire format.
    ///
    /// Cells are listed row by row starting from the top-left corner. Every
    /// character is a digit packing two consecutive cells: `3 * left + right`
    /// where a cell is 0 (empty), 1 (vertical piece) or 2 (horizontal piece).
    ///
    /// # Errors
    ///
    /// Fails on characters that are not digits in `0..=8` or if the number of
    /// encoded cells does not match `width * width`.
    pub fn from_wire(encoded: &str, width: u8) -> anyhow::Result<Self> {
        let mut grid = Self::empty(width)?;
        let expected = grid.cells.len();
        if expected % 2 != 0 {
            bail!("wire format packs cells in pairs: {width}x{width} board can not be encoded");
        }
        if encoded.len() * 2 != expected {
            bail!(
                "expected {} characters for {width}x{width} board, got {}",
                expected / 2,
                encoded.len()
            );
        }
        for (pair, symbol) in encoded.chars().enumerate() {
            let digit = symbol
                .to_digit(10)
                .filter(|&digit| digit < 9)
                .with_context(|| format!("unexpected symbol '{symbol}' at position {pair}"))?;
            let digit = u8::try_from(digit)?;
            for (offset, value) in [(0, digit / 3), (1, digit % 3)] {
                let sequence = pair * 2 + offset;
                let x = sequence % usize::from(width);
                let y = sequence / usize::from(width);
                grid.cells[x * usize::from(width) + y] = Cell::try_from(value)?;
            }
        }
        Ok(grid)
    }

    /// Encodes the grid in the tournament wire format, see [`Grid::from_wire`].
    #[must_use]
    pub fn to_wire(&self) -> String {
        let width = usize::from(self.width);
        (0..self.cells.len())
            .map(|sequence| u8::from(self.cells[(sequence % width) * width + sequence / width]))
            .tuples()
            .map(|(left, right)| char::from(b'0' + 3 * left + right))
            .collect()
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn cell(&self, x: u8, y: u8) -> Cell {
        self.cells[usize::from(x) * usize::from(self.width) + usize::from(y)]
    }

    /// Places a domino of `player`'s orientation. The move has to be legal.
    pub fn make_move(&mut self, placement: Move, player: Player) {
        let (second_x, second_y) = placement.second_cell(player);
        for (x, y) in [(placement.x, placement.y), (second_x, second_y)] {
            let index = usize::from(x) * usize::from(self.width) + usize::from(y);
            debug_assert!(self.cells[index].is_empty());
            self.cells[index] = Cell::from(player);
        }
    }

    /// Drops the piece orientation and keeps occupancy only.
    #[must_use]
    pub fn occupancy(&self) -> Board {
        Board {
            width: self.width,
            occupied: self.cells.iter().map(|cell| !cell.is_empty()).collect(),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            (0..self.width)
                .map(|y| (0..self.width).map(|x| self.cell(x, y)).join(""))
                .join(LINE_SEPARATOR)
        )
    }
}

//! Domineering primitives commonly used within [`crate::game`].

use std::fmt;
use std::ops::Not;

use anyhow::bail;

/// Widest supported board. A packed line has to fit the greedy table index,
/// which has `2^width` entries.
pub const MAX_BOARD_WIDTH: u8 = 16;

/// Upper bound on the number of legal placements for one player on the widest
/// board: `width * (width - 1)`.
pub const MAX_MOVES: usize = MAX_BOARD_WIDTH as usize * (MAX_BOARD_WIDTH as usize - 1);

/// Board width used by the tournament server.
pub const TOURNAMENT_BOARD_WIDTH: u8 = 12;

/// Checks that the board width is supported by both board representations.
pub(crate) fn validate_width(width: u8) -> anyhow::Result<()> {
    if width == 0 || width > MAX_BOARD_WIDTH {
        bail!("board width should be within 1..={MAX_BOARD_WIDTH}, got {width}");
    }
    Ok(())
}

/// Domineering is played by two players: one places dominoes vertically (and
/// traditionally moves first), the other one horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    /// Occupies `(x, y)` and `(x, y + 1)`.
    Vertical,
    /// Occupies `(x, y)` and `(x + 1, y)`.
    Horizontal,
}

impl Player {
    /// Offset of the second cell covered by this player's domino relative to
    /// the top-left one, as `(dx, dy)`.
    #[must_use]
    pub const fn offset(self) -> (u8, u8) {
        match self {
            Self::Vertical => (0, 1),
            Self::Horizontal => (1, 0),
        }
    }

    /// +1 for [`Player::Horizontal`] and -1 for [`Player::Vertical`]. Scores
    /// are computed from the horizontal player's point of view and flipped
    /// with this sign.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Vertical => -1,
            Self::Horizontal => 1,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "V" | "v" => Ok(Self::Vertical),
            "H" | "h" => Ok(Self::Horizontal),
            _ => bail!("player should be 'V' or 'H', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::Vertical => 'V',
                Self::Horizontal => 'H',
            }
        )
    }
}

/// A domino placement named by its top-left (lower-indexed) cell. Together with
/// the [`Player`] making it, it determines both covered cells, see
/// [`Player::offset`].
///
/// `x` is the column (left to right) and `y` is the row (top to bottom).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    /// Column of the top-left cell.
    pub x: u8,
    /// Row of the top-left cell.
    pub y: u8,
}

impl Move {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Returns the second cell covered when `player` makes this move.
    #[must_use]
    pub const fn second_cell(self, player: Player) -> (u8, u8) {
        let (dx, dy) = player.offset();
        (self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Move {
    /// Serializes the move the way the tournament server expects it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Contents of a single cell. The orientation of the piece covering a cell is
/// only kept for display: legality depends on occupancy alone.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Vertical,
    Horizontal,
}

impl Cell {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Vertical => Self::Vertical,
            Player::Horizontal => Self::Horizontal,
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = anyhow::Error;

    /// Parses the numeric cell value used by the tournament wire format.
    fn try_from(value: u8) -> anyhow::Result<Self> {
        match value {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Vertical),
            2 => Ok(Self::Horizontal),
            _ => bail!("cell value should be 0, 1 or 2, got {value}"),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => 0,
            Cell::Vertical => 1,
            Cell::Horizontal => 2,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::Empty => '.',
                Self::Vertical => 'V',
                Self::Horizontal => 'H',
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn players() {
        assert_eq!(!Player::Vertical, Player::Horizontal);
        assert_eq!(!!Player::Vertical, Player::Vertical);
        assert_eq!(Player::try_from("V").unwrap(), Player::Vertical);
        assert_eq!(Player::try_from("h").unwrap(), Player::Horizontal);
        assert!(Player::try_from("x").is_err());
        assert_eq!(Player::Horizontal.to_string(), "H");
    }

    #[test]
    fn second_cell() {
        let placement = Move::new(3, 5);
        assert_eq!(placement.second_cell(Player::Vertical), (3, 6));
        assert_eq!(placement.second_cell(Player::Horizontal), (4, 5));
    }

    #[test]
    fn move_display() {
        assert_eq!(Move::new(0, 11).to_string(), "(0, 11)");
    }

    #[test]
    fn cells() {
        for value in 0..3 {
            assert_eq!(u8::from(Cell::try_from(value).unwrap()), value);
        }
        assert!(Cell::try_from(3).is_err());
        assert_eq!(Cell::from(Player::Vertical), Cell::Vertical);
        assert!(Cell::default().is_empty());
    }

    #[test]
    fn widths() {
        assert!(validate_width(0).is_err());
        assert!(validate_width(1).is_ok());
        assert!(validate_width(MAX_BOARD_WIDTH).is_ok());
        assert!(validate_width(MAX_BOARD_WIDTH + 1).is_err());
    }
}

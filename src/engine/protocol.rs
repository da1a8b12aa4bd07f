//! Text formats the engine speaks.
//!
//! The tournament server sends a line with one or more requests separated by
//! `/`. Every request looks like `<V|H>;<round>;<game>;<opponent>;<board>`
//! where the board uses the wire format of [`Grid::from_wire`]. The answer
//! echoes the round and game identifiers followed by the chosen move:
//! `<round>;<game>;(<x>, <y>)`.
//!
//! The puzzle format is a player letter (`v` or `h`) followed by the rows of
//! the board, `-` standing for an empty cell. The answer is `<y> <x>`.

use anyhow::{bail, Context};

use crate::game::{Board, Grid, Move, Player};

pub(super) const PING: &str = "Ping";
pub(super) const PONG: &str = "Pong";
pub(super) const REQUEST_SEPARATOR: char = '/';
const FIELD_SEPARATOR: char = ';';

#[derive(Debug, PartialEq, Eq)]
pub(super) struct Request<'a> {
    pub(super) player: Player,
    pub(super) round: &'a str,
    pub(super) game: &'a str,
    pub(super) opponent: &'a str,
    pub(super) grid: Grid,
}

impl<'a> Request<'a> {
    /// Parses a single request for a `width x width` board.
    pub(super) fn parse(request: &'a str, width: u8) -> anyhow::Result<Self> {
        let fields: Vec<&str> = request.trim().split(FIELD_SEPARATOR).collect();
        let [player, round, game, opponent, board] = fields[..] else {
            bail!(
                "request should have 5 fields separated by '{FIELD_SEPARATOR}', got {}: '{request}'",
                fields.len()
            );
        };
        Ok(Self {
            player: Player::try_from(player)?,
            round,
            game,
            opponent,
            grid: Grid::from_wire(board, width)
                .with_context(|| format!("round {round}, game {game}"))?,
        })
    }

    pub(super) fn answer(&self, chosen: Move) -> String {
        format!("{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{chosen}", self.round, self.game)
    }
}

/// Parses the puzzle input.
pub(super) fn parse_puzzle(input: &str) -> anyhow::Result<(Player, Board)> {
    let mut tokens = input.split_whitespace();
    let player = tokens.next().context("expected player to move, got empty input")?;
    let player = Player::try_from(player)?;
    let rows: Vec<&str> = tokens.collect();
    Ok((player, Board::from_rows(&rows)?))
}

pub(super) fn puzzle_answer(chosen: Move) -> String {
    format!("{} {}", chosen.y, chosen.x)
}

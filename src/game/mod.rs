//! Implementation of Domineering rules and board representations.

pub mod bitboard;
pub mod board;
pub mod core;
pub mod movegen;

pub use self::bitboard::Bitboard;
pub use self::board::{Board, Grid};
pub use self::core::{Cell, Move, Player};

#![no_main]
use domineering::game::movegen::generate_moves;
use domineering::game::{Bitboard, Board, Move, Player};
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

// The first byte is the width, every following bit marks an occupied cell.
fuzz_target!(|data: &[u8]| {
    let Some((&width, cells)) = data.split_first() else {
        return;
    };
    let Ok(mut board) = Board::empty(width % 17) else {
        return;
    };
    for x in 0..board.width() {
        for y in 0..board.width() {
            let bit = usize::from(x) * usize::from(board.width()) + usize::from(y);
            if cells.get(bit / 8).is_some_and(|byte| byte & (1 << (bit % 8)) != 0) {
                board.occupy(x, y);
            }
        }
    }
    let bitboard = Bitboard::from(&board);
    for player in [Player::Vertical, Player::Horizontal] {
        let expected = (0..board.width())
            .cartesian_product(0..board.width())
            .map(|(x, y)| Move::new(x, y))
            .filter(|&candidate| board.is_legal(candidate, player))
            .collect::<Vec<_>>();
        assert_eq!(generate_moves(&board, player), expected);
        assert_eq!(
            bitboard.generate_moves(player).into_iter().sorted().collect::<Vec<_>>(),
            expected
        );
    }
});

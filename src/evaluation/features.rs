//! Bit-parallel position features computed over packed lines.
//!
//! All counters take the active lines of a [`crate::game::Bitboard`]; cells
//! outside of the board are treated as occupied.

use crate::game::bitboard::Line;

/// Counts vertical placements that can be made simultaneously, column by
/// column. Candidates within a column overlap, so the greedy non-overlapping
/// `packing` table is used instead of a plain population count.
pub(crate) fn vertical_mobility(lines: &[Line], packing: &[u8]) -> u32 {
    lines
        .iter()
        .map(|&line| u32::from(packing[(line & (line << 1)) as usize]))
        .sum()
}

/// Counts horizontal placements. A row accepted for the pair of columns
/// `(x - 1, x)` is not counted again for `(x, x + 1)`.
pub(crate) fn horizontal_mobility(lines: &[Line]) -> u32 {
    let mut previous = 0;
    let mut count = 0;
    for pair in lines.windows(2) {
        previous = pair[0] & pair[1] & !previous;
        count += previous.count_ones();
    }
    count
}

/// Counts vertical placements the opponent can not interfere with: both cells
/// of the domino have occupied neighbours in every adjacent column.
pub(crate) fn vertical_safe(lines: &[Line], packing: &[u8]) -> u32 {
    (0..lines.len())
        .map(|x| {
            let line = lines[x];
            let mut safe = line & (line >> 1);
            for neighbour in neighbours(lines, x) {
                let occupied = !neighbour;
                safe &= occupied & (occupied >> 1);
            }
            u32::from(packing[safe as usize])
        })
        .sum()
}

/// Counts horizontal placements the opponent can not interfere with: the cells
/// right above and right below the domino are occupied in both columns.
pub(crate) fn horizontal_safe(lines: &[Line]) -> u32 {
    let mut previous = 0;
    let mut count = 0;
    for pair in lines.windows(2) {
        let occupied = !pair[0] & !pair[1];
        let safe = pair[0] & pair[1] & (occupied >> 1) & ((occupied << 1) | 1);
        previous = safe & !previous;
        count += previous.count_ones();
    }
    count
}

/// Counts empty cells with no empty neighbour: nobody can ever cover them.
pub(crate) fn holes(lines: &[Line]) -> u32 {
    (0..lines.len())
        .map(|x| {
            let line = lines[x];
            let mut isolated = line & !(line >> 1) & !(line << 1);
            for neighbour in neighbours(lines, x) {
                isolated &= !neighbour;
            }
            isolated.count_ones()
        })
        .sum()
}

fn neighbours(lines: &[Line], x: usize) -> impl Iterator<Item = Line> + '_ {
    let left = x.checked_sub(1).map(|left| lines[left]);
    let right = lines.get(x + 1).copied();
    left.into_iter().chain(right)
}

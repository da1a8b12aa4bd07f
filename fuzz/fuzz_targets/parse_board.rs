#![no_main]
use domineering::game::Grid;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    for width in [2, 8, 12] {
        if let Ok(grid) = Grid::from_wire(s, width) {
            assert_eq!(grid.to_wire(), s);
        }
    }
});

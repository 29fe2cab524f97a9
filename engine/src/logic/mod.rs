use rand::Rng;
use tracing::{debug, instrument, trace};

use crate::{
    data::{Board, Cell, CellState, RevealState},
    error::EngineError,
};

const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// How [`place_mines`] treats a draw that lands on a cell that is already a mine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    /// Draw again until every requested mine is on its own cell.
    #[default]
    Distinct,
    /// One draw per mine; a repeated cell is simply lost, leaving fewer mines
    /// than requested.
    Independent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealResult {
    NoOp,
    /// The addressed cell is a mine.
    Exploded,
    /// Cells uncovered by this reveal, in the order they were uncovered.
    Revealed(Vec<(usize, usize)>),
}

/// In-range neighbours of `(x, y)` on a `width` x `height` grid.
pub fn neighbours(
    width: usize,
    height: usize,
    x: usize,
    y: usize,
) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBOUR_OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < width && ny < height).then_some((nx, ny))
    })
}

/// Allocates an all-empty board. Dimensions are the caller's responsibility;
/// only a mine count larger than the board, or a cell count that overflows
/// `usize`, is rejected.
#[instrument(level = "debug")]
pub fn create_board(width: usize, height: usize, mines: usize) -> Result<Board, EngineError> {
    let cells = width
        .checked_mul(height)
        .ok_or(EngineError::BoardTooLarge { width, height })?;
    if mines > cells {
        return Err(EngineError::InvalidMinesNumber { mines, cells });
    }

    Ok(Board {
        width,
        height,
        mines,
        remaining_safe: cells - mines,
        cells: vec![Cell::Empty(0); cells],
    })
}

/// Turns `(x, y)` into a mine and bumps the count of every safe neighbour.
///
/// Returns `false` (and changes nothing) when the position is out of range or
/// already a mine. The safe-cell counter is not touched, so a layout built by
/// hand should place exactly [`Board::mine_count`] mines.
pub fn place_mine_at(board: &mut Board, x: usize, y: usize) -> bool {
    if !board.contains(x, y) {
        return false;
    }

    let index = board.index(x, y);
    if board.cells[index].is_mine() {
        return false;
    }
    board.cells[index] = Cell::Mine;

    for (nx, ny) in neighbours(board.width, board.height, x, y) {
        let index = board.index(nx, ny);
        if let Cell::Empty(adjacent) = &mut board.cells[index] {
            *adjacent += 1;
        }
    }

    true
}

/// Scatters [`Board::mine_count`] mines with uniform `(x, y)` draws.
pub fn place_mines<R: Rng + ?Sized>(board: &mut Board, placement: Placement, rng: &mut R) {
    if board.cells.is_empty() {
        return;
    }

    let mut lost = 0;
    for _ in 0..board.mines {
        loop {
            let x = rng.random_range(0..board.width);
            let y = rng.random_range(0..board.height);

            if place_mine_at(board, x, y) {
                trace!("Placed mine at ({}, {})", x, y);
                break;
            }

            if placement == Placement::Independent {
                lost += 1;
                break;
            }
        }
    }

    // Keep the win condition tied to the mines that really exist.
    board.remaining_safe += lost;

    debug!(
        "Placed {} of {} mines on a {}x{} board ({:?})",
        board.mines - lost,
        board.mines,
        board.width,
        board.height,
        placement
    );
}

/// Primary click on `(x, y)`.
///
/// A zero cell cascades to its neighbours through an explicit work-list;
/// the cascade stops at numbered cells and never steps onto a mine.
/// A flag shields its cell from a direct reveal but not from a cascade.
pub fn reveal(board: &mut Board, state: &mut RevealState, x: usize, y: usize) -> RevealResult {
    if !board.contains(x, y) {
        return RevealResult::NoOp;
    }

    let index = board.index(x, y);
    if state.get(index) != Some(CellState::Hidden) {
        return RevealResult::NoOp;
    }

    if board.cells[index].is_mine() {
        state.cells[index] = CellState::Revealed;
        debug!("Mine hit at ({}, {})", x, y);
        return RevealResult::Exploded;
    }

    let mut revealed = Vec::new();
    let mut pending = vec![(x, y)];

    while let Some((x, y)) = pending.pop() {
        let index = board.index(x, y);
        match state.get(index) {
            Some(CellState::Hidden | CellState::Flagged) => {}
            Some(CellState::Revealed) | None => continue,
        }

        let adjacent = match board.cells[index] {
            Cell::Mine => continue,
            Cell::Empty(adjacent) => adjacent,
        };

        state.cells[index] = CellState::Revealed;
        board.remaining_safe = board.remaining_safe.saturating_sub(1);
        revealed.push((x, y));

        if adjacent == 0 {
            pending.extend(
                neighbours(board.width, board.height, x, y)
                    .filter(|&(nx, ny)| !state.is_revealed(board.index(nx, ny))),
            );
        }
    }

    debug!(
        "Revealed {} cells from ({}, {}), {} safe cells left",
        revealed.len(),
        x,
        y,
        board.remaining_safe
    );

    RevealResult::Revealed(revealed)
}

/// Uncovers every mine, typically once the game is lost.
/// Returns the mines that were not visible yet.
pub fn reveal_mines(board: &Board, state: &mut RevealState) -> Vec<(usize, usize)> {
    let mut shown = Vec::new();
    for y in 0..board.height {
        for x in 0..board.width {
            let index = board.index(x, y);
            if board.cells[index].is_mine()
                && let Some(cell) = state.cells.get_mut(index)
                && *cell != CellState::Revealed
            {
                *cell = CellState::Revealed;
                shown.push((x, y));
            }
        }
    }
    shown
}

/// Secondary click: Hidden <-> Flagged. Returns whether anything changed.
pub fn toggle_flag(board: &Board, state: &mut RevealState, x: usize, y: usize) -> bool {
    if !board.contains(x, y) {
        return false;
    }

    let Some(cell) = state.cells.get_mut(board.index(x, y)) else {
        return false;
    };
    *cell = match *cell {
        CellState::Hidden => CellState::Flagged,
        CellState::Flagged => CellState::Hidden,
        CellState::Revealed => return false,
    };

    true
}

pub fn win_condition(board: &Board) -> bool {
    board.remaining_safe == 0
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn board_with_mines(width: usize, height: usize, mines: &[(usize, usize)]) -> Board {
        let mut board = create_board(width, height, mines.len()).unwrap();
        for &(x, y) in mines {
            assert!(place_mine_at(&mut board, x, y));
        }
        board
    }

    fn count_mines_around(board: &Board, x: usize, y: usize) -> u8 {
        neighbours(board.width(), board.height(), x, y)
            .filter(|&(nx, ny)| board.cell(nx, ny) == Some(Cell::Mine))
            .count() as u8
    }

    #[test]
    fn neighbours_are_clipped_at_edges() {
        assert_eq!(neighbours(9, 9, 4, 4).count(), 8);
        assert_eq!(neighbours(9, 9, 0, 0).count(), 3);
        assert_eq!(neighbours(9, 9, 8, 8).count(), 3);
        assert_eq!(neighbours(9, 9, 0, 4).count(), 5);
        assert_eq!(neighbours(9, 9, 4, 0).count(), 5);

        let corner: Vec<_> = neighbours(2, 2, 1, 1).collect();
        assert!(corner.contains(&(0, 0)));
        assert!(corner.contains(&(1, 0)));
        assert!(corner.contains(&(0, 1)));
    }

    #[test]
    fn create_board_builds_empty_grid() {
        let board = create_board(4, 3, 5).unwrap();
        assert_eq!(board.cells().len(), 12);
        assert_eq!(board.remaining_safe(), 7);
        assert!(board.cells().iter().all(|cell| *cell == Cell::Empty(0)));
    }

    #[test]
    fn create_board_rejects_too_many_mines() {
        assert_eq!(
            create_board(2, 2, 5).unwrap_err(),
            EngineError::InvalidMinesNumber { mines: 5, cells: 4 }
        );
        assert!(create_board(2, 2, 4).is_ok());
    }

    #[test]
    fn create_board_rejects_unaddressable_size() {
        assert_eq!(
            create_board(usize::MAX, 2, 1).unwrap_err(),
            EngineError::BoardTooLarge {
                width: usize::MAX,
                height: 2
            }
        );
    }

    #[test]
    fn two_by_two_corner_mine() {
        let mut board = board_with_mines(2, 2, &[(0, 0)]);
        assert_eq!(board.cell(1, 0), Some(Cell::Empty(1)));
        assert_eq!(board.cell(0, 1), Some(Cell::Empty(1)));
        assert_eq!(board.cell(1, 1), Some(Cell::Empty(1)));
        assert_eq!(board.remaining_safe(), 3);

        let mut state = RevealState::for_board(&board);
        assert_eq!(
            reveal(&mut board, &mut state, 1, 1),
            RevealResult::Revealed(vec![(1, 1)])
        );
        assert_eq!(board.remaining_safe(), 2);
        assert_eq!(state.count(CellState::Revealed), 1);
    }

    #[test]
    fn three_by_three_center_mine() {
        let mut board = board_with_mines(3, 3, &[(1, 1)]);
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (1, 1) {
                    assert_eq!(board.cell(x, y), Some(Cell::Empty(1)));
                }
            }
        }

        let mut state = RevealState::for_board(&board);
        assert_eq!(
            reveal(&mut board, &mut state, 0, 0),
            RevealResult::Revealed(vec![(0, 0)])
        );

        let safe: Vec<_> = (0..9)
            .map(|i| (i % 3, i / 3))
            .filter(|&pos| pos != (1, 1) && pos != (0, 0))
            .collect();
        for &(x, y) in &safe {
            assert!(!win_condition(&board));
            reveal(&mut board, &mut state, x, y);
        }
        assert!(win_condition(&board));
    }

    #[test]
    fn reveal_mine_explodes_without_touching_counter() {
        let mut board = board_with_mines(3, 3, &[(1, 1)]);
        let mut state = RevealState::for_board(&board);

        assert_eq!(reveal(&mut board, &mut state, 1, 1), RevealResult::Exploded);
        assert_eq!(board.remaining_safe(), 8);
        assert!(state.is_revealed(board.index(1, 1)));
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut board = board_with_mines(3, 3, &[(2, 2)]);
        let mut state = RevealState::for_board(&board);

        reveal(&mut board, &mut state, 1, 1);
        let remaining = board.remaining_safe();
        let snapshot = state.clone();

        assert_eq!(reveal(&mut board, &mut state, 1, 1), RevealResult::NoOp);
        assert_eq!(board.remaining_safe(), remaining);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn reveal_out_of_range_is_noop() {
        let mut board = board_with_mines(2, 2, &[(0, 0)]);
        let mut state = RevealState::for_board(&board);

        assert_eq!(reveal(&mut board, &mut state, 2, 0), RevealResult::NoOp);
        assert_eq!(reveal(&mut board, &mut state, 0, 2), RevealResult::NoOp);
        assert_eq!(board.remaining_safe(), 3);
    }

    #[test]
    fn state_from_smaller_board_is_never_indexed_past_its_end() {
        let small = board_with_mines(2, 2, &[(0, 0)]);
        let mut board = board_with_mines(4, 4, &[(3, 3)]);
        let mut state = RevealState::for_board(&small);

        assert_eq!(reveal(&mut board, &mut state, 3, 2), RevealResult::NoOp);
        assert!(!toggle_flag(&board, &mut state, 3, 2));

        // The cascade from (0, 0) runs off the end of the state and stops there.
        let RevealResult::Revealed(cells) = reveal(&mut board, &mut state, 0, 0) else {
            panic!("expected a cascade");
        };
        assert!(cells.iter().all(|&(x, y)| board.index(x, y) < 4));
        assert!(reveal_mines(&board, &mut state).is_empty());
    }

    #[test]
    fn flood_fill_stops_at_mine_wall() {
        // Column x = 2 is all mines; nothing right of it can be reached.
        let mut board = board_with_mines(5, 3, &[(2, 0), (2, 1), (2, 2)]);
        let mut state = RevealState::for_board(&board);

        let RevealResult::Revealed(cells) = reveal(&mut board, &mut state, 0, 1) else {
            panic!("expected a cascade");
        };

        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|&(x, _)| x < 2));
        assert_eq!(board.cell(1, 1), Some(Cell::Empty(3)));
        assert_eq!(board.remaining_safe(), 6);
        for y in 0..3 {
            for x in 2..5 {
                assert!(!state.is_revealed(board.index(x, y)));
            }
        }
    }

    #[test]
    fn flood_fill_visits_each_cell_once() {
        let mut board = board_with_mines(6, 6, &[(5, 5)]);
        let mut state = RevealState::for_board(&board);

        let RevealResult::Revealed(mut cells) = reveal(&mut board, &mut state, 0, 0) else {
            panic!("expected a cascade");
        };

        assert_eq!(cells.len(), 35);
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 35);
        assert!(win_condition(&board));
    }

    #[test]
    fn flood_fill_on_large_board() {
        let mut board = board_with_mines(600, 600, &[(599, 599)]);
        let mut state = RevealState::for_board(&board);

        reveal(&mut board, &mut state, 0, 0);
        assert!(win_condition(&board));
        assert_eq!(state.count(CellState::Revealed), 600 * 600 - 1);
    }

    #[test]
    fn flag_blocks_direct_reveal() {
        let mut board = board_with_mines(3, 3, &[(1, 1)]);
        let mut state = RevealState::for_board(&board);

        assert!(toggle_flag(&board, &mut state, 1, 1));
        assert_eq!(reveal(&mut board, &mut state, 1, 1), RevealResult::NoOp);
        assert!(toggle_flag(&board, &mut state, 1, 1));
        assert_eq!(state.get(board.index(1, 1)), Some(CellState::Hidden));
        assert_eq!(reveal(&mut board, &mut state, 1, 1), RevealResult::Exploded);
    }

    #[test]
    fn cascade_reveals_flagged_cells() {
        let mut board = board_with_mines(4, 4, &[(3, 3)]);
        let mut state = RevealState::for_board(&board);

        toggle_flag(&board, &mut state, 1, 0);
        reveal(&mut board, &mut state, 0, 0);

        assert_eq!(state.get(board.index(1, 0)), Some(CellState::Revealed));
        assert_eq!(state.count(CellState::Flagged), 0);
        assert!(win_condition(&board));
    }

    #[test]
    fn flag_ignores_revealed_and_out_of_range() {
        let mut board = board_with_mines(2, 2, &[(0, 0)]);
        let mut state = RevealState::for_board(&board);

        reveal(&mut board, &mut state, 1, 1);
        assert!(!toggle_flag(&board, &mut state, 1, 1));
        assert!(!toggle_flag(&board, &mut state, 5, 5));
        assert_eq!(state.count(CellState::Flagged), 0);
    }

    #[test]
    fn reveal_mines_skips_already_visible() {
        let mut board = board_with_mines(3, 3, &[(0, 0), (2, 2)]);
        let mut state = RevealState::for_board(&board);

        assert_eq!(reveal(&mut board, &mut state, 0, 0), RevealResult::Exploded);
        assert_eq!(reveal_mines(&board, &mut state), vec![(2, 2)]);
        assert_eq!(state.count(CellState::Revealed), 2);
        assert_eq!(board.remaining_safe(), 7);
    }

    #[test]
    fn place_mine_at_keeps_mines_unnumbered() {
        let board = board_with_mines(3, 1, &[(0, 0), (1, 0)]);
        assert_eq!(board.cells(), &[Cell::Mine, Cell::Mine, Cell::Empty(1)]);
    }

    #[test]
    fn distinct_placement_places_exact_count() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = create_board(5, 4, 12).unwrap();
            place_mines(&mut board, Placement::Distinct, &mut rng);

            assert_eq!(board.placed_mines(), 12);
            assert_eq!(board.remaining_safe(), 20 - 12);
        }
    }

    #[test]
    fn distinct_placement_can_fill_board() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = create_board(3, 3, 9).unwrap();
        place_mines(&mut board, Placement::Distinct, &mut rng);

        assert!(board.cells().iter().all(Cell::is_mine));
        assert!(win_condition(&board));
    }

    #[test]
    fn independent_placement_tolerates_duplicates() {
        let mut saw_duplicate = false;
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = create_board(3, 3, 6).unwrap();
            place_mines(&mut board, Placement::Independent, &mut rng);

            let placed = board.placed_mines();
            assert!(placed <= 6);
            assert!(board.remaining_safe() >= 9 - 6);
            assert_eq!(board.remaining_safe(), 9 - placed);
            saw_duplicate |= placed < 6;
        }
        assert!(saw_duplicate);
    }

    #[test]
    fn adjacency_matches_neighbouring_mines() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = create_board(9, 7, 15).unwrap();
            let placement = if seed % 2 == 0 {
                Placement::Distinct
            } else {
                Placement::Independent
            };
            place_mines(&mut board, placement, &mut rng);

            for y in 0..7 {
                for x in 0..9 {
                    if let Some(Cell::Empty(adjacent)) = board.cell(x, y) {
                        assert_eq!(adjacent, count_mines_around(&board, x, y));
                    }
                }
            }
        }
    }

    #[test]
    fn win_iff_every_safe_cell_revealed() {
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = create_board(6, 5, 7).unwrap();
            place_mines(&mut board, Placement::Distinct, &mut rng);
            let mut state = RevealState::for_board(&board);

            for y in 0..5 {
                for x in 0..6 {
                    if board.cell(x, y) == Some(Cell::Mine) {
                        continue;
                    }
                    let all_safe_revealed = board
                        .cells()
                        .iter()
                        .zip(state.states())
                        .all(|(cell, seen)| cell.is_mine() || *seen == CellState::Revealed);
                    assert_eq!(win_condition(&board), all_safe_revealed);
                    reveal(&mut board, &mut state, x, y);
                }
            }

            assert!(win_condition(&board));
            assert_eq!(state.count(CellState::Revealed), 30 - 7);
        }
    }
}

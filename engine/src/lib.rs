//! Minefield engine.
//!
//! A board is a flat row-major vector of [`Cell`]s (`index = x + y * width`).
//! Reveal/flag progress is kept apart from the cells in a [`RevealState`],
//! so the same board value can be inspected without caring what the player
//! has uncovered.
//!
//! ```
//! use minesweeper_engine::{RevealResult, create_board, place_mine_at, reveal, win_condition, RevealState};
//!
//! let mut board = create_board(2, 2, 1)?;
//! place_mine_at(&mut board, 0, 0);
//! let mut state = RevealState::for_board(&board);
//!
//! assert_eq!(reveal(&mut board, &mut state, 1, 1), RevealResult::Revealed(vec![(1, 1)]));
//! assert_eq!(board.remaining_safe(), 2);
//! assert!(!win_condition(&board));
//! # Ok::<(), minesweeper_engine::EngineError>(())
//! ```

mod data;
mod error;
mod logic;

pub use data::{Board, Cell, CellState, RevealState};
pub use error::EngineError;
pub use logic::{
    Placement, RevealResult, create_board, neighbours, place_mine_at, place_mines, reveal,
    reveal_mines, toggle_flag, win_condition,
};

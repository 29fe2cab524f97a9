#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Mine,
    /// Safe cell with the number of mines among its neighbours (0..=8).
    Empty(u8),
}

impl Cell {
    pub fn is_mine(&self) -> bool {
        matches!(self, Cell::Mine)
    }
}

/// Shape is fixed at creation; only cells and the safe counter change.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) mines: usize,
    pub(crate) remaining_safe: usize,
    pub(crate) cells: Vec<Cell>,
}

impl Board {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Mine count the board was created with.
    pub fn mine_count(&self) -> usize {
        self.mines
    }

    /// Mines actually on the board. Lower than [`Board::mine_count`] only
    /// when independent placement drew the same cell twice.
    pub fn placed_mines(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_mine()).count()
    }

    /// Safe cells not revealed yet.
    pub fn remaining_safe(&self) -> usize {
        self.remaining_safe
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if !self.contains(x, y) {
            return None;
        }
        self.cells.get(self.index(x, y)).copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

/// Per-cell player progress, indexed like [`Board::cells`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    pub(crate) cells: Vec<CellState>,
}

impl RevealState {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            cells: vec![CellState::Hidden; len],
        }
    }

    pub fn for_board(board: &Board) -> Self {
        Self::new(board.cells.len())
    }

    pub fn get(&self, index: usize) -> Option<CellState> {
        self.cells.get(index).copied()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.get(index) == Some(CellState::Revealed)
    }

    pub fn states(&self) -> &[CellState] {
        &self.cells
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }
}

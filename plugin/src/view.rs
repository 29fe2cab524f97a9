use std::collections::HashMap;

use minesweeper_common::{
    models::{Cell, Pos},
    protocol::{CellUpdate, PluginMessage},
};

/// Host-side copy of the board, rebuilt purely from plugin messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub board: Vec<Vec<Cell>>,
    pub game_over: bool,
    pub won: bool,
}

impl BoardView {
    /// Follows a message stream: `init` replaces the view, `update` patches
    /// it and `cleared` drops it. Anything else leaves it alone.
    pub fn track(view: &mut Option<Self>, message: &PluginMessage) {
        match message {
            PluginMessage::Init {
                width,
                height,
                mines,
                field,
            } => {
                *view = Some(Self {
                    width: *width,
                    height: *height,
                    mines: *mines,
                    board: field.clone(),
                    game_over: false,
                    won: false,
                })
            }
            PluginMessage::Update { updates, won, lost } => {
                if let Some(view) = view {
                    view.apply(updates, *won, *lost);
                }
            }
            PluginMessage::Cleared => *view = None,
            PluginMessage::Config { .. }
            | PluginMessage::Notice { .. }
            | PluginMessage::GameOver { .. } => {}
        }
    }

    pub fn apply(&mut self, updates: &[CellUpdate], won: bool, lost: bool) {
        for CellUpdate { pos, value } in updates {
            if let Some(cell) = self.cell_mut(*pos) {
                *cell = *value;
            }
        }
        self.won = won;
        self.game_over = won || lost;
    }

    /// Cell at `pos`, or `None` outside the announced shape.
    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        if pos.x >= self.width {
            return None;
        }
        self.board.get(pos.y)?.get(pos.x).copied()
    }

    fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        if pos.x >= self.width {
            return None;
        }
        self.board.get_mut(pos.y)?.get_mut(pos.x)
    }

    /// Number of cells in each display state.
    pub fn count_cells(&self) -> HashMap<&'static str, usize> {
        let mut counts = HashMap::new();
        for cell in self.board.iter().flatten() {
            let state = match cell {
                Cell::Hidden => "hidden",
                Cell::Flagged => "flagged",
                Cell::Revealed { .. } => "revealed",
                Cell::Mine => "mine",
            };
            *counts.entry(state).or_insert(0) += 1;
        }
        counts
    }

    /// One text line per row: `#` hidden, `F` flag, `*` mine, `.` empty,
    /// digits for numbered cells.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in &self.board {
            for cell in row {
                out.push(match cell {
                    Cell::Hidden => '#',
                    Cell::Flagged => 'F',
                    Cell::Mine => '*',
                    Cell::Revealed { adjacent: 0 } => '.',
                    Cell::Revealed { adjacent } => char::from(b'0' + (*adjacent).min(8)),
                });
            }
            out.push('\n');
        }
        out
    }
}

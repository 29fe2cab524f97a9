use serde::{Deserialize, Serialize};

pub const MIN_WIDTH: usize = 2;
pub const MIN_HEIGHT: usize = 2;
pub const MIN_MINES: usize = 1;

/// What the host is allowed to see of a cell.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "state")]
pub enum Cell {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    #[serde(rename = "mine")]
    Mine,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

/// A cell addressed either by coordinates or by its row-major index.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum CellAddress {
    Pos(Pos),
    Index(usize),
}

impl CellAddress {
    /// Resolves the address on a `width` x `height` board.
    /// Returns `None` when it falls outside the board.
    pub fn resolve(self, width: usize, height: usize) -> Option<Pos> {
        let pos = match self {
            CellAddress::Pos(pos) => pos,
            CellAddress::Index(index) => {
                if width == 0 {
                    return None;
                }
                Pos {
                    x: index % width,
                    y: index / width,
                }
            }
        };

        (pos.x < width && pos.y < height).then_some(pos)
    }
}

impl From<Pos> for CellAddress {
    fn from(pos: Pos) -> Self {
        CellAddress::Pos(pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameParams {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
}

impl GameParams {
    /// `None` when the board is too large to address.
    pub fn cells(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Mine count is the only constraint that depends on the other fields.
    pub fn mines_fit(&self, mines: usize) -> bool {
        self.cells().is_some_and(|cells| mines <= cells)
    }
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            width: MIN_WIDTH,
            height: MIN_HEIGHT,
            mines: MIN_MINES,
        }
    }
}

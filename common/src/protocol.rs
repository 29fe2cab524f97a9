use serde::{Deserialize, Serialize};

use crate::models::{Cell, CellAddress, Pos};

/// Input forwarded by the host: configuration edits, buttons and mouse clicks.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum HostEvent {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "set_width")]
    SetWidth { value: usize },
    #[serde(rename = "set_height")]
    SetHeight { value: usize },
    #[serde(rename = "set_mines")]
    SetMines { value: usize },
    #[serde(rename = "create")]
    Create,
    #[serde(rename = "reveal")]
    Reveal { cell: CellAddress },
    #[serde(rename = "flag")]
    Flag { cell: CellAddress },
    #[serde(rename = "end_game")]
    EndGame { retry: bool },
    #[serde(rename = "close")]
    Close,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub pos: Pos,
    pub value: Cell,
}

/// Everything the plugin asks the host to show.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PluginMessage {
    #[serde(rename = "config")]
    Config {
        width: usize,
        height: usize,
        mines: usize,
    },
    #[serde(rename = "init")]
    Init {
        width: usize,
        height: usize,
        mines: usize,
        field: Vec<Vec<Cell>>,
    },
    #[serde(rename = "update")]
    Update {
        updates: Vec<CellUpdate>,
        won: bool,
        lost: bool,
    },
    #[serde(rename = "notice")]
    Notice { text: String },
    /// Asks the player whether to retry; answered with `HostEvent::EndGame`.
    #[serde(rename = "game_over")]
    GameOver { won: bool, text: String },
    #[serde(rename = "cleared")]
    Cleared,
}

//! Types shared between the minesweeper plugin and the host that embeds it.
//!
//! `models` holds the board-level value types, `protocol` the messages that
//! cross the host/plugin boundary.

pub mod models;
pub mod protocol;

//! Minesweeper tab logic, independent of any particular host UI.
//!
//! The host forwards [`HostEvent`]s to [`MinesweeperPlugin::handle`] and
//! receives [`PluginMessage`]s through its [`Host`] implementation:
//!
//! ```rust
//! use minesweeper_plugin::{HostEvent, MinesweeperPlugin, Phase, PluginMessage};
//!
//! let mut plugin = MinesweeperPlugin::with_seed(Vec::<PluginMessage>::new(), 42);
//! plugin.handle(HostEvent::Open);
//! plugin.handle(HostEvent::SetWidth { value: 8 });
//! plugin.handle(HostEvent::SetHeight { value: 8 });
//! plugin.handle(HostEvent::SetMines { value: 10 });
//! plugin.handle(HostEvent::Create);
//!
//! assert_eq!(plugin.phase(), Phase::Playing);
//! assert!(matches!(plugin.host().last(), Some(PluginMessage::Init { width: 8, .. })));
//! ```
//!
//! [`BoardView`] is the other half: a host-side copy of the board rebuilt from
//! the messages alone.

mod host;
mod session;
mod view;

pub use host::Host;
pub use session::{INVALID_MINES_NUMBER, MinesweeperPlugin, Phase};
pub use view::BoardView;

// Re-export common types for convenience
pub use minesweeper_common::{models::*, protocol::*};
pub use minesweeper_engine::Placement;

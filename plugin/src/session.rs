use minesweeper_common::{
    models::{self, CellAddress, GameParams, MIN_HEIGHT, MIN_MINES, MIN_WIDTH, Pos},
    protocol::{CellUpdate, HostEvent, PluginMessage},
};
use minesweeper_engine::{
    Board, Cell, CellState, EngineError, Placement, RevealResult, RevealState, create_board,
    place_mines, reveal, reveal_mines, toggle_flag, win_condition,
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::host::Host;

pub const INVALID_MINES_NUMBER: &str = "Invalid Mines Number";

const WIN_TEXT: &str = "You Win. Retry?";
const LOSE_TEXT: &str = "You Lose. Retry?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuring,
    Playing,
    Won,
    Lost,
}

struct Game {
    board: Board,
    state: RevealState,
}

impl Game {
    fn view(&self, x: usize, y: usize) -> models::Cell {
        let index = self.board.index(x, y);
        match (self.board.cells()[index], self.state.states()[index]) {
            (_, CellState::Hidden) => models::Cell::Hidden,
            (_, CellState::Flagged) => models::Cell::Flagged,
            (Cell::Mine, CellState::Revealed) => models::Cell::Mine,
            (Cell::Empty(adjacent), CellState::Revealed) => models::Cell::Revealed { adjacent },
        }
    }

    fn updates(&self, positions: impl IntoIterator<Item = (usize, usize)>) -> Vec<CellUpdate> {
        positions
            .into_iter()
            .map(|(x, y)| CellUpdate {
                pos: Pos { x, y },
                value: self.view(x, y),
            })
            .collect()
    }

    fn init_message(&self) -> PluginMessage {
        let width = self.board.width();
        PluginMessage::Init {
            width,
            height: self.board.height(),
            mines: self.board.mine_count(),
            field: (0..self.board.height())
                .map(|y| (0..width).map(|x| self.view(x, y)).collect())
                .collect(),
        }
    }
}

/// One Minesweeper tab: its configuration fields and at most one live board.
pub struct MinesweeperPlugin<H: Host> {
    host: H,
    params: GameParams,
    placement: Placement,
    phase: Phase,
    game: Option<Game>,
    rng: StdRng,
}

impl<H: Host> MinesweeperPlugin<H> {
    pub fn new(host: H) -> Self {
        Self::with_rng(host, StdRng::from_rng(&mut rand::rng()))
    }

    /// Same mine layouts for the same seed.
    pub fn with_seed(host: H, seed: u64) -> Self {
        Self::with_rng(host, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(host: H, rng: StdRng) -> Self {
        Self {
            host,
            params: GameParams::default(),
            placement: Placement::default(),
            phase: Phase::Configuring,
            game: None,
            rng,
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn params(&self) -> GameParams {
        self.params
    }

    pub fn board(&self) -> Option<&Board> {
        self.game.as_ref().map(|game| &game.board)
    }

    pub fn reveal_state(&self) -> Option<&RevealState> {
        self.game.as_ref().map(|game| &game.state)
    }

    pub fn handle(&mut self, event: HostEvent) {
        debug!("Handling {:?} in {:?}", event, self.phase);

        match event {
            HostEvent::Open => self.open(),
            HostEvent::SetWidth { value } => self.set_width(value),
            HostEvent::SetHeight { value } => self.set_height(value),
            HostEvent::SetMines { value } => self.set_mines(value),
            HostEvent::Create => self.create_grid(),
            HostEvent::Reveal { cell } => self.reveal(cell),
            HostEvent::Flag { cell } => self.flag(cell),
            HostEvent::EndGame { retry } => self.end_game(retry),
            HostEvent::Close => self.close(),
        }
    }

    /// Tab opened: start over from the minimum configuration.
    pub fn open(&mut self) {
        info!("Opening minesweeper tab");
        self.params = GameParams::default();
        self.game = None;
        self.phase = Phase::Configuring;
        self.send_config();
    }

    pub fn set_width(&mut self, value: usize) {
        self.params.width = at_least(value, MIN_WIDTH, "width");
        self.send_config();
    }

    pub fn set_height(&mut self, value: usize) {
        self.params.height = at_least(value, MIN_HEIGHT, "height");
        self.send_config();
    }

    /// Keeps the previous count when the new one does not fit the board.
    pub fn set_mines(&mut self, value: usize) {
        let value = at_least(value, MIN_MINES, "mines");
        if self.validate_mines(value) {
            self.params.mines = value;
        }
        self.send_config();
    }

    /// Replaces any current board with a fresh one built from the configuration.
    pub fn create_grid(&mut self) {
        if !self.validate_mines(self.params.mines) {
            return;
        }

        let GameParams {
            width,
            height,
            mines,
        } = self.params;
        let mut board = match create_board(width, height, mines) {
            Ok(board) => board,
            Err(e) => {
                warn!("Refusing to create board: {}", e);
                self.send_notice(INVALID_MINES_NUMBER);
                return;
            }
        };
        place_mines(&mut board, self.placement, &mut self.rng);

        info!(
            "Created {}x{} board with {} mines ({} safe cells)",
            width,
            height,
            board.placed_mines(),
            board.remaining_safe()
        );

        let game = Game {
            state: RevealState::for_board(&board),
            board,
        };
        self.host.send(game.init_message());
        self.game = Some(game);
        self.phase = Phase::Playing;
    }

    pub fn reveal(&mut self, cell: CellAddress) {
        let Some((game, pos)) = self.playing_cell(cell) else {
            return;
        };

        match reveal(&mut game.board, &mut game.state, pos.x, pos.y) {
            RevealResult::NoOp => {}
            RevealResult::Exploded => {
                let mut shown = vec![(pos.x, pos.y)];
                shown.extend(reveal_mines(&game.board, &mut game.state));
                let updates = game.updates(shown);

                info!("Mine hit at ({}, {}), game lost", pos.x, pos.y);
                self.phase = Phase::Lost;
                self.host.send(PluginMessage::Update {
                    updates,
                    won: false,
                    lost: true,
                });
                self.send_game_over(false);
            }
            RevealResult::Revealed(cells) => {
                let updates = game.updates(cells);
                let won = win_condition(&game.board);

                self.host.send(PluginMessage::Update {
                    updates,
                    won,
                    lost: false,
                });
                if won {
                    info!("All safe cells revealed, game won");
                    self.phase = Phase::Won;
                    self.send_game_over(true);
                }
            }
        }
    }

    pub fn flag(&mut self, cell: CellAddress) {
        let Some((game, pos)) = self.playing_cell(cell) else {
            return;
        };

        if toggle_flag(&game.board, &mut game.state, pos.x, pos.y) {
            let updates = game.updates([(pos.x, pos.y)]);
            self.host.send(PluginMessage::Update {
                updates,
                won: false,
                lost: false,
            });
        }
    }

    /// Answer to the game-over prompt.
    pub fn end_game(&mut self, retry: bool) {
        if !matches!(self.phase, Phase::Won | Phase::Lost) {
            warn!("Ignoring end-of-game answer while {:?}", self.phase);
            return;
        }

        if retry {
            self.create_grid();
        } else {
            self.clear();
        }
    }

    /// Tab closed or plugin unloaded.
    pub fn close(&mut self) {
        info!("Closing minesweeper tab");
        self.game = None;
        self.phase = Phase::Configuring;
    }

    fn clear(&mut self) {
        self.game = None;
        self.phase = Phase::Configuring;
        self.host.send(PluginMessage::Cleared);
    }

    fn playing_cell(&mut self, cell: CellAddress) -> Option<(&mut Game, Pos)> {
        if self.phase != Phase::Playing {
            debug!("Ignoring cell input while {:?}", self.phase);
            return None;
        }

        let game = self.game.as_mut()?;
        let pos = cell.resolve(game.board.width(), game.board.height())?;
        Some((game, pos))
    }

    fn validate_mines(&mut self, mines: usize) -> bool {
        if self.params.mines_fit(mines) {
            return true;
        }

        let error = match self.params.cells() {
            Some(cells) => EngineError::InvalidMinesNumber { mines, cells },
            None => EngineError::BoardTooLarge {
                width: self.params.width,
                height: self.params.height,
            },
        };
        warn!("Rejected configuration: {}", error);
        self.send_notice(INVALID_MINES_NUMBER);
        false
    }

    fn send_config(&mut self) {
        let GameParams {
            width,
            height,
            mines,
        } = self.params;
        self.host.send(PluginMessage::Config {
            width,
            height,
            mines,
        });
    }

    fn send_notice(&mut self, text: &str) {
        self.host.send(PluginMessage::Notice {
            text: text.to_string(),
        });
    }

    fn send_game_over(&mut self, won: bool) {
        let text = if won { WIN_TEXT } else { LOSE_TEXT };
        self.host.send(PluginMessage::GameOver {
            won,
            text: text.to_string(),
        });
    }
}

fn at_least(value: usize, min: usize, field: &str) -> usize {
    if value < min {
        warn!("Raising {} from {} to the minimum of {}", field, value, min);
        return min;
    }
    value
}

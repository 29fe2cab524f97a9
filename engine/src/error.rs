use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid mines number: {mines} mines do not fit in {cells} cells")]
    InvalidMinesNumber { mines: usize, cells: usize },
    #[error("board too large: {width}x{height} cells cannot be addressed")]
    BoardTooLarge { width: usize, height: usize },
}

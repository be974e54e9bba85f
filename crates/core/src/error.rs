use thiserror::Error;

use crate::{Square, Team};

/// Errors that can occur while setting up or playing a game
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Square ({col}, {row}) is outside the {width}x{height} board")]
    OutOfRangeSquare {
        col: i32,
        row: i32,
        width: u8,
        height: u8,
    },

    #[error("Game is already over: {winner} won")]
    MoveAfterGameOver { winner: Team },

    #[error("Square {0} is already occupied")]
    Occupied(Square),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience Result type for board and session operations
pub type Result<T> = std::result::Result<T, GameError>;

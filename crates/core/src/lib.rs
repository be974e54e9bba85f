//! tilechess core - board state and move-oracle abstraction
//!
//! This crate holds the data model shared by the move engine and any
//! presentation shell: squares, pieces, the authoritative board state and
//! the [`MoveOracle`] capability that per-piece move rules implement.
//!
//! # Types
//!
//! - [`BoardState`] - Occupancy grid, side to move and captured rosters
//! - [`MoveOracle`] - Trait for per-archetype move generation
//! - [`GameError`] - Error taxonomy for board and session operations

mod board;
mod error;
mod oracle;
mod piece;
mod square;

pub use board::{BoardState, CapturedRoster};
pub use error::{GameError, Result};
pub use oracle::MoveOracle;
pub use piece::{Archetype, Piece, PieceId, Team};
pub use square::{BoardSize, Square};

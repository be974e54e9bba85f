//! tilechess - turn-based move engine
//!
//! This crate runs a two-player game on top of the board state from
//! `tilechess_core`: it asks a per-archetype oracle where a selected piece
//! may go, validates and applies moves, resolves captures, alternates turns
//! and detects the end of the game (king captured or a team eliminated).
//!
//! # Example
//!
//! ```
//! use tilechess::{GameSession, MoveResult, SessionConfig};
//! use tilechess_core::{Square, Team};
//!
//! let mut session = GameSession::new(&SessionConfig::classic()).unwrap();
//! let from = Square::new(4, 1);
//! let destinations = session.on_piece_selected(from).unwrap();
//! assert!(destinations.contains(&Square::new(4, 3)));
//!
//! let result = session.on_move_attempt(from, Square::new(4, 3)).unwrap();
//! assert!(matches!(result, MoveResult::Applied(_)));
//! assert_eq!(session.active_team(), Team::Black);
//! ```

mod config;
mod layout;
mod movegen;
mod session;

pub use config::SessionConfig;
pub use layout::{Layout, LayoutKind};
pub use movegen::{OracleTable, StandardOracle};
pub use session::{GameSession, IllegalMove, MoveReport, MoveResult, Outcome, SessionEvent};

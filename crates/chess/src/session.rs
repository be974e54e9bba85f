//! The move engine: selection, validation, capture, turn order and
//! end-of-game detection for one game.

use std::fmt;

use serde::{Deserialize, Serialize};
use tilechess_core::{
    Archetype, BoardState, GameError, MoveOracle, Piece, PieceId, Result, Square, Team,
};
use tracing::{debug, info};

use crate::{OracleTable, SessionConfig};

/// Whether the game is still running
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won(Team),
}

impl Outcome {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Outcome::Won(_))
    }

    pub const fn winner(self) -> Option<Team> {
        match self {
            Outcome::InProgress => None,
            Outcome::Won(team) => Some(team),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "in progress"),
            Outcome::Won(team) => write!(f, "{} wins", team),
        }
    }
}

/// Why a move attempt was rejected
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum IllegalMove {
    /// No piece on the source square
    EmptySource,
    /// The piece belongs to the team that is not on move
    NotYourTurn,
    /// The source square was not the last piece selected
    NotSelected,
    /// The destination is not among the selected piece's destinations
    NotInLegalSet,
    /// The destination holds a piece of the mover's own team
    FriendlyFire,
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            IllegalMove::EmptySource => "no piece on the source square",
            IllegalMove::NotYourTurn => "that piece is not on move",
            IllegalMove::NotSelected => "piece was not selected first",
            IllegalMove::NotInLegalSet => "destination is not reachable",
            IllegalMove::FriendlyFire => "destination holds a friendly piece",
        };
        write!(f, "{}", msg)
    }
}

/// Summary of an applied move
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveReport {
    pub piece: PieceId,
    pub archetype: Archetype,
    pub team: Team,
    pub from: Square,
    pub to: Square,
    /// The enemy piece taken off the board, if any
    pub captured: Option<Piece>,
    /// Outcome after the move
    pub outcome: Outcome,
    /// True if this move ended the game
    pub outcome_changed: bool,
}

/// Result of a move attempt
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MoveResult {
    Applied(MoveReport),
    Illegal(IllegalMove),
}

impl MoveResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveResult::Applied(_))
    }

    pub fn report(&self) -> Option<&MoveReport> {
        match self {
            MoveResult::Applied(report) => Some(report),
            MoveResult::Illegal(_) => None,
        }
    }
}

/// Notifications for a presentation shell, drained with [`GameSession::take_events`]
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SessionEvent {
    /// A piece left the board; it is the newest entry of its team's roster
    Captured(Piece),
    OutcomeChanged(Outcome),
    Reset,
}

/// Destinations computed when a piece was picked up
#[derive(Clone, Debug)]
struct Selection {
    from: Square,
    destinations: Vec<Square>,
}

/// The piece a validated move will carry
#[derive(Clone, Copy, Debug)]
struct Mover {
    id: PieceId,
    archetype: Archetype,
    team: Team,
}

/// One game: the board, the move rules and the outcome.
///
/// The session owns its board exclusively; shells read it through
/// [`GameSession::board`] and change it only through move attempts and
/// resets.
#[derive(Debug)]
pub struct GameSession {
    /// Position restored by [`GameSession::reset_game`]
    initial: BoardState,
    board: BoardState,
    oracles: OracleTable,
    enforce_turns: bool,
    outcome: Outcome,
    selection: Option<Selection>,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Start a game with the standard move rules
    pub fn new(config: &SessionConfig) -> Result<Self> {
        Self::with_oracles(config, OracleTable::standard())
    }

    /// Start a game with a custom oracle table
    pub fn with_oracles(config: &SessionConfig, oracles: OracleTable) -> Result<Self> {
        config.validate()?;
        let board = config.layout().populate(config.board)?;
        Ok(Self::from_board(board, oracles, config.enforce_turns))
    }

    /// Start a game from an arbitrary position.
    ///
    /// Play continues from `board` as given. Resetting returns to its pieces
    /// with both rosters empty and White to move.
    pub fn from_board(board: BoardState, oracles: OracleTable, enforce_turns: bool) -> Self {
        let outcome = elimination_winner(&board).map_or(Outcome::InProgress, Outcome::Won);
        GameSession {
            initial: board.without_history(),
            board,
            oracles,
            enforce_turns,
            outcome,
            selection: None,
            events: Vec::new(),
        }
    }

    /// Read-only view of the current position
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn active_team(&self) -> Team {
        self.board.active_team()
    }

    pub fn enforces_turns(&self) -> bool {
        self.enforce_turns
    }

    /// Replace the move rule for one archetype. Drops any current selection.
    pub fn register_oracle(&mut self, archetype: Archetype, oracle: impl MoveOracle + 'static) {
        self.oracles.register(archetype, oracle);
        self.selection = None;
    }

    /// Destinations for the piece on `square`, straight from its oracle.
    ///
    /// Empty when the square is empty. Does not record a selection.
    pub fn legal_destinations(&self, square: Square) -> Result<Vec<Square>> {
        let square = self.board.size().validate(square)?;
        Ok(match self.board.piece_at(square) {
            Some(piece) => self.oracles.generate_moves(piece, &self.board),
            None => Vec::new(),
        })
    }

    /// Pick up the piece on `square` and return where it may go.
    ///
    /// The returned destinations become the legality check for the next
    /// [`GameSession::attempt_move`]. Selecting an empty square, a piece of
    /// the side not on move (when turns are enforced) or anything after the
    /// game has ended yields no destinations and clears the selection.
    pub fn on_piece_selected(&mut self, square: Square) -> Result<Vec<Square>> {
        let square = self.board.size().validate(square)?;
        self.selection = None;

        if self.outcome.is_terminal() {
            return Ok(Vec::new());
        }
        let Some(piece) = self.board.piece_at(square) else {
            return Ok(Vec::new());
        };
        if self.enforce_turns && piece.team() != self.board.active_team() {
            debug!(%square, team = %piece.team(), "selection ignored, not on move");
            return Ok(Vec::new());
        }

        let destinations = self.oracles.generate_moves(piece, &self.board);
        debug!(%square, piece = %piece.archetype(), count = destinations.len(), "piece selected");
        self.selection = Some(Selection {
            from: square,
            destinations: destinations.clone(),
        });
        Ok(destinations)
    }

    /// The selected square and its destinations, if a piece is picked up
    pub fn selection(&self) -> Option<(Square, &[Square])> {
        self.selection
            .as_ref()
            .map(|s| (s.from, s.destinations.as_slice()))
    }

    /// Put the selected piece back without moving
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Same as [`GameSession::attempt_move`]
    pub fn on_move_attempt(&mut self, from: Square, to: Square) -> Result<MoveResult> {
        self.attempt_move(from, to)
    }

    /// Try to move the selected piece from `from` to `to`.
    ///
    /// Legality is decided by the destinations recorded at selection time.
    /// Every attempt consumes the selection. A rejected attempt leaves the
    /// board untouched; an applied one captures, moves, flips the turn and
    /// re-evaluates the outcome.
    ///
    /// # Errors
    /// - [`GameError::OutOfRangeSquare`] if either square is off the board
    /// - [`GameError::MoveAfterGameOver`] once a team has won
    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<MoveResult> {
        let size = self.board.size();
        let from = size.validate(from)?;
        let to = size.validate(to)?;
        if let Outcome::Won(winner) = self.outcome {
            return Err(GameError::MoveAfterGameOver { winner });
        }

        let selection = self.selection.take();
        match self.check_move(selection.as_ref(), from, to) {
            Ok(mover) => Ok(MoveResult::Applied(self.apply(mover, from, to))),
            Err(reason) => {
                debug!(%from, %to, %reason, "move rejected");
                Ok(MoveResult::Illegal(reason))
            }
        }
    }

    fn check_move(
        &self,
        selection: Option<&Selection>,
        from: Square,
        to: Square,
    ) -> std::result::Result<Mover, IllegalMove> {
        let mover = self.board.piece_at(from).ok_or(IllegalMove::EmptySource)?;
        if self.enforce_turns && mover.team() != self.board.active_team() {
            return Err(IllegalMove::NotYourTurn);
        }
        let selection = selection
            .filter(|s| s.from == from)
            .ok_or(IllegalMove::NotSelected)?;
        if !selection.destinations.contains(&to) {
            return Err(IllegalMove::NotInLegalSet);
        }
        if self
            .board
            .piece_at(to)
            .is_some_and(|target| target.team() == mover.team())
        {
            return Err(IllegalMove::FriendlyFire);
        }
        Ok(Mover {
            id: mover.id(),
            archetype: mover.archetype(),
            team: mover.team(),
        })
    }

    /// Applies a move that passed [`GameSession::check_move`]
    fn apply(&mut self, mover: Mover, from: Square, to: Square) -> MoveReport {
        let before = self.outcome;
        let Mover {
            id: piece,
            archetype,
            team,
        } = mover;

        let captured = self.board.remove(to);
        if let Some(victim) = &captured {
            info!(%team, captured = %victim, "capture");
            self.board.record_capture(victim.clone());
            self.events.push(SessionEvent::Captured(victim.clone()));
            if victim.is_king() && !self.outcome.is_terminal() {
                self.outcome = Outcome::Won(team);
            }
        }

        self.board.relocate(from, to);
        self.board.flip_turn();

        if !self.outcome.is_terminal() {
            if let Some(winner) = elimination_winner(&self.board) {
                self.outcome = Outcome::Won(winner);
            }
        }

        let outcome_changed = self.outcome != before;
        if outcome_changed {
            info!(outcome = %self.outcome, "game over");
            self.events.push(SessionEvent::OutcomeChanged(self.outcome));
        }
        debug!(%from, %to, %archetype, %team, "move applied");

        MoveReport {
            piece,
            archetype,
            team,
            from,
            to,
            captured,
            outcome: self.outcome,
            outcome_changed,
        }
    }

    /// Restore the starting position: both rosters empty, White to move,
    /// game in progress.
    pub fn reset_game(&mut self) {
        self.board = self.initial.clone();
        self.outcome = elimination_winner(&self.board).map_or(Outcome::InProgress, Outcome::Won);
        self.selection = None;
        self.events.push(SessionEvent::Reset);
        info!(pieces = self.board.pieces().count(), "game reset");
    }

    /// Drain notifications produced since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

/// The winner if one team has no pieces left
fn elimination_winner(board: &BoardState) -> Option<Team> {
    Team::ALL
        .into_iter()
        .find(|&team| board.piece_count(team) == 0)
        .map(Team::opposite)
}

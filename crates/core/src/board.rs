//! Authoritative board state: occupancy, side to move and captured rosters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BoardSize, Piece, PieceId, Square, Team};

/// Pieces a team has lost, in the order they were captured.
#[derive(Clone, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct CapturedRoster {
    pieces: Vec<Piece>,
}

impl CapturedRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn as_slice(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.iter().any(|p| p.id() == id)
    }

    /// Off-board placement slot of a captured piece, counting from 1.
    ///
    /// A shell lines captured pieces up beside the board, spacing each one
    /// by its slot.
    pub fn slot_of(&self, id: PieceId) -> Option<usize> {
        self.pieces.iter().position(|p| p.id() == id).map(|i| i + 1)
    }

    fn push(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }
}

/// The board grid plus the bookkeeping that goes with it.
///
/// Invariant: every square holds at most one piece, and a piece's recorded
/// square always matches the cell it sits in.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BoardState {
    size: BoardSize,
    /// Row-major cells, `size.area()` long
    cells: Vec<Option<Piece>>,
    active_team: Team,
    /// Captured pieces indexed by the team that lost them
    rosters: [CapturedRoster; 2],
}

impl BoardState {
    /// Create an empty board with White to move
    pub fn new(size: BoardSize) -> Self {
        BoardState {
            size,
            cells: vec![None; size.area()],
            active_team: Team::White,
            rosters: [CapturedRoster::new(), CapturedRoster::new()],
        }
    }

    /// The same pieces on squares of a fresh board: both rosters empty and
    /// White to move. Pieces keep their move counters.
    pub fn without_history(&self) -> Self {
        BoardState {
            size: self.size,
            cells: self.cells.clone(),
            active_team: Team::White,
            rosters: [CapturedRoster::new(), CapturedRoster::new()],
        }
    }

    #[inline]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Returns the piece on `square`.
    ///
    /// # Panics
    /// Panics if `square` is not on this board. Every producer of squares
    /// (oracles, input shells) is expected to stay in range.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.cells[self.checked_index(square)].as_ref()
    }

    /// Like [`BoardState::piece_at`], but returns None for off-board squares
    pub fn get(&self, square: Square) -> Option<&Piece> {
        if self.size.contains(square) {
            self.cells[self.size.index(square)].as_ref()
        } else {
            None
        }
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Puts `piece` on `square`, returning whatever was there before.
    ///
    /// The displaced occupant is handed back untouched; capture bookkeeping is
    /// the caller's job.
    pub fn place(&mut self, mut piece: Piece, square: Square) -> Option<Piece> {
        let idx = self.checked_index(square);
        piece.set_square(square);
        self.cells[idx].replace(piece)
    }

    /// Clears `square` and returns its occupant
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let idx = self.checked_index(square);
        self.cells[idx].take()
    }

    /// Moves the piece on `from` to `to` and counts the move.
    ///
    /// Returns the piece displaced from `to`, if any. Does nothing when
    /// `from` is empty or equal to `to`.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        if from == to {
            return None;
        }
        let mut piece = self.remove(from)?;
        piece.count_move();
        self.place(piece, to)
    }

    /// The team that moves next
    #[inline]
    pub fn active_team(&self) -> Team {
        self.active_team
    }

    pub fn flip_turn(&mut self) {
        self.active_team = self.active_team.opposite();
    }

    /// Pieces `team` has lost so far
    pub fn roster(&self, team: Team) -> &CapturedRoster {
        &self.rosters[team.index()]
    }

    /// Files a captured piece under the roster of the team that lost it
    pub fn record_capture(&mut self, piece: Piece) {
        self.rosters[piece.team().index()].push(piece);
    }

    /// Iterator over every piece on the board, row by row
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    pub fn pieces_of(&self, team: Team) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |p| p.team() == team)
    }

    pub fn piece_count(&self, team: Team) -> usize {
        self.pieces_of(team).count()
    }

    /// Finds a piece on the board by identity
    pub fn find(&self, id: PieceId) -> Option<&Piece> {
        self.pieces().find(|p| p.id() == id)
    }

    fn checked_index(&self, square: Square) -> usize {
        assert!(
            self.size.contains(square),
            "square {:?} is outside the {} board",
            square,
            self.size
        );
        self.size.index(square)
    }
}

/// Renders the top row first, with row numbers on the left and column
/// numbers (mod 10) underneath.
impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.size.height).rev() {
            write!(f, "{:>3} ", row)?;
            for col in 0..self.size.width {
                match self.get(Square::new(col, row)) {
                    Some(piece) => write!(f, "{}", piece.to_char())?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "    ")?;
        for col in 0..self.size.width {
            write!(f, "{}", col % 10)?;
        }
        writeln!(f)
    }
}

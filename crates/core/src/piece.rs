use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Square;

/// One of the two sides of a game
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Team {
    White = 0,
    Black = 1,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::White, Team::Black];

    /// Returns the opposing team
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// Returns the team id (0 for White, 1 for Black)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction pawns of this team advance along the row axis
    #[inline]
    pub const fn forward(self) -> i32 {
        match self {
            Team::White => 1,
            Team::Black => -1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::White => write!(f, "White"),
            Team::Black => write!(f, "Black"),
        }
    }
}

/// The kind of a piece, which selects its move-generation rule
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Archetype {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Pawn,
        Archetype::Knight,
        Archetype::Bishop,
        Archetype::Rook,
        Archetype::Queen,
        Archetype::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Letter used in text renderings (uppercase)
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Archetype::Pawn => 'P',
            Archetype::Knight => 'N',
            Archetype::Bishop => 'B',
            Archetype::Rook => 'R',
            Archetype::Queen => 'Q',
            Archetype::King => 'K',
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Stable identity of a piece within one game
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece in play or in a captured roster.
///
/// The square and move counter are only changed by
/// [`BoardState`](crate::BoardState) when the piece is placed or moved.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    archetype: Archetype,
    team: Team,
    square: Square,
    moves_made: u16,
}

impl Piece {
    /// Creates a piece that has not moved yet
    pub const fn new(id: PieceId, archetype: Archetype, team: Team, square: Square) -> Self {
        Piece {
            id,
            archetype,
            team,
            square,
            moves_made: 0,
        }
    }

    #[inline]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    #[inline]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// The square this piece occupies (or last occupied, once captured)
    #[inline]
    pub const fn square(&self) -> Square {
        self.square
    }

    /// Number of moves this piece has made since setup
    #[inline]
    pub const fn moves_made(&self) -> u16 {
        self.moves_made
    }

    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.moves_made > 0
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        self.archetype == Archetype::King
    }

    /// Letter for text renderings: uppercase for White, lowercase for Black
    pub const fn to_char(&self) -> char {
        let c = self.archetype.to_char();
        match self.team {
            Team::White => c,
            Team::Black => c.to_ascii_lowercase(),
        }
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    pub(crate) fn count_move(&mut self) {
        self.moves_made = self.moves_made.saturating_add(1);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}", self.team, self.archetype, self.square)
    }
}

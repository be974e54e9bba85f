//! Initial piece placements.

use serde::{Deserialize, Serialize};
use tilechess_core::{Archetype, BoardSize, BoardState, GameError, Piece, PieceId, Result, Square, Team};

/// Which starting arrangement to set up
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// The standard 32-piece set on an 8x8 area
    #[default]
    Classic,
    /// The 29-a-side pawn/rook/bishop formation for a 30x30 board, without kings
    Formation,
}

/// White's back rank in the classic set, by column
const CLASSIC_BACK_RANK: [Archetype; 8] = [
    Archetype::Rook,
    Archetype::Knight,
    Archetype::Bishop,
    Archetype::Queen,
    Archetype::King,
    Archetype::Bishop,
    Archetype::Knight,
    Archetype::Rook,
];

/// White's half of the formation as (col, row, archetype), relative to the
/// layout anchor. Black mirrors it across the formation's middle row.
const FORMATION_WHITE: [(u8, u8, Archetype); 29] = [
    (0, 1, Archetype::Pawn),
    (1, 1, Archetype::Pawn),
    (2, 1, Archetype::Pawn),
    (3, 2, Archetype::Pawn),
    (4, 2, Archetype::Pawn),
    (5, 2, Archetype::Pawn),
    (6, 2, Archetype::Pawn),
    (7, 3, Archetype::Pawn),
    (8, 3, Archetype::Pawn),
    (9, 3, Archetype::Pawn),
    (10, 2, Archetype::Pawn),
    (11, 2, Archetype::Pawn),
    (12, 2, Archetype::Pawn),
    (13, 2, Archetype::Pawn),
    (14, 1, Archetype::Pawn),
    (15, 1, Archetype::Pawn),
    (16, 1, Archetype::Pawn),
    (3, 1, Archetype::Bishop),
    (4, 0, Archetype::Rook),
    (5, 1, Archetype::Rook),
    (6, 0, Archetype::Bishop),
    (7, 2, Archetype::Bishop),
    (8, 1, Archetype::Bishop),
    (8, 2, Archetype::Rook),
    (9, 2, Archetype::Bishop),
    (10, 0, Archetype::Bishop),
    (11, 1, Archetype::Rook),
    (12, 0, Archetype::Rook),
    (13, 1, Archetype::Bishop),
];

/// Rows spanned by the formation, white back row to black back row
const FORMATION_HEIGHT: u8 = 13;
const FORMATION_WIDTH: u8 = 17;

/// A starting arrangement anchored at a square of the board.
///
/// The anchor is the bottom-left corner of the area the arrangement covers,
/// so a layout can sit anywhere on an oversized board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Layout {
    pub kind: LayoutKind,
    pub anchor: Square,
}

impl Layout {
    pub const fn new(kind: LayoutKind, anchor: Square) -> Self {
        Layout { kind, anchor }
    }

    /// Classic set in the bottom-left corner
    pub const fn classic() -> Self {
        Self::new(LayoutKind::Classic, Square::new(0, 0))
    }

    /// Formation at the position it occupies on a 30x30 board
    pub const fn formation() -> Self {
        Self::new(LayoutKind::Formation, Square::new(3, 8))
    }

    /// Width and height of the area the arrangement covers
    pub const fn footprint(&self) -> (u8, u8) {
        match self.kind {
            LayoutKind::Classic => (8, 8),
            LayoutKind::Formation => (FORMATION_WIDTH, FORMATION_HEIGHT),
        }
    }

    /// Number of pieces the arrangement places per team
    pub fn pieces_per_team(&self) -> usize {
        match self.kind {
            LayoutKind::Classic => 16,
            LayoutKind::Formation => FORMATION_WHITE.len(),
        }
    }

    /// Checks that the whole arrangement fits on a board of `size`
    pub fn check_fits(&self, size: BoardSize) -> Result<()> {
        let (width, height) = self.footprint();
        let right = self.anchor.col as u32 + width as u32;
        let top = self.anchor.row as u32 + height as u32;
        if right > size.width as u32 || top > size.height as u32 {
            return Err(GameError::InvalidConfig(format!(
                "{:?} layout anchored at {} needs {}x{} squares, board is {}",
                self.kind, self.anchor, width, height, size
            )));
        }
        Ok(())
    }

    /// Placements as (archetype, team, square), White first.
    /// Only valid once [`Layout::check_fits`] has passed.
    fn placements(&self) -> Vec<(Archetype, Team, Square)> {
        let mut out = Vec::with_capacity(self.pieces_per_team() * 2);
        let (_, height) = self.footprint();
        let at = |col: u8, row: u8| Square::new(self.anchor.col + col, self.anchor.row + row);

        match self.kind {
            LayoutKind::Classic => {
                for (team, back, pawns) in [(Team::White, 0, 1), (Team::Black, 7, 6)] {
                    for (col, &archetype) in CLASSIC_BACK_RANK.iter().enumerate() {
                        out.push((archetype, team, at(col as u8, back)));
                    }
                    for col in 0..8 {
                        out.push((Archetype::Pawn, team, at(col, pawns)));
                    }
                }
            }
            LayoutKind::Formation => {
                for &(col, row, archetype) in &FORMATION_WHITE {
                    out.push((archetype, Team::White, at(col, row)));
                }
                for &(col, row, archetype) in &FORMATION_WHITE {
                    out.push((archetype, Team::Black, at(col, height - 1 - row)));
                }
            }
        }
        out
    }

    /// Builds a fresh board of `size` with this arrangement on it and White to move
    pub fn populate(&self, size: BoardSize) -> Result<BoardState> {
        self.check_fits(size)?;
        let mut board = BoardState::new(size);
        for (i, (archetype, team, square)) in self.placements().into_iter().enumerate() {
            let piece = Piece::new(PieceId(i as u16), archetype, team, square);
            if board.place(piece, square).is_some() {
                return Err(GameError::Occupied(square));
            }
        }
        Ok(board)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::classic()
    }
}

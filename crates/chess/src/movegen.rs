//! Standard move generation, one rule per archetype.
//!
//! Check is not considered. The standard rules never list a square held by
//! the mover's own team, though the engine does not rely on that.

use std::fmt;

use tilechess_core::{Archetype, BoardState, MoveOracle, Piece, Square};

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// The built-in move rule for each archetype
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StandardOracle {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl StandardOracle {
    pub const fn for_archetype(archetype: Archetype) -> Self {
        match archetype {
            Archetype::Pawn => StandardOracle::Pawn,
            Archetype::Knight => StandardOracle::Knight,
            Archetype::Bishop => StandardOracle::Bishop,
            Archetype::Rook => StandardOracle::Rook,
            Archetype::Queen => StandardOracle::Queen,
            Archetype::King => StandardOracle::King,
        }
    }
}

impl MoveOracle for StandardOracle {
    fn generate_moves(&self, piece: &Piece, board: &BoardState) -> Vec<Square> {
        let mut moves = Vec::with_capacity(32);
        match self {
            StandardOracle::Pawn => pawn_moves(piece, board, &mut moves),
            StandardOracle::Knight => step_moves(piece, board, &KNIGHT_JUMPS, &mut moves),
            StandardOracle::Bishop => slide_moves(piece, board, &DIAGONAL, &mut moves),
            StandardOracle::Rook => slide_moves(piece, board, &ORTHOGONAL, &mut moves),
            StandardOracle::Queen => {
                slide_moves(piece, board, &ORTHOGONAL, &mut moves);
                slide_moves(piece, board, &DIAGONAL, &mut moves);
            }
            StandardOracle::King => {
                step_moves(piece, board, &ORTHOGONAL, &mut moves);
                step_moves(piece, board, &DIAGONAL, &mut moves);
            }
        }
        moves
    }
}

/// Single push onto an empty square, double push on the pawn's first move,
/// diagonal steps only onto enemy pieces.
fn pawn_moves(piece: &Piece, board: &BoardState, moves: &mut Vec<Square>) {
    let size = board.size();
    let from = piece.square();
    let forward = piece.team().forward();

    if let Some(one) = from.offset(0, forward, size) {
        if board.is_empty(one) {
            moves.push(one);
            if !piece.has_moved() {
                if let Some(two) = from.offset(0, 2 * forward, size) {
                    if board.is_empty(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for side in [-1, 1] {
        if let Some(to) = from.offset(side, forward, size) {
            if board
                .get(to)
                .is_some_and(|target| target.team() != piece.team())
            {
                moves.push(to);
            }
        }
    }
}

/// Walk each ray until the edge or the first piece; an enemy blocker is capturable
fn slide_moves(
    piece: &Piece,
    board: &BoardState,
    directions: &[(i32, i32)],
    moves: &mut Vec<Square>,
) {
    let size = board.size();
    for &(dc, dr) in directions {
        let mut current = piece.square();
        while let Some(next) = current.offset(dc, dr, size) {
            match board.get(next) {
                None => moves.push(next),
                Some(blocker) => {
                    if blocker.team() != piece.team() {
                        moves.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
}

fn step_moves(piece: &Piece, board: &BoardState, steps: &[(i32, i32)], moves: &mut Vec<Square>) {
    let size = board.size();
    for &(dc, dr) in steps {
        if let Some(to) = piece.square().offset(dc, dr, size) {
            if board.get(to).map_or(true, |target| target.team() != piece.team()) {
                moves.push(to);
            }
        }
    }
}

/// Lookup table from archetype to the oracle that moves it.
///
/// Starts with the [`StandardOracle`] for every archetype; individual rules
/// can be swapped with [`OracleTable::register`].
pub struct OracleTable {
    oracles: [Box<dyn MoveOracle>; 6],
}

impl OracleTable {
    /// Table using the built-in rule for every archetype
    pub fn standard() -> Self {
        OracleTable {
            oracles: Archetype::ALL.map(|a| {
                Box::new(StandardOracle::for_archetype(a)) as Box<dyn MoveOracle>
            }),
        }
    }

    /// Replace the rule used for `archetype`
    pub fn register(&mut self, archetype: Archetype, oracle: impl MoveOracle + 'static) {
        self.oracles[archetype.index()] = Box::new(oracle);
    }

    /// Builder form of [`OracleTable::register`]
    pub fn with(mut self, archetype: Archetype, oracle: impl MoveOracle + 'static) -> Self {
        self.register(archetype, oracle);
        self
    }

    pub fn oracle(&self, archetype: Archetype) -> &dyn MoveOracle {
        self.oracles[archetype.index()].as_ref()
    }

    /// Destinations for `piece` according to the oracle of its archetype
    pub fn generate_moves(&self, piece: &Piece, board: &BoardState) -> Vec<Square> {
        self.oracle(piece.archetype()).generate_moves(piece, board)
    }
}

impl Default for OracleTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for OracleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleTable").finish_non_exhaustive()
    }
}

use crate::{BoardState, Piece, Square};

/// A move-generation rule for one kind of piece.
///
/// Given a piece and the board it stands on, an oracle lists the squares the
/// piece may move to. Check is ignored. The board's width and height come
/// from [`BoardState::size`].
///
/// Contract:
/// - Pure: the same piece and board always yield the same squares.
/// - Every returned square lies on the board.
/// - The result may include squares held by the piece's own team; the move
///   engine rejects those itself.
pub trait MoveOracle: Send + Sync {
    /// Returns the destinations reachable by `piece` on `board`
    fn generate_moves(&self, piece: &Piece, board: &BoardState) -> Vec<Square>;
}

impl<F> MoveOracle for F
where
    F: Fn(&Piece, &BoardState) -> Vec<Square> + Send + Sync,
{
    fn generate_moves(&self, piece: &Piece, board: &BoardState) -> Vec<Square> {
        self(piece, board)
    }
}

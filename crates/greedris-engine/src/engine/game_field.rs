use crate::{
    CompletePieceDropError,
    core::{
        action::MoveSequence,
        bit_board::BitBoard,
        piece::{Piece, PieceKind},
    },
};

use super::{
    move_rules::MoveRules,
    piece_buffer::{PieceBuffer, PieceSeed},
};

/// Board, falling piece, and upcoming pieces of one game.
///
/// The falling piece always sits at its spawn position: a turn is played by handing a whole
/// [`MoveSequence`] to [`Self::complete_move_sequence`].
#[derive(Debug, Clone)]
pub struct GameField {
    board: BitBoard,
    falling_piece: Piece,
    piece_buffer: PieceBuffer,
}

impl GameField {
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut piece_buffer = PieceBuffer::with_seed(seed);
        let falling_piece = Piece::new(piece_buffer.pop_next());
        Self {
            board: BitBoard::INITIAL,
            falling_piece,
            piece_buffer,
        }
    }

    #[must_use]
    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_buffer.next_pieces()
    }

    /// Plays the falling piece through `moves`, locks it, clears filled rows, and spawns the
    /// next piece.
    ///
    /// Returns the number of cleared rows, and an error if the new piece overlaps the stack.
    pub fn complete_move_sequence(
        &mut self,
        rules: &MoveRules,
        moves: &MoveSequence,
    ) -> (usize, Result<(), CompletePieceDropError>) {
        self.board = rules.apply_moves(&self.board, self.falling_piece, moves);
        let cleared_lines = self.board.clear_filled_lines();

        self.falling_piece = Piece::new(self.piece_buffer.pop_next());
        if self.board.is_colliding(self.falling_piece) {
            return (
                cleared_lines,
                Err(CompletePieceDropError::NewPieceCollision),
            );
        }
        (cleared_lines, Ok(()))
    }
}

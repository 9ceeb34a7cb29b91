//! The outcome of playing one candidate: the post-clear board and how many rows it cleared.

use greedris_engine::{BitBoard, MoveSequence, Piece};

use crate::{
    board_analysis::BoardAnalysis,
    simulator::{self, PieceEngine},
};

#[derive(Debug, Clone)]
pub struct PlacementAnalysis {
    cleared_lines: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Wraps a board that already had its filled rows removed.
    #[must_use]
    pub fn from_board(after_clear: BitBoard, cleared_lines: usize) -> Self {
        Self {
            cleared_lines,
            board_analysis: BoardAnalysis::from_board(after_clear),
        }
    }

    /// Plays `moves` through `engine` and analyzes the result.
    #[must_use]
    pub fn simulate<E>(engine: &E, board: &BitBoard, piece: Piece, moves: &MoveSequence) -> Self
    where
        E: PieceEngine + ?Sized,
    {
        let (after_clear, cleared_lines) = simulator::simulate(engine, board, piece, moves);
        Self::from_board(after_clear, cleared_lines)
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn board(&self) -> &BitBoard {
        self.board_analysis.board()
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }

    #[must_use]
    pub fn into_board(self) -> BitBoard {
        self.board_analysis.into_board()
    }
}

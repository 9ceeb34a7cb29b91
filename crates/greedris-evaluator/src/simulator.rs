//! The seam between the selector and the grid/piece engine.

use std::fmt;

use greedris_engine::{BitBoard, LineSet, MoveRules, MoveSequence, Piece};

/// Grid/piece rules the selector relies on.
///
/// `apply_moves` must be total: moves that cannot be made are absorbed, never reported. The
/// line methods default to the [`BitBoard`] implementations.
pub trait PieceEngine: fmt::Debug + Send + Sync {
    /// Plays `moves` from the spawn position and returns the board with the piece locked in,
    /// before line clears.
    fn apply_moves(&self, board: &BitBoard, piece: Piece, moves: &MoveSequence) -> BitBoard;

    fn lines_to_clear(&self, board: &BitBoard) -> LineSet {
        board.lines_to_clear()
    }

    /// Removes `lines` and returns how many were removed.
    fn clear_lines(&self, board: &mut BitBoard, lines: &[usize]) -> usize {
        board.clear_lines(lines)
    }
}

impl PieceEngine for MoveRules {
    fn apply_moves(&self, board: &BitBoard, piece: Piece, moves: &MoveSequence) -> BitBoard {
        MoveRules::apply_moves(self, board, piece, moves)
    }
}

/// Plays one move sequence and returns the post-clear board with the number of cleared rows.
pub fn simulate<E>(
    engine: &E,
    board: &BitBoard,
    piece: Piece,
    moves: &MoveSequence,
) -> (BitBoard, usize)
where
    E: PieceEngine + ?Sized,
{
    let mut board = engine.apply_moves(board, piece, moves);
    let lines = engine.lines_to_clear(&board);
    let cleared_lines = if lines.is_empty() {
        0
    } else {
        engine.clear_lines(&mut board, &lines)
    };
    (board, cleared_lines)
}

#[cfg(test)]
mod tests {
    use greedris_engine::{Action, PieceKind};

    use super::*;

    #[test]
    fn test_simulate_reports_post_clear_board() {
        let board = BitBoard::from_ascii(
            "
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            .#########
            .#########
            ",
        );
        let moves = MoveSequence::with_hard_drop([
            Action::RotateClockwise,
            Action::MoveLeft,
            Action::MoveLeft,
            Action::MoveLeft,
            Action::MoveLeft,
            Action::MoveLeft,
        ])
        .unwrap();

        let (after, cleared) = simulate(
            &MoveRules::default(),
            &board,
            Piece::new(PieceKind::I),
            &moves,
        );
        assert_eq!(cleared, 2);
        assert_eq!(board.count_occupied() + 4 - 20, after.count_occupied());
        assert!(after.is_occupied(0, 18));
        assert!(after.is_occupied(0, 19));
        assert!(after.lines_to_clear().is_empty());
    }

    #[test]
    fn test_simulate_without_clear() {
        let moves = MoveSequence::new([Action::HardDrop]).unwrap();
        let (after, cleared) = simulate(
            &MoveRules::default(),
            &BitBoard::INITIAL,
            Piece::new(PieceKind::T),
            &moves,
        );
        assert_eq!(cleared, 0);
        assert_eq!(after.count_occupied(), 4);
    }
}

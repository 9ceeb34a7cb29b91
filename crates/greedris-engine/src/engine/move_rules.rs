use serde::{Deserialize, Serialize};

use crate::core::{
    action::{Action, MoveSequence},
    bit_board::BitBoard,
    piece::Piece,
};

/// How the falling piece reacts between inputs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    /// The piece only moves when told to.
    #[default]
    Off,
    /// After every non-drop action the piece falls one row. If it cannot, it lands and locks
    /// immediately and any remaining actions are discarded.
    PerAction,
}

/// Result of applying one action to the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Falling(Piece),
    Locked(Piece),
}

/// Rules for applying actions to a falling piece.
///
/// Every action is total: a move or rotation that would collide is absorbed as a no-op, never
/// reported as an error.
///
/// # Example
///
/// ```
/// use greedris_engine::{Action, BitBoard, MoveRules, MoveSequence, Piece, PieceKind};
///
/// let rules = MoveRules::default();
/// let moves = MoveSequence::with_hard_drop([Action::MoveLeft; 5]).unwrap();
/// let board = rules.apply_moves(&BitBoard::INITIAL, Piece::new(PieceKind::O), &moves);
/// assert!(board.is_occupied(0, 19));
/// assert_eq!(board.count_occupied(), 4);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveRules {
    gravity: Gravity,
}

impl MoveRules {
    #[must_use]
    pub const fn new(gravity: Gravity) -> Self {
        Self { gravity }
    }

    #[must_use]
    pub const fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Applies a single action.
    #[must_use]
    pub fn step(&self, board: &BitBoard, piece: Piece, action: Action) -> Step {
        let fits = |p: &Piece| !board.is_colliding(*p);
        let moved = match action {
            Action::MoveLeft => piece.left().filter(fits).unwrap_or(piece),
            Action::MoveRight => piece.right().filter(fits).unwrap_or(piece),
            Action::RotateClockwise => piece.super_rotated_right(board).unwrap_or(piece),
            Action::RotateAnticlockwise => piece.super_rotated_left(board).unwrap_or(piece),
            Action::HardDrop => return Step::Locked(piece.simulate_drop_position(board)),
        };
        match self.gravity {
            Gravity::Off => Step::Falling(moved),
            Gravity::PerAction => match moved.down().filter(fits) {
                Some(fallen) => Step::Falling(fallen),
                None => Step::Locked(moved),
            },
        }
    }

    /// Applies actions in order and returns the piece at its lock position.
    ///
    /// Actions after the piece locks are ignored. If the actions run out before a lock, the
    /// piece is hard-dropped.
    #[must_use]
    pub fn resolve_lock_position(
        &self,
        board: &BitBoard,
        piece: Piece,
        actions: &[Action],
    ) -> Piece {
        let mut piece = piece;
        for &action in actions {
            match self.step(board, piece, action) {
                Step::Falling(p) => piece = p,
                Step::Locked(p) => return p,
            }
        }
        piece.simulate_drop_position(board)
    }

    /// Applies a move sequence and returns the board with the piece locked in, before any line
    /// clears.
    #[must_use]
    pub fn apply_moves(&self, board: &BitBoard, piece: Piece, moves: &MoveSequence) -> BitBoard {
        let locked = self.resolve_lock_position(board, piece, moves.actions());
        let mut board = board.clone();
        board.fill_piece(locked);
        board
    }
}

//! The fixed menu of move sequences tried for every piece.
//!
//! Candidates do not depend on the board or the piece: every turn tries the same 88 sequences
//! in the same order. They are built from 11 horizontal shifts and 4 rotations, combined in both
//! orders:
//!
//! ```text
//! index  0..44   [shift…, rotation…, HardDrop]   shift outer, rotation inner
//! index 44..88   [rotation…, shift…, HardDrop]   same nesting
//! ```
//!
//! Identical sequences (such as the bare `[HardDrop]` at index 0 and 44) are kept, so an index
//! always identifies the same candidate.

use std::{iter, sync::LazyLock};

use arrayvec::ArrayVec;
use greedris_engine::{Action, MAX_SEQUENCE_LEN, MoveSequence};
use serde::Serialize;

/// Horizontal shifts in generation order: none, 1..=5 left, 1..=5 right.
pub const SHIFTS: [i8; 11] = [0, -1, -2, -3, -4, -5, 1, 2, 3, 4, 5];

pub const CANDIDATE_COUNT: usize = CandidateOrder::ALL.len() * SHIFTS.len() * Rotation::ALL.len();

/// Which half of the action list comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrder {
    TranslateFirst,
    RotateFirst,
}

impl CandidateOrder {
    pub const ALL: [Self; 2] = [Self::TranslateFirst, Self::RotateFirst];
}

/// Rotation inputs, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    None,
    Anticlockwise,
    Clockwise,
    HalfTurn,
}

impl Rotation {
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::Anticlockwise,
        Self::Clockwise,
        Self::HalfTurn,
    ];

    #[must_use]
    pub const fn actions(self) -> &'static [Action] {
        match self {
            Self::None => &[],
            Self::Anticlockwise => &[Action::RotateAnticlockwise],
            Self::Clockwise => &[Action::RotateClockwise],
            Self::HalfTurn => &[Action::RotateClockwise, Action::RotateClockwise],
        }
    }
}

/// One entry of the candidate menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    index: usize,
    order: CandidateOrder,
    shift: i8,
    rotation: Rotation,
    moves: MoveSequence,
}

impl Candidate {
    /// Position in generation order; ties between equal scores go to the lower index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn order(&self) -> CandidateOrder {
        self.order
    }

    /// Columns moved: negative is left, positive is right.
    #[must_use]
    pub fn shift(&self) -> i8 {
        self.shift
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn moves(&self) -> &MoveSequence {
        &self.moves
    }
}

static CANDIDATES: LazyLock<Vec<Candidate>> = LazyLock::new(build_candidates);

/// Returns the candidate menu in generation order.
///
/// ```
/// use greedris_evaluator::candidates::{CANDIDATE_COUNT, all_candidates};
///
/// let candidates = all_candidates();
/// assert_eq!(candidates.len(), CANDIDATE_COUNT);
/// assert_eq!(candidates[0].moves().to_string(), "hard_drop");
/// assert_eq!(candidates[5].moves().to_string(), "move_left rotate_anticlockwise hard_drop");
/// ```
#[must_use]
pub fn all_candidates() -> &'static [Candidate] {
    &CANDIDATES
}

fn shift_actions(shift: i8) -> impl Iterator<Item = Action> + Clone {
    let action = if shift < 0 {
        Action::MoveLeft
    } else {
        Action::MoveRight
    };
    iter::repeat_n(action, usize::from(shift.unsigned_abs()))
}

fn build_candidates() -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(CANDIDATE_COUNT);
    for order in CandidateOrder::ALL {
        for shift in SHIFTS {
            for rotation in Rotation::ALL {
                let translation = shift_actions(shift);
                let turn = rotation.actions().iter().copied();
                let prefix: ArrayVec<Action, MAX_SEQUENCE_LEN> = match order {
                    CandidateOrder::TranslateFirst => translation.chain(turn).collect(),
                    CandidateOrder::RotateFirst => turn.chain(translation).collect(),
                };
                // At most five shifts and two rotations precede the drop.
                let moves = MoveSequence::with_hard_drop(prefix)
                    .expect("candidate sequences fit within the sequence length limit");
                candidates.push(Candidate {
                    index: candidates.len(),
                    order,
                    shift,
                    rotation,
                    moves,
                });
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    use Action::{HardDrop, MoveLeft, MoveRight, RotateAnticlockwise, RotateClockwise};

    fn actions(index: usize) -> &'static [Action] {
        all_candidates()[index].moves().actions()
    }

    #[test]
    fn test_candidate_count_is_fixed() {
        assert_eq!(CANDIDATE_COUNT, 88);
        assert_eq!(all_candidates().len(), 88);
        assert!(std::ptr::eq(all_candidates(), all_candidates()));
    }

    #[test]
    fn test_index_matches_position() {
        for (i, candidate) in all_candidates().iter().enumerate() {
            assert_eq!(candidate.index(), i);
            assert_eq!(candidate.moves().actions().last(), Some(&HardDrop));
        }
    }

    #[test]
    fn test_translate_first_half() {
        assert_eq!(actions(0), &[HardDrop]);
        assert_eq!(actions(1), &[RotateAnticlockwise, HardDrop]);
        assert_eq!(actions(2), &[RotateClockwise, HardDrop]);
        assert_eq!(actions(3), &[RotateClockwise, RotateClockwise, HardDrop]);
        assert_eq!(actions(4), &[MoveLeft, HardDrop]);
        assert_eq!(
            actions(23),
            &[
                MoveLeft,
                MoveLeft,
                MoveLeft,
                MoveLeft,
                MoveLeft,
                RotateClockwise,
                RotateClockwise,
                HardDrop
            ]
        );
        assert_eq!(actions(26), &[MoveRight, RotateClockwise, HardDrop]);
        assert!(
            all_candidates()[..44]
                .iter()
                .all(|c| c.order() == CandidateOrder::TranslateFirst)
        );
    }

    #[test]
    fn test_rotate_first_half() {
        assert_eq!(actions(44), &[HardDrop]);
        assert_eq!(actions(45), &[RotateAnticlockwise, HardDrop]);
        assert_eq!(
            actions(51),
            &[RotateClockwise, RotateClockwise, MoveLeft, HardDrop]
        );
        assert_eq!(actions(87).len(), 8);
        assert_eq!(&actions(87)[..2], &[RotateClockwise, RotateClockwise]);
        assert!(
            all_candidates()[44..]
                .iter()
                .all(|c| c.order() == CandidateOrder::RotateFirst)
        );
    }

    #[test]
    fn test_metadata_describes_moves() {
        let candidate = &all_candidates()[66];
        assert_eq!(candidate.order(), CandidateOrder::RotateFirst);
        assert_eq!(candidate.shift(), -5);
        assert_eq!(candidate.rotation(), Rotation::Clockwise);
        assert_eq!(candidate.moves().len(), 7);
    }
}

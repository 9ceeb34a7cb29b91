use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::MoveSequenceError;

/// Longest move sequence the engine accepts, hard drop included.
pub const MAX_SEQUENCE_LEN: usize = 8;

/// A single input applied to the falling piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[display("move_left")]
    MoveLeft,
    #[display("move_right")]
    MoveRight,
    #[display("rotate_clockwise")]
    RotateClockwise,
    #[display("rotate_anticlockwise")]
    RotateAnticlockwise,
    #[display("hard_drop")]
    HardDrop,
}

impl Action {
    /// Returns `true` for the action that locks the piece.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Action::HardDrop)
    }
}

/// Ordered actions ending in exactly one [`Action::HardDrop`].
///
/// The invariant is checked on construction, so anything holding a `MoveSequence` can rely on
/// the piece being locked by its last action.
///
/// ```
/// use greedris_engine::{Action, MoveSequence, MoveSequenceError};
///
/// let moves = MoveSequence::new([Action::MoveLeft, Action::HardDrop]).unwrap();
/// assert_eq!(moves.to_string(), "move_left hard_drop");
///
/// let err = MoveSequence::new([Action::MoveLeft]).unwrap_err();
/// assert_eq!(err, MoveSequenceError::MissingHardDrop);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveSequence {
    actions: ArrayVec<Action, MAX_SEQUENCE_LEN>,
}

impl MoveSequence {
    pub fn new<I>(actions: I) -> Result<Self, MoveSequenceError>
    where
        I: IntoIterator<Item = Action>,
    {
        let mut buf = ArrayVec::new();
        let mut len = 0;
        for action in actions {
            len += 1;
            if len <= MAX_SEQUENCE_LEN {
                buf.push(action);
            }
        }
        if len > MAX_SEQUENCE_LEN {
            return Err(MoveSequenceError::TooLong {
                len,
                max: MAX_SEQUENCE_LEN,
            });
        }

        let Some((last, body)) = buf.split_last() else {
            return Err(MoveSequenceError::Empty);
        };
        if let Some(index) = body.iter().position(|action| action.is_terminal()) {
            return Err(MoveSequenceError::EarlyHardDrop { index });
        }
        if !last.is_terminal() {
            return Err(MoveSequenceError::MissingHardDrop);
        }
        Ok(Self { actions: buf })
    }

    /// Builds `[prefix…, HardDrop]` from non-terminal actions.
    pub fn with_hard_drop<I>(prefix: I) -> Result<Self, MoveSequenceError>
    where
        I: IntoIterator<Item = Action>,
    {
        Self::new(prefix.into_iter().chain([Action::HardDrop]))
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions before the terminal hard drop.
    #[must_use]
    pub fn prefix(&self) -> &[Action] {
        &self.actions[..self.actions.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Display for MoveSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{action}")?;
        }
        Ok(())
    }
}

impl Serialize for MoveSequence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.actions)
    }
}

impl<'de> Deserialize<'de> for MoveSequence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let actions = Vec::<Action>::deserialize(deserializer)?;
        Self::new(actions).map_err(serde::de::Error::custom)
    }
}

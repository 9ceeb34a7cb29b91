//! Reference grid/piece engine for the greedris placement selector.
//!
//! The engine owns everything about "how pieces behave": the board representation, piece
//! shapes and rotation kicks, the action vocabulary, move legality, line clearing, and piece
//! generation. The evaluator crate only consumes it through a narrow seam, so the rules here
//! can be replaced by a host's own engine.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when a freshly spawned piece overlaps the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CompletePieceDropError {
    #[display("new piece collides at spawn position")]
    NewPieceCollision,
}

/// Error returned when an action list is not a well-formed move sequence.
///
/// A well-formed sequence is non-empty, ends with exactly one [`Action::HardDrop`], and fits in
/// [`MAX_SEQUENCE_LEN`] actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveSequenceError {
    #[display("move sequence is empty")]
    Empty,
    #[display("move sequence does not end with a hard drop")]
    MissingHardDrop,
    #[display("hard drop at position {index} before the end of the sequence")]
    EarlyHardDrop { index: usize },
    #[display("move sequence has {len} actions, at most {max} allowed")]
    TooLong { len: usize, max: usize },
}

/// Error returned when a textual board does not describe a full playable grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    #[display("expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },
    #[display("row {row}: expected {expected} cells, got {actual}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("row {row}: invalid cell {cell:?} (expected '#' or '.')")]
    InvalidCell { row: usize, cell: char },
}

/// Error returned when a piece seed is not a 32-digit hexadecimal string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PieceSeedParseError {
    #[display("invalid hex: expected 32 characters, got {actual}")]
    Length { actual: usize },
    #[display("invalid hex: unexpected character {found:?}")]
    InvalidDigit { found: char },
    #[display("invalid hex: {source}")]
    InvalidHex { source: std::num::ParseIntError },
}

//! Greedy placement selection for a falling tetromino.
//!
//! For one board and one piece, the selector tries a fixed menu of move sequences, simulates
//! each through a grid/piece engine, scores the resulting board with a weighted linear
//! heuristic, and returns the sequence with the lowest score.
//!
//! # Pipeline
//!
//! ```text
//! candidates (88 fixed sequences)
//!     ↓ per candidate
//! simulator (engine applies moves, filled rows are cleared)
//!     ↓
//! board_feature (5 features of the post-clear board)
//!     ↓
//! placement_evaluator (dot product with the weight vector)
//!     ↓
//! turn_evaluator (first candidate with the minimum score)
//! ```
//!
//! # Modules
//!
//! - [`candidates`] - the fixed, board-independent candidate menu
//! - [`simulator`] - the [`PieceEngine`](simulator::PieceEngine) seam and the simulate step
//! - [`board_analysis`] - lazily computed column heights, holes, and other board metrics
//! - [`placement_analysis`] - a simulated candidate: post-clear board plus cleared row count
//! - [`board_feature`] - feature ids and the [`FeatureVector`](board_feature::FeatureVector)
//! - [`weights`] - [`WeightVector`](weights::WeightVector) with the built-in presets
//! - [`placement_evaluator`] - scoring a single placement
//! - [`turn_evaluator`] - selection and self-play sessions
//!
//! # Example
//!
//! ```
//! use greedris_engine::{BitBoard, Piece, PieceKind};
//! use greedris_evaluator::{turn_evaluator::TurnEvaluator, weights::WeightVector};
//!
//! let evaluator = TurnEvaluator::with_weights(Some(WeightVector::TUNED));
//! let moves = evaluator.select_moves(&BitBoard::INITIAL, Piece::new(PieceKind::T));
//! assert!(moves.actions().ends_with(&[greedris_engine::Action::HardDrop]));
//! ```
//!
//! # Features
//!
//! - `rayon` (default): simulate candidates on the rayon thread pool when
//!   [`Parallelism::Parallel`](turn_evaluator::Parallelism::Parallel) is selected.

pub mod board_analysis;
pub mod board_feature;
pub mod candidates;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod simulator;
pub mod turn_evaluator;
pub mod weights;

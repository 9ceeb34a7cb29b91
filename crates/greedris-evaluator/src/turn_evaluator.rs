//! Turn evaluation: choosing the move sequence for the current piece.
//!
//! The [`TurnEvaluator`] plays every entry of the fixed candidate menu through a
//! [`PieceEngine`], scores each resulting board with a [`PlacementEvaluator`], and keeps the
//! lowest score. It looks one piece ahead and nothing more.
//!
//! # Tie-breaking
//!
//! Candidates are compared in generation order and only a strictly lower score replaces the
//! current best, so among equal scores the lowest candidate index wins. A NaN score never
//! replaces a real one; if every score is NaN the first candidate is returned.
//!
//! With [`Parallelism::Parallel`] the candidates are simulated on the rayon pool, but the scores
//! are collected in index order and reduced by the same loop, so the result never depends on
//! completion order.
//!
//! # Usage
//!
//! ```
//! use greedris_engine::{BitBoard, Piece, PieceKind};
//! use greedris_evaluator::turn_evaluator::TurnEvaluator;
//!
//! let evaluator = TurnEvaluator::with_weights(None);
//! let piece = Piece::new(PieceKind::O);
//! let (plan, _analysis) = evaluator.select_best_turn(&BitBoard::INITIAL, piece);
//!
//! // Three moves left already reach the wall, where the surface is flattest.
//! assert_eq!(plan.candidate().index(), 12);
//! assert_eq!(plan.moves().to_string(), "move_left move_left move_left hard_drop");
//! ```

use greedris_engine::{BitBoard, GameField, GameStats, MoveRules, MoveSequence, Piece};
use serde::Serialize;

use crate::{
    board_feature::FeatureVector,
    candidates::{Candidate, all_candidates},
    placement_analysis::PlacementAnalysis,
    placement_evaluator::{LinearPlacementEvaluator, PlacementEvaluator},
    simulator::PieceEngine,
    weights::WeightVector,
};

/// How candidates are simulated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    /// Uses the rayon pool when the `rayon` feature is enabled, sequential otherwise.
    #[default]
    Parallel,
}

/// The chosen candidate for a turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnPlan {
    #[serde(flatten)]
    candidate: Candidate,
    score: f32,
    features: FeatureVector,
}

impl TurnPlan {
    #[must_use]
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    #[must_use]
    pub fn moves(&self) -> &MoveSequence {
        self.candidate.moves()
    }

    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn features(&self) -> &FeatureVector {
        &self.features
    }
}

/// Result of a self-play session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    pub stats: GameStats,
    /// `true` if the session ended by topping out rather than by the turn limit.
    pub game_over: bool,
}

/// Selects the best candidate for a board and piece.
#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
    engine: Box<dyn PieceEngine + 'a>,
    parallelism: Parallelism,
}

impl<'a> TurnEvaluator<'a> {
    /// Creates a turn evaluator using the default [`MoveRules`].
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
            engine: Box::new(MoveRules::default()),
            parallelism: Parallelism::default(),
        }
    }

    /// Creates a linear evaluator; `None` selects [`WeightVector::DEFAULT`].
    #[must_use]
    pub fn with_weights(weights: Option<WeightVector>) -> Self {
        let weights = WeightVector::resolve(weights);
        Self::new(Box::new(LinearPlacementEvaluator::new(weights)))
    }

    #[must_use]
    pub fn with_engine(self, engine: Box<dyn PieceEngine + 'a>) -> Self {
        Self { engine, ..self }
    }

    #[must_use]
    pub fn with_parallelism(self, parallelism: Parallelism) -> Self {
        Self {
            parallelism,
            ..self
        }
    }

    fn evaluate_candidate(
        &self,
        board: &BitBoard,
        piece: Piece,
        candidate: &Candidate,
    ) -> (f32, PlacementAnalysis) {
        let analysis =
            PlacementAnalysis::simulate(self.engine.as_ref(), board, piece, candidate.moves());
        let score = self.placement_evaluator.evaluate_placement(&analysis);
        (score, analysis)
    }

    /// Selects the candidate with the lowest score.
    ///
    /// Returns the plan together with the analysis of its resulting board.
    ///
    /// # Panics
    ///
    /// Never in practice: the candidate menu is never empty.
    #[must_use]
    pub fn select_best_turn(
        &self,
        board: &BitBoard,
        piece: Piece,
    ) -> (TurnPlan, PlacementAnalysis) {
        let candidates = all_candidates();
        let best = match self.parallelism {
            #[cfg(feature = "rayon")]
            Parallelism::Parallel => {
                use rayon::prelude::*;
                let scored: Vec<_> = candidates
                    .par_iter()
                    .map(|candidate| self.evaluate_candidate(board, piece, candidate))
                    .collect();
                track_best(candidates.iter().zip(scored))
            }
            #[cfg(not(feature = "rayon"))]
            Parallelism::Parallel => track_best(candidates.iter().map(|candidate| {
                (candidate, self.evaluate_candidate(board, piece, candidate))
            })),
            Parallelism::Sequential => track_best(candidates.iter().map(|candidate| {
                (candidate, self.evaluate_candidate(board, piece, candidate))
            })),
        };
        let (candidate, (score, analysis)) = best.expect("candidate menu is never empty");

        log::debug!(
            "selected candidate {} ({}) for {}: score {score}",
            candidate.index(),
            candidate.moves(),
            piece.kind(),
        );
        let plan = TurnPlan {
            candidate: candidate.clone(),
            score,
            features: FeatureVector::from_analysis(&analysis),
        };
        (plan, analysis)
    }

    /// Selects the move sequence for `piece` on `board`.
    #[must_use]
    pub fn select_moves(&self, board: &BitBoard, piece: Piece) -> MoveSequence {
        self.select_best_turn(board, piece).0.moves().clone()
    }

    /// Plays up to `turn_limit` pieces on `field`, applying each selection with `rules`.
    ///
    /// `rules` should match the engine this evaluator simulates with, otherwise the field can
    /// diverge from what was scored.
    pub fn play_session(
        &self,
        field: &mut GameField,
        rules: &MoveRules,
        turn_limit: usize,
    ) -> SessionResult {
        let mut stats = GameStats::new();
        for _ in 0..turn_limit {
            let (plan, _analysis) = self.select_best_turn(field.board(), field.falling_piece());
            let (cleared_lines, result) = field.complete_move_sequence(rules, plan.moves());
            stats.complete_piece_drop(cleared_lines);
            if result.is_err() {
                return SessionResult {
                    stats,
                    game_over: true,
                };
            }
        }
        SessionResult {
            stats,
            game_over: false,
        }
    }
}

/// Keeps the first item with the lowest score. NaN loses to any other score.
fn track_best<'c, I>(scored: I) -> Option<(&'c Candidate, (f32, PlacementAnalysis))>
where
    I: IntoIterator<Item = (&'c Candidate, (f32, PlacementAnalysis))>,
{
    let mut best: Option<(&'c Candidate, (f32, PlacementAnalysis))> = None;
    for (candidate, (score, analysis)) in scored {
        log::trace!("candidate {}: score {score}", candidate.index());
        let improves = match &best {
            None => true,
            Some((_, (best_score, _))) => {
                score < *best_score || (best_score.is_nan() && !score.is_nan())
            }
        };
        if improves {
            best = Some((candidate, (score, analysis)));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use greedris_engine::{Action, PieceKind, PieceSeed};

    use super::*;

    /// Locks nothing, except that any clockwise rotation fills the bottom-left cell.
    #[derive(Debug)]
    struct MarkClockwise;

    impl PieceEngine for MarkClockwise {
        fn apply_moves(&self, board: &BitBoard, _piece: Piece, moves: &MoveSequence) -> BitBoard {
            let mut board = board.clone();
            if moves.actions().contains(&Action::RotateClockwise) {
                board.occupy_cell(0, 19);
            }
            board
        }
    }

    /// Scores NaN unless the bottom-left cell is filled.
    #[derive(Debug)]
    struct NanUnlessMarked;

    impl PlacementEvaluator for NanUnlessMarked {
        fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
            if analysis.board().is_occupied(0, 19) {
                1.0
            } else {
                f32::NAN
            }
        }
    }

    #[derive(Debug)]
    struct AlwaysNan;

    impl PlacementEvaluator for AlwaysNan {
        fn evaluate_placement(&self, _analysis: &PlacementAnalysis) -> f32 {
            f32::NAN
        }
    }

    fn block_lover() -> TurnEvaluator<'static> {
        // Only total_blocks counts, and more is better.
        TurnEvaluator::with_weights(Some(WeightVector::new([0.0, 0.0, 0.0, -1.0, 0.0])))
            .with_engine(Box::new(MarkClockwise))
    }

    #[test]
    fn test_equal_scores_pick_lowest_index() {
        // Every candidate without a clockwise turn leaves the board empty and ties.
        for parallelism in [Parallelism::Sequential, Parallelism::Parallel] {
            let evaluator = TurnEvaluator::with_weights(None)
                .with_engine(Box::new(MarkClockwise))
                .with_parallelism(parallelism);
            let moves = evaluator.select_moves(&BitBoard::INITIAL, Piece::new(PieceKind::T));
            assert_eq!(moves.actions(), &[Action::HardDrop]);
        }
    }

    #[test]
    fn test_first_of_tied_winners_is_kept() {
        for parallelism in [Parallelism::Sequential, Parallelism::Parallel] {
            let evaluator = block_lover().with_parallelism(parallelism);
            let (plan, analysis) =
                evaluator.select_best_turn(&BitBoard::INITIAL, Piece::new(PieceKind::L));
            // [RotateClockwise, HardDrop] is index 2 and again index 46.
            assert_eq!(plan.candidate().index(), 2);
            assert!((plan.score() - -1.0).abs() < f32::EPSILON);
            assert_eq!(analysis.board().count_occupied(), 1);
        }
    }

    #[test]
    fn test_nan_never_beats_a_real_score() {
        let evaluator = TurnEvaluator::new(Box::new(NanUnlessMarked))
            .with_engine(Box::new(MarkClockwise));
        let (plan, _) = evaluator.select_best_turn(&BitBoard::INITIAL, Piece::new(PieceKind::S));
        assert_eq!(plan.candidate().index(), 2);
        assert!((plan.score() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_all_nan_returns_first_candidate() {
        let evaluator = TurnEvaluator::new(Box::new(AlwaysNan));
        let (plan, _) = evaluator.select_best_turn(&BitBoard::INITIAL, Piece::new(PieceKind::Z));
        assert_eq!(plan.candidate().index(), 0);
        assert!(plan.score().is_nan());
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
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
            ....#.....
            #..###...#
            ##.####.##
            ###.######
            ####.#####
            ",
        );
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind);
            let sequential = TurnEvaluator::with_weights(None)
                .with_parallelism(Parallelism::Sequential)
                .select_best_turn(&board, piece);
            let parallel = TurnEvaluator::with_weights(None)
                .with_parallelism(Parallelism::Parallel)
                .select_best_turn(&board, piece);
            assert_eq!(
                sequential.0.candidate().index(),
                parallel.0.candidate().index(),
                "{kind}"
            );
            assert_eq!(sequential.1.board(), parallel.1.board(), "{kind}");
        }
    }

    #[test]
    fn test_play_session_respects_turn_limit() {
        let evaluator = TurnEvaluator::with_weights(Some(WeightVector::TUNED));
        let mut field = GameField::with_seed(PieceSeed::from_u128(0xdead_beef));
        let result = evaluator.play_session(&mut field, &MoveRules::default(), 30);
        assert!(!result.game_over);
        assert_eq!(result.stats.completed_pieces(), 30);
    }
}

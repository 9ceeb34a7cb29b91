use greedris_engine::{Action, BitBoard, MoveRules, Piece, PieceKind};
use greedris_evaluator::{
    board_feature::{BoardFeature, FeatureVector},
    candidates::{CANDIDATE_COUNT, all_candidates},
    placement_analysis::PlacementAnalysis,
    turn_evaluator::{Parallelism, TurnEvaluator},
    weights::WeightVector,
};

fn two_rows_open_at_left() -> BitBoard {
    BitBoard::from_ascii(
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
    )
}

fn checkerboard() -> BitBoard {
    let rows = (0..BitBoard::PLAYABLE_HEIGHT).map(|y| {
        if y % 2 == 0 {
            "#.#.#.#.#."
        } else {
            ".#.#.#.#.#"
        }
    });
    BitBoard::from_rows(rows).unwrap()
}

#[test]
fn test_candidate_menu_is_fixed() {
    assert_eq!(all_candidates().len(), CANDIDATE_COUNT);
    let first: Vec<_> = all_candidates().iter().map(|c| c.moves().clone()).collect();
    let second: Vec<_> = all_candidates().iter().map(|c| c.moves().clone()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_vertical_i_clears_two_rows() {
    let evaluator = TurnEvaluator::with_weights(None);
    let board = two_rows_open_at_left();
    let (plan, analysis) = evaluator.select_best_turn(&board, Piece::new(PieceKind::I));

    // The first candidate that stands the I upright in column 0: anticlockwise, then 4 left.
    assert_eq!(plan.candidate().index(), 61);
    assert_eq!(
        plan.moves().actions(),
        &[
            Action::RotateAnticlockwise,
            Action::MoveLeft,
            Action::MoveLeft,
            Action::MoveLeft,
            Action::MoveLeft,
            Action::HardDrop
        ]
    );
    assert_eq!(analysis.cleared_lines(), 2);

    let features = plan.features();
    assert_eq!(features[BoardFeature::ClearBonus], 2.0);
    assert_eq!(features[BoardFeature::TotalBlocks], 2.0);
    assert_eq!(
        board.count_occupied() + 4 - 2 * 10,
        analysis.board().count_occupied()
    );
    assert_eq!(plan.score(), WeightVector::DEFAULT.score(features));
}

#[test]
fn test_identical_outcomes_keep_the_earlier_candidate() {
    let evaluator = TurnEvaluator::with_weights(None);
    let piece = Piece::new(PieceKind::O);
    let (plan, _) = evaluator.select_best_turn(&BitBoard::INITIAL, piece);
    assert_eq!(plan.candidate().index(), 12);

    // Four and five moves left press against the same wall.
    let rules = MoveRules::default();
    for later in [16, 20] {
        let moves = all_candidates()[later].moves();
        let analysis = PlacementAnalysis::simulate(&rules, &BitBoard::INITIAL, piece, moves);
        assert_eq!(&FeatureVector::from_analysis(&analysis), plan.features());
    }
}

#[test]
fn test_selection_is_deterministic() {
    let board = checkerboard();
    for kind in PieceKind::ALL {
        let piece = Piece::new(kind);
        let evaluator = TurnEvaluator::with_weights(Some(WeightVector::TUNED));
        let first = evaluator.select_moves(&board, piece);
        let again = evaluator.select_moves(&board, piece);
        let sequential = TurnEvaluator::with_weights(Some(WeightVector::TUNED))
            .with_parallelism(Parallelism::Sequential)
            .select_moves(&board, piece);
        assert_eq!(first, again, "{kind}");
        assert_eq!(first, sequential, "{kind}");
    }
}

#[test]
fn test_hopeless_board_still_selects() {
    let board = checkerboard();
    let evaluator = TurnEvaluator::with_weights(None);
    for kind in PieceKind::ALL {
        let (plan, analysis) = evaluator.select_best_turn(&board, Piece::new(kind));
        assert!(plan.candidate().index() < CANDIDATE_COUNT);
        assert!(plan.score().is_finite());
        assert_eq!(analysis.cleared_lines(), 0);
    }
}

#[test]
fn test_in_grid_placement_beats_locking_above_the_grid() {
    // Columns 0-6 are full to the top: a plain drop locks the O above the playable area.
    let board = BitBoard::from_ascii(&"#######...\n".repeat(20));
    let piece = Piece::new(PieceKind::O);
    let rules = MoveRules::default();

    let stuck = PlacementAnalysis::simulate(&rules, &board, piece, all_candidates()[0].moves());
    assert!(stuck.board().is_above_top());
    let stuck_features = FeatureVector::from_analysis(&stuck);
    assert_eq!(stuck_features[BoardFeature::TotalBlocks], 144.0);
    assert_eq!(stuck_features[BoardFeature::TotalHeight], 144.0);

    let (plan, analysis) = TurnEvaluator::with_weights(None).select_best_turn(&board, piece);
    assert!(!analysis.board().is_above_top());
    assert_eq!(plan.candidate().index(), 36);
    assert_eq!(
        plan.moves().actions(),
        &[
            Action::MoveRight,
            Action::MoveRight,
            Action::MoveRight,
            Action::MoveRight,
            Action::HardDrop
        ]
    );
    assert_eq!(plan.features()[BoardFeature::TotalBlocks], 144.0);
    assert!(plan.score() < WeightVector::DEFAULT.score(&stuck_features));
}

#[test]
fn test_score_is_linear_in_features() {
    let features = FeatureVector::new([4.0, 2.0, 0.0, 4.0, 2.0]);
    assert_eq!(WeightVector::DEFAULT.score(&features), 522.0);

    let doubled = FeatureVector::new([8.0, 4.0, 0.0, 8.0, 4.0]);
    assert_eq!(WeightVector::DEFAULT.score(&doubled), 1044.0);
}

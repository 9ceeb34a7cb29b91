use std::{iter, path::PathBuf};

use greedris_engine::{GameField, GameStats, Gravity, PieceSeed};
use greedris_evaluator::weights::WeightVector;
use rand::Rng as _;
use serde::Serialize;

use crate::util;

use super::EvaluatorArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Maximum number of pieces per game
    #[arg(long, default_value_t = 1000)]
    turn_limit: usize,
    /// Piece seed of the first game (32 hex digits); later games use the following seeds
    #[arg(long)]
    seed: Option<PieceSeed>,
    #[clap(flatten)]
    evaluator: EvaluatorArg,
    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl AutoPlayArg {
    #[cfg(test)]
    pub(super) fn evaluator(&self) -> &EvaluatorArg {
        &self.evaluator
    }
}

#[derive(Debug, Serialize)]
struct GameReport {
    seed: PieceSeed,
    game_over: bool,
    stats: GameStats,
}

#[derive(Debug, Serialize)]
struct AutoPlayReport {
    weights: WeightVector,
    gravity: Gravity,
    turn_limit: usize,
    games: Vec<GameReport>,
    total: GameStats,
}

/// Seeds for consecutive games: `first`, then each following value, wrapping at `u128::MAX`.
fn game_seeds(first: PieceSeed) -> impl Iterator<Item = PieceSeed> {
    iter::successors(Some(first), |seed| {
        Some(PieceSeed::from_u128(seed.as_u128().wrapping_add(1)))
    })
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        games,
        turn_limit,
        seed,
        evaluator,
        output,
    } = arg;

    let rules = evaluator.rules();
    let (evaluator, weights) = evaluator.build()?;
    let first_seed = seed.unwrap_or_else(|| rand::rng().random());

    eprintln!("Playing {games} game(s) with weights [{weights}], turn limit {turn_limit}...");
    let mut reports = Vec::with_capacity(*games);
    let mut total = GameStats::new();
    for (game, seed) in game_seeds(first_seed).take(*games).enumerate() {
        let mut field = GameField::with_seed(seed);
        let result = evaluator.play_session(&mut field, &rules, *turn_limit);
        let stats = &result.stats;
        eprintln!(
            "Game {}/{games} [{seed}]: {} pieces, {} lines, score {}{}",
            game + 1,
            stats.completed_pieces(),
            stats.total_cleared_lines(),
            stats.score(),
            if result.game_over { " (top out)" } else { "" }
        );
        total.accumulate(stats);
        reports.push(GameReport {
            seed,
            game_over: result.game_over,
            stats: result.stats,
        });
    }

    let game_overs = reports.iter().filter(|r| r.game_over).count();
    eprintln!(
        "Total: {} pieces, {} lines, score {}, line clears {:?}, {game_overs}/{games} topped out",
        total.completed_pieces(),
        total.total_cleared_lines(),
        total.score(),
        total.line_cleared_counter(),
    );

    let report = AutoPlayReport {
        weights,
        gravity: rules.gravity(),
        turn_limit: *turn_limit,
        games: reports,
        total,
    };
    util::write_report(&report, output.as_deref())
}

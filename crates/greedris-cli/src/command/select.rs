use std::path::PathBuf;

use greedris_engine::{BitBoard, Piece};
use greedris_evaluator::turn_evaluator::TurnPlan;
use serde::Serialize;

use crate::util;

use super::EvaluatorArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SelectArg {
    /// Path to the position file (JSON format)
    #[arg(long)]
    position: PathBuf,
    #[clap(flatten)]
    evaluator: EvaluatorArg,
    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl SelectArg {
    #[cfg(test)]
    pub(super) fn evaluator(&self) -> &EvaluatorArg {
        &self.evaluator
    }
}

#[derive(Debug, Serialize)]
struct SelectionReport {
    #[serde(flatten)]
    plan: TurnPlan,
    cleared_lines: usize,
    resulting_board: BitBoard,
}

pub(crate) fn run(arg: &SelectArg) -> anyhow::Result<()> {
    let SelectArg {
        position: position_path,
        evaluator,
        output,
    } = arg;

    let position = util::read_position_file(position_path)?;
    let (evaluator, _weights) = evaluator.build()?;

    let (plan, analysis) = evaluator.select_best_turn(&position.board, Piece::new(position.piece));
    eprintln!(
        "Selected candidate {} for {}: {} (score {})",
        plan.candidate().index(),
        position.piece,
        plan.moves(),
        plan.score()
    );

    let report = SelectionReport {
        plan,
        cleared_lines: analysis.cleared_lines(),
        resulting_board: analysis.into_board(),
    };
    util::write_report(&report, output.as_deref())
}

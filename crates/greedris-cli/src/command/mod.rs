use std::path::PathBuf;

use clap::{Parser, Subcommand};
use greedris_engine::{Gravity, MoveRules};
use greedris_evaluator::{
    turn_evaluator::{Parallelism, TurnEvaluator},
    weights::WeightVector,
};

use crate::util;

use self::{auto_play::AutoPlayArg, select::SelectArg};

mod auto_play;
mod select;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Select the move sequence for one position
    Select(#[clap(flatten)] SelectArg),
    /// Play headless games with the selector
    AutoPlay(#[clap(flatten)] AutoPlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    log::debug!("{args:?}");
    match args.mode {
        Mode::Select(arg) => select::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
    }
    Ok(())
}

/// Built-in weight vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Preset {
    Default,
    Tuned,
}

impl Preset {
    fn weights(self) -> WeightVector {
        match self {
            Preset::Default => WeightVector::DEFAULT,
            Preset::Tuned => WeightVector::TUNED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum GravityMode {
    /// Pieces move only when told to
    #[default]
    Off,
    /// The piece falls one row after every move or rotation
    PerAction,
}

impl From<GravityMode> for Gravity {
    fn from(mode: GravityMode) -> Self {
        match mode {
            GravityMode::Off => Gravity::Off,
            GravityMode::PerAction => Gravity::PerAction,
        }
    }
}

/// Options shared by every command that runs the selector.
#[derive(Debug, Clone, clap::Args)]
struct EvaluatorArg {
    /// Comma-separated weights: clear_bonus,total_height,hole_count,total_blocks,total_spikiness
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["model", "preset"])]
    weights: Option<WeightVector>,
    /// Path to a weight model file (JSON format)
    #[arg(long, conflicts_with = "preset")]
    model: Option<PathBuf>,
    /// Built-in weight vector [default: default]
    #[arg(long, value_enum)]
    preset: Option<Preset>,
    /// How the piece falls while moves are applied
    #[arg(long, value_enum, default_value_t)]
    gravity: GravityMode,
    /// Simulate candidates on the current thread only
    #[arg(long)]
    sequential: bool,
}

impl EvaluatorArg {
    /// Resolves the weight source; `None` means the selector's default.
    fn weights(&self) -> anyhow::Result<Option<WeightVector>> {
        if let Some(weights) = self.weights {
            return Ok(Some(weights));
        }
        if let Some(path) = &self.model {
            let model = util::read_weight_model_file(path)?;
            eprintln!("Loaded weight model {:?} from {}", model.name, path.display());
            return Ok(Some(model.weights));
        }
        Ok(self.preset.map(Preset::weights))
    }

    fn rules(&self) -> MoveRules {
        MoveRules::new(self.gravity.into())
    }

    fn build(&self) -> anyhow::Result<(TurnEvaluator<'static>, WeightVector)> {
        let weights = WeightVector::resolve(self.weights()?);
        let parallelism = if self.sequential {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        };
        let evaluator = TurnEvaluator::with_weights(Some(weights))
            .with_engine(Box::new(self.rules()))
            .with_parallelism(parallelism);
        Ok((evaluator, weights))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_select_with_inline_weights() {
        let args = CommandArgs::try_parse_from([
            "greedris",
            "select",
            "--position",
            "position.json",
            "--weights",
            "-1,2,3,4,5",
            "--gravity",
            "per-action",
        ])
        .unwrap();
        let Mode::Select(arg) = args.mode else {
            panic!("expected select");
        };
        let weights = arg.evaluator().weights().unwrap();
        assert_eq!(
            weights,
            Some(WeightVector::new([-1.0, 2.0, 3.0, 4.0, 5.0]))
        );
        assert_eq!(arg.evaluator().rules().gravity(), Gravity::PerAction);
    }

    #[test]
    fn test_weight_sources_conflict() {
        let result = CommandArgs::try_parse_from([
            "greedris",
            "auto-play",
            "--preset",
            "tuned",
            "--weights",
            "1,2,3,4,5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_preset_defaults_to_none() {
        let args = CommandArgs::try_parse_from(["greedris", "auto-play", "--sequential"]).unwrap();
        let Mode::AutoPlay(arg) = args.mode else {
            panic!("expected auto-play");
        };
        assert_eq!(arg.evaluator().weights().unwrap(), None);
        assert!(arg.evaluator().sequential);
    }
}

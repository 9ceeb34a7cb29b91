//! Scoring a single placement.
//!
//! A [`PlacementEvaluator`] turns the analysis of one simulated candidate into a score. The
//! selector keeps the candidate with the lowest score, so every evaluator here follows the
//! "lower is better" convention.

use std::fmt;

use crate::{
    board_feature::FeatureVector, placement_analysis::PlacementAnalysis, weights::WeightVector,
};

/// Assigns a score to a placement; lower is better.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;
}

/// Dot product of a [`WeightVector`] with the placement's [`FeatureVector`].
///
/// No normalization or clamping is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearPlacementEvaluator {
    weights: WeightVector,
}

impl LinearPlacementEvaluator {
    #[must_use]
    pub const fn new(weights: WeightVector) -> Self {
        Self { weights }
    }
}

impl PlacementEvaluator for LinearPlacementEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        self.weights.score(&FeatureVector::from_analysis(analysis))
    }
}

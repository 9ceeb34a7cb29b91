use greedris_evaluator::weights::WeightVector;
use serde::{Deserialize, Serialize};

/// A named weight vector stored as JSON, keyed by feature id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WeightModel {
    pub name: String,
    pub weights: WeightVector,
}

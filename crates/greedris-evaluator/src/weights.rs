//! Weight vectors for the linear scorer.

use std::{collections::BTreeMap, fmt, iter, num::ParseFloatError, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap as _};

use crate::board_feature::{BoardFeature, FeatureVector};

/// Error returned when a weight vector cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum WeightVectorError {
    #[display("expected {expected} weights, got {actual}")]
    Length { expected: usize, actual: usize },
    #[display("weight {index}: {source}")]
    InvalidComponent {
        index: usize,
        source: ParseFloatError,
    },
    #[display("missing weight for feature `{}`", feature.id())]
    MissingFeature { feature: BoardFeature },
    #[display("unknown feature id `{id}`")]
    UnknownFeature { id: String },
}

/// One coefficient per [`BoardFeature`], in [`BoardFeature::ALL`] order.
///
/// A placement's score is the dot product with its [`FeatureVector`]; lower is better.
///
/// ```
/// use greedris_evaluator::{board_feature::FeatureVector, weights::WeightVector};
///
/// let weights: WeightVector = "38, 44, -3, 67, 7".parse().unwrap();
/// assert_eq!(weights, WeightVector::DEFAULT);
///
/// let features = FeatureVector::new([4.0, 2.0, 0.0, 4.0, 2.0]);
/// assert_eq!(weights.score(&features), 522.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector([f32; BoardFeature::LEN]);

impl Default for WeightVector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl WeightVector {
    /// Built-in weights used when none are supplied.
    pub const DEFAULT: Self = Self([38.0, 44.0, -3.0, 67.0, 7.0]);

    /// Offline-tuned weights.
    #[expect(clippy::excessive_precision)]
    pub const TUNED: Self = Self([
        7.973_528_5,
        0.217_849_89,
        1.527_923_27,
        1.206_136_3,
        0.346_223_45,
    ]);

    #[must_use]
    pub const fn new(weights: [f32; BoardFeature::LEN]) -> Self {
        Self(weights)
    }

    /// Uses `weights` if given, otherwise [`Self::DEFAULT`].
    #[must_use]
    pub fn resolve(weights: Option<Self>) -> Self {
        weights.unwrap_or(Self::DEFAULT)
    }

    pub fn from_slice(weights: &[f32]) -> Result<Self, WeightVectorError> {
        let weights = <[f32; BoardFeature::LEN]>::try_from(weights).map_err(|_| {
            WeightVectorError::Length {
                expected: BoardFeature::LEN,
                actual: weights.len(),
            }
        })?;
        Ok(Self(weights))
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f32; BoardFeature::LEN] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, feature: BoardFeature) -> f32 {
        self.0[feature.index()]
    }

    #[must_use]
    pub fn score(&self, features: &FeatureVector) -> f32 {
        iter::zip(&self.0, features.as_array())
            .map(|(w, f)| w * f)
            .sum()
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{w}")?;
        }
        Ok(())
    }
}

/// Parses comma-separated weights, e.g. `"38,44,-3,67,7"`.
impl FromStr for WeightVector {
    type Err = WeightVectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let weights = s
            .split(',')
            .enumerate()
            .map(|(index, part)| {
                part.trim()
                    .parse::<f32>()
                    .map_err(|source| WeightVectorError::InvalidComponent { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_slice(&weights)
    }
}

impl Serialize for WeightVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(BoardFeature::LEN))?;
        for feature in BoardFeature::ALL {
            map.serialize_entry(feature.id(), &self.get(feature))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeightVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = BTreeMap::<String, f32>::deserialize(deserializer)?;
        Self::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

impl WeightVector {
    fn from_entries(entries: BTreeMap<String, f32>) -> Result<Self, WeightVectorError> {
        let mut weights = [None; BoardFeature::LEN];
        for (id, weight) in entries {
            let feature =
                BoardFeature::from_id(&id).ok_or(WeightVectorError::UnknownFeature { id })?;
            weights[feature.index()] = Some(weight);
        }
        let mut resolved = [0.0; BoardFeature::LEN];
        for feature in BoardFeature::ALL {
            resolved[feature.index()] = weights[feature.index()]
                .ok_or(WeightVectorError::MissingFeature { feature })?;
        }
        Ok(Self(resolved))
    }
}

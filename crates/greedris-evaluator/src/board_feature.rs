//! The five board features scored by the selector.
//!
//! | index | id                | measures                                             |
//! |-------|-------------------|------------------------------------------------------|
//! | 0     | `clear_bonus`     | 4 minus the rows cleared by the placement            |
//! | 1     | `total_height`    | sum of column heights                                |
//! | 2     | `hole_count`      | empty cells under column tops (columns taller than 1) |
//! | 3     | `total_blocks`    | occupied cells                                       |
//! | 4     | `total_spikiness` | sum of height differences between adjacent columns   |
//!
//! Every feature is "lower is calmer" except `clear_bonus`, which shrinks as more rows clear.

use std::{fmt, ops::Index};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap as _};

use crate::placement_analysis::PlacementAnalysis;

/// Rows a single tetromino can clear at most; the clear bonus counts down from here.
const MAX_CLEARED_LINES: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardFeature {
    ClearBonus,
    TotalHeight,
    HoleCount,
    TotalBlocks,
    TotalSpikiness,
}

impl BoardFeature {
    pub const LEN: usize = 5;

    /// All features in vector order.
    pub const ALL: [Self; Self::LEN] = [
        Self::ClearBonus,
        Self::TotalHeight,
        Self::HoleCount,
        Self::TotalBlocks,
        Self::TotalSpikiness,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ClearBonus => "clear_bonus",
            Self::TotalHeight => "total_height",
            Self::HoleCount => "hole_count",
            Self::TotalBlocks => "total_blocks",
            Self::TotalSpikiness => "total_spikiness",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ClearBonus => "Clear Bonus",
            Self::TotalHeight => "Total Height",
            Self::HoleCount => "Hole Count",
            Self::TotalBlocks => "Total Blocks",
            Self::TotalSpikiness => "Total Spikiness",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn extract(self, analysis: &PlacementAnalysis) -> f32 {
        let board = analysis.board_analysis();
        match self {
            Self::ClearBonus => MAX_CLEARED_LINES - analysis.cleared_lines() as f32,
            Self::TotalHeight => f32::from(board.total_height()),
            Self::HoleCount => f32::from(board.hole_count()),
            Self::TotalBlocks => f32::from(board.total_blocks()),
            Self::TotalSpikiness => f32::from(board.total_spikiness()),
        }
    }
}

impl fmt::Display for BoardFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature values in [`BoardFeature::ALL`] order.
///
/// Serializes as a map from feature id to value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; BoardFeature::LEN]);

impl FeatureVector {
    #[must_use]
    pub const fn new(values: [f32; BoardFeature::LEN]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn from_analysis(analysis: &PlacementAnalysis) -> Self {
        Self(BoardFeature::ALL.map(|feature| feature.extract(analysis)))
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f32; BoardFeature::LEN] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoardFeature, f32)> + '_ {
        BoardFeature::ALL.into_iter().zip(self.0)
    }
}

impl Index<BoardFeature> for FeatureVector {
    type Output = f32;

    fn index(&self, feature: BoardFeature) -> &f32 {
        &self.0[feature.index()]
    }
}

impl Serialize for FeatureVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(BoardFeature::LEN))?;
        for (feature, value) in self.iter() {
            map.serialize_entry(feature.id(), &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use greedris_engine::BitBoard;

    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for (i, feature) in BoardFeature::ALL.into_iter().enumerate() {
            assert_eq!(feature.index(), i);
            assert_eq!(BoardFeature::from_id(feature.id()), Some(feature));
            let json = serde_json::to_string(&feature).unwrap();
            assert_eq!(json, format!("\"{}\"", feature.id()));
        }
        assert_eq!(BoardFeature::from_id("max_height"), None);
    }

    #[test]
    fn test_empty_board_features() {
        let analysis = PlacementAnalysis::from_board(BitBoard::INITIAL, 0);
        let features = FeatureVector::from_analysis(&analysis);
        assert_eq!(features.as_array(), &[4.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_clear_bonus_counts_down() {
        let analysis = PlacementAnalysis::from_board(BitBoard::INITIAL, 2);
        let features = FeatureVector::from_analysis(&analysis);
        assert!((features[BoardFeature::ClearBonus] - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_serializes_as_id_map() {
        let features = FeatureVector::new([4.0, 2.0, 0.0, 4.0, 2.0]);
        let json = serde_json::to_value(features).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "clear_bonus": 4.0,
                "total_height": 2.0,
                "hole_count": 0.0,
                "total_blocks": 4.0,
                "total_spikiness": 2.0,
            })
        );
    }
}

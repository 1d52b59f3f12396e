// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RoadType;

/// A single aspect of a road segment which a [PreferenceWeights] multiplier applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// Applies to every edge of the given [RoadType].
    RoadType(RoadType),

    /// Applies to edges without street lighting.
    Unlit,

    /// Scales every edge by its scenic score, see [evaluate](crate::evaluate).
    Scenic,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoadType(rt) => fmt::Display::fmt(rt, f),
            Self::Unlit => f.write_str("unlit"),
            Self::Scenic => f.write_str("scenic"),
        }
    }
}

impl FromStr for Dimension {
    type Err = WeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unlit" => Ok(Self::Unlit),
            "scenic" => Ok(Self::Scenic),
            _ => s
                .parse::<RoadType>()
                .map(Self::RoadType)
                .map_err(|_| WeightsError::UnknownDimension(s.to_string())),
        }
    }
}

/// Problems with a set of [PreferenceWeights].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    /// Multipliers must be finite and greater than zero. A zero multiplier would make
    /// edges free to traverse.
    #[error("multiplier for {dimension} must be positive and finite, got {value}")]
    NonPositive { dimension: Dimension, value: f64 },

    /// A key is neither a known road type, nor "unlit", nor "scenic".
    #[error("unknown preference dimension: {0:?}")]
    UnknownDimension(String),

    /// Same as [WeightsError::NonPositive], for a key which matches no [Dimension].
    #[error("multiplier for {key:?} must be positive and finite, got {value}")]
    NonPositiveUnmatched { key: String, value: f64 },
}

/// Multipliers expressing routing intent, one per [Dimension].
///
/// Values below 1 mean "prefer", values above 1 mean "avoid". Dimensions which
/// are not set are neutral, as is a multiplier of exactly 1.
///
/// Serialized as a flat mapping, e.g. `{"motorway": 10.0, "unlit": 2.0, "scenic": 0.5}`.
/// Keys which match no [Dimension] (e.g. "highway", "lit") are kept, but never match
/// any edge, so they act as a multiplier of 1. Multipliers, including those of unmatched
/// keys, are only checked by [PreferenceWeights::validate], which
/// [find_route](crate::find_route) runs before searching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct PreferenceWeights {
    road_types: BTreeMap<RoadType, f64>,
    unlit: Option<f64>,
    scenic: Option<f64>,
    unmatched: BTreeMap<String, f64>,
}

impl PreferenceWeights {
    pub fn with_road_type(mut self, road_type: RoadType, multiplier: f64) -> Self {
        self.set(Dimension::RoadType(road_type), multiplier);
        self
    }

    pub fn with_unlit(mut self, multiplier: f64) -> Self {
        self.set(Dimension::Unlit, multiplier);
        self
    }

    pub fn with_scenic(mut self, multiplier: f64) -> Self {
        self.set(Dimension::Scenic, multiplier);
        self
    }

    /// Sets (or replaces) the multiplier for a [Dimension].
    pub fn set(&mut self, dimension: Dimension, multiplier: f64) {
        match dimension {
            Dimension::RoadType(rt) => {
                self.road_types.insert(rt, multiplier);
            }
            Dimension::Unlit => self.unlit = Some(multiplier),
            Dimension::Scenic => self.scenic = Some(multiplier),
        }
    }

    /// Returns the multiplier set for a [Dimension], if any.
    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::RoadType(rt) => self.road_types.get(&rt).copied(),
            Dimension::Unlit => self.unlit,
            Dimension::Scenic => self.scenic,
        }
    }

    /// Iterates over all set multipliers; road types first, then "unlit" and "scenic".
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.road_types
            .iter()
            .map(|(&rt, &m)| (Dimension::RoadType(rt), m))
            .chain(self.unlit.map(|m| (Dimension::Unlit, m)))
            .chain(self.scenic.map(|m| (Dimension::Scenic, m)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Keys of a raw mapping which didn't match any [Dimension], with their multipliers.
    pub fn unmatched(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.unmatched.iter().map(|(k, &m)| (k.as_str(), m))
    }

    /// Ensures every multiplier is finite and greater than zero.
    pub fn validate(&self) -> Result<(), WeightsError> {
        if let Some((dimension, value)) = self.iter().find(|&(_, m)| !is_valid_multiplier(m)) {
            return Err(WeightsError::NonPositive { dimension, value });
        }
        if let Some((key, value)) = self.unmatched().find(|&(_, m)| !is_valid_multiplier(m)) {
            return Err(WeightsError::NonPositiveUnmatched {
                key: key.to_string(),
                value,
            });
        }
        Ok(())
    }

    /// Multiplier for the scenic dimension, unless it is absent or neutral.
    ///
    /// Unlike other dimensions, a scenic multiplier of 1 would still rescale costs by
    /// the scenic score. Exactly 1 is therefore treated as "not set".
    pub(crate) fn active_scenic(&self) -> Option<f64> {
        self.scenic.filter(|&m| m != 1.0)
    }

    /// Lower bound of the ratio between an edge cost and its length,
    /// assuming validated weights and scenic scores within `0.0..=10.0`.
    pub(crate) fn min_length_factor(&self) -> f64 {
        let road_type = self.road_types.values().copied().fold(1.0, f64::min);
        let unlit = self.unlit.unwrap_or(1.0).min(1.0);
        let scenic = self.active_scenic().map_or(1.0, |m| 0.1 * m);
        road_type * unlit * scenic
    }
}

impl TryFrom<BTreeMap<String, f64>> for PreferenceWeights {
    type Error = WeightsError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut w = Self::default();
        for (key, multiplier) in raw {
            match key.parse::<Dimension>() {
                Ok(dimension) => w.set(dimension, multiplier),
                Err(_) => {
                    log::warn!(
                        target: "strider::cost",
                        "preference {:?} matches no road type or attribute, treating as neutral",
                        key
                    );
                    w.unmatched.insert(key, multiplier);
                }
            }
        }
        Ok(w)
    }
}

impl From<PreferenceWeights> for BTreeMap<String, f64> {
    fn from(w: PreferenceWeights) -> Self {
        let mut raw: Self = w.iter().map(|(d, m)| (d.to_string(), m)).collect();
        raw.extend(w.unmatched);
        raw
    }
}

fn is_valid_multiplier(m: f64) -> bool {
    m > 0.0 && m.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_from_json() {
        let w: PreferenceWeights =
            serde_json::from_str(r#"{"motorway": 10.0, "footway": 0.4, "unlit": 2.0, "scenic": 0.5}"#)
                .unwrap();
        assert_eq!(w.get(Dimension::RoadType(RoadType::Motorway)), Some(10.0));
        assert_eq!(w.get(Dimension::RoadType(RoadType::Footway)), Some(0.4));
        assert_eq!(w.get(Dimension::RoadType(RoadType::Path)), None);
        assert_eq!(w.get(Dimension::Unlit), Some(2.0));
        assert_eq!(w.get(Dimension::Scenic), Some(0.5));
    }

    #[test]
    fn unknown_dimension_from_str() {
        assert_eq!(
            "highway".parse::<Dimension>(),
            Err(WeightsError::UnknownDimension("highway".to_string()))
        );
        assert_eq!("unlit".parse::<Dimension>(), Ok(Dimension::Unlit));
    }

    #[test]
    fn unmatched_keys_are_kept_neutral() {
        let w: PreferenceWeights =
            serde_json::from_str(r#"{"highway": 10.0, "lit": 2.0, "scenic": 0.5, "unlit": 2.0}"#)
                .unwrap();
        assert_eq!(w.get(Dimension::Scenic), Some(0.5));
        assert_eq!(w.get(Dimension::Unlit), Some(2.0));
        assert_eq!(w.iter().count(), 2);
        assert_eq!(
            w.unmatched().collect::<Vec<_>>(),
            vec![("highway", 10.0), ("lit", 2.0)]
        );
        assert_eq!(w.validate(), Ok(()));
        assert_eq!(w.min_length_factor(), 0.05);

        assert_eq!(
            serde_json::to_string(&w).unwrap(),
            r#"{"highway":10.0,"lit":2.0,"scenic":0.5,"unlit":2.0}"#
        );
    }

    #[test]
    fn unmatched_keys_are_validated() {
        let w: PreferenceWeights = serde_json::from_str(r#"{"highway": -1.0}"#).unwrap();
        assert_eq!(
            w.validate(),
            Err(WeightsError::NonPositiveUnmatched {
                key: "highway".to_string(),
                value: -1.0
            })
        );
    }

    #[test]
    fn serializes_as_flat_map() {
        let w = PreferenceWeights::default()
            .with_scenic(0.3)
            .with_road_type(RoadType::Primary, 5.0);
        assert_eq!(
            serde_json::to_string(&w).unwrap(),
            r#"{"primary":5.0,"scenic":0.3}"#
        );
    }

    #[test]
    fn validate() {
        assert_eq!(PreferenceWeights::default().validate(), Ok(()));
        assert_eq!(
            PreferenceWeights::default().with_unlit(0.01).validate(),
            Ok(())
        );

        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let w = PreferenceWeights::default()
                .with_unlit(2.0)
                .with_road_type(RoadType::Path, bad);
            assert!(matches!(
                w.validate(),
                Err(WeightsError::NonPositive {
                    dimension: Dimension::RoadType(RoadType::Path),
                    ..
                })
            ));
        }
    }

    #[test]
    fn neutral_scenic_is_inactive() {
        assert_eq!(PreferenceWeights::default().with_scenic(1.0).active_scenic(), None);
        assert_eq!(
            PreferenceWeights::default().with_scenic(0.5).active_scenic(),
            Some(0.5)
        );
    }

    #[test]
    fn min_length_factor() {
        assert_eq!(PreferenceWeights::default().min_length_factor(), 1.0);

        let w = PreferenceWeights::default()
            .with_road_type(RoadType::Motorway, 10.0)
            .with_unlit(5.0);
        assert_eq!(w.min_length_factor(), 1.0);

        let w = PreferenceWeights::default()
            .with_road_type(RoadType::Path, 0.5)
            .with_unlit(0.8)
            .with_scenic(2.0);
        assert!((w.min_length_factor() - 0.5 * 0.8 * 0.2).abs() < 1e-12);
    }
}

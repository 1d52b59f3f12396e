// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use super::{PreferenceWeights, WeightsError};
use crate::Edge;

/// An edge evaluated to a cost which is not a positive, finite number.
///
/// This points to corrupted edge data or weights which bypassed validation.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("edge {edge} evaluated to invalid cost: {cost}")]
pub struct InvalidCost {
    pub edge: i64,
    pub cost: f64,
}

/// Turns [Edges](Edge) into traversal costs during a route search.
///
/// Implementations must be pure: the same edge must always evaluate to the same cost.
pub trait EdgeCost {
    /// Returns the (positive) cost of traversing `edge`.
    fn cost(&self, edge: &Edge) -> Result<f64, InvalidCost>;

    /// Returns a number `f` such that `cost(edge) >= f * edge.length` for every valid edge.
    ///
    /// Used to scale the A* heuristic. Returning 0 disables the heuristic.
    fn min_length_factor(&self) -> f64 {
        0.0
    }

    /// Checks the configuration of this cost function before any edge is evaluated.
    fn validate(&self) -> Result<(), WeightsError> {
        Ok(())
    }
}

/// Computes the cost of traversing an [Edge] under the provided [PreferenceWeights].
///
/// Starting from the edge length, applies (in order) the multiplier for the edge's
/// road type, the "unlit" multiplier for edges without lighting, and the "scenic"
/// multiplier scaled by `(11 - scenic_score) / 10`. The last factor ranges from 1.1 for
/// a scenic score of 0 to 0.1 for a scenic score of 10, so a scenic preference makes
/// more scenic edges relatively cheaper.
pub fn evaluate(edge: &Edge, weights: &PreferenceWeights) -> Result<f64, InvalidCost> {
    let mut cost = edge.length;

    if let Some(m) = weights.get(super::Dimension::RoadType(edge.road_type)) {
        cost *= m;
    }

    if !edge.lit {
        if let Some(m) = weights.get(super::Dimension::Unlit) {
            cost *= m;
        }
    }

    if let Some(m) = weights.active_scenic() {
        cost *= ((11.0 - edge.scenic_score) / 10.0) * m;
    }

    if cost > 0.0 && cost.is_finite() {
        Ok(cost)
    } else {
        Err(InvalidCost {
            edge: edge.id,
            cost,
        })
    }
}

impl EdgeCost for PreferenceWeights {
    fn cost(&self, edge: &Edge) -> Result<f64, InvalidCost> {
        evaluate(edge, self)
    }

    fn min_length_factor(&self) -> f64 {
        PreferenceWeights::min_length_factor(self)
    }

    fn validate(&self) -> Result<(), WeightsError> {
        PreferenceWeights::validate(self)
    }
}

/// Uses the physical edge length as the cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicalLength;

impl EdgeCost for PhysicalLength {
    fn cost(&self, edge: &Edge) -> Result<f64, InvalidCost> {
        Ok(edge.length)
    }

    fn min_length_factor(&self) -> f64 {
        1.0
    }
}

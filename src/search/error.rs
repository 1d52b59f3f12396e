// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use crate::{InvalidCost, WeightsError};

/// Recommended number of allowed node expansions in [find_route](crate::find_route)
/// before [RouteError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions which may occur during [find_route](crate::find_route) or
/// [find_route_with](crate::find_route_with).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// The start or end node doesn't exist in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(i64),

    /// The end node is not reachable from the start node.
    #[error("no path exists from node {start} to node {end}")]
    NoPathExists { start: i64, end: i64 },

    /// At least one preference multiplier is not a positive, finite number.
    #[error("invalid preference weights: {0}")]
    InvalidWeights(#[from] WeightsError),

    /// An edge evaluated to a non-positive cost.
    #[error(transparent)]
    InvalidCost(#[from] InvalidCost),

    /// Route search has exceeded its limit of steps.
    /// Either the nodes are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole reachable graph,
    /// which can result in a denial-of-service. The step limit protects
    /// against resource exhaustion.
    #[error("step limit exceeded")]
    StepLimitExceeded,

    /// Route search did not finish before [SearchOptions::deadline](crate::SearchOptions::deadline).
    #[error("search deadline exceeded")]
    DeadlineExceeded,
}

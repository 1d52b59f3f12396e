// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::route::{self, RouteResult};
use crate::{EdgeCost, Graph, PreferenceWeights};

mod error;
mod label_setting;

pub use error::{RouteError, DEFAULT_STEP_LIMIT};
pub(crate) use label_setting::{Label, SearchTree};

/// Shortest path algorithm used by [find_route_with].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Plain [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm).
    #[default]
    Dijkstra,

    /// [A*](https://en.wikipedia.org/wiki/A*_search_algorithm), guided by the
    /// great-circle distance to the end node. The estimate is scaled down so that it
    /// never exceeds the real remaining cost, so results match [Algorithm::Dijkstra].
    AStar,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dijkstra => write!(f, "dijkstra"),
            Self::AStar => write!(f, "a-star"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dijkstra" => Ok(Self::Dijkstra),
            "a-star" | "astar" => Ok(Self::AStar),
            _ => Err(format!("unknown algorithm: {:?}", s)),
        }
    }
}

/// Additional controls for a single route search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub algorithm: Algorithm,

    /// Limits how many nodes may be expanded before [RouteError::StepLimitExceeded]
    /// is returned. Concluding that no route exists requires expanding all nodes
    /// reachable from the start, which can be very time-consuming on large graphs.
    pub step_limit: Option<usize>,

    /// Point in time after which the search gives up with [RouteError::DeadlineExceeded].
    /// Checked between node expansions.
    pub deadline: Option<Instant>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Dijkstra,
            step_limit: Some(DEFAULT_STEP_LIMIT),
            deadline: None,
        }
    }
}

/// Finds the cheapest route between two nodes under the provided [PreferenceWeights],
/// using Dijkstra's algorithm and the [DEFAULT_STEP_LIMIT].
///
/// Weights are validated before the graph is touched: any multiplier which is not
/// positive and finite results in [RouteError::InvalidWeights].
pub fn find_route(
    g: &Graph,
    start_id: i64,
    end_id: i64,
    weights: &PreferenceWeights,
) -> Result<RouteResult, RouteError> {
    find_route_with(g, start_id, end_id, weights, &SearchOptions::default())
}

/// Finds the cheapest route between two nodes with an arbitrary [EdgeCost] function
/// and [SearchOptions].
///
/// Routing from a node to itself returns an empty route.
pub fn find_route_with<C: EdgeCost + ?Sized>(
    g: &Graph,
    start_id: i64,
    end_id: i64,
    cost_fn: &C,
    options: &SearchOptions,
) -> Result<RouteResult, RouteError> {
    cost_fn.validate()?;

    let start = g
        .index_of(start_id)
        .ok_or(RouteError::NodeNotFound(start_id))?;
    let end = g.index_of(end_id).ok_or(RouteError::NodeNotFound(end_id))?;

    let tree = label_setting::search(g, start, end, cost_fn, options)?;
    Ok(route::assemble(g, &tree))
}

// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::search::{Label, SearchTree};
use crate::{Edge, Graph, RoadType, TrafficLevel};

/// One traversed [Edge] of a [RouteResult], with its classification attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub edge_id: i64,
    pub source: i64,
    pub target: i64,

    /// Physical length of the segment, in meters.
    pub length: f64,

    /// Route cost accumulated from the start up to the end of this segment.
    pub cumulative_cost: f64,

    pub road_type: RoadType,
    pub lit: bool,
    pub scenic_score: f64,
    pub traffic_level: TrafficLevel,
    pub safety_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RouteSegment {
    fn new(edge: &Edge, cumulative_cost: f64) -> Self {
        Self {
            edge_id: edge.id,
            source: edge.source,
            target: edge.target,
            length: edge.length,
            cumulative_cost,
            road_type: edge.road_type,
            lit: edge.lit,
            scenic_score: edge.scenic_score,
            traffic_level: edge.traffic_level,
            safety_score: edge.safety_score,
            name: edge.name.clone(),
        }
    }

    pub fn is_scenic(&self) -> bool {
        self.scenic_score > crate::SCENIC_THRESHOLD
    }
}

/// The cheapest route between two nodes.
///
/// `total_cost` is the number the search minimized and has no physical meaning;
/// `total_length` is the distance actually travelled, in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub start: i64,
    pub end: i64,
    pub segments: Vec<RouteSegment>,
    pub total_cost: f64,
    pub total_length: f64,
}

impl RouteResult {
    /// Whether the route has no segments (start and end are the same node).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn edge_ids(&self) -> Vec<i64> {
        self.segments.iter().map(|s| s.edge_id).collect()
    }

    /// Returns all visited node ids, from start to end.
    pub fn node_ids(&self) -> Vec<i64> {
        std::iter::once(self.start)
            .chain(self.segments.iter().map(|s| s.target))
            .collect()
    }

    pub fn length_km(&self) -> f64 {
        self.total_length / 1000.0
    }

    pub fn lit_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.lit).count()
    }

    /// Number of segments with a scenic score above [SCENIC_THRESHOLD](crate::SCENIC_THRESHOLD).
    pub fn scenic_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.is_scenic()).count()
    }
}

/// Walks the predecessor edges from the settled end node back to the start.
///
/// Costs are taken from the search labels as-is, so `total_cost` is exactly
/// the value the search minimized.
pub(crate) fn assemble(g: &Graph, tree: &SearchTree) -> RouteResult {
    let mut segments = Vec::new();
    let mut total_length = 0.0;
    let mut at = tree.end;

    let total_cost = label_cost(&tree.labels[at]);

    while let Some(edge_idx) = label_via(&tree.labels[at]) {
        let edge = g.edge_at(edge_idx);
        segments.push(RouteSegment::new(edge, label_cost(&tree.labels[at])));
        total_length += edge.length;
        at = g.ends_at(edge_idx).0;
    }

    segments.reverse();
    RouteResult {
        start: g.node_at(at).id,
        end: g.node_at(tree.end).id,
        segments,
        total_cost,
        total_length,
    }
}

fn label_cost(label: &Label) -> f64 {
    match *label {
        Label::Frontier { cost, .. } | Label::Settled { cost, .. } => cost,
        Label::Unvisited => f64::INFINITY,
    }
}

fn label_via(label: &Label) -> Option<usize> {
    match *label {
        Label::Frontier { via, .. } | Label::Settled { via, .. } => via,
        Label::Unvisited => None,
    }
}

// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

//! Semantic routing over road networks.
//!
//! A road network is loaded once into an immutable [Graph] of [Nodes](Node)
//! and directed [Edges](Edge). Every route request carries its own
//! [PreferenceWeights] ("avoid unlit streets", "prefer scenic paths"), which are turned
//! into per-edge costs while the search runs, so the same graph can be re-routed
//! under any preference set without rebuilding anything.
//!
//! # Example
//!
//! ```no_run
//! use strider::{NodeLocator, PreferenceWeights, RoadType};
//!
//! let options = strider::snapshot::Options {
//!     file_format: strider::snapshot::FileFormat::Unknown,
//! };
//! let g = strider::snapshot::load_from_file(&options, "path/to/guelph.json.gz")
//!     .expect("failed to load the graph snapshot");
//!
//! let tree = strider::KDTree::from_graph(&g).expect("graph has no nodes");
//! let start = tree.nearest_node(43.5448, -80.2482).expect("graph has no nodes");
//! let end = tree.nearest_node(43.5320, -80.2247).expect("graph has no nodes");
//!
//! let weights = PreferenceWeights::default()
//!     .with_road_type(RoadType::Primary, 10.0)
//!     .with_unlit(5.0)
//!     .with_scenic(0.5);
//!
//! let route = strider::find_route(&g, start, end, &weights)
//!     .expect("failed to find route");
//!
//! println!("{:.1} km, cost {:.1}", route.length_km(), route.total_cost);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod cost;
mod distance;
pub mod geojson;
pub mod graph;
pub mod interpret;
mod kd;
mod route;
mod search;
pub mod snapshot;

pub use cost::{evaluate, EdgeCost, InvalidCost, PhysicalLength, PreferenceWeights, WeightsError};
pub use distance::earth_distance;
pub use graph::{load_graph, Generation, Graph, GraphHandle, GraphRegistry, LoadError, NotFound};
pub use interpret::{interpret_preferences, InterpretedPreferences, PreferenceInterpreter};
pub use kd::{KDTree, NodeLocator};
pub use route::{RouteResult, RouteSegment};
pub use search::{
    find_route, find_route_with, Algorithm, RouteError, SearchOptions, DEFAULT_STEP_LIMIT,
};

/// Represents an intersection or an endpoint in the road network.
///
/// Nodes are created when a [Graph] is loaded and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,

    /// Identifier of the feature this node was derived from (e.g. an OSM node id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<i64>,

    pub lat: f64,
    pub lon: f64,
}

/// Category of a road segment, as used by [PreferenceWeights] road-type multipliers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    Service,
    LivingStreet,
    Pedestrian,
    Track,
    Path,
    Footway,
    Cycleway,
    Steps,
}

impl RoadType {
    pub const ALL: [RoadType; 15] = [
        RoadType::Motorway,
        RoadType::Trunk,
        RoadType::Primary,
        RoadType::Secondary,
        RoadType::Tertiary,
        RoadType::Unclassified,
        RoadType::Residential,
        RoadType::Service,
        RoadType::LivingStreet,
        RoadType::Pedestrian,
        RoadType::Track,
        RoadType::Path,
        RoadType::Footway,
        RoadType::Cycleway,
        RoadType::Steps,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoadType::Motorway => "motorway",
            RoadType::Trunk => "trunk",
            RoadType::Primary => "primary",
            RoadType::Secondary => "secondary",
            RoadType::Tertiary => "tertiary",
            RoadType::Unclassified => "unclassified",
            RoadType::Residential => "residential",
            RoadType::Service => "service",
            RoadType::LivingStreet => "living_street",
            RoadType::Pedestrian => "pedestrian",
            RoadType::Track => "track",
            RoadType::Path => "path",
            RoadType::Footway => "footway",
            RoadType::Cycleway => "cycleway",
            RoadType::Steps => "steps",
        }
    }
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoadType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|rt| rt.as_str() == s).ok_or(())
    }
}

/// Ordered traffic volume on a road segment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Represents a one-way road segment from `source` to `target`.
///
/// A two-way road is stored as two edges with swapped endpoints, which allows
/// each direction to carry its own attributes (see [Edge::reversed]).
///
/// `length` is in meters and must be positive. `scenic_score` and `safety_score`
/// must lie within `0.0..=10.0`. Both invariants are checked by [load_graph].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: i64,
    pub source: i64,
    pub target: i64,
    pub length: f64,
    pub road_type: RoadType,

    #[serde(default)]
    pub lit: bool,

    #[serde(default = "default_scenic_score")]
    pub scenic_score: f64,

    #[serde(default)]
    pub traffic_level: TrafficLevel,

    #[serde(default = "default_safety_score")]
    pub safety_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<i64>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

fn default_scenic_score() -> f64 {
    1.0
}

fn default_safety_score() -> f64 {
    5.0
}

impl Edge {
    /// Creates an edge with default attributes: unlit, scenic score 1,
    /// low traffic, safety score 5 and no tags.
    pub fn new(id: i64, source: i64, target: i64, length: f64, road_type: RoadType) -> Self {
        Self {
            id,
            source,
            target,
            length,
            road_type,
            lit: false,
            scenic_score: default_scenic_score(),
            traffic_level: TrafficLevel::Low,
            safety_score: default_safety_score(),
            name: None,
            external_id: None,
            tags: HashMap::default(),
        }
    }

    /// Returns the same segment traversed in the opposite direction, under a new `id`.
    pub fn reversed(&self, id: i64) -> Self {
        Self {
            id,
            source: self.target,
            target: self.source,
            ..self.clone()
        }
    }

    /// Whether the segment counts as scenic in route summaries.
    pub fn is_scenic(&self) -> bool {
        self.scenic_score > SCENIC_THRESHOLD
    }
}

/// Scenic score above which a segment is reported as scenic.
pub const SCENIC_THRESHOLD: f64 = 7.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn road_type_round_trips_through_str() {
        for rt in RoadType::ALL {
            assert_eq!(rt.as_str().parse::<RoadType>(), Ok(rt));
        }
        assert!("highway".parse::<RoadType>().is_err());
    }

    #[test]
    fn edge_defaults_from_json() {
        let e: Edge = serde_json::from_str(
            r#"{"id": 1, "source": 10, "target": 11, "length": 12.5, "road_type": "living_street"}"#,
        )
        .unwrap();
        assert_eq!(e, Edge::new(1, 10, 11, 12.5, RoadType::LivingStreet));
        assert_eq!(e.scenic_score, 1.0);
        assert_eq!(e.safety_score, 5.0);
        assert!(!e.lit);
    }

    #[test]
    fn edge_reversed() {
        let mut e = Edge::new(1, 10, 11, 12.5, RoadType::Path);
        e.lit = true;
        let r = e.reversed(2);
        assert_eq!(r.id, 2);
        assert_eq!(r.source, 11);
        assert_eq!(r.target, 10);
        assert!(r.lit);
        assert_eq!(r.length, 12.5);
    }
}

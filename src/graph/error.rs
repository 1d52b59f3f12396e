// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use std::fmt;

/// Structural problems in node and edge data which prevent a [Graph](crate::Graph)
/// from being published.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(i64),

    #[error("duplicate edge id: {0}")]
    DuplicateEdgeId(i64),

    #[error("edge {edge} references missing node {node}")]
    DanglingEdgeReference { edge: i64, node: i64 },

    #[error("edge {edge} has non-positive length: {length}")]
    NonPositiveLength { edge: i64, length: f64 },

    #[error("edge {0} starts and ends at the same node")]
    SelfLoop(i64),

    #[error("node {node} has invalid coordinates: lat {lat}, lon {lon}")]
    InvalidCoordinate { node: i64, lat: f64, lon: f64 },

    #[error("edge {edge} has {score} score outside of 0..=10: {value}")]
    ScoreOutOfRange { edge: i64, score: Score, value: f64 },
}

/// Bounded edge score attribute, see [LoadError::ScoreOutOfRange].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Scenic,
    Safety,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scenic => write!(f, "scenic"),
            Self::Safety => write!(f, "safety"),
        }
    }
}

/// Lookup of an identifier which is not present in a [Graph](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotFound {
    #[error("node not found: {0}")]
    Node(i64),

    #[error("edge not found: {0}")]
    Edge(i64),
}

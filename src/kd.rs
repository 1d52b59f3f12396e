// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use crate::distance::meridian_distance;
use crate::{earth_distance, Graph, Node};

/// Snaps an arbitrary position to a node of the road network.
///
/// Route requests usually start from coordinates; [find_route](crate::find_route)
/// needs node ids. Implementations are free to use any spatial index.
pub trait NodeLocator {
    /// Returns the id of the node closest to the given position,
    /// or `None` if there are no candidate nodes.
    fn nearest_node(&self, lat: f64, lon: f64) -> Option<i64>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    lat: f64,
    lon: f64,
    id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Lat,
    Lon,
}

impl Axis {
    fn flip(self) -> Self {
        match self {
            Axis::Lat => Axis::Lon,
            Axis::Lon => Axis::Lat,
        }
    }

    fn of(self, lat: f64, lon: f64) -> f64 {
        match self {
            Axis::Lat => lat,
            Axis::Lon => lon,
        }
    }
}

/// Static [k-d tree](https://en.wikipedia.org/wiki/K-d_tree) over node positions.
///
/// The tree is implicit: all points live in one array, the median of every sub-slice
/// splits that subtree, with the "below" branch to its left and the "above" branch
/// to its right. Levels alternate between latitude and longitude, starting with latitude.
///
/// Equally distant nodes resolve to the lowest id. Positions across the ante meridian
/// (180°/-180° longitude) are not considered neighbors.
#[derive(Debug, Clone)]
pub struct KDTree {
    points: Vec<Point>,
}

impl KDTree {
    /// Indexes all nodes of a [Graph]. Returns `None` if the graph has no nodes.
    pub fn from_graph(g: &Graph) -> Option<Self> {
        Self::from_nodes(g.iter().copied())
    }

    /// Indexes arbitrary [Nodes](Node). Returns `None` if there are none.
    pub fn from_nodes<I: IntoIterator<Item = Node>>(nodes: I) -> Option<Self> {
        let mut points: Vec<Point> = nodes
            .into_iter()
            .map(|n| Point {
                lat: n.lat,
                lon: n.lon,
                id: n.id,
            })
            .collect();

        if points.is_empty() {
            None
        } else {
            arrange(&mut points, Axis::Lat);
            Some(Self { points })
        }
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl NodeLocator for KDTree {
    fn nearest_node(&self, lat: f64, lon: f64) -> Option<i64> {
        let mut best: Option<(f64, i64)> = None;
        descend(&self.points, Axis::Lat, lat, lon, &mut best);
        best.map(|(_, id)| id)
    }
}

/// Reorders `points` into the implicit tree layout.
fn arrange(points: &mut [Point], axis: Axis) {
    if points.len() < 2 {
        return;
    }

    let mid = points.len() / 2;
    points.select_nth_unstable_by(mid, |a, b| {
        axis.of(a.lat, a.lon).total_cmp(&axis.of(b.lat, b.lon))
    });

    let (below, rest) = points.split_at_mut(mid);
    arrange(below, axis.flip());
    arrange(&mut rest[1..], axis.flip());
}

fn descend(points: &[Point], axis: Axis, lat: f64, lon: f64, best: &mut Option<(f64, i64)>) {
    if points.is_empty() {
        return;
    }

    let mid = points.len() / 2;
    let pivot = points[mid];

    let dist = earth_distance(lat, lon, pivot.lat, pivot.lon);
    let improves = match *best {
        None => true,
        Some((d, id)) => dist < d || (dist == d && pivot.id < id),
    };
    if improves {
        *best = Some((dist, pivot.id));
    }

    let (below, above) = (&points[..mid], &points[mid + 1..]);
    let (near, far) = if axis.of(lat, lon) < axis.of(pivot.lat, pivot.lon) {
        (below, above)
    } else {
        (above, below)
    };

    descend(near, axis.flip(), lat, lon, best);

    // Every point on the far side is at least this far away
    let to_split = match axis {
        Axis::Lat => earth_distance(lat, lon, pivot.lat, lon),
        Axis::Lon => meridian_distance(lat, lon, pivot.lon),
    };
    if best.map_or(true, |(d, _)| to_split <= d) {
        descend(far, axis.flip(), lat, lon, best);
    }
}

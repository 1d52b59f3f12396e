// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use super::{Algorithm, RouteError, SearchOptions};
use crate::{earth_distance, EdgeCost, Graph, Node};

/// Search state of a single node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Label {
    Unvisited,

    /// Reached with a tentative `cost` over the edge at position `via`.
    Frontier { cost: f64, via: Option<usize> },

    /// Reached with the final, minimal `cost` over the edge at position `via`.
    Settled { cost: f64, via: Option<usize> },
}

/// Labels left behind by a successful search, with the end node settled.
#[derive(Debug, Clone)]
pub(crate) struct SearchTree {
    pub(crate) labels: Vec<Label>,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: usize,
    id: i64,
    cost: f64,
    score: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for QueueItem {}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores (and lower node ids on ties) are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Straight-line lower bound of the remaining cost to the end node.
struct Heuristic {
    factor: f64,
    lat: f64,
    lon: f64,
}

impl Heuristic {
    fn new<C: EdgeCost + ?Sized>(g: &Graph, end: &Node, cost_fn: &C, algorithm: Algorithm) -> Self {
        let factor = match algorithm {
            Algorithm::Dijkstra => 0.0,
            // cost >= min_length_factor * length >= min_length_factor * ratio * crow-flies distance
            Algorithm::AStar => (cost_fn.min_length_factor() * g.geodesic_ratio()).max(0.0),
        };
        Self {
            factor,
            lat: end.lat,
            lon: end.lon,
        }
    }

    fn estimate(&self, node: &Node) -> f64 {
        if self.factor == 0.0 {
            0.0
        } else {
            self.factor * earth_distance(node.lat, node.lon, self.lat, self.lon)
        }
    }
}

/// Runs a label-setting shortest path search from `start` until `end` is settled.
///
/// Nodes are extracted from the frontier by lowest tentative cost (plus the heuristic
/// estimate for [Algorithm::AStar]), with ties broken by lower node id.
pub(crate) fn search<C: EdgeCost + ?Sized>(
    g: &Graph,
    start: usize,
    end: usize,
    cost_fn: &C,
    options: &SearchOptions,
) -> Result<SearchTree, RouteError> {
    let heuristic = Heuristic::new(g, g.node_at(end), cost_fn, options.algorithm);

    let mut labels = vec![Label::Unvisited; g.len()];
    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut steps: usize = 0;

    labels[start] = Label::Frontier {
        cost: 0.0,
        via: None,
    };
    queue.push(QueueItem {
        at: start,
        id: g.node_at(start).id,
        cost: 0.0,
        score: heuristic.estimate(g.node_at(start)),
    });

    while let Some(item) = queue.pop() {
        // Contrary to the textbook definition, the queue might contain outdated items
        // for nodes which were reached more cheaply later on.
        let via = match labels[item.at] {
            Label::Frontier { cost, via } if cost == item.cost => via,
            _ => continue,
        };
        labels[item.at] = Label::Settled {
            cost: item.cost,
            via,
        };

        if item.at == end {
            log::debug!(
                "{:?} search {} -> {} settled after {} steps, cost {}",
                options.algorithm,
                g.node_at(start).id,
                item.id,
                steps,
                item.cost
            );
            return Ok(SearchTree { labels, end });
        }

        steps += 1;
        if options.step_limit.is_some_and(|limit| steps > limit) {
            return Err(RouteError::StepLimitExceeded);
        }
        if options.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(RouteError::DeadlineExceeded);
        }

        log::trace!("expanding node {} at cost {}", item.id, item.cost);

        for &edge_idx in g.outgoing_at(item.at) {
            let (_, to) = g.ends_at(edge_idx);

            let known_cost = match labels[to] {
                Label::Settled { .. } => continue,
                Label::Frontier { cost, .. } => cost,
                Label::Unvisited => f64::INFINITY,
            };

            // Check if this is the cheapest way to the neighbor
            let cost = item.cost + cost_fn.cost(g.edge_at(edge_idx))?;
            if cost >= known_cost {
                continue;
            }

            labels[to] = Label::Frontier {
                cost,
                via: Some(edge_idx),
            };
            let neighbor = g.node_at(to);
            queue.push(QueueItem {
                at: to,
                id: neighbor.id,
                cost,
                score: cost + heuristic.estimate(neighbor),
            });
        }
    }

    log::debug!(
        "{:?} search {} -> {} exhausted the frontier after {} steps",
        options.algorithm,
        g.node_at(start).id,
        g.node_at(end).id,
        steps
    );
    Err(RouteError::NoPathExists {
        start: g.node_at(start).id,
        end: g.node_at(end).id,
    })
}

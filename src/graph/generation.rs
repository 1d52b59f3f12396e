// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use parking_lot::RwLock;

use super::{load_graph, GraphHandle, LoadError};
use crate::{Edge, Node};

/// One published snapshot of the road network.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Sequence number of this snapshot, starting at 1 and increasing with every publish.
    pub number: u64,
    pub graph: GraphHandle,
}

/// Holds the [Generation] new searches should run against.
///
/// Publishing replaces the whole graph at once. Searches which already obtained
/// a [Generation] keep using it until they finish, regardless of later publishes.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    current: RwLock<Option<Generation>>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently published [Generation], if any.
    pub fn current(&self) -> Option<Generation> {
        self.current.read().clone()
    }

    /// Makes `graph` the current generation.
    pub fn publish(&self, graph: GraphHandle) -> Generation {
        let mut current = self.current.write();
        let number = current.as_ref().map_or(1, |g| g.number + 1);
        let generation = Generation { number, graph };
        *current = Some(generation.clone());
        log::info!(
            "published graph generation {} ({} nodes, {} edges)",
            number,
            generation.graph.len(),
            generation.graph.edge_count()
        );
        generation
    }

    /// Builds a new graph from the provided data and publishes it.
    ///
    /// If the data is invalid, nothing is published and the previous
    /// generation (if any) stays current.
    pub fn reload<N, E>(&self, nodes: N, edges: E) -> Result<Generation, LoadError>
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        match load_graph(nodes, edges) {
            Ok(graph) => Ok(self.publish(graph)),
            Err(e) => {
                log::warn!(
                    "graph reload rejected, keeping generation {:?}: {}",
                    self.current.read().as_ref().map(|g| g.number),
                    e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::graph::tests::node;
    use crate::{find_route, PreferenceWeights, RoadType};

    fn line(length: f64) -> (Vec<Node>, Vec<Edge>) {
        (
            vec![node(1, 43.0, -80.0), node(2, 43.0, -79.99)],
            vec![Edge::new(1, 1, 2, length, RoadType::Residential)],
        )
    }

    #[test]
    fn empty_registry() {
        assert!(GraphRegistry::new().current().is_none());
    }

    #[test]
    fn reload_increments_generation() {
        let registry = GraphRegistry::new();
        let (nodes, edges) = line(1000.0);
        assert_eq!(registry.reload(nodes, edges).unwrap().number, 1);
        let (nodes, edges) = line(2000.0);
        assert_eq!(registry.reload(nodes, edges).unwrap().number, 2);

        let current = registry.current().unwrap();
        assert_eq!(current.number, 2);
        assert_eq!(current.graph.edge(1).unwrap().length, 2000.0);
    }

    #[test]
    fn failed_reload_keeps_previous_generation() {
        let registry = GraphRegistry::new();
        let (nodes, edges) = line(1000.0);
        registry.reload(nodes, edges).unwrap();

        let (nodes, edges) = line(-5.0);
        assert!(registry.reload(nodes, edges).is_err());

        let current = registry.current().unwrap();
        assert_eq!(current.number, 1);
        assert_eq!(current.graph.edge(1).unwrap().length, 1000.0);
    }

    #[test]
    fn in_flight_searches_keep_their_generation() {
        let registry = GraphRegistry::new();
        let (nodes, edges) = line(1000.0);
        let old = registry.reload(nodes, edges).unwrap();

        let (nodes, edges) = line(3000.0);
        registry.reload(nodes, edges).unwrap();

        let route = find_route(&old.graph, 1, 2, &PreferenceWeights::default()).unwrap();
        assert_eq!(route.total_length, 1000.0);
        assert_eq!(Arc::strong_count(&old.graph), 1);
    }

    #[test]
    fn concurrent_searches_see_whole_generations() {
        let registry = GraphRegistry::new();
        let (nodes, edges) = line(1000.0);
        registry.reload(nodes, edges).unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        let current = registry.current().unwrap();
                        let route =
                            find_route(&current.graph, 1, 2, &PreferenceWeights::default())
                                .unwrap();
                        let expected = current.graph.edge(1).unwrap().length;
                        assert_eq!(route.total_length, expected);
                        assert_eq!(route.total_cost, expected);
                    }
                });
            }

            s.spawn(|| {
                for i in 2..50 {
                    let (nodes, edges) = line(1000.0 * i as f64);
                    registry.reload(nodes, edges).unwrap();
                }
            });
        });

        assert_eq!(registry.current().unwrap().number, 49);
    }
}

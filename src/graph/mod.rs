// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

use std::collections::hash_map::{Entry, HashMap};
use std::sync::Arc;

use crate::{earth_distance, Edge, Node};

mod error;
mod generation;

pub use error::{LoadError, NotFound, Score};
pub use generation::{Generation, GraphRegistry};

/// Shared, read-only reference to one loaded [Graph].
pub type GraphHandle = Arc<Graph>;

/// Represents a road network as a set of [Nodes](Node)
/// and directed [Edges](Edge) between them.
///
/// Nodes and edges live in dense arrays; identifiers are only translated into
/// array positions at the API boundary. A graph never changes after
/// [load_graph] returns it, so any number of searches may share it.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<i64, usize>,
    edge_index: HashMap<i64, usize>,

    /// Outgoing edges of node `i` are `outgoing[offsets[i]..offsets[i + 1]]`.
    offsets: Vec<usize>,
    outgoing: Vec<usize>,
    edge_ends: Vec<(usize, usize)>,

    /// Lowest ratio of edge length to the great-circle distance between its endpoints,
    /// capped at 1.
    geodesic_ratio: f64,
}

/// Validates nodes and edges and builds an immutable [Graph] from them.
///
/// Fails on the first structural problem found: duplicate identifiers, edges
/// referencing unknown nodes, self-loops, non-positive lengths, invalid coordinates
/// or scores outside of `0.0..=10.0`.
pub fn load_graph<N, E>(nodes: N, edges: E) -> Result<GraphHandle, LoadError>
where
    N: IntoIterator<Item = Node>,
    E: IntoIterator<Item = Edge>,
{
    let g = Graph::build(nodes, edges)?;
    log::info!(
        "loaded graph with {} nodes and {} edges",
        g.len(),
        g.edge_count()
    );
    Ok(Arc::new(g))
}

impl Graph {
    fn build<N, E>(nodes: N, edges: E) -> Result<Self, LoadError>
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        let mut g = Self {
            geodesic_ratio: 1.0,
            ..Self::default()
        };

        for node in nodes {
            g.push_node(node)?;
        }
        for edge in edges {
            g.push_edge(edge)?;
        }

        g.build_adjacency();
        g.geodesic_ratio = g.compute_geodesic_ratio();
        Ok(g)
    }

    fn push_node(&mut self, node: Node) -> Result<(), LoadError> {
        let valid_position = node.lat.is_finite()
            && node.lon.is_finite()
            && (-90.0..=90.0).contains(&node.lat)
            && (-180.0..=180.0).contains(&node.lon);
        if !valid_position {
            return Err(LoadError::InvalidCoordinate {
                node: node.id,
                lat: node.lat,
                lon: node.lon,
            });
        }

        match self.node_index.entry(node.id) {
            Entry::Occupied(_) => Err(LoadError::DuplicateNodeId(node.id)),
            Entry::Vacant(e) => {
                e.insert(self.nodes.len());
                self.nodes.push(node);
                Ok(())
            }
        }
    }

    fn push_edge(&mut self, edge: Edge) -> Result<(), LoadError> {
        // NaN lengths fail this check too
        if !(edge.length > 0.0 && edge.length.is_finite()) {
            return Err(LoadError::NonPositiveLength {
                edge: edge.id,
                length: edge.length,
            });
        }
        if edge.source == edge.target {
            return Err(LoadError::SelfLoop(edge.id));
        }
        check_score(edge.id, Score::Scenic, edge.scenic_score)?;
        check_score(edge.id, Score::Safety, edge.safety_score)?;

        let source = self.endpoint_index(edge.id, edge.source)?;
        let target = self.endpoint_index(edge.id, edge.target)?;

        match self.edge_index.entry(edge.id) {
            Entry::Occupied(_) => Err(LoadError::DuplicateEdgeId(edge.id)),
            Entry::Vacant(e) => {
                e.insert(self.edges.len());
                self.edges.push(edge);
                self.edge_ends.push((source, target));
                Ok(())
            }
        }
    }

    fn endpoint_index(&self, edge_id: i64, node_id: i64) -> Result<usize, LoadError> {
        self.node_index
            .get(&node_id)
            .copied()
            .ok_or(LoadError::DanglingEdgeReference {
                edge: edge_id,
                node: node_id,
            })
    }

    /// Groups edge positions by their source node (counting sort, stable in load order).
    fn build_adjacency(&mut self) {
        let mut offsets = vec![0; self.nodes.len() + 1];
        for &(source, _) in &self.edge_ends {
            offsets[source + 1] += 1;
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        let mut cursor = offsets.clone();
        let mut outgoing = vec![0; self.edges.len()];
        for (edge_idx, &(source, _)) in self.edge_ends.iter().enumerate() {
            outgoing[cursor[source]] = edge_idx;
            cursor[source] += 1;
        }

        self.offsets = offsets;
        self.outgoing = outgoing;
    }

    fn compute_geodesic_ratio(&self) -> f64 {
        self.edges
            .iter()
            .zip(&self.edge_ends)
            .filter_map(|(edge, &(s, t))| {
                let (a, b) = (&self.nodes[s], &self.nodes[t]);
                let geodesic = earth_distance(a.lat, a.lon, b.lat, b.lon);
                if geodesic > 0.0 {
                    Some(edge.length / geodesic)
                } else {
                    None
                }
            })
            .fold(1.0, f64::min)
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of (directed) edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns an iterator over all [Edges](Edge) in the graph, in load order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Retrieves a [Node] with the provided id.
    pub fn node(&self, id: i64) -> Result<&Node, NotFound> {
        self.node_index
            .get(&id)
            .map(|&idx| &self.nodes[idx])
            .ok_or(NotFound::Node(id))
    }

    /// Retrieves an [Edge] with the provided id.
    pub fn edge(&self, id: i64) -> Result<&Edge, NotFound> {
        self.edge_index
            .get(&id)
            .map(|&idx| &self.edges[idx])
            .ok_or(NotFound::Edge(id))
    }

    /// Returns all outgoing [Edges](Edge) of a node together with the node each one leads to.
    ///
    /// The order of returned pairs is unspecified.
    pub fn neighbors(&self, id: i64) -> Result<impl Iterator<Item = (&Edge, &Node)>, NotFound> {
        let idx = self.index_of(id).ok_or(NotFound::Node(id))?;
        Ok(self
            .outgoing_at(idx)
            .iter()
            .map(move |&e| (&self.edges[e], &self.nodes[self.edge_ends[e].1])))
    }

    pub(crate) fn index_of(&self, id: i64) -> Option<usize> {
        self.node_index.get(&id).copied()
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn edge_at(&self, idx: usize) -> &Edge {
        &self.edges[idx]
    }

    /// Positions of edges leaving the node at position `idx`.
    pub(crate) fn outgoing_at(&self, idx: usize) -> &[usize] {
        &self.outgoing[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Positions of the source and target nodes of the edge at position `idx`.
    pub(crate) fn ends_at(&self, idx: usize) -> (usize, usize) {
        self.edge_ends[idx]
    }

    pub(crate) fn geodesic_ratio(&self) -> f64 {
        self.geodesic_ratio
    }
}

fn check_score(edge: i64, score: Score, value: f64) -> Result<(), LoadError> {
    if (0.0..=10.0).contains(&value) {
        Ok(())
    } else {
        Err(LoadError::ScoreOutOfRange { edge, score, value })
    }
}

// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

//! Conversion of a [RouteResult] into a [GeoJSON](https://geojson.org/) FeatureCollection
//! for map display.

use serde_json::{json, Value};

use crate::{Graph, RouteResult};

/// Provides the shape of road segments.
///
/// Geometries are not part of the routing [Graph]; they usually come from the
/// same store the graph was loaded from.
pub trait EdgeGeometry {
    /// Returns `[lon, lat]` positions of an edge, ordered in its direction of travel.
    fn edge_geometry(&self, edge_id: i64) -> Option<Vec<[f64; 2]>>;
}

/// Approximates every edge by a straight line between its two nodes.
#[derive(Debug, Clone, Copy)]
pub struct StraightSegments<'a>(pub &'a Graph);

impl EdgeGeometry for StraightSegments<'_> {
    fn edge_geometry(&self, edge_id: i64) -> Option<Vec<[f64; 2]>> {
        let edge = self.0.edge(edge_id).ok()?;
        let from = self.0.node(edge.source).ok()?;
        let to = self.0.node(edge.target).ok()?;
        Some(vec![[from.lon, from.lat], [to.lon, to.lat]])
    }
}

/// Builds a FeatureCollection with a single LineString feature covering the whole route.
///
/// Segments without a geometry are left out of the line, but are still listed in the
/// feature properties. An empty route produces an empty FeatureCollection.
pub fn feature_collection<G: EdgeGeometry + ?Sized>(route: &RouteResult, geometry: &G) -> Value {
    if route.is_empty() {
        return json!({
            "type": "FeatureCollection",
            "features": []
        });
    }

    let mut coordinates: Vec<[f64; 2]> = Vec::new();
    for segment in &route.segments {
        if let Some(points) = geometry.edge_geometry(segment.edge_id) {
            // Consecutive segments share their connecting point
            let skip = match (coordinates.last(), points.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            coordinates.extend(points.into_iter().skip(skip));
        }
    }

    let segments: Vec<Value> = route
        .segments
        .iter()
        .enumerate()
        .map(|(seq, s)| {
            json!({
                "seq": seq + 1,
                "edge_id": s.edge_id,
                "type": s.road_type,
                "name": s.name,
                "length_m": round_to(s.length, 1),
                "lit": s.lit,
                "scenic_score": s.scenic_score,
                "traffic_level": s.traffic_level,
                "safety_score": s.safety_score
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": coordinates
                },
                "properties": {
                    "distance_m": round_to(route.total_length, 1),
                    "distance_km": round_to(route.length_km(), 2),
                    "total_cost": route.total_cost,
                    "segment_count": route.segments.len(),
                    "lit_segments": route.lit_segments(),
                    "scenic_segments": route.scenic_segments(),
                    "segments": segments
                }
            }
        ]
    })
}

fn round_to(x: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (x * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::graph::tests::node;
    use crate::{find_route, load_graph, Edge, PreferenceWeights, RoadType};

    fn graph() -> crate::GraphHandle {
        let nodes = vec![
            node(1, 43.54, -80.25),
            node(2, 43.54, -80.249),
            node(3, 43.541, -80.249),
        ];
        let mut edges = vec![
            Edge::new(1, 1, 2, 123.44, RoadType::Residential),
            Edge::new(2, 2, 3, 211.0, RoadType::Footway),
        ];
        edges[0].lit = true;
        edges[1].scenic_score = 7.5;
        edges[1].name = Some("Royal City Park".to_string());
        load_graph(nodes, edges).unwrap()
    }

    #[test]
    fn straight_segments() {
        let g = graph();
        let route = find_route(&g, 1, 3, &PreferenceWeights::default()).unwrap();
        let fc = feature_collection(&route, &StraightSegments(&g));

        assert_eq!(fc["type"], "FeatureCollection");
        let feature = &fc["features"][0];
        assert_eq!(feature["geometry"]["type"], "LineString");
        assert_eq!(
            feature["geometry"]["coordinates"],
            json!([[-80.25, 43.54], [-80.249, 43.54], [-80.249, 43.541]])
        );

        let props = &feature["properties"];
        assert_eq!(props["distance_m"], 334.4);
        assert_eq!(props["distance_km"], 0.33);
        assert_eq!(props["segment_count"], 2);
        assert_eq!(props["lit_segments"], 1);
        assert_eq!(props["scenic_segments"], 1);
        assert_eq!(props["segments"][0]["seq"], 1);
        assert_eq!(props["segments"][0]["length_m"], 123.4);
        assert_eq!(props["segments"][1]["type"], "footway");
        assert_eq!(props["segments"][1]["name"], "Royal City Park");
    }

    #[test]
    fn external_geometry() {
        struct Stored(HashMap<i64, Vec<[f64; 2]>>);

        impl EdgeGeometry for Stored {
            fn edge_geometry(&self, edge_id: i64) -> Option<Vec<[f64; 2]>> {
                self.0.get(&edge_id).cloned()
            }
        }

        let g = graph();
        let route = find_route(&g, 1, 3, &PreferenceWeights::default()).unwrap();
        let stored = Stored(HashMap::from([(
            1,
            vec![[-80.25, 43.54], [-80.2495, 43.5401], [-80.249, 43.54]],
        )]));

        let fc = feature_collection(&route, &stored);
        assert_eq!(
            fc["features"][0]["geometry"]["coordinates"],
            json!([[-80.25, 43.54], [-80.2495, 43.5401], [-80.249, 43.54]])
        );
        assert_eq!(fc["features"][0]["properties"]["segment_count"], 2);
    }

    #[test]
    fn empty_route() {
        let g = graph();
        let route = find_route(&g, 2, 2, &PreferenceWeights::default()).unwrap();
        let fc = feature_collection(&route, &StraightSegments(&g));
        assert_eq!(fc, json!({"type": "FeatureCollection", "features": []}));
    }
}

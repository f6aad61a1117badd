//! Route result and summary.
//!
//! A [`PlannedRoute`] is derived per query and never stored: the ordered
//! node and edge sequences, the line geometry, and totals computed from the
//! graph's true edge lengths.

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, GeometryValue, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::json;

use fr_core::{EdgeId, NodeId};

use crate::network::RoadGraph;

/// Derived totals of a route.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Sum of true edge lengths, in coordinate units.
    pub length: f64,
    pub num_edges: usize,
    /// Edges on the route flagged hazardous.
    pub hazard_edges: usize,
    pub num_nodes: usize,
    /// Haversine length in metres, for display only.
    pub approx_length_m: f64,
    /// Total penalised cost the search minimised.
    pub cost: f64,
}

/// Response metadata record, named as consumed by the request layer.
///
/// `length_m` carries [`RouteSummary::length`] (coordinate units).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    pub length_m: f64,
    pub num_edges: usize,
    pub avoided_edges: usize,
}

impl RouteSummary {
    pub fn meta(&self) -> RouteMeta {
        RouteMeta {
            length_m: self.length,
            num_edges: self.num_edges,
            avoided_edges: self.hazard_edges,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlannedRoute {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub geometry: LineString<f64>,
    pub summary: RouteSummary,
}

impl PlannedRoute {
    /// Walk `edges` from `start` and collect nodes, geometry and totals.
    pub(crate) fn from_edges(
        graph: &RoadGraph,
        start: NodeId,
        edges: Vec<EdgeId>,
        cost: f64,
    ) -> Self {
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(start);
        let mut length = 0.0;
        let mut approx_length_m = 0.0;
        let mut hazard_edges = 0;

        let mut cur = start;
        for &e in &edges {
            let (a, b) = graph.endpoints(e);
            let next = if a == cur { b } else { a };
            length += graph.edge_length[e.index()];
            approx_length_m += graph.position(cur).haversine_m(graph.position(next));
            if graph.is_hazardous(e) {
                hazard_edges += 1;
            }
            nodes.push(next);
            cur = next;
        }

        let mut coords: Vec<Coord<f64>> = nodes.iter().map(|&n| graph.position(n).into()).collect();
        // Same start and end node: repeat the point so the line stays valid.
        if coords.len() == 1 {
            coords.push(coords[0]);
        }

        PlannedRoute {
            summary: RouteSummary {
                length,
                num_edges: edges.len(),
                hazard_edges,
                num_nodes: nodes.len(),
                approx_length_m,
                cost,
            },
            nodes,
            edges,
            geometry: LineString::new(coords),
        }
    }

    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// GeoJSON LineString feature with `length` and `nodes` properties.
    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("length".to_string(), json!(self.summary.length));
        properties.insert("nodes".to_string(), json!(self.summary.num_nodes));

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeometryValue::from(&self.geometry))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: vec![self.to_feature()],
            foreign_members: None,
        }
    }
}

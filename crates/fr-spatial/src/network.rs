//! Road graph representation.
//!
//! # Data layout
//!
//! Edges are **undirected**: one logical edge per physical segment, indexed
//! by `EdgeId`, with its endpoints, length, hazard flag and pass-through
//! properties stored in parallel arrays.
//!
//! Traversal goes through a **Compressed Sparse Row (CSR)** adjacency of
//! directed arcs, two per edge.  The arcs leaving node `n` occupy
//!
//! ```text
//! arc_edge[ node_arc_start[n] .. node_arc_start[n+1] ]
//! ```
//!
//! Both arcs of an edge point at the same `EdgeId`, so cost and hazard flag
//! are identical in both directions.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over `[lon, lat]` node positions answers
//! nearest-node queries in planar degree space.

use std::sync::Arc;

use geo::Line;
use geojson::JsonObject;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use fr_core::{CoordPrecision, EdgeId, GeoPoint, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lon, lat]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared planar distance in lon/lat space, identical to
    /// [`GeoPoint::planar_distance_2`].
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Edge view ─────────────────────────────────────────────────────────────────

/// Borrowed view of one edge, handed to cost models.
#[derive(Copy, Clone, Debug)]
pub struct EdgeRef<'a> {
    pub id: EdgeId,
    pub length: f64,
    pub hazardous: bool,
    pub properties: Option<&'a JsonObject>,
}

/// Edge as produced by the builder, before CSR construction.
pub(crate) struct RawEdge {
    pub(crate) a: NodeId,
    pub(crate) b: NodeId,
    pub(crate) length: f64,
    pub(crate) properties: Option<Arc<JsonObject>>,
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Undirected road graph in CSR form plus a node spatial index.
///
/// Built by [`GraphBuilder`](crate::GraphBuilder), stamped once with
/// [`annotate_hazards`](Self::annotate_hazards), then shared read-only.
pub struct RoadGraph {
    /// Position of each node, indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer; length `node_count + 1`.
    pub node_arc_start: Vec<u32>,
    /// Edge behind each arc.
    pub arc_edge: Vec<EdgeId>,
    /// Head node of each arc.
    pub arc_to: Vec<NodeId>,

    /// First endpoint of each edge (the lower `NodeId`).
    pub edge_a: Vec<NodeId>,
    /// Second endpoint of each edge.
    pub edge_b: Vec<NodeId>,
    /// Planar length in coordinate units, recomputed from the endpoints.
    pub edge_length: Vec<f64>,

    pub(crate) edge_hazard: Vec<bool>,
    edge_props: Vec<Option<Arc<JsonObject>>>,

    precision: CoordPrecision,
    spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    /// A graph with no nodes or edges.  Every route query against it fails
    /// with [`SpatialError::EmptyGraph`](crate::SpatialError::EmptyGraph).
    pub fn empty() -> Self {
        Self::from_parts(CoordPrecision::default(), Vec::new(), Vec::new())
    }

    pub(crate) fn from_parts(
        precision: CoordPrecision,
        nodes: Vec<GeoPoint>,
        edges: Vec<RawEdge>,
    ) -> Self {
        let node_count = nodes.len();

        // Degree count, then prefix sum.
        let mut node_arc_start = vec![0u32; node_count + 1];
        for e in &edges {
            node_arc_start[e.a.index() + 1] += 1;
            node_arc_start[e.b.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_arc_start[i] += node_arc_start[i - 1];
        }

        // Fill arcs in EdgeId order so adjacency order is deterministic.
        let arc_count = edges.len() * 2;
        let mut cursor: Vec<u32> = node_arc_start[..node_count].to_vec();
        let mut arc_edge = vec![EdgeId::INVALID; arc_count];
        let mut arc_to = vec![NodeId::INVALID; arc_count];
        for (i, e) in edges.iter().enumerate() {
            let id = EdgeId(i as u32);
            for (from, to) in [(e.a, e.b), (e.b, e.a)] {
                let slot = cursor[from.index()] as usize;
                arc_edge[slot] = id;
                arc_to[slot] = to;
                cursor[from.index()] += 1;
            }
        }

        let spatial_idx = RTree::bulk_load(
            nodes
                .iter()
                .enumerate()
                .map(|(i, p)| NodeEntry {
                    point: [p.lon, p.lat],
                    id: NodeId(i as u32),
                })
                .collect(),
        );

        let mut edge_a = Vec::with_capacity(edges.len());
        let mut edge_b = Vec::with_capacity(edges.len());
        let mut edge_length = Vec::with_capacity(edges.len());
        let mut edge_props = Vec::with_capacity(edges.len());
        for e in edges {
            edge_a.push(e.a);
            edge_b.push(e.b);
            edge_length.push(e.length);
            edge_props.push(e.properties);
        }
        let edge_hazard = vec![false; edge_a.len()];

        RoadGraph {
            node_pos: nodes,
            node_arc_start,
            arc_edge,
            arc_to,
            edge_a,
            edge_b,
            edge_length,
            edge_hazard,
            edge_props,
            precision,
            spatial_idx,
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn hazard_edge_count(&self) -> usize {
        self.edge_hazard.iter().filter(|&&h| h).count()
    }

    /// Coordinate-identity rule the graph was built with.
    pub fn precision(&self) -> CoordPrecision {
        self.precision
    }

    // ── Element access ────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    /// Node at exactly `p` under the graph's coordinate-identity rule.
    pub fn node_at(&self, p: GeoPoint) -> Option<NodeId> {
        let key = self.precision.key(p);
        self.node_pos
            .iter()
            .position(|&q| self.precision.key(q) == key)
            .map(|i| NodeId(i as u32))
    }

    #[inline]
    pub fn is_hazardous(&self, edge: EdgeId) -> bool {
        self.edge_hazard[edge.index()]
    }

    pub fn properties(&self, edge: EdgeId) -> Option<&JsonObject> {
        self.edge_props[edge.index()].as_deref()
    }

    #[inline]
    pub fn edge(&self, edge: EdgeId) -> EdgeRef<'_> {
        EdgeRef {
            id: edge,
            length: self.edge_length[edge.index()],
            hazardous: self.edge_hazard[edge.index()],
            properties: self.properties(edge),
        }
    }

    #[inline]
    pub fn endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        (self.edge_a[edge.index()], self.edge_b[edge.index()])
    }

    /// Edge connecting `a` and `b`, in either direction.
    pub fn find_edge(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.arcs(a).find(|&(_, to)| to == b).map(|(e, _)| e)
    }

    /// Straight segment between the endpoints of `edge`.
    pub fn segment(&self, edge: EdgeId) -> Line<f64> {
        let (a, b) = self.endpoints(edge);
        Line::new(self.position(a), self.position(b))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// `(edge, neighbour)` pairs for every arc leaving `node`.
    #[inline]
    pub fn arcs(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        let start = self.node_arc_start[node.index()] as usize;
        let end = self.node_arc_start[node.index() + 1] as usize;
        (start..end).map(|i| (self.arc_edge[i], self.arc_to[i]))
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.node_arc_start[node.index()] as usize;
        let end = self.node_arc_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Node nearest to `p` by planar distance in lon/lat space.
    ///
    /// Ties go to the lowest `NodeId`.  Returns `None` only if the graph has
    /// no nodes.
    pub fn nearest_node(&self, p: GeoPoint) -> Option<NodeId> {
        let query = [p.lon, p.lat];
        let mut iter = self.spatial_idx.nearest_neighbor_iter(&query);
        let first = iter.next()?;
        let best_d2 = first.distance_2(&query);
        let mut best = first.id;
        // Entries come out in non-decreasing distance; scan the equidistant run.
        for entry in iter {
            if entry.distance_2(&query) > best_d2 {
                break;
            }
            best = best.min(entry.id);
        }
        Some(best)
    }

    /// Linear-scan equivalent of [`nearest_node`](Self::nearest_node).
    pub fn nearest_node_linear(&self, p: GeoPoint) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (i, &q) in self.node_pos.iter().enumerate() {
            let d2 = q.planar_distance_2(p);
            if best.is_none_or(|(_, b)| d2 < b) {
                best = Some((NodeId(i as u32), d2));
            }
        }
        best.map(|(id, _)| id)
    }
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self::empty()
    }
}

//! Road graph construction from line geometries.
//!
//! Every input line is decomposed into consecutive vertex pairs.  Each
//! vertex is resolved to a node by coordinate identity (see
//! [`CoordPrecision`]), and each pair becomes one undirected edge whose
//! length is recomputed from the endpoint coordinates.
//!
//! When several segments join the same node pair, the shortest one is kept
//! and the others are dropped.  Segments whose two vertices resolve to the
//! same node are dropped as well.

use std::sync::Arc;

use geo::{LineString, MultiLineString};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject};
use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use fr_core::{CoordKey, CoordPrecision, EdgeId, GeoPoint, NodeId};

use crate::io;
use crate::network::{RawEdge, RoadGraph};
use crate::{SpatialError, SpatialResult};

/// Counters collected while building, logged when the graph is finished.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub features: usize,
    pub lines: usize,
    pub skipped_non_line: usize,
    pub skipped_short_lines: usize,
    pub skipped_degenerate_segments: usize,
    pub segments: usize,
    pub parallel_discarded: usize,
}

/// Incrementally construct a [`RoadGraph`].
///
/// Feed it a GeoJSON document with [`build`](Self::build), or individual
/// segments with [`add_segment`](Self::add_segment) followed by
/// [`finish`](Self::finish).
///
/// # Example
///
/// ```
/// use fr_core::GeoPoint;
/// use fr_spatial::GraphBuilder;
///
/// let mut b = GraphBuilder::new();
/// b.add_segment(GeoPoint::new(19.940, 50.060), GeoPoint::new(19.941, 50.060), None);
/// b.add_segment(GeoPoint::new(19.941, 50.060), GeoPoint::new(19.941, 50.061), None);
/// let graph = b.finish().unwrap();
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// ```
pub struct GraphBuilder {
    precision: CoordPrecision,
    nodes: Vec<GeoPoint>,
    node_ids: FxHashMap<CoordKey, NodeId>,
    edges: Vec<RawEdge>,
    edge_ids: FxHashMap<(NodeId, NodeId), EdgeId>,
    stats: BuildStats,
}

impl GraphBuilder {
    /// Builder with exact coordinate identity.
    pub fn new() -> Self {
        Self::with_precision(CoordPrecision::Exact)
    }

    pub fn with_precision(precision: CoordPrecision) -> Self {
        Self {
            precision,
            nodes: Vec::new(),
            node_ids: FxHashMap::default(),
            edges: Vec::new(),
            edge_ids: FxHashMap::default(),
            stats: BuildStats::default(),
        }
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return the node for `p`, creating it on first sight.
    pub fn resolve_node(&mut self, p: GeoPoint) -> NodeId {
        let key = self.precision.key(p);
        if let Some(&id) = self.node_ids.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(p);
        self.node_ids.insert(key, id);
        id
    }

    /// Add one segment between `a` and `b`.
    ///
    /// Returns the edge now connecting the two nodes, or `None` if both
    /// vertices resolve to the same node.  When an edge already connects the
    /// pair it keeps whichever of the two is shorter, along with that
    /// segment's properties.
    pub fn add_segment(
        &mut self,
        a: GeoPoint,
        b: GeoPoint,
        properties: Option<Arc<JsonObject>>,
    ) -> Option<EdgeId> {
        if self.precision.same(a, b) {
            self.stats.skipped_degenerate_segments += 1;
            return None;
        }
        let u = self.resolve_node(a);
        let v = self.resolve_node(b);
        let (lo, hi) = if u < v { (u, v) } else { (v, u) };
        let length = self.nodes[u.index()].planar_distance(self.nodes[v.index()]);
        self.stats.segments += 1;

        if let Some(&existing) = self.edge_ids.get(&(lo, hi)) {
            let edge = &mut self.edges[existing.index()];
            if length < edge.length {
                edge.length = length;
                edge.properties = properties;
            }
            self.stats.parallel_discarded += 1;
            return Some(existing);
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(RawEdge { a: lo, b: hi, length, properties });
        self.edge_ids.insert((lo, hi), id);
        Some(id)
    }

    /// Add every consecutive vertex pair of `line`.  Lines with fewer than
    /// two vertices are skipped.
    pub fn add_line(&mut self, line: &LineString<f64>, properties: Option<Arc<JsonObject>>) {
        if line.0.len() < 2 {
            self.stats.skipped_short_lines += 1;
            return;
        }
        self.stats.lines += 1;
        for w in line.0.windows(2) {
            self.add_segment(w[0].into(), w[1].into(), properties.clone());
        }
    }

    pub fn add_multi_line(
        &mut self,
        lines: &MultiLineString<f64>,
        properties: Option<Arc<JsonObject>>,
    ) {
        for line in lines {
            self.add_line(line, properties.clone());
        }
    }

    /// Add one feature.  Non-line geometries are skipped with a warning;
    /// features without geometry are skipped silently.
    pub fn add_feature(&mut self, feature: &Feature) {
        self.stats.features += 1;
        let Some(geometry) = feature.geometry.as_ref() else {
            debug!("skipping road feature without geometry");
            return;
        };
        let properties = feature.properties.clone().map(Arc::new);
        match io::to_geo(geometry) {
            Some(geo::Geometry::LineString(line)) => self.add_line(&line, properties),
            Some(geo::Geometry::MultiLineString(lines)) => self.add_multi_line(&lines, properties),
            Some(other) => {
                self.stats.skipped_non_line += 1;
                warn!("skipping unsupported road geometry type {}", io::type_name(&other));
            }
            None => {
                self.stats.skipped_non_line += 1;
                warn!("skipping road geometry that cannot be converted");
            }
        }
    }

    pub fn add_collection(&mut self, collection: &FeatureCollection) {
        for feature in &collection.features {
            self.add_feature(feature);
        }
    }

    /// Build a graph from a GeoJSON document.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::MalformedInput`] if `input` is not a
    ///   `FeatureCollection`.
    /// - [`SpatialError::EmptyInput`] if no usable line geometry was found.
    pub fn build(mut self, input: &GeoJson) -> SpatialResult<RoadGraph> {
        let collection = io::feature_collection(input, "road")?;
        self.add_collection(collection);
        self.finish()
    }

    /// [`build`](Self::build), but an input without usable geometry yields
    /// [`RoadGraph::empty`] instead of an error.
    pub fn build_or_empty(self, input: &GeoJson) -> SpatialResult<RoadGraph> {
        match self.build(input) {
            Err(SpatialError::EmptyInput { .. }) => Ok(RoadGraph::empty()),
            other => other,
        }
    }

    /// Consume the builder.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyInput`] if no edge was added.
    pub fn finish(self) -> SpatialResult<RoadGraph> {
        let s = self.stats;
        debug!(
            "road input: {} features, {} lines, {} segments, {} non-line skipped, \
             {} short lines skipped, {} degenerate segments, {} parallel segments collapsed",
            s.features,
            s.lines,
            s.segments,
            s.skipped_non_line,
            s.skipped_short_lines,
            s.skipped_degenerate_segments,
            s.parallel_discarded,
        );
        if self.edges.is_empty() {
            warn!("road input contains no usable line geometry");
            return Err(SpatialError::EmptyInput { what: "road" });
        }
        info!(
            "road graph built: {} nodes, {} edges (coordinate identity: {})",
            self.nodes.len(),
            self.edges.len(),
            self.precision,
        );
        Ok(RoadGraph::from_parts(self.precision, self.nodes, self.edges))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

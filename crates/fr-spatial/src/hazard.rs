//! Hazard-zone index and edge annotation.
//!
//! Polygons are indexed by their bounding rectangles in an R-tree.  An
//! intersection test first collects the rectangles overlapping the query
//! segment's bounding box, then runs an exact `geo::Intersects` check on
//! those candidates only.  MultiPolygons are split so that each member gets
//! its own rectangle.

use geo::{BoundingRect, Intersects, Line, Polygon};
use geojson::GeoJson;
use log::{debug, info};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};
use serde::Serialize;

use fr_core::EdgeId;

use crate::io;
use crate::network::RoadGraph;
use crate::SpatialResult;

/// R-tree entry: polygon bounding box + index into `HazardIndex::polygons`.
type ZoneItem = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Immutable spatial index over hazard polygons.
pub struct HazardIndex {
    polygons: Vec<Polygon<f64>>,
    /// Source feature index of each polygon.
    zone_of: Vec<usize>,
    tree: RTree<ZoneItem>,
}

/// Outcome of [`RoadGraph::annotate_hazards`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HazardStats {
    pub num_edges: usize,
    pub num_flooded_edges: usize,
    pub num_polygons: usize,
}

impl HazardIndex {
    /// An index over zero polygons; every test returns `false`.
    pub fn empty() -> Self {
        Self::from_zones(Vec::new())
    }

    /// Build from a GeoJSON `FeatureCollection` of Polygon / MultiPolygon
    /// features.  Other geometry types are ignored.
    ///
    /// # Errors
    ///
    /// [`SpatialError::MalformedInput`](crate::SpatialError::MalformedInput)
    /// if `input` is not a `FeatureCollection`.  An empty collection is not
    /// an error.
    pub fn build(input: &GeoJson) -> SpatialResult<Self> {
        let collection = io::feature_collection(input, "hazard")?;
        let mut zones = Vec::new();
        for (zone, feature) in collection.features.iter().enumerate() {
            let Some(geometry) = feature.geometry.as_ref() else {
                continue;
            };
            match io::to_geo(geometry) {
                Some(geo::Geometry::Polygon(p)) => zones.push((zone, p)),
                Some(geo::Geometry::MultiPolygon(mp)) => {
                    zones.extend(mp.0.into_iter().map(|p| (zone, p)));
                }
                Some(other) => {
                    debug!("ignoring hazard geometry of type {}", io::type_name(&other));
                }
                None => debug!("ignoring hazard geometry that cannot be converted"),
            }
        }
        let index = Self::from_zones(zones);
        info!(
            "hazard index built: {} polygons from {} features",
            index.polygon_count(),
            collection.features.len()
        );
        Ok(index)
    }

    /// Index polygons directly; each one is its own zone.
    pub fn from_polygons(polygons: impl IntoIterator<Item = Polygon<f64>>) -> Self {
        Self::from_zones(polygons.into_iter().enumerate().collect())
    }

    fn from_zones(zones: Vec<(usize, Polygon<f64>)>) -> Self {
        let mut polygons = Vec::with_capacity(zones.len());
        let mut zone_of = Vec::with_capacity(zones.len());
        let mut items = Vec::with_capacity(zones.len());
        for (zone, polygon) in zones {
            // Empty rings have no extent and cannot intersect anything.
            let Some(rect) = polygon.bounding_rect() else {
                continue;
            };
            let envelope = Rectangle::from_corners(
                [rect.min().x, rect.min().y],
                [rect.max().x, rect.max().y],
            );
            items.push(GeomWithData::new(envelope, polygons.len()));
            polygons.push(polygon);
            zone_of.push(zone);
        }
        HazardIndex {
            polygons,
            zone_of,
            tree: RTree::bulk_load(items),
        }
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// `true` if `segment` touches the boundary or interior of any polygon.
    pub fn intersects(&self, segment: &Line<f64>) -> bool {
        self.candidates(segment)
            .into_iter()
            .any(|i| segment.intersects(&self.polygons[i]))
    }

    /// Source feature indices of every zone `segment` touches, ascending and
    /// deduplicated.
    pub fn intersecting_zones(&self, segment: &Line<f64>) -> Vec<usize> {
        let mut zones: Vec<usize> = self
            .candidates(segment)
            .into_iter()
            .filter(|&i| segment.intersects(&self.polygons[i]))
            .map(|i| self.zone_of[i])
            .collect();
        zones.sort_unstable();
        zones.dedup();
        zones
    }

    fn candidates(&self, segment: &Line<f64>) -> Vec<usize> {
        let r = segment.bounding_rect();
        let aabb = AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]);
        self.tree
            .locate_in_envelope_intersecting(&aabb)
            .map(|item| item.data)
            .collect()
    }
}

impl Default for HazardIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl RoadGraph {
    /// Set every edge's hazard flag from `index`, replacing earlier flags.
    ///
    /// An edge is hazardous if the straight segment between its endpoints
    /// touches any polygon; grazing contact counts.
    pub fn annotate_hazards(&mut self, index: &HazardIndex) -> HazardStats {
        let flags = hazard_flags(self, index);
        let num_flooded_edges = flags.iter().filter(|&&f| f).count();
        self.edge_hazard = flags;

        let stats = HazardStats {
            num_edges: self.edge_count(),
            num_flooded_edges,
            num_polygons: index.polygon_count(),
        };
        info!(
            "hazard annotation: {} / {} edges flooded ({} polygons)",
            stats.num_flooded_edges, stats.num_edges, stats.num_polygons
        );
        stats
    }
}

#[cfg(feature = "parallel")]
fn hazard_flags(graph: &RoadGraph, index: &HazardIndex) -> Vec<bool> {
    use rayon::prelude::*;

    if index.is_empty() {
        return vec![false; graph.edge_count()];
    }
    (0..graph.edge_count())
        .into_par_iter()
        .map(|i| index.intersects(&graph.segment(EdgeId(i as u32))))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn hazard_flags(graph: &RoadGraph, index: &HazardIndex) -> Vec<bool> {
    if index.is_empty() {
        return vec![false; graph.edge_count()];
    }
    (0..graph.edge_count())
        .map(|i| index.intersects(&graph.segment(EdgeId(i as u32))))
        .collect()
}

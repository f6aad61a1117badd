//! Unit tests for fr-spatial.
//!
//! Networks are built from inline GeoJSON or hand-placed segments, so no
//! data files are needed.

#[cfg(test)]
mod helpers {
    use geo::{Polygon, Rect};
    use geojson::{FeatureCollection, GeoJson};
    use serde_json::{json, Value};

    use crate::parse_geojson;

    // Four corners of a ~110 m square in Kraków.
    pub const A: [f64; 2] = [19.940, 50.060];
    pub const B: [f64; 2] = [19.941, 50.060];
    pub const C: [f64; 2] = [19.941, 50.061];
    pub const D: [f64; 2] = [19.940, 50.061];

    pub fn line(coords: &[[f64; 2]]) -> Value {
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "LineString", "coordinates": coords },
        })
    }

    pub fn named_line(name: &str, coords: &[[f64; 2]]) -> Value {
        json!({
            "type": "Feature",
            "properties": { "name": name },
            "geometry": { "type": "LineString", "coordinates": coords },
        })
    }

    pub fn rect_feature(min: [f64; 2], max: [f64; 2]) -> Value {
        json!({
            "type": "Feature",
            "properties": { "hazard": "flood" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [min[0], min[1]],
                    [min[0], max[1]],
                    [max[0], max[1]],
                    [max[0], min[1]],
                    [min[0], min[1]],
                ]],
            },
        })
    }

    pub fn rect(min: [f64; 2], max: [f64; 2]) -> Polygon<f64> {
        Rect::new((min[0], min[1]), (max[0], max[1])).to_polygon()
    }

    pub fn collection(features: Vec<Value>) -> GeoJson {
        let doc = json!({ "type": "FeatureCollection", "features": features });
        parse_geojson(&doc.to_string()).unwrap()
    }

    pub fn features(doc: &GeoJson) -> &FeatureCollection {
        match doc {
            GeoJson::FeatureCollection(fc) => fc,
            _ => panic!("not a FeatureCollection"),
        }
    }

    /// A–B–C–D–A square, one feature per side.
    pub fn square_roads() -> GeoJson {
        collection(vec![
            named_line("A", &[A, B]),
            named_line("B", &[B, C]),
            named_line("C", &[C, D]),
            named_line("D", &[D, A]),
        ])
    }

    /// Flood box that crosses only side B–C of the square.
    pub fn flood_on_bc() -> GeoJson {
        collection(vec![rect_feature([19.9408, 50.0603], [19.9412, 50.0607])])
    }
}

// ── Graph construction ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use std::collections::HashSet;

    use fr_core::{CoordPrecision, GeoPoint, NodeId};
    use serde_json::json;

    use super::helpers::*;
    use crate::{GraphBuilder, SpatialError};

    #[test]
    fn node_count_matches_distinct_endpoints() {
        let segments = [
            [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]],
            [[1.0, 0.0], [1.0, 1.0], [2.0, 0.0]],
        ];
        let doc = collection(segments.iter().map(|s| line(s)).collect());
        let graph = GraphBuilder::new().build(&doc).unwrap();

        let distinct: HashSet<(u64, u64)> = segments
            .iter()
            .flatten()
            .map(|c| (c[0].to_bits(), c[1].to_bits()))
            .collect();
        assert_eq!(graph.node_count(), distinct.len());
        assert_eq!(graph.edge_count(), 4);

        for i in 0..graph.edge_count() {
            let e = fr_core::EdgeId(i as u32);
            let (a, b) = graph.endpoints(e);
            let expected = graph.position(a).planar_distance(graph.position(b));
            assert_eq!(graph.edge_length[i], expected);
            assert!(graph.edge_length[i] >= 0.0);
        }
    }

    #[test]
    fn duplicate_segments_collapse_to_one_edge() {
        let doc = collection(vec![
            named_line("first", &[A, B]),
            named_line("second", &[A, B]),
            named_line("reversed", &[B, A]),
        ]);
        let graph = GraphBuilder::new().build(&doc).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let a = GeoPoint::new(A[0], A[1]);
        let b = GeoPoint::new(B[0], B[1]);
        assert_eq!(graph.edge_length[0], a.planar_distance(b));
        // Equal lengths: the first segment keeps its properties.
        let props = graph.properties(fr_core::EdgeId(0)).unwrap();
        assert_eq!(props["name"], json!("first"));
    }

    #[test]
    fn last_decimal_place_vertices_stay_distinct() {
        let nearly_one = 1.000_000_000_000_000_2;
        assert_ne!(nearly_one, 1.0);
        let doc = collection(vec![
            line(&[[0.0, 0.0], [1.0, 0.0]]),
            line(&[[nearly_one, 0.0], [2.0, 0.0]]),
        ]);

        let exact = GraphBuilder::new().build(&doc).unwrap();
        assert_eq!(exact.node_count(), 4);
        assert_eq!(exact.edge_count(), 2);

        let rounded = GraphBuilder::with_precision(CoordPrecision::Decimals(6))
            .build(&doc)
            .unwrap();
        assert_eq!(rounded.node_count(), 3);
        assert_eq!(rounded.precision(), CoordPrecision::Decimals(6));
        // The node keeps the coordinate that created it.
        assert_eq!(rounded.position(NodeId(1)), GeoPoint::new(1.0, 0.0));
    }

    #[test]
    fn non_line_geometries_are_skipped() {
        let doc = collection(vec![
            json!({
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            }),
            line(&[[0.0, 0.0], [1.0, 0.0]]),
            rect_feature([5.0, 5.0], [6.0, 6.0]),
            json!({ "type": "Feature", "properties": {}, "geometry": null }),
        ]);
        let mut b = GraphBuilder::new();
        b.add_collection(features(&doc));
        assert_eq!(b.stats().features, 4);
        assert_eq!(b.stats().skipped_non_line, 2);

        let graph = b.finish().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn multi_line_parts_are_decomposed() {
        let doc = collection(vec![json!({
            "type": "Feature",
            "properties": { "name": "split" },
            "geometry": {
                "type": "MultiLineString",
                "coordinates": [
                    [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]],
                    [[5.0, 5.0], [6.0, 5.0]],
                ],
            },
        })]);
        let graph = GraphBuilder::new().build(&doc).unwrap();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 3);
        for i in 0..3 {
            let props = graph.properties(fr_core::EdgeId(i)).unwrap();
            assert_eq!(props["name"], json!("split"));
        }
    }

    #[test]
    fn short_and_degenerate_input() {
        let doc = collection(vec![
            line(&[[0.0, 0.0]]),
            line(&[[3.0, 3.0], [3.0, 3.0], [4.0, 3.0]]),
        ]);
        let mut b = GraphBuilder::new();
        b.add_collection(features(&doc));
        assert_eq!(b.stats().skipped_short_lines, 1);
        assert_eq!(b.stats().skipped_degenerate_segments, 1);
        let graph = b.finish().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn no_usable_geometry_is_empty_input() {
        let doc = collection(vec![line(&[[0.0, 0.0]])]);
        let err = GraphBuilder::new().build(&doc).err().unwrap();
        assert!(matches!(err, SpatialError::EmptyInput { .. }));
        assert!(!err.is_fatal());

        let graph = GraphBuilder::new().build_or_empty(&doc).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);

        let empty = collection(vec![]);
        assert!(GraphBuilder::new().build_or_empty(&empty).unwrap().is_empty());
    }

    #[test]
    fn non_collection_is_malformed() {
        let feature = crate::parse_geojson(&line(&[A, B]).to_string()).unwrap();
        let err = GraphBuilder::new().build(&feature).err().unwrap();
        assert!(matches!(err, SpatialError::MalformedInput(_)));
        assert!(err.is_fatal());

        let err = crate::parse_geojson("{ not json").unwrap_err();
        assert!(matches!(err, SpatialError::MalformedInput(_)));
    }

    #[test]
    fn square_adjacency_is_symmetric() {
        let graph = GraphBuilder::new().build(&square_roads()).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        for n in 0..4 {
            assert_eq!(graph.degree(NodeId(n)), 2);
        }
        let (a, b) = (NodeId(0), NodeId(1));
        assert_eq!(graph.find_edge(a, b), graph.find_edge(b, a));
        assert!(graph.find_edge(NodeId(0), NodeId(2)).is_none());
        assert_eq!(graph.node_at(GeoPoint::new(C[0], C[1])), Some(NodeId(2)));
    }

    #[test]
    fn rebuild_is_deterministic() {
        let first = GraphBuilder::new().build(&square_roads()).unwrap();
        let second = GraphBuilder::new().build(&square_roads()).unwrap();
        assert_eq!(first.node_pos, second.node_pos);
        assert_eq!(first.edge_a, second.edge_a);
        assert_eq!(first.edge_b, second.edge_b);
        assert_eq!(first.arc_to, second.arc_to);
    }
}

// ── Nearest-node resolution ───────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use fr_core::{GeoPoint, NodeId};

    use super::helpers::*;
    use crate::{GraphBuilder, RoadGraph};

    #[test]
    fn exact_position_snaps_to_node() {
        let graph = GraphBuilder::new().build(&square_roads()).unwrap();
        assert_eq!(graph.nearest_node(GeoPoint::new(C[0], C[1])), Some(NodeId(2)));
    }

    #[test]
    fn nearest_by_planar_distance() {
        let graph = GraphBuilder::new().build(&square_roads()).unwrap();
        let near_b = GeoPoint::new(19.9409, 50.0601);
        assert_eq!(graph.nearest_node(near_b), Some(NodeId(1)));
        assert_eq!(graph.nearest_node_linear(near_b), Some(NodeId(1)));
    }

    #[test]
    fn tie_goes_to_first_seen_node() {
        // (2, 0) is seen first, so it is NodeId(0).
        let doc = collection(vec![line(&[[2.0, 0.0], [0.0, 0.0]])]);
        let graph = GraphBuilder::new().build(&doc).unwrap();
        let midpoint = GeoPoint::new(1.0, 0.0);
        assert_eq!(graph.nearest_node(midpoint), Some(NodeId(0)));
        assert_eq!(graph.nearest_node_linear(midpoint), Some(NodeId(0)));
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let graph = GraphBuilder::new().build(&square_roads()).unwrap();
        for i in 0..=20 {
            for j in 0..=20 {
                let p = GeoPoint::new(19.9395 + i as f64 * 0.0001, 50.0595 + j as f64 * 0.0001);
                assert_eq!(graph.nearest_node(p), graph.nearest_node_linear(p), "at {p}");
            }
        }
    }

    #[test]
    fn empty_graph_has_no_nearest() {
        let graph = RoadGraph::empty();
        assert!(graph.nearest_node(GeoPoint::new(0.0, 0.0)).is_none());
        assert!(graph.nearest_node_linear(GeoPoint::new(0.0, 0.0)).is_none());
    }
}

// ── Hazard index & annotation ─────────────────────────────────────────────────

#[cfg(test)]
mod hazard {
    use fr_core::{EdgeId, GeoPoint, NodeId};
    use geo::{Line, MultiPolygon, Polygon};
    use serde_json::json;

    use super::helpers::*;
    use crate::{GraphBuilder, HazardIndex, SpatialError};

    #[test]
    fn empty_collection_flags_nothing() {
        let index = HazardIndex::build(&collection(vec![])).unwrap();
        assert!(index.is_empty());

        let mut graph = GraphBuilder::new().build(&square_roads()).unwrap();
        let stats = graph.annotate_hazards(&index);
        assert_eq!(stats.num_edges, 4);
        assert_eq!(stats.num_flooded_edges, 0);
        assert_eq!(stats.num_polygons, 0);
        assert_eq!(graph.hazard_edge_count(), 0);
    }

    #[test]
    fn only_crossed_edge_is_flagged() {
        let index = HazardIndex::build(&flood_on_bc()).unwrap();
        let mut graph = GraphBuilder::new().build(&square_roads()).unwrap();
        let stats = graph.annotate_hazards(&index);
        assert_eq!(stats.num_flooded_edges, 1);

        let bc = graph.find_edge(NodeId(1), NodeId(2)).unwrap();
        assert!(graph.is_hazardous(bc));
        assert!(graph.edge(bc).hazardous);
        assert_eq!(graph.hazard_edge_count(), 1);
    }

    #[test]
    fn grazing_contact_counts() {
        let seg = Line::new((0.0, 0.0), (2.0, 0.0));
        let touching = Polygon::new(
            vec![(1.0, 0.0), (1.5, 1.0), (0.5, 1.0), (1.0, 0.0)].into(),
            vec![],
        );
        let clear = Polygon::new(
            vec![(1.0, 0.01), (1.5, 1.0), (0.5, 1.0), (1.0, 0.01)].into(),
            vec![],
        );
        assert!(HazardIndex::from_polygons([touching]).intersects(&seg));
        assert!(!HazardIndex::from_polygons([clear]).intersects(&seg));
    }

    #[test]
    fn segment_inside_polygon_counts() {
        let index = HazardIndex::from_polygons([rect([0.0, 0.0], [10.0, 10.0])]);
        assert!(index.intersects(&Line::new((2.0, 2.0), (3.0, 3.0))));
        assert!(!index.intersects(&Line::new((20.0, 2.0), (30.0, 3.0))));
    }

    #[test]
    fn adding_polygons_never_unflags() {
        let mut graph = GraphBuilder::new().build(&square_roads()).unwrap();
        let p1 = rect([19.9408, 50.0603], [19.9412, 50.0607]); // crosses B–C
        let p2 = rect([19.9403, 50.0608], [19.9406, 50.0612]); // crosses C–D

        graph.annotate_hazards(&HazardIndex::from_polygons([p1.clone()]));
        let before: Vec<bool> = (0..graph.edge_count())
            .map(|i| graph.is_hazardous(EdgeId(i as u32)))
            .collect();

        let stats = graph.annotate_hazards(&HazardIndex::from_polygons([p1, p2]));
        let after: Vec<bool> = (0..graph.edge_count())
            .map(|i| graph.is_hazardous(EdgeId(i as u32)))
            .collect();

        for (b, a) in before.iter().zip(&after) {
            assert!(!b || *a, "an edge lost its hazard flag");
        }
        assert_eq!(before.iter().filter(|&&f| f).count(), 1);
        assert_eq!(stats.num_flooded_edges, 2);
    }

    #[test]
    fn multipolygon_members_share_a_zone() {
        let mp = MultiPolygon::new(vec![
            rect([0.0, -1.0], [1.0, 1.0]),
            rect([3.0, -1.0], [4.0, 1.0]),
        ]);
        let doc = collection(vec![
            json!({
                "type": "Feature",
                "properties": {},
                "geometry": geojson::Geometry::new(geojson::GeometryValue::from(&mp)),
            }),
            rect_feature([10.0, -1.0], [11.0, 1.0]),
        ]);
        let index = HazardIndex::build(&doc).unwrap();
        assert_eq!(index.polygon_count(), 3);

        let short = Line::new((0.5, 0.0), (3.5, 0.0));
        assert_eq!(index.intersecting_zones(&short), vec![0]);
        let long = Line::new((0.5, 0.0), (10.5, 0.0));
        assert_eq!(index.intersecting_zones(&long), vec![0, 1]);
        let gap = Line::new((5.0, 0.0), (6.0, 0.0));
        assert!(index.intersecting_zones(&gap).is_empty());
    }

    #[test]
    fn non_polygon_hazards_are_ignored() {
        let doc = collection(vec![line(&[A, C])]);
        let index = HazardIndex::build(&doc).unwrap();
        assert_eq!(index.polygon_count(), 0);
        assert!(!index.intersects(&Line::new(
            GeoPoint::new(A[0], A[1]),
            GeoPoint::new(C[0], C[1])
        )));
    }

    #[test]
    fn non_collection_is_malformed() {
        let text = rect_feature([0.0, 0.0], [1.0, 1.0]).to_string();
        let feature = crate::parse_geojson(&text).unwrap();
        let err = HazardIndex::build(&feature).err().unwrap();
        assert!(matches!(err, SpatialError::MalformedInput(_)));
    }

    #[test]
    fn rebuild_hazard_counts_are_deterministic() {
        let index = HazardIndex::build(&flood_on_bc()).unwrap();
        let mut first = GraphBuilder::new().build(&square_roads()).unwrap();
        let mut second = GraphBuilder::new().build(&square_roads()).unwrap();
        let s1 = first.annotate_hazards(&index);
        let s2 = second.annotate_hazards(&index);
        assert_eq!(s1, s2);
        assert_eq!(first.node_count(), second.node_count());
        assert_eq!(first.edge_count(), second.edge_count());
    }
}

// ── Route planning ────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use fr_core::{GeoPoint, NodeId};

    use super::helpers::*;
    use crate::{
        EdgeCost, GraphBuilder, HazardIndex, HazardPenalty, LengthOnly, RoadGraph, RoutePlanner,
        SpatialError,
    };

    fn square(with_flood: bool) -> RoadGraph {
        let mut graph = GraphBuilder::new().build(&square_roads()).unwrap();
        if with_flood {
            graph.annotate_hazards(&HazardIndex::build(&flood_on_bc()).unwrap());
        }
        graph
    }

    /// Hazardous direct edge S–T of length 1 plus a safe detour via
    /// M = (0.5, `detour_height`).
    fn shortcut_vs_detour(detour_height: f64) -> RoadGraph {
        let s = GeoPoint::new(0.0, 0.0);
        let t = GeoPoint::new(1.0, 0.0);
        let m = GeoPoint::new(0.5, detour_height);
        let mut b = GraphBuilder::new();
        b.add_segment(s, t, None);
        b.add_segment(s, m, None);
        b.add_segment(m, t, None);
        let mut graph = b.finish().unwrap();
        graph.annotate_hazards(&HazardIndex::from_polygons([rect([0.4, -0.1], [0.6, 0.1])]));
        assert_eq!(graph.hazard_edge_count(), 1);
        graph
    }

    #[test]
    fn square_route_avoids_flooded_side() {
        let graph = square(true);
        let route = RoutePlanner::new()
            .route(&graph, A[1], A[0], C[1], C[0])
            .unwrap();
        // A=0, B=1, C=2, D=3
        assert_eq!(route.nodes, vec![NodeId(0), NodeId(3), NodeId(2)]);
        assert_eq!(route.summary.num_edges, 2);
        assert_eq!(route.summary.hazard_edges, 0);
        assert_eq!(route.summary.meta().avoided_edges, 0);
    }

    #[test]
    fn square_route_without_flood() {
        let graph = square(false);
        let route = RoutePlanner::new()
            .route(&graph, A[1], A[0], C[1], C[0])
            .unwrap();
        assert_eq!(route.summary.num_edges, 2);
        assert_eq!(route.summary.hazard_edges, 0);
        assert!((route.summary.length - 0.002).abs() < 1e-9);
        assert!(route.summary.length > 0.0);
        assert_eq!(route.nodes.first(), Some(&NodeId(0)));
        assert_eq!(route.nodes.last(), Some(&NodeId(2)));
    }

    #[test]
    fn query_points_snap_to_nearest_nodes() {
        let graph = square(true);
        // Slightly off A and C.
        let route = RoutePlanner::new()
            .route(&graph, 50.05995, 19.93995, 50.06105, 19.94105)
            .unwrap();
        assert_eq!(route.nodes, vec![NodeId(0), NodeId(3), NodeId(2)]);
    }

    #[test]
    fn safe_detour_wins_below_penalty_ratio() {
        // Detour ≈ 2.24 < 1 × 1000.
        let graph = shortcut_vs_detour(1.0);
        let route = RoutePlanner::new().route(&graph, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(route.summary.num_edges, 2);
        assert_eq!(route.summary.hazard_edges, 0);
    }

    #[test]
    fn hazardous_shortcut_wins_above_penalty_ratio() {
        // Detour ≈ 1200 > 1 × 1000.
        let graph = shortcut_vs_detour(600.0);
        let route = RoutePlanner::new().route(&graph, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(route.summary.num_edges, 1);
        assert_eq!(route.summary.hazard_edges, 1);
    }

    /// Apex height that makes the two-edge detour `total` long.
    fn detour_height(total: f64) -> f64 {
        ((total / 2.0).powi(2) - 0.25).sqrt()
    }

    #[test]
    fn flip_happens_at_the_penalty_ratio() {
        let planner = RoutePlanner::new();

        let graph = shortcut_vs_detour(detour_height(999.8));
        let route = planner.route(&graph, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(route.summary.hazard_edges, 0);
        assert!((route.summary.length - 999.8).abs() < 1e-6);

        let graph = shortcut_vs_detour(detour_height(1000.2));
        let route = planner.route(&graph, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(route.summary.hazard_edges, 1);
        assert_eq!(route.summary.length, 1.0);
    }

    #[test]
    fn summary_length_is_unpenalised() {
        let graph = shortcut_vs_detour(600.0);
        let route = RoutePlanner::new().route(&graph, 0.0, 0.0, 0.0, 1.0).unwrap();
        let true_sum: f64 = route.edges.iter().map(|e| graph.edge_length[e.index()]).sum();
        assert_eq!(route.summary.length, true_sum);
        assert_eq!(route.summary.length, 1.0);
        assert_eq!(route.summary.cost, 1000.0);
        assert_eq!(route.summary.meta().length_m, 1.0);
    }

    #[test]
    fn cost_model_is_substitutable() {
        let graph = shortcut_vs_detour(1.0);

        // Penalty 2: hazardous cost 2 < detour 2.24.
        let mild = RoutePlanner::with_cost(HazardPenalty::new(2.0).unwrap());
        let route = mild.route(&graph, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(route.summary.hazard_edges, 1);
        assert_eq!(mild.cost_model().factor(), 2.0);

        let blind = RoutePlanner::with_cost(LengthOnly);
        let route = blind.route(&graph, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(route.summary.num_edges, 1);
    }

    #[test]
    fn unusable_penalty_factors_are_rejected() {
        for factor in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 0.5, 0.0, -2.0] {
            let err = HazardPenalty::new(factor).unwrap_err();
            assert!(matches!(err, SpatialError::InvalidPenalty(_)), "factor {factor}");
            assert_eq!(err.kind(), crate::ErrorKind::InvalidPenalty);
        }
        assert_eq!(HazardPenalty::new(1.0).unwrap().factor(), 1.0);
        assert_eq!(HazardPenalty::default().factor(), 1000.0);
    }

    #[test]
    fn lone_hazardous_edge_is_still_routable() {
        let mut b = GraphBuilder::new();
        b.add_segment(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0), None);
        let mut graph = b.finish().unwrap();
        graph.annotate_hazards(&HazardIndex::from_polygons([rect([0.4, -0.1], [0.6, 0.1])]));

        let route = RoutePlanner::new().route(&graph, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(route.summary.num_edges, 1);
        assert_eq!(route.summary.hazard_edges, 1);
        assert_eq!(route.summary.cost, 1000.0);
    }

    #[test]
    fn penalty_applies_only_to_hazardous_edges() {
        let graph = shortcut_vs_detour(1.0);
        let p = HazardPenalty::default();
        for i in 0..graph.edge_count() {
            let e = graph.edge(fr_core::EdgeId(i as u32));
            let expected = if e.hazardous { e.length * 1000.0 } else { e.length };
            assert_eq!(p.cost(e), expected);
        }
    }

    #[test]
    fn empty_graph_is_an_error() {
        let empty = GraphBuilder::new()
            .build_or_empty(&collection(vec![]))
            .unwrap();
        let err = RoutePlanner::new().route(&empty, 0.0, 0.0, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, SpatialError::EmptyGraph));
    }

    #[test]
    fn disconnected_nodes_have_no_path() {
        let doc = collection(vec![
            line(&[[0.0, 0.0], [1.0, 0.0]]),
            line(&[[10.0, 0.0], [11.0, 0.0]]),
        ]);
        let graph = GraphBuilder::new().build(&doc).unwrap();
        let err = RoutePlanner::new().route(&graph, 0.0, 0.0, 0.0, 11.0).unwrap_err();
        assert!(matches!(err, SpatialError::NoPath { .. }));
    }

    #[test]
    fn same_node_gives_trivial_route() {
        let graph = square(false);
        let route = RoutePlanner::new()
            .route(&graph, A[1], A[0], A[1] + 1e-7, A[0])
            .unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.summary.num_edges, 0);
        assert_eq!(route.summary.length, 0.0);
        assert_eq!(route.geometry.0.len(), 2);
    }

    #[test]
    fn non_finite_query_is_rejected() {
        let graph = square(false);
        let err = RoutePlanner::new()
            .route(&graph, f64::NAN, A[0], C[1], C[0])
            .unwrap_err();
        assert!(matches!(err, SpatialError::InvalidCoordinate(_)));
    }

    #[test]
    fn routes_are_deterministic() {
        let first = RoutePlanner::new().route(&square(false), A[1], A[0], C[1], C[0]).unwrap();
        let second = RoutePlanner::new().route(&square(false), A[1], A[0], C[1], C[0]).unwrap();
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn feature_output_shape() {
        let graph = square(true);
        let route = RoutePlanner::new()
            .route(&graph, A[1], A[0], C[1], C[0])
            .unwrap();
        let feature = route.to_feature();
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["geometry"]["type"], "LineString");
        assert_eq!(json["geometry"]["coordinates"].as_array().unwrap().len(), 3);
        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props["nodes"], serde_json::json!(3));
        assert!(props["length"].as_f64().unwrap() > 0.0);

        let meta = serde_json::to_value(route.summary.meta()).unwrap();
        assert_eq!(meta["num_edges"], serde_json::json!(2));
        assert_eq!(meta["avoided_edges"], serde_json::json!(0));
        assert!(meta["length_m"].as_f64().unwrap() > 0.0);

        assert_eq!(route.to_feature_collection().features.len(), 1);
    }

    #[test]
    fn planner_is_shareable_across_threads() {
        let graph = std::sync::Arc::new(square(true));
        let planner = std::sync::Arc::new(RoutePlanner::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let graph = graph.clone();
                let planner = planner.clone();
                std::thread::spawn(move || {
                    planner.route(&graph, A[1], A[0], C[1], C[0]).unwrap().nodes
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), vec![NodeId(0), NodeId(3), NodeId(2)]);
        }
    }
}

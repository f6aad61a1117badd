//! Cost models and the hazard-averse route planner.
//!
//! # Pluggability
//!
//! The search never looks at hazard flags itself; it asks an [`EdgeCost`]
//! for the weight of each edge.  [`HazardPenalty`] is the default policy,
//! and alternative policies (different factors, length-only) are swapped in
//! through [`RoutePlanner::with_cost`] without touching the search.
//!
//! # Cost vs. length
//!
//! The penalised cost is used only to rank paths.  Reported lengths are
//! always the true edge lengths.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, info};

use fr_core::{EdgeId, GeoPoint, NodeId};

use crate::network::{EdgeRef, RoadGraph};
use crate::route::PlannedRoute;
use crate::{SpatialError, SpatialResult};

/// Multiplier applied to hazardous edges by [`HazardPenalty::default`].
pub const DEFAULT_PENALTY_FACTOR: f64 = 1000.0;

// ── Cost models ───────────────────────────────────────────────────────────────

/// Weight of traversing one edge, in either direction.
///
/// Implementations must return a finite, non-negative value and must be
/// `Send + Sync` so one planner can serve concurrent queries.
pub trait EdgeCost: Send + Sync {
    fn cost(&self, edge: EdgeRef<'_>) -> f64;
}

/// Length for safe edges, length × `factor` for hazardous ones.
///
/// Hazardous edges stay traversable, so a route exists whenever the graph is
/// connected, but any safe detour shorter than `factor` times the hazardous
/// stretch wins.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HazardPenalty {
    factor: f64,
}

impl HazardPenalty {
    /// # Errors
    ///
    /// [`SpatialError::InvalidPenalty`] unless `factor` is finite and at
    /// least 1.
    pub fn new(factor: f64) -> SpatialResult<Self> {
        if factor.is_finite() && factor >= 1.0 {
            Ok(Self { factor })
        } else {
            Err(SpatialError::InvalidPenalty(factor))
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Default for HazardPenalty {
    fn default() -> Self {
        Self { factor: DEFAULT_PENALTY_FACTOR }
    }
}

impl EdgeCost for HazardPenalty {
    #[inline]
    fn cost(&self, edge: EdgeRef<'_>) -> f64 {
        if edge.hazardous {
            edge.length * self.factor
        } else {
            edge.length
        }
    }
}

/// Plain geometric length; hazards are ignored.
#[derive(Copy, Clone, Debug, Default)]
pub struct LengthOnly;

impl EdgeCost for LengthOnly {
    #[inline]
    fn cost(&self, edge: EdgeRef<'_>) -> f64 {
        edge.length
    }
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Nearest-node resolution + Dijkstra + summarisation.
///
/// Holds no per-query state; `&self` methods may run concurrently against a
/// shared `RoadGraph`.
#[derive(Clone, Debug, Default)]
pub struct RoutePlanner<C: EdgeCost = HazardPenalty> {
    cost: C,
}

impl RoutePlanner<HazardPenalty> {
    /// Planner with the default 1000× hazard penalty.
    pub fn new() -> Self {
        Self { cost: HazardPenalty::default() }
    }
}

impl<C: EdgeCost> RoutePlanner<C> {
    pub fn with_cost(cost: C) -> Self {
        Self { cost }
    }

    pub fn cost_model(&self) -> &C {
        &self.cost
    }

    /// Route between two query coordinates, given as latitude/longitude.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::InvalidCoordinate`] for NaN or infinite input.
    /// - [`SpatialError::EmptyGraph`] if the graph has no nodes.
    /// - [`SpatialError::NoPath`] if the snapped nodes are disconnected.
    pub fn route(
        &self,
        graph: &RoadGraph,
        start_lat: f64,
        start_lon: f64,
        end_lat: f64,
        end_lon: f64,
    ) -> SpatialResult<PlannedRoute> {
        let from = GeoPoint::try_new(start_lon, start_lat)?;
        let to = GeoPoint::try_new(end_lon, end_lat)?;
        self.route_points(graph, from, to)
    }

    pub fn route_points(
        &self,
        graph: &RoadGraph,
        from: GeoPoint,
        to: GeoPoint,
    ) -> SpatialResult<PlannedRoute> {
        info!("computing route from {from} to {to}");
        let source = graph.nearest_node(from).ok_or(SpatialError::EmptyGraph)?;
        let target = graph.nearest_node(to).ok_or(SpatialError::EmptyGraph)?;
        debug!("snapped to {source} -> {target}");

        let route = self.route_nodes(graph, source, target)?;
        info!(
            "path found: {} nodes, {} edges ({} hazardous)",
            route.summary.num_nodes, route.summary.num_edges, route.summary.hazard_edges
        );
        Ok(route)
    }

    /// Route between two nodes already in `graph`.
    pub fn route_nodes(
        &self,
        graph: &RoadGraph,
        from: NodeId,
        to: NodeId,
    ) -> SpatialResult<PlannedRoute> {
        let (edges, cost) = self.dijkstra(graph, from, to)?;
        Ok(PlannedRoute::from_edges(graph, from, edges, cost))
    }

    /// Edge sequence and total penalised cost of the cheapest path.
    fn dijkstra(
        &self,
        graph: &RoadGraph,
        from: NodeId,
        to: NodeId,
    ) -> SpatialResult<(Vec<EdgeId>, f64)> {
        if graph.is_empty() {
            return Err(SpatialError::EmptyGraph);
        }
        if from == to {
            return Ok((Vec::new(), 0.0));
        }

        let n = graph.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev = vec![(EdgeId::INVALID, NodeId::INVALID); n];
        let mut heap = BinaryHeap::new();

        dist[from.index()] = 0.0;
        heap.push(State { cost: 0.0, node: from });

        while let Some(State { cost, node }) = heap.pop() {
            if node == to {
                return Ok((reconstruct(&prev, from, to), cost));
            }
            // Stale heap entry.
            if cost > dist[node.index()] {
                continue;
            }
            for (edge, next) in graph.arcs(node) {
                let next_cost = cost + self.cost.cost(graph.edge(edge));
                if next_cost < dist[next.index()] {
                    dist[next.index()] = next_cost;
                    prev[next.index()] = (edge, node);
                    heap.push(State { cost: next_cost, node: next });
                }
            }
        }

        Err(SpatialError::NoPath { from, to })
    }
}

fn reconstruct(prev: &[(EdgeId, NodeId)], from: NodeId, to: NodeId) -> Vec<EdgeId> {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let (edge, parent) = prev[cur.index()];
        edges.push(edge);
        cur = parent;
    }
    edges.reverse();
    edges
}

// ── Heap state ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Eq for State {}

// Min-heap by cost; NodeId breaks ties so pops are deterministic.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

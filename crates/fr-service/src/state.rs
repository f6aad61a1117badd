//! Process-wide routing state.
//!
//! # Snapshots
//!
//! A [`Snapshot`] bundles one immutable graph with its hazard counts and the
//! outcome of the build that produced it.  [`RoutingState`] holds the current
//! snapshot behind an `RwLock<Arc<_>>`; the lock guards only the pointer, so
//! queries clone the `Arc` and run without holding it.  A rebuild constructs
//! a new snapshot off-lock and swaps it in; queries already running keep the
//! snapshot they started with.
//!
//! # Failure policy
//!
//! A failed build never leaves the state unusable: the empty snapshot is
//! installed with [`BuildStatus::Fallback`], and every query then fails with
//! `EmptyGraph` until a later refresh succeeds.

use std::sync::{Arc, PoisonError, RwLock};

use log::{info, warn};
use serde::Serialize;

use fr_spatial::{ErrorKind, HazardPenalty, HazardStats, RoadGraph, RoutePlanner};

use crate::loader::load_network;
use crate::{RouteQuery, RouteResponse, ServiceConfig, ServiceResult};

/// How the current snapshot came to be.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum BuildStatus {
    /// No build attempted yet.
    Uninitialized,
    /// Built from the configured sources.
    Built,
    /// The last build failed with this error; the graph is empty.
    Fallback(ErrorKind),
}

/// One immutable generation of routing data.
pub struct Snapshot {
    pub graph:        RoadGraph,
    pub hazard_stats: HazardStats,
    pub status:       BuildStatus,
}

impl Snapshot {
    fn empty(status: BuildStatus) -> Self {
        Self {
            graph: RoadGraph::empty(),
            hazard_stats: HazardStats::default(),
            status,
        }
    }
}

pub struct RoutingState {
    config:  ServiceConfig,
    planner: RoutePlanner<HazardPenalty>,
    current: RwLock<Arc<Snapshot>>,
}

impl RoutingState {
    /// Uninitialised state holding the empty snapshot.
    ///
    /// # Errors
    ///
    /// Whatever [`ServiceConfig::validate`] rejects.
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        config.validate()?;
        let planner = RoutePlanner::with_cost(HazardPenalty::new(config.penalty_factor)?);
        Ok(Self {
            config,
            planner,
            current: RwLock::new(Arc::new(Snapshot::empty(BuildStatus::Uninitialized))),
        })
    }

    /// [`new`](Self::new) followed by one [`refresh`](Self::refresh).
    pub fn initialize(config: ServiceConfig) -> ServiceResult<Self> {
        let state = Self::new(config)?;
        state.refresh();
        Ok(state)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Rebuild from the configured sources and swap in the result.
    ///
    /// Never fails: on error the empty snapshot is installed and the error
    /// kind is recorded in the returned status.
    pub fn refresh(&self) -> BuildStatus {
        let next = match load_network(&self.config) {
            Ok((graph, hazard_stats)) => Snapshot {
                graph,
                hazard_stats,
                status: BuildStatus::Built,
            },
            Err(e) if !e.is_fatal() => {
                info!("{e}; serving an empty graph");
                Snapshot::empty(BuildStatus::Fallback(e.kind()))
            }
            Err(e) => {
                warn!("network build failed ({}): {e}; serving an empty graph", e.kind());
                Snapshot::empty(BuildStatus::Fallback(e.kind()))
            }
        };
        let status = next.status;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        info!("routing snapshot replaced: {status:?}");
        status
    }

    /// The current snapshot.  Stays valid after later refreshes.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn status(&self) -> BuildStatus {
        self.snapshot().status
    }

    pub fn hazard_stats(&self) -> HazardStats {
        self.snapshot().hazard_stats
    }

    /// Validate `query` and route it against the current snapshot.
    pub fn route(&self, query: &RouteQuery) -> ServiceResult<RouteResponse> {
        query.validate()?;
        let snapshot = self.snapshot();
        let route = self.planner.route(
            &snapshot.graph,
            query.start_lat,
            query.start_lon,
            query.end_lat,
            query.end_lon,
        )?;
        Ok(RouteResponse::from(&route))
    }
}

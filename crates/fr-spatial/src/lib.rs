//! `fr-spatial`: road graph, hazard index, and hazard-averse routing.
//!
//! # Pipeline
//!
//! 1. [`HazardIndex::build`] indexes flood polygons.
//! 2. [`GraphBuilder::build`] turns road lines into a [`RoadGraph`].
//! 3. [`RoadGraph::annotate_hazards`] stamps each edge against the index.
//! 4. [`RoutePlanner::route`] answers queries against the finished graph.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`network`] | `RoadGraph` (CSR + node R-tree), `EdgeRef`                |
//! | [`builder`] | `GraphBuilder`, `BuildStats`                              |
//! | [`hazard`]  | `HazardIndex`, `HazardStats`, edge annotation             |
//! | [`router`]  | `EdgeCost` trait, `HazardPenalty`, `LengthOnly`, `RoutePlanner` |
//! | [`route`]   | `PlannedRoute`, `RouteSummary`, `RouteMeta`               |
//! | [`io`]      | GeoJSON parsing and reading                               |
//! | [`error`]   | `SpatialError`, `ErrorKind`, `SpatialResult<T>`           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Hazard annotation on Rayon worker threads.              |
//! | `serde`    | Serde derives on `fr-core` types.                       |

pub mod builder;
pub mod error;
pub mod hazard;
pub mod io;
pub mod network;
pub mod route;
pub mod router;

#[cfg(test)]
mod tests;

pub use builder::{BuildStats, GraphBuilder};
pub use error::{ErrorKind, SpatialError, SpatialResult};
pub use hazard::{HazardIndex, HazardStats};
pub use io::{parse_geojson, read_geojson};
pub use network::{EdgeRef, RoadGraph};
pub use route::{PlannedRoute, RouteMeta, RouteSummary};
pub use router::{DEFAULT_PENALTY_FACTOR, EdgeCost, HazardPenalty, LengthOnly, RoutePlanner};

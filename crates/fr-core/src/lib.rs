//! `fr-core`: foundational types for the `floodroute` workspace.
//!
//! Every other `fr-*` crate depends on this one.  It has no `fr-*`
//! dependencies and only `geo` (for coordinate conversions) and `thiserror`,
//! plus optional `serde`.
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`                                        |
//! | [`geo`]     | `GeoPoint`, planar and haversine distance                 |
//! | [`coord`]   | `CoordKey`, `CoordPrecision` (node identity by coordinate) |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.      |

pub mod coord;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::{CoordKey, CoordPrecision};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId};

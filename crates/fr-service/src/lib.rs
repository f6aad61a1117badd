//! `fr-service`: the process-facing layer of floodroute.
//!
//! Owns the configuration, loads the road and hazard sources, and keeps the
//! current routing snapshot behind [`RoutingState`].  A transport layer (HTTP
//! handler, CLI, …) constructs one `RoutingState`, calls
//! [`RoutingState::route`] per request and [`RoutingState::refresh`] when the
//! sources change.
//!
//! # Quick-start
//!
//! ```rust,no_run
//! use fr_service::{RouteQuery, RoutingState, ServiceConfig};
//!
//! let config = ServiceConfig::default();
//! let state = RoutingState::initialize(config)?;
//! let response = state.route(&RouteQuery::new(50.06, 19.94, 50.061, 19.941))?;
//! println!("{} edges", response.meta.num_edges);
//! # Ok::<(), fr_service::ServiceError>(())
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod query;
pub mod state;


pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use loader::{load_hazards, load_network};
pub use query::{RouteQuery, RouteResponse};
pub use state::{BuildStatus, RoutingState, Snapshot};

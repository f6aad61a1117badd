//! Service configuration.
//!
//! # TOML format
//!
//! ```toml
//! roads_path      = "data/roads.geojson"
//! hazards_path    = "data/flood_zones.geojson"
//! coord_precision = "exact"          # or { decimals = 6 }
//! penalty_factor  = 1000.0
//! ```
//!
//! Every key is optional; missing keys take the [`Default`] values shown
//! above.  Unknown keys are rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use fr_core::CoordPrecision;
use fr_spatial::DEFAULT_PENALTY_FACTOR;

use crate::{ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Road network FeatureCollection (LineString / MultiLineString).
    pub roads_path:      PathBuf,
    /// Flood zone FeatureCollection (Polygon / MultiPolygon).  May be absent.
    pub hazards_path:    PathBuf,
    /// Node identity rule for road vertices.
    pub coord_precision: CoordPrecision,
    /// Cost multiplier for hazardous edges.
    pub penalty_factor:  f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            roads_path:      PathBuf::from("data/roads.geojson"),
            hazards_path:    PathBuf::from("data/flood_zones.geojson"),
            coord_precision: CoordPrecision::Exact,
            penalty_factor:  DEFAULT_PENALTY_FACTOR,
        }
    }
}

impl ServiceConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> ServiceResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> ServiceResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ServiceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject precisions beyond `f64` resolution and penalty factors that
    /// would make hazardous edges cheaper than safe ones.
    pub fn validate(&self) -> ServiceResult<()> {
        self.coord_precision.validate()?;
        if !self.penalty_factor.is_finite() || self.penalty_factor < 1.0 {
            return Err(ServiceError::Config(format!(
                "penalty_factor must be a finite number >= 1, got {}",
                self.penalty_factor
            )));
        }
        Ok(())
    }
}

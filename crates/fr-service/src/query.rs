//! Request and response shapes of the routing endpoint.

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use fr_spatial::{PlannedRoute, RouteMeta};

use crate::{ServiceError, ServiceResult};

/// Start and end coordinates of one route request, in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat:   f64,
    pub end_lon:   f64,
}

impl RouteQuery {
    pub fn new(start_lat: f64, start_lon: f64, end_lat: f64, end_lon: f64) -> Self {
        Self { start_lat, start_lon, end_lat, end_lon }
    }

    /// Every value finite, latitudes in [-90, 90], longitudes in [-180, 180].
    pub fn validate(&self) -> ServiceResult<()> {
        check("start_lat", self.start_lat, 90.0)?;
        check("start_lon", self.start_lon, 180.0)?;
        check("end_lat", self.end_lat, 90.0)?;
        check("end_lon", self.end_lon, 180.0)?;
        Ok(())
    }

    /// Parse `key=value` style parameters, e.g. from a query string.
    ///
    /// Unknown keys are ignored; a missing or non-numeric coordinate is an
    /// error.  The result is validated.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> ServiceResult<Self> {
        let mut values: [Option<f64>; 4] = [None; 4];
        for (key, raw) in pairs {
            let slot = match key {
                "start_lat" => 0,
                "start_lon" => 1,
                "end_lat" => 2,
                "end_lon" => 3,
                _ => continue,
            };
            let v = raw.trim().parse::<f64>().map_err(|_| {
                ServiceError::InvalidQuery(format!("{key} is not a number: {raw:?}"))
            })?;
            values[slot] = Some(v);
        }

        let get = |slot: usize, key: &str| {
            values[slot]
                .ok_or_else(|| ServiceError::InvalidQuery(format!("missing parameter {key}")))
        };
        let query = Self {
            start_lat: get(0, "start_lat")?,
            start_lon: get(1, "start_lon")?,
            end_lat:   get(2, "end_lat")?,
            end_lon:   get(3, "end_lon")?,
        };
        query.validate()?;
        Ok(query)
    }
}

fn check(name: &str, value: f64, limit: f64) -> ServiceResult<()> {
    if !value.is_finite() {
        return Err(ServiceError::InvalidQuery(format!("{name} is not finite")));
    }
    if value.abs() > limit {
        return Err(ServiceError::InvalidQuery(format!(
            "{name} = {value} is outside [-{limit}, {limit}]"
        )));
    }
    Ok(())
}

/// Route geometry plus summary metadata.
#[derive(Clone, Debug, Serialize)]
pub struct RouteResponse {
    pub route: FeatureCollection,
    pub meta:  RouteMeta,
}

impl From<&PlannedRoute> for RouteResponse {
    fn from(route: &PlannedRoute) -> Self {
        Self {
            route: route.to_feature_collection(),
            meta:  route.summary.meta(),
        }
    }
}
